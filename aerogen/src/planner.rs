//! Survey planner wiring parsing, CRS detection and line generation together.

use std::path::Path;

use aerogen_types::geo::{Crs, CrsTransform};

use crate::boundary::AreaPolygon;
use crate::crs::detect_crs;
use crate::error::AerogenError;
use crate::lines::{AnalyticLineGenerator, GeneratedLineSet, LineFamily, LineFileCorrector};
use crate::options::PlannerOptions;
use crate::parser::{SurveyFile, SurveyFileParser};

/// Everything derived from one layout file.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyLayout {
    /// Survey area in the survey CRS.
    pub area: AreaPolygon,
    /// CRS of the survey, detected from the header or the configured fallback.
    pub crs: Crs,
    /// Survey lines in the target CRS.
    pub survey_lines: GeneratedLineSet,
    /// Tie lines in the target CRS.
    pub tie_lines: GeneratedLineSet,
}

impl SurveyLayout {
    /// Lines of the given family.
    pub fn lines(&self, family: LineFamily) -> &GeneratedLineSet {
        match family {
            LineFamily::Survey => &self.survey_lines,
            LineFamily::Tie => &self.tie_lines,
        }
    }
}

/// Produces the survey area and flight lines from layout files.
///
/// For each line family the planner uses the auxiliary `.xyz` file next to the layout file when it exists and
/// auxiliary files are enabled, and the analytic generator otherwise.
#[derive(Debug, Clone, Default)]
pub struct SurveyPlanner {
    options: PlannerOptions,
}

impl SurveyPlanner {
    /// Creates a new planner.
    pub fn new(options: PlannerOptions) -> Self {
        Self { options }
    }

    /// Planner options.
    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    /// Reads the layout file at `path` and plans the survey.
    pub fn plan(&self, path: &Path) -> Result<SurveyLayout, AerogenError> {
        let survey = SurveyFileParser::new(self.options.parser.clone()).parse_file(path)?;
        self.plan_survey(&survey)
    }

    /// Plans an already parsed survey. Auxiliary files are only looked up when the survey has a path.
    pub fn plan_survey(&self, survey: &SurveyFile) -> Result<SurveyLayout, AerogenError> {
        let area = AreaPolygon::new(&survey.boundary)?;
        let crs = self.survey_crs(survey)?;
        let target = Crs::from_epsg(self.options.target_epsg)?;
        log::info!("Survey CRS is {crs}, lines are delivered in {target}");

        Ok(SurveyLayout {
            area,
            crs,
            survey_lines: self.family_lines(survey, LineFamily::Survey, crs, target)?,
            tie_lines: self.family_lines(survey, LineFamily::Tie, crs, target)?,
        })
    }

    fn survey_crs(&self, survey: &SurveyFile) -> Result<Crs, AerogenError> {
        match (detect_crs(&survey.metadata), self.options.fallback_epsg) {
            (Err(AerogenError::CrsUndetectable(reason)), Some(epsg)) => {
                log::warn!("Unable to detect CRS ({reason}), using EPSG:{epsg}");
                Ok(Crs::from_epsg(epsg)?)
            }
            (result, _) => result,
        }
    }

    fn family_lines(
        &self,
        survey: &SurveyFile,
        family: LineFamily,
        crs: Crs,
        target: Crs,
    ) -> Result<GeneratedLineSet, AerogenError> {
        let auxiliary = survey
            .path
            .as_deref()
            .filter(|_| self.options.parser.capabilities.auxiliary_files)
            .map(|path| family.auxiliary_file(path))
            .filter(|path| path.is_file());

        if let Some(auxiliary) = auxiliary {
            log::info!("Reading {family:?} lines from {auxiliary:?}");
            let auxiliary_crs = Crs::from_epsg(self.options.auxiliary_epsg)?;
            let lines = LineFileCorrector::new(auxiliary_crs, crs, target)?.correct_file(&auxiliary)?;
            return Ok(GeneratedLineSet::new(family, target, lines));
        }

        log::info!("Generating {family:?} lines from the area corners");
        let metadata = &survey.metadata;
        let heading = metadata
            .heading(family)
            .ok_or(AerogenError::MissingParameter(family.heading_key()))?;
        let spacing = metadata
            .spacing(family)
            .ok_or(AerogenError::MissingParameter(family.spacing_key()))?;

        let corners = survey.line_corners()?;
        let lines = AnalyticLineGenerator::new(&corners, family, heading, spacing)?.generate()?;
        GeneratedLineSet::new(family, crs, lines).reproject(&CrsTransform::new(crs, target)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const LAYOUT: &str = "\
UTM;L1
15;CM
49;Lat
90;HSL
0;HTL
100;spacing SL
250;spacing TL
c;500000;5500000
c;500000;5501000
c;501000;5501000
c;501000;5500000
";

    fn planner(target_epsg: u32) -> SurveyPlanner {
        SurveyPlanner::new(PlannerOptions::default().with_target_epsg(target_epsg))
    }

    #[test]
    fn analytic_lines_in_survey_crs() {
        let survey = SurveyFileParser::default().parse(LAYOUT).unwrap();
        let layout = planner(32633).plan_survey(&survey).unwrap();

        assert_eq!(layout.crs.epsg(), 32633);
        assert_eq!(layout.area.vertices().len(), 5);
        assert_eq!(layout.survey_lines.len(), 11);
        assert_eq!(layout.tie_lines.len(), 5);
        assert_eq!(layout.lines(LineFamily::Tie).crs(), layout.crs);
    }

    #[test]
    fn lines_are_reprojected_to_target() {
        let survey = SurveyFileParser::default().parse(LAYOUT).unwrap();
        let layout = planner(4326).plan_survey(&survey).unwrap();

        assert_eq!(layout.survey_lines.crs(), Crs::Wgs84);
        for line in layout.survey_lines.lines() {
            for point in line.iter() {
                assert!((14.9..15.1).contains(&point.x));
                assert!((49.6..49.7).contains(&point.y));
            }
        }
    }

    #[test]
    fn fallback_crs() {
        let data = LAYOUT.replace("UTM;L1", "S-JTSK;L1");
        let survey = SurveyFileParser::default().parse(&data).unwrap();
        assert_matches!(
            planner(4326).plan_survey(&survey),
            Err(AerogenError::CrsUndetectable(_))
        );

        let planner = SurveyPlanner::new(
            PlannerOptions::default()
                .with_target_epsg(32633)
                .with_fallback_epsg(32633),
        );
        assert_eq!(planner.plan_survey(&survey).unwrap().crs.epsg(), 32633);
    }

    #[test]
    fn missing_spacing() {
        let data = LAYOUT.replace("250;spacing TL\n", "");
        let survey = SurveyFileParser::default().parse(&data).unwrap();
        assert_matches!(
            planner(32633).plan_survey(&survey),
            Err(AerogenError::MissingParameter("spacing TL"))
        );
    }

    #[test]
    fn too_few_boundary_points() {
        let survey = SurveyFileParser::default()
            .parse("UTM;L1\n15;CM\nc;0;0\nc;1;1\n")
            .unwrap();
        assert_matches!(
            planner(32633).plan_survey(&survey),
            Err(AerogenError::InsufficientBoundaryPoints { found: 2 })
        );
    }
}
