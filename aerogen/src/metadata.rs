//! Survey header metadata.

use crate::lines::LineFamily;

/// Parameters declared in the header of a layout file.
///
/// Every field is optional: a field stays `None` when its header line is absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyMetadata {
    /// Projection name, e.g. `"UTM"`.
    pub projection_hint: Option<String>,
    /// Central meridian in whole degrees.
    pub central_meridian: Option<i32>,
    /// Whether the survey lies on the northern hemisphere.
    pub northern_hemisphere: Option<bool>,
    /// Heading of survey lines in radians.
    pub survey_heading_rad: Option<f64>,
    /// Distance between survey lines in survey units.
    pub survey_spacing: Option<f64>,
    /// Heading of tie lines in radians.
    pub tie_heading_rad: Option<f64>,
    /// Distance between tie lines in survey units.
    pub tie_spacing: Option<f64>,
}

impl SurveyMetadata {
    /// Heading declared for the given line family.
    pub fn heading(&self, family: LineFamily) -> Option<f64> {
        match family {
            LineFamily::Survey => self.survey_heading_rad,
            LineFamily::Tie => self.tie_heading_rad,
        }
    }

    /// Spacing declared for the given line family.
    pub fn spacing(&self, family: LineFamily) -> Option<f64> {
        match family {
            LineFamily::Survey => self.survey_spacing,
            LineFamily::Tie => self.tie_spacing,
        }
    }
}
