//! Parser of survey layout files.
//!
//! A layout file is a line oriented text file. Header lines carry a value followed by a key, e.g. `9;CM` or
//! `200,5;spacing SL`, boundary vertices are `c;<x>;<y>` records and the optional corner record is
//! `l li;<x1>;<y1>;<x2>;<y2>`. Numbers may use a comma as the decimal separator.

use std::fs;
use std::path::{Path, PathBuf};

use aerogen_types::cartesian::Point2d;

use crate::error::AerogenError;
use crate::metadata::SurveyMetadata;
use crate::options::ParserOptions;

const PROJECTION_MARKER: &str = "L1";
const CENTRAL_MERIDIAN_KEY: &str = "CM";
const SURVEY_HEADING_KEY: &str = "HSL";
const TIE_HEADING_KEY: &str = "HTL";
const SURVEY_SPACING_KEY: &str = "spacing SL";
const TIE_SPACING_KEY: &str = "spacing TL";
const BOUNDARY_PREFIX: &str = "c;";
const CORNER_PREFIX: &str = "l li";

/// Content of a parsed layout file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyFile {
    /// Path the file was read from, if it was read from the file system.
    pub path: Option<PathBuf>,
    /// Header metadata.
    pub metadata: SurveyMetadata,
    /// Boundary vertices in file order, not closed.
    pub boundary: Vec<Point2d>,
    /// Corner points from `l li` records, two per record.
    pub corners: Vec<Point2d>,
}

impl SurveyFile {
    /// The four corners the analytic line generator works with.
    ///
    /// Corner records take precedence. Without them the first four boundary vertices are used.
    pub fn line_corners(&self) -> Result<[Point2d; 4], AerogenError> {
        let (source, points) = if self.corners.is_empty() {
            ("boundary vertices", &self.boundary)
        } else {
            ("corner records", &self.corners)
        };

        if !self.corners.is_empty() && self.corners.len() != 4 {
            return Err(AerogenError::InsufficientLinePoints(format!(
                "expected 4 corner points, found {}",
                self.corners.len()
            )));
        }

        match points.get(..4) {
            Some(&[p0, p1, p2, p3]) => Ok([p0, p1, p2, p3]),
            _ => Err(AerogenError::InsufficientLinePoints(format!(
                "4 {source} required, found {}",
                points.len()
            ))),
        }
    }
}

/// Layout file parser.
#[derive(Debug, Clone, Default)]
pub struct SurveyFileParser {
    options: ParserOptions,
}

impl SurveyFileParser {
    /// Creates a new parser.
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Parser options.
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Reads and parses the file at `path`.
    pub fn parse_file(&self, path: &Path) -> Result<SurveyFile, AerogenError> {
        let data = fs::read_to_string(path).map_err(|source| AerogenError::FileUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let mut survey = self.parse(&data)?;
        survey.path = Some(path.to_path_buf());
        log::debug!(
            "Parsed {path:?}: {} boundary points, {} corner points",
            survey.boundary.len(),
            survey.corners.len()
        );

        Ok(survey)
    }

    /// Parses the content of a layout file.
    pub fn parse(&self, data: &str) -> Result<SurveyFile, AerogenError> {
        let mut survey = SurveyFile::default();
        for (index, raw) in data.lines().enumerate() {
            self.parse_line(raw.trim(), index + 1, &mut survey)?;
        }

        Ok(survey)
    }

    fn parse_line(
        &self,
        line: &str,
        line_no: usize,
        survey: &mut SurveyFile,
    ) -> Result<(), AerogenError> {
        let metadata = &mut survey.metadata;
        if line.is_empty() {
            return Ok(());
        }

        if line.starts_with(BOUNDARY_PREFIX) {
            let fields: Vec<&str> = line.split(';').collect();
            survey.boundary.push(point_at(&fields, 1, line_no)?);
        } else if line.starts_with(CORNER_PREFIX) {
            if !self.options.capabilities.corner_record {
                log::debug!("Ignoring corner record at line {line_no}");
                return Ok(());
            }

            let fields: Vec<&str> = line.split(';').collect();
            survey.corners.push(point_at(&fields, 1, line_no)?);
            survey.corners.push(point_at(&fields, 3, line_no)?);
        } else if line.contains(PROJECTION_MARKER) {
            let hint = line.split(';').next().unwrap_or_default().trim();
            log::debug!("Projection hint: {hint}");
            metadata.projection_hint = Some(hint.to_string());
        } else if line.ends_with(CENTRAL_MERIDIAN_KEY) {
            metadata.central_meridian = Some(header_number(line, line_no)?.trunc() as i32);
        } else if line.ends_with(self.options.hemisphere_key.as_str()) {
            metadata.northern_hemisphere = Some(header_number(line, line_no)? > 0.0);
        } else if line.ends_with(SURVEY_HEADING_KEY) {
            metadata.survey_heading_rad = Some(header_number(line, line_no)?.to_radians());
        } else if line.ends_with(TIE_HEADING_KEY) {
            metadata.tie_heading_rad = Some(header_number(line, line_no)?.to_radians());
        } else if line.ends_with(SURVEY_SPACING_KEY) {
            metadata.survey_spacing = Some(header_number(line, line_no)?);
        } else if line.ends_with(TIE_SPACING_KEY) {
            metadata.tie_spacing = Some(header_number(line, line_no)?);
        }

        Ok(())
    }
}

/// Parses a number accepting a comma as the decimal separator.
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    value.trim().replace(',', ".").parse().ok()
}

/// Value of a `<value>;<key>` or `<value> <key>` header line.
fn header_number(line: &str, line_no: usize) -> Result<f64, AerogenError> {
    let value = match line.split_once(';') {
        Some((value, _)) => value,
        None => line.split_whitespace().next().unwrap_or_default(),
    };

    parse_number(value).ok_or_else(|| AerogenError::MalformedRecord {
        line: line_no,
        reason: format!("invalid header value '{value}' in '{line}'"),
    })
}

fn point_at(fields: &[&str], index: usize, line_no: usize) -> Result<Point2d, AerogenError> {
    let coordinate = |i: usize| {
        fields
            .get(i)
            .and_then(|value| parse_number(value))
            .ok_or_else(|| AerogenError::MalformedRecord {
                line: line_no,
                reason: format!("expected a number in field {}", i + 1),
            })
    };

    Ok(Point2d::new(coordinate(index)?, coordinate(index + 1)?))
}
