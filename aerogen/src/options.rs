//! Configuration of the parser and the planner.

use serde::{Deserialize, Serialize};

use crate::error::AerogenError;

/// Which optional parts of a layout file the parser should look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserCapabilities {
    /// Read `l li` corner-pair records.
    pub corner_record: bool,
    /// Look for `<basename>_sl.xyz` / `<basename>_tl.xyz` next to the layout file.
    pub auxiliary_files: bool,
}

impl Default for ParserCapabilities {
    fn default() -> Self {
        Self {
            corner_record: true,
            auxiliary_files: true,
        }
    }
}

/// Layout file parser options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Suffix of the header line carrying the hemisphere sign. Layout file variants use either `Lat` or `Lon`.
    pub hemisphere_key: String,
    /// Optional parts of the file to read.
    pub capabilities: ParserCapabilities,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            hemisphere_key: "Lat".to_string(),
            capabilities: ParserCapabilities::default(),
        }
    }
}

/// Options of the [`SurveyPlanner`](crate::SurveyPlanner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerOptions {
    /// Parser options.
    pub parser: ParserOptions,
    /// EPSG code of the CRS generated lines are delivered in.
    pub target_epsg: u32,
    /// EPSG code of the coordinates stored in auxiliary `.xyz` files.
    pub auxiliary_epsg: u32,
    /// EPSG code used when the CRS cannot be detected from the header.
    pub fallback_epsg: Option<u32>,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            parser: ParserOptions::default(),
            target_epsg: 4326,
            auxiliary_epsg: 4326,
            fallback_epsg: None,
        }
    }
}

impl PlannerOptions {
    /// Parses options from a JSON document. Missing fields take their default values.
    ///
    /// ```
    /// use aerogen::PlannerOptions;
    ///
    /// let options = PlannerOptions::from_json(r#"{ "target_epsg": 32633 }"#).unwrap();
    /// assert_eq!(options.target_epsg, 32633);
    /// assert_eq!(options.parser.hemisphere_key, "Lat");
    /// ```
    pub fn from_json(json: &str) -> Result<Self, AerogenError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the parser options.
    pub fn with_parser(mut self, parser: ParserOptions) -> Self {
        self.parser = parser;
        self
    }

    /// Sets the EPSG code of the output CRS.
    pub fn with_target_epsg(mut self, epsg: u32) -> Self {
        self.target_epsg = epsg;
        self
    }

    /// Sets the EPSG code of auxiliary file coordinates.
    pub fn with_auxiliary_epsg(mut self, epsg: u32) -> Self {
        self.auxiliary_epsg = epsg;
        self
    }

    /// Sets the CRS to fall back to when it cannot be detected.
    pub fn with_fallback_epsg(mut self, epsg: u32) -> Self {
        self.fallback_epsg = Some(epsg);
        self
    }
}
