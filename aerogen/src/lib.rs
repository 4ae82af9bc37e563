//! Aerogen derives the survey area, its coordinate reference system and the survey and tie flight lines from an
//! aerial survey layout file.
//!
//! # Quick start
//!
//! ```no_run
//! use std::path::Path;
//! use aerogen::{PlannerOptions, SurveyPlanner};
//!
//! let planner = SurveyPlanner::new(PlannerOptions::default().with_target_epsg(4326));
//! let layout = planner.plan(Path::new("block_a.txt")).unwrap();
//! println!(
//!     "{} survey lines, {} tie lines in {}",
//!     layout.survey_lines.len(),
//!     layout.tie_lines.len(),
//!     layout.survey_lines.crs()
//! );
//! ```
//!
//! # Main components
//!
//! * [`SurveyFileParser`] reads the header metadata, boundary vertices and corner records of a layout file.
//! * [`detect_crs`](crs::detect_crs) derives the UTM zone of the survey from the header.
//! * [`AreaPolygon`] is the closed survey boundary.
//! * [`AnalyticLineGenerator`](lines::AnalyticLineGenerator) sweeps parallel lines across the four area corners at the
//!   declared heading and spacing.
//! * [`LineFileCorrector`](lines::LineFileCorrector) builds lines from raw coordinates in auxiliary `.xyz` files and
//!   fixes digitizing errors at the turns of the flight path.
//! * [`SurveyPlanner`] runs all of the above for a layout file.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod boundary;
pub mod crs;
pub mod error;
pub mod lines;
mod metadata;
mod options;
pub mod parser;
mod planner;

pub use aerogen_types;
pub use boundary::AreaPolygon;
pub use error::AerogenError;
pub use lines::{GeneratedLineSet, LineFamily, Polyline};
pub use metadata::SurveyMetadata;
pub use options::{ParserCapabilities, ParserOptions, PlannerOptions};
pub use parser::{SurveyFile, SurveyFileParser};
pub use planner::{SurveyLayout, SurveyPlanner};
