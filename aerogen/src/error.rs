//! Error types used by the crate.

use std::path::PathBuf;

use aerogen_types::AerogenTypesError;
use thiserror::Error;

/// Aerogen error type.
#[derive(Debug, Error)]
pub enum AerogenError {
    /// The layout or an auxiliary line file could not be opened or read.
    #[error("failed to read file {path:?}: {source}")]
    FileUnreadable {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Fewer than 3 distinct boundary vertices were found.
    #[error("unable to generate area polygon: {found} distinct boundary points, at least 3 required")]
    InsufficientBoundaryPoints {
        /// Number of distinct points found.
        found: usize,
    },
    /// Line corner data or auxiliary line data is absent or unusable.
    #[error("insufficient line points: {0}")]
    InsufficientLinePoints(String),
    /// The CRS cannot be derived from the header. The caller may supply one manually.
    #[error("unable to detect CRS: {0}")]
    CrsUndetectable(String),
    /// Degenerate input geometry, e.g. collinear corners.
    #[error("geometry construction failed: {0}")]
    GeometryConstruction(String),
    /// A record that must carry numbers could not be parsed.
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number in the source file.
        line: usize,
        /// What is wrong with the record.
        reason: String,
    },
    /// A header parameter needed by the line generator is not declared.
    #[error("missing header parameter: {0}")]
    MissingParameter(&'static str),
    /// CRS lookup or coordinate transformation failed.
    #[error("coordinate transformation failed: {0}")]
    Transformation(#[from] AerogenTypesError),
    /// Options document could not be parsed.
    #[error("invalid options: {0}")]
    Options(#[from] serde_json::Error),
}
