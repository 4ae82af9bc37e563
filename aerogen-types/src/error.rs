//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error)]
pub enum AerogenTypesError {
    /// Geometry conversion error.
    #[error("invalid input geometry: {0}")]
    Conversion(String),
    /// The CRS is not supported by the projection backend.
    #[error("unsupported CRS: EPSG:{0}")]
    UnsupportedCrs(u32),
    /// Projection backend failed to build or apply an operation.
    #[error("projection failed: {0}")]
    Projection(String),
}
