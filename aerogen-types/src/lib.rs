//! Geometry primitives and coordinate reference system helpers used by the `aerogen` flight line generator.
//!
//! The crate is split into:
//! * [`cartesian`] - points and segments in a projected (planar) coordinate space, with the handful of operations
//!   the line generators need: distance, azimuth, intersection, rotation and extension;
//! * [`contour`] - traits for sequences of points, with simple contour and polygon implementations in [`impls`];
//! * [`geo`] - geographic points, projections and [`Crs`](geo::Crs) identified by EPSG codes.

pub mod cartesian;
pub mod contour;
pub mod error;
pub mod geo;
pub mod impls;
pub mod segment;

pub use contour::{ClosedContour, Contour};
pub use error::AerogenTypesError;
pub use segment::Segment;
