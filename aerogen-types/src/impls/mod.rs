//! Simple implementations of the geometry traits.

mod contour;
mod polygon;

pub use contour::{ClosedContour, Contour};
pub use polygon::Polygon;
