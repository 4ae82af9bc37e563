//! Types and functions on geometries in cartesian coordinates.

mod point;

pub use point::{normalize_degrees, CartesianPoint2d, CartesianPoint2dFloat, NewCartesianPoint2d, Point2d};
