//! Geographic coordinates (latitude and longitude) (see [`GeoPoint`]) and conversion between coordinate reference
//! systems (see [`Projection`] and [`CrsTransform`]).

mod crs;
#[cfg(feature = "geodesy")]
mod geodesy;
mod point;
mod projection;
#[cfg(feature = "geodesy")]
mod transform;

pub use crs::Crs;
#[cfg(feature = "geodesy")]
pub use geodesy::GeodesyProjection;
pub use point::{GeoPoint, GeoPoint2d, NewGeoPoint};
pub use projection::Projection;
#[cfg(feature = "geodesy")]
pub use transform::CrsTransform;
