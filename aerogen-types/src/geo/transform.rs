use crate::cartesian::{CartesianPoint2d, Point2d};
use crate::error::AerogenTypesError;
use crate::geo::crs::Crs;
use crate::geo::geodesy::GeodesyProjection;
use crate::geo::point::{GeoPoint, GeoPoint2d, NewGeoPoint};
use crate::geo::projection::Projection;

/// Transformation of points between two coordinate reference systems.
///
/// Points of geographic systems are stored as `(lon, lat)` in `(x, y)`. The transformation goes through geographic
/// WGS84 coordinates: the source point is unprojected first, then projected into the target system.
pub struct CrsTransform {
    source: Crs,
    target: Crs,
    source_projection: Option<GeodesyProjection<GeoPoint2d, Point2d>>,
    target_projection: Option<GeodesyProjection<GeoPoint2d, Point2d>>,
}

impl CrsTransform {
    /// Creates a transformation from `source` to `target`.
    pub fn new(source: Crs, target: Crs) -> Result<Self, AerogenTypesError> {
        Ok(Self {
            source,
            target,
            source_projection: Self::projection_for(&source)?,
            target_projection: Self::projection_for(&target)?,
        })
    }

    /// Source CRS.
    pub fn source(&self) -> Crs {
        self.source
    }

    /// Target CRS.
    pub fn target(&self) -> Crs {
        self.target
    }

    /// Whether the transformation leaves the points unchanged.
    pub fn is_identity(&self) -> bool {
        self.source == self.target
    }

    fn projection_for(
        crs: &Crs,
    ) -> Result<Option<GeodesyProjection<GeoPoint2d, Point2d>>, AerogenTypesError> {
        crs.geodesy_definition()
            .map(|definition| GeodesyProjection::new(&definition))
            .transpose()
    }

    fn to_geo(
        point: &Point2d,
        projection: &Option<GeodesyProjection<GeoPoint2d, Point2d>>,
    ) -> Option<GeoPoint2d> {
        match projection {
            Some(projection) => projection.unproject(point),
            None => Some(GeoPoint2d::lonlat(point.x(), point.y())),
        }
    }

    fn from_geo(
        point: &GeoPoint2d,
        projection: &Option<GeodesyProjection<GeoPoint2d, Point2d>>,
    ) -> Option<Point2d> {
        match projection {
            Some(projection) => projection.project(point),
            None => Some(Point2d::new(point.lon(), point.lat())),
        }
    }
}

impl Projection for CrsTransform {
    type InPoint = Point2d;
    type OutPoint = Point2d;

    fn project(&self, input: &Point2d) -> Option<Point2d> {
        if self.is_identity() {
            return Some(*input);
        }

        let geo = Self::to_geo(input, &self.source_projection)?;
        Self::from_geo(&geo, &self.target_projection)
    }

    fn unproject(&self, input: &Point2d) -> Option<Point2d> {
        if self.is_identity() {
            return Some(*input);
        }

        let geo = Self::to_geo(input, &self.target_projection)?;
        Self::from_geo(&geo, &self.source_projection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn wgs84_to_utm_and_back() {
        let transform = CrsTransform::new(Crs::Wgs84, Crs::utm(32, true).unwrap()).unwrap();
        let point = Point2d::new(9.0, 0.0);
        let projected = transform.project(&point).unwrap();
        assert_abs_diff_eq!(projected, Point2d::new(500_000.0, 0.0), epsilon = 1e-3);

        let original = Point2d::new(10.3, 47.9);
        let round_trip = transform
            .unproject(&transform.project(&original).unwrap())
            .unwrap();
        assert_abs_diff_eq!(round_trip, original, epsilon = 1e-8);
    }

    #[test]
    fn southern_hemisphere_has_false_northing() {
        let transform = CrsTransform::new(Crs::Wgs84, Crs::utm(32, false).unwrap()).unwrap();
        let projected = transform.project(&Point2d::new(9.0, -10.0)).unwrap();
        assert!(projected.y > 8_000_000.0 && projected.y < 10_000_000.0);
        assert_abs_diff_eq!(projected.x, 500_000.0, epsilon = 1e-3);
    }

    #[test]
    fn utm_to_utm_goes_through_geographic() {
        let source = Crs::utm(33, true).unwrap();
        let target = Crs::utm(34, true).unwrap();
        let transform = CrsTransform::new(source, target).unwrap();
        let point = Point2d::new(700_000.0, 5_500_000.0);
        let moved = transform.project(&point).unwrap();
        assert!(moved.x < point.x);
        let back = transform.unproject(&moved).unwrap();
        assert_abs_diff_eq!(back, point, epsilon = 1e-4);
    }

    #[test]
    fn identity() {
        let transform = CrsTransform::new(Crs::Wgs84, Crs::Wgs84).unwrap();
        assert!(transform.is_identity());
        let point = Point2d::new(1.0, 2.0);
        assert_eq!(transform.project(&point), Some(point));
    }
}
