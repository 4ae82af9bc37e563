//! Survey area polygon.

use aerogen_types::cartesian::{CartesianPoint2d, Point2d};
use aerogen_types::impls::{ClosedContour, Polygon};
use aerogen_types::Contour;

use crate::error::AerogenError;

/// Closed boundary of the survey area.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaPolygon {
    polygon: Polygon<Point2d>,
}

impl AreaPolygon {
    /// Builds the area polygon from boundary vertices in file order.
    ///
    /// At least 3 distinct vertices are required. The input is not modified; closing of the ring is done by
    /// [`AreaPolygon::vertices`].
    pub fn new(points: &[Point2d]) -> Result<Self, AerogenError> {
        let mut distinct: Vec<&Point2d> = Vec::with_capacity(points.len());
        for point in points {
            if !distinct.iter().any(|p| p.equal(point)) {
                distinct.push(point);
            }
        }

        if distinct.len() < 3 {
            return Err(AerogenError::InsufficientBoundaryPoints {
                found: distinct.len(),
            });
        }

        Ok(Self {
            polygon: ClosedContour::new(points.to_vec()).into(),
        })
    }

    /// Vertices of the boundary ring with the first vertex repeated at the end.
    pub fn vertices(&self) -> Vec<Point2d> {
        self.polygon
            .outer_contour
            .iter_points_closing()
            .copied()
            .collect()
    }

    /// The boundary as a polygon.
    pub fn polygon(&self) -> &Polygon<Point2d> {
        &self.polygon
    }

    /// Consumes the area returning the polygon.
    pub fn into_polygon(self) -> Polygon<Point2d> {
        self.polygon
    }
}
