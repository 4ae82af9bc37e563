use nalgebra::Rotation2;

use crate::cartesian::{CartesianPoint2dFloat, Point2d};

/// Relative slack on the segment parameters when testing whether an intersection lies on both segments. Keeps
/// intersections that fall exactly on a shared endpoint from being lost to rounding.
const PARAMETER_TOLERANCE: f64 = 1e-9;

/// A straight line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<Point>(pub Point, pub Point);

impl Segment<Point2d> {
    /// Start point.
    pub fn start(&self) -> Point2d {
        self.0
    }

    /// End point.
    pub fn end(&self) -> Point2d {
        self.1
    }

    /// Length of the segment.
    pub fn length(&self) -> f64 {
        self.0.distance(&self.1)
    }

    /// Azimuth of the segment direction in degrees, see [`CartesianPoint2dFloat::azimuth`].
    pub fn azimuth(&self) -> f64 {
        self.0.azimuth(&self.1)
    }

    /// Returns the point where this segment crosses `other`, or `None` if the segments do not cross or are parallel.
    ///
    /// Endpoints are considered part of the segments.
    pub fn intersection(&self, other: &Segment<Point2d>) -> Option<Point2d> {
        let r = self.1 - self.0;
        let s = other.1 - other.0;
        let denominator = r.perp(&s);
        if denominator.abs() <= f64::EPSILON * r.norm() * s.norm() {
            return None;
        }

        let qp = other.0 - self.0;
        let t = qp.perp(&s) / denominator;
        let u = qp.perp(&r) / denominator;

        let range = -PARAMETER_TOLERANCE..=1.0 + PARAMETER_TOLERANCE;
        if range.contains(&t) && range.contains(&u) {
            Some(self.0 + r * t)
        } else {
            None
        }
    }

    /// Rotates the segment clockwise by `angle` degrees around the `pivot` point.
    pub fn rotate(&self, angle: f64, pivot: &Point2d) -> Self {
        let rotation = Rotation2::new(-angle.to_radians());
        Self(
            pivot + rotation * (self.0 - pivot),
            pivot + rotation * (self.1 - pivot),
        )
    }

    /// Extends the segment by `start_distance` before its start point and by `end_distance` after its end point.
    ///
    /// A zero-length segment has no direction and is returned unchanged.
    pub fn extend(&self, start_distance: f64, end_distance: f64) -> Self {
        let direction = self.1 - self.0;
        let length = direction.norm();
        if length == 0.0 {
            return *self;
        }

        let unit = direction / length;
        Self(self.0 - unit * start_distance, self.1 + unit * end_distance)
    }
}
