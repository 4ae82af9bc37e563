use nalgebra::{Point2, Scalar, Vector2};
use num_traits::{Bounded, Float, FromPrimitive, Num};

/// Point in a projected coordinate space. `x` is easting, `y` is northing.
pub type Point2d = Point2<f64>;

/// Point in a 2d cartesian coordinate space.
pub trait CartesianPoint2d {
    /// Numeric type of the coordinates.
    type Num: Num + Copy + PartialOrd + Bounded + Scalar + FromPrimitive;

    /// X coordinate.
    fn x(&self) -> Self::Num;
    /// Y coordinate.
    fn y(&self) -> Self::Num;

    /// Returns true if both coordinates of the points are exactly equal.
    fn equal(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        self.x() == other.x() && self.y() == other.y()
    }

    /// Vector from `other` to `self`.
    fn sub(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> Vector2<Self::Num> {
        Vector2::new(self.x() - other.x(), self.y() - other.y())
    }

    /// Squared euclidean distance.
    fn distance_sq(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> Self::Num {
        let v = self.sub(other);
        v.x * v.x + v.y * v.y
    }
}

/// Constructor for cartesian points.
pub trait NewCartesianPoint2d<Num = f64>: CartesianPoint2d<Num = Num> {
    /// Creates a point from its coordinates.
    fn new(x: Num, y: Num) -> Self;
}

/// Operations available for points with floating point coordinates.
pub trait CartesianPoint2dFloat<N: Float = f64>: CartesianPoint2d<Num = N> {
    /// Euclidean distance between the points.
    fn distance(&self, other: &impl CartesianPoint2d<Num = N>) -> N {
        self.distance_sq(other).sqrt()
    }

    /// Compass bearing from `self` to `other` in degrees, measured clockwise from the `y` axis.
    ///
    /// The value is signed and lies in `(-180, 180]`. Use [`normalize_degrees`] to bring it into `[0, 360)`.
    fn azimuth(&self, other: &impl CartesianPoint2d<Num = N>) -> N {
        (other.x() - self.x())
            .atan2(other.y() - self.y())
            .to_degrees()
    }
}

impl<N: Float, T: CartesianPoint2d<Num = N>> CartesianPoint2dFloat<N> for T {}

impl<Num: num_traits::Num + Copy + PartialOrd + Bounded + Scalar + FromPrimitive> CartesianPoint2d
    for Point2<Num>
{
    type Num = Num;

    fn x(&self) -> Num {
        self.x
    }
    fn y(&self) -> Num {
        self.y
    }
}

impl<Num: num_traits::Num + Copy + PartialOrd + Bounded + Scalar + FromPrimitive>
    NewCartesianPoint2d<Num> for Point2<Num>
{
    fn new(x: Num, y: Num) -> Self {
        Point2::new(x, y)
    }
}

/// Brings an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(360.0);
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn azimuth_is_clockwise_from_north() {
        let origin = Point2d::new(0.0, 0.0);
        assert_abs_diff_eq!(origin.azimuth(&Point2d::new(0.0, 5.0)), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(origin.azimuth(&Point2d::new(5.0, 0.0)), 90.0, epsilon = 1e-12);
        assert_abs_diff_eq!(origin.azimuth(&Point2d::new(0.0, -5.0)), 180.0, epsilon = 1e-12);
        assert_abs_diff_eq!(origin.azimuth(&Point2d::new(-5.0, 0.0)), -90.0, epsilon = 1e-12);
    }

    #[test]
    fn distance() {
        let a = Point2d::new(1.0, 1.0);
        let b = Point2d::new(4.0, 5.0);
        assert_abs_diff_eq!(a.distance(&b), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a.distance_sq(&b), 25.0);
    }

    #[test]
    fn normalize() {
        assert_abs_diff_eq!(normalize_degrees(-90.0), 270.0);
        assert_abs_diff_eq!(normalize_degrees(450.0), 90.0);
        assert_abs_diff_eq!(normalize_degrees(0.0), 0.0);
        assert!(normalize_degrees(-1e-20) < 360.0);
    }
}
