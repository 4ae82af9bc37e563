use std::path::Path;

use aerogen_types::cartesian::{normalize_degrees, CartesianPoint2dFloat, Point2d};
use aerogen_types::geo::{Crs, CrsTransform, Projection};
use aerogen_types::{AerogenTypesError, Segment};

use crate::error::AerogenError;
use crate::lines::records::{read_line_records, LineRecord};
use crate::lines::{is_real_intersection, Polyline};

/// Allowed deviation in degrees of the first turn from a right angle before the first two points are considered
/// swapped.
pub const FIRST_SEGMENT_TOLERANCE: f64 = 20.0;
/// Allowed deviation in degrees of a turn between lines from a right angle before the joint is corrected.
pub const INTERIOR_TOLERANCE: f64 = 5.0;

/// Turn in degrees `[0, 360)` at `b` when going from `a` through `b` to `c`. `0` is straight on, `90` is a right
/// turn and `270` a left turn.
pub fn turn_angle(a: &Point2d, b: &Point2d, c: &Point2d) -> f64 {
    normalize_degrees(b.azimuth(c) - a.azimuth(b))
}

fn is_near_normal(turn: f64, tolerance: f64) -> bool {
    (turn - 90.0).abs() <= tolerance || (turn - 270.0).abs() <= tolerance
}

fn circular_distance(a: f64, b: f64) -> f64 {
    let d = normalize_degrees(a - b);
    d.min(360.0 - d)
}

/// The right angle turn (`90` or `270`) closest to `turn`. When `turn` is equally far from both, the one closest
/// to `previous_turn` is used.
fn expected_turn(turn: f64, previous_turn: f64) -> f64 {
    let to_right = circular_distance(turn, 90.0);
    let to_left = circular_distance(turn, 270.0);
    if (to_right - to_left).abs() <= f64::EPSILON * 360.0 {
        if circular_distance(previous_turn, 90.0) <= circular_distance(previous_turn, 270.0) {
            90.0
        } else {
            270.0
        }
    } else if to_right < to_left {
        90.0
    } else {
        270.0
    }
}

/// Swaps the first two points if they were digitized in reverse order.
///
/// The points are swapped when the turn at the second point is not close to a right angle and the first segment is
/// shorter than half of the third one. Sequences of fewer than four points are left as they are. Returns whether the
/// points were swapped.
pub fn correct_first_segment(points: &mut [Point2d]) -> bool {
    let [p0, p1, p2, p3, ..] = *points else {
        return false;
    };

    let turn = turn_angle(&p0, &p1, &p2);
    if is_near_normal(turn, FIRST_SEGMENT_TOLERANCE) || p0.distance(&p1) >= 0.5 * p2.distance(&p3) {
        return false;
    }

    log::debug!("First segment turns by {turn:.1} degrees, swapping first two points");
    points.swap(0, 1);
    true
}

/// Straightens the flight path so that consecutive segments meet at a right angle.
///
/// Every interior point is checked. For a point whose turn is not within [`INTERIOR_TOLERANCE`] of a right angle,
/// the shorter of its two segments is rotated about its far end by exactly the angle that makes the turn a right
/// angle, and the point is moved to the intersection of the rotated segment with the line of the longer one. The
/// rotation is the difference between the current and the expected turn, not `turn + (180 - previous_turn)`: the
/// latter only gives a right angle when the previous turn was itself exact. Returns the number of corrected points.
pub fn correct_interior(points: &mut [Point2d]) -> usize {
    let mut previous_turn = None;
    let mut corrected = 0;
    for i in 1..points.len().saturating_sub(1) {
        let (a, b, c) = (points[i - 1], points[i], points[i + 1]);
        let turn = turn_angle(&a, &b, &c);
        let previous = *previous_turn.get_or_insert(turn);
        if is_near_normal(turn, INTERIOR_TOLERANCE) {
            previous_turn = Some(turn);
            continue;
        }

        let expected = expected_turn(turn, previous);
        let incoming = Segment(a, b);
        let outgoing = Segment(b, c);
        let reach = incoming.length() + outgoing.length();

        // Clockwise rotation grows the azimuth of the rotated segment.
        let (short, long) = if outgoing.length() <= incoming.length() {
            (outgoing.rotate(signed_degrees(expected - turn), &c), incoming)
        } else {
            (incoming.rotate(signed_degrees(turn - expected), &a), outgoing)
        };

        let joint = short
            .extend(reach, reach)
            .intersection(&long.extend(reach, reach))
            .filter(is_real_intersection);
        if let Some(joint) = joint {
            log::debug!("Point {i} turns by {turn:.1} degrees, moved from {b:?} to {joint:?}");
            points[i] = joint;
            corrected += 1;
        }

        previous_turn = Some(expected);
    }

    corrected
}

fn signed_degrees(angle: f64) -> f64 {
    let angle = normalize_degrees(angle);
    if angle > 180.0 {
        angle - 360.0
    } else {
        angle
    }
}

/// Builds flight lines from raw auxiliary line records.
///
/// The raw points are transformed into the working (projected) CRS where turn angles are meaningful, corrected as one
/// concatenated flight path and split back into one line per record in the target CRS.
pub struct LineFileCorrector {
    to_working: CrsTransform,
    to_target: CrsTransform,
}

impl LineFileCorrector {
    /// Creates a corrector for points stored in `auxiliary_crs`.
    pub fn new(auxiliary_crs: Crs, working_crs: Crs, target_crs: Crs) -> Result<Self, AerogenError> {
        if working_crs.is_geographic() {
            log::warn!("Correcting lines in geographic {working_crs}, turn angles will be distorted");
        }

        Ok(Self {
            to_working: CrsTransform::new(auxiliary_crs, working_crs)?,
            to_target: CrsTransform::new(working_crs, target_crs)?,
        })
    }

    /// CRS of the returned lines.
    pub fn target_crs(&self) -> Crs {
        self.to_target.target()
    }

    /// Reads the auxiliary file at `path` and corrects its lines.
    pub fn correct_file(&self, path: &Path) -> Result<Vec<Polyline>, AerogenError> {
        let records = read_line_records(path)?;
        self.correct_records(&records)
    }

    /// Corrects the lines of the given records.
    pub fn correct_records(&self, records: &[LineRecord]) -> Result<Vec<Polyline>, AerogenError> {
        let mut points = records
            .iter()
            .flat_map(|record| record.points())
            .map(|point| transform_point(&self.to_working, &point))
            .collect::<Result<Vec<_>, _>>()?;

        if points.is_empty() {
            return Err(AerogenError::InsufficientLinePoints(
                "auxiliary file has no points".to_string(),
            ));
        }

        correct_first_segment(&mut points);
        let corrected = correct_interior(&mut points);
        log::debug!(
            "Corrected {corrected} of {} points in {} lines",
            points.len(),
            records.len()
        );

        let mut remaining = points.as_slice();
        let mut lines = Vec::with_capacity(records.len());
        for record in records {
            let (line, rest) = remaining.split_at(record.len());
            remaining = rest;
            lines.push(Polyline::open(
                line.iter()
                    .map(|point| transform_point(&self.to_target, point))
                    .collect::<Result<Vec<_>, _>>()?,
            ));
        }

        Ok(lines)
    }
}

fn transform_point(transform: &CrsTransform, point: &Point2d) -> Result<Point2d, AerogenError> {
    transform.project(point).ok_or_else(|| {
        AerogenTypesError::Projection(format!(
            "failed to transform {point:?} from {} to {}",
            transform.source(),
            transform.target()
        ))
        .into()
    })
}
