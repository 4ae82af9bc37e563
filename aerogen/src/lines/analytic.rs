use std::f64::consts::{FRAC_PI_2, PI};

use aerogen_types::cartesian::{CartesianPoint2dFloat, Point2d};
use aerogen_types::Segment;
use nalgebra::Vector2;

use crate::error::AerogenError;
use crate::lines::{is_real_intersection, LineFamily, Polyline};

/// Angles closer than this to `0` or `π` make a triangle degenerate.
const ANGLE_TOLERANCE: f64 = 1e-9;
/// Slack allowed on a cosine computed by the law of cosines before it is considered out of domain.
const COSINE_TOLERANCE: f64 = 1e-12;
/// Clipped lines shorter than this are dropped.
const MIN_LINE_LENGTH: f64 = 1e-9;
/// Upper bound on the number of sweep steps of one generation run.
const MAX_SWEEP_STEPS: usize = 10_000_000;

/// Generates parallel lines of one family across a quadrilateral survey area.
///
/// The first line is placed through the far corner of the start edge at the requested heading. Following lines are
/// swept along the two rails of the quadrilateral with the requested spacing until they leave it through the end
/// edge. The sweep never clips against the full boundary polygon.
///
/// A heading is an angle in radians counter-clockwise from the easting axis.
///
/// Each family sweeps between its own pair of rails, so the heading has to cross them. For an axis aligned square
/// with corners listed `(0, 0), (0, 10), (10, 10), (10, 0)`, tie lines run at heading `0` and survey lines at
/// heading `π/2`. A heading parallel to the rails of the family fails with
/// [`AerogenError::GeometryConstruction`].
#[derive(Debug, Clone)]
pub struct AnalyticLineGenerator {
    corners: [Point2d; 4],
    family: LineFamily,
    heading: f64,
    spacing: f64,
}

impl AnalyticLineGenerator {
    /// Creates a generator for the given corners `P0..P3`.
    pub fn new(
        corners: &[Point2d],
        family: LineFamily,
        heading: f64,
        spacing: f64,
    ) -> Result<Self, AerogenError> {
        let corners: [Point2d; 4] = corners.try_into().map_err(|_| {
            AerogenError::InsufficientLinePoints(format!(
                "exactly 4 corner points required, found {}",
                corners.len()
            ))
        })?;

        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(AerogenError::GeometryConstruction(format!(
                "line spacing must be positive, got {spacing}"
            )));
        }

        if !heading.is_finite() {
            return Err(AerogenError::GeometryConstruction(format!(
                "invalid heading {heading}"
            )));
        }

        Ok(Self {
            corners,
            family,
            heading,
            spacing,
        })
    }

    /// Family of the generated lines.
    pub fn family(&self) -> LineFamily {
        self.family
    }

    /// Generates the lines, terminating against the end edge of the family.
    pub fn generate(&self) -> Result<Vec<Polyline>, AerogenError> {
        let (from, to) = self.family.layout().end_edge;
        self.generate_with_end_boundary(Segment(self.corners[from], self.corners[to]))
    }

    /// Generates the lines, clipping the last ones against the given end boundary.
    ///
    /// The first line comes first, followed by the swept lines in sweep order.
    pub fn generate_with_end_boundary(
        &self,
        end_boundary: Segment<Point2d>,
    ) -> Result<Vec<Polyline>, AerogenError> {
        let layout = self.family.layout();
        let [ia, ib, ic] = layout.triangle;
        let (a, b, c) = (self.corners[ia], self.corners[ib], self.corners[ic]);
        let triangle = Triangle::solve(a, b, c)?;

        // Direction of the start edge rebuilt from the diagonal and the solved angle at the start corner.
        let diagonal = c - a;
        let side = diagonal.perp(&(b - a)).signum();
        let edge_direction = diagonal.y.atan2(diagonal.x) + side * triangle.angles[0];
        let gamma = edge_direction - self.heading;

        let mut phi = match self.family {
            LineFamily::Survey => self.heading - FRAC_PI_2,
            LineFamily::Tie => self.heading + FRAC_PI_2,
        };
        if unit(phi).dot(&(c - b)) < 0.0 {
            phi += PI;
        }

        let offset = triangle.sides[0] * gamma.sin() / (phi - self.heading).sin();
        let first_start = a + unit(phi) * offset;
        let first_line = Segment(first_start, b);
        log::debug!(
            "First {:?} line starts {offset:.3} from corner {ia}: {first_line:?}",
            self.family
        );

        let [(_, end_a), (_, end_b)] = layout.rails;
        let rails = [
            Rail::new(first_start, self.corners[end_a], phi)?,
            Rail::new(b, self.corners[end_b], phi)?,
        ];

        let normal = unit(phi);
        let projections = self.corners.map(|p| normal.dot(&p.coords));
        let extent = projections.iter().copied().fold(f64::MIN, f64::max)
            - projections.iter().copied().fold(f64::MAX, f64::min);
        let steps = (extent / self.spacing).ceil();
        if !steps.is_finite() || steps > MAX_SWEEP_STEPS as f64 {
            return Err(AerogenError::GeometryConstruction(format!(
                "spacing {} is too small for an area {extent:.3} across",
                self.spacing
            )));
        }
        let max_steps = steps as usize + 2;

        let sweep = Sweep {
            rails,
            spacing: self.spacing,
            end_boundary,
            step: 0,
            max_steps,
            finished: false,
        };

        let mut lines = vec![Polyline::open(vec![first_line.start(), first_line.end()])];
        lines.extend(sweep);
        log::debug!("Generated {} {:?} lines", lines.len(), self.family);

        Ok(lines)
    }
}

fn unit(angle: f64) -> Vector2<f64> {
    Vector2::new(angle.cos(), angle.sin())
}

/// Triangle `V0, V1, V2` with side lengths `|V0V1|, |V1V2|, |V2V0|` and interior angles at `V0, V1, V2`.
#[derive(Debug, Clone, Copy)]
struct Triangle {
    sides: [f64; 3],
    angles: [f64; 3],
}

impl Triangle {
    fn solve(v0: Point2d, v1: Point2d, v2: Point2d) -> Result<Self, AerogenError> {
        let sides = [v0.distance(&v1), v1.distance(&v2), v2.distance(&v0)];
        let [s01, s12, s20] = sides;
        if sides.iter().any(|side| *side <= 0.0) {
            return Err(AerogenError::GeometryConstruction(
                "corner points of the triangle coincide".to_string(),
            ));
        }

        let a0 = cosine_angle(s01, s20, s12)?;
        let a1 = cosine_angle(s01, s12, s20)?;

        // Law of sines leaves two candidates, the one closing the triangle is the right one.
        let sine = (s01 * a0.sin() / s12).clamp(-1.0, 1.0);
        let acute = sine.asin();
        let closing = PI - a0 - a1;
        let a2 = if (acute - closing).abs() <= (PI - acute - closing).abs() {
            acute
        } else {
            PI - acute
        };

        let angles = [a0, a1, a2];
        if angles
            .iter()
            .any(|angle| *angle < ANGLE_TOLERANCE || *angle > PI - ANGLE_TOLERANCE)
        {
            return Err(AerogenError::GeometryConstruction(format!(
                "degenerate triangle with angles {angles:?}, corner points are collinear"
            )));
        }

        Ok(Self { sides, angles })
    }
}

/// Angle between sides `adjacent_a` and `adjacent_b` opposite to `opposite` by the law of cosines.
fn cosine_angle(adjacent_a: f64, adjacent_b: f64, opposite: f64) -> Result<f64, AerogenError> {
    let cos = (adjacent_a * adjacent_a + adjacent_b * adjacent_b - opposite * opposite)
        / (2.0 * adjacent_a * adjacent_b);
    if !(-1.0 - COSINE_TOLERANCE..=1.0 + COSINE_TOLERANCE).contains(&cos) {
        return Err(AerogenError::GeometryConstruction(format!(
            "law of cosines gives {cos} for sides {adjacent_a}, {adjacent_b}, {opposite}"
        )));
    }

    Ok(cos.clamp(-1.0, 1.0).acos())
}

/// Boundary edge a line end slides along during the sweep.
#[derive(Debug, Clone, Copy)]
struct Rail {
    end: Point2d,
    length: f64,
    alpha: f64,
    beta_cos: f64,
}

impl Rail {
    fn new(start: Point2d, end: Point2d, phi: f64) -> Result<Self, AerogenError> {
        let direction = end - start;
        let alpha = direction.y.atan2(direction.x);
        let beta_cos = (alpha - phi).cos();
        if beta_cos <= COSINE_TOLERANCE {
            return Err(AerogenError::GeometryConstruction(format!(
                "rail from {start:?} to {end:?} does not advance along the sweep direction"
            )));
        }

        Ok(Self {
            end,
            length: direction.norm(),
            alpha,
            beta_cos,
        })
    }

    /// Remaining distance to the rail end at sweep offset `dd` and the point at that offset.
    fn offset(&self, dd: f64) -> (f64, Point2d) {
        let remaining = self.length - dd / self.beta_cos;
        (remaining, self.end - unit(self.alpha) * remaining)
    }
}

/// State of the offset sweep. Owned by one generation run.
#[derive(Debug)]
struct Sweep {
    rails: [Rail; 2],
    spacing: f64,
    end_boundary: Segment<Point2d>,
    step: usize,
    max_steps: usize,
    finished: bool,
}

impl Sweep {
    fn finish(&mut self, reason: &str) {
        log::debug!("Sweep stopped after {} steps: {reason}", self.step);
        self.finished = true;
    }

    fn clip(&self, line: Segment<Point2d>, outside_is_start: bool) -> Option<Segment<Point2d>> {
        let crossing = line
            .intersection(&self.end_boundary)
            .filter(is_real_intersection)?;

        Some(if outside_is_start {
            Segment(crossing, line.end())
        } else {
            Segment(line.start(), crossing)
        })
    }
}

impl Iterator for Sweep {
    type Item = Polyline;

    fn next(&mut self) -> Option<Polyline> {
        while !self.finished {
            self.step += 1;
            if self.step > self.max_steps {
                self.finish("iteration limit reached");
                return None;
            }

            let dd = self.spacing * self.step as f64;
            let (remaining_a, point_a) = self.rails[0].offset(dd);
            let (remaining_b, point_b) = self.rails[1].offset(dd);
            let line = Segment(point_a, point_b);

            let line = match (remaining_a < 0.0, remaining_b < 0.0) {
                (false, false) => line,
                (true, true) => {
                    self.finish("line is past the end boundary");
                    return None;
                }
                (outside_a, _) => match self.clip(line, outside_a) {
                    Some(clipped) => clipped,
                    None => {
                        self.finish("line does not reach the end boundary");
                        return None;
                    }
                },
            };

            if line.length() > MIN_LINE_LENGTH {
                return Some(Polyline::open(vec![line.start(), line.end()]));
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    fn square() -> [Point2d; 4] {
        [
            Point2d::new(0.0, 0.0),
            Point2d::new(0.0, 10.0),
            Point2d::new(10.0, 10.0),
            Point2d::new(10.0, 0.0),
        ]
    }

    #[test]
    fn tie_lines_in_square() {
        let lines = AnalyticLineGenerator::new(&square(), LineFamily::Tie, 0.0, 2.0)
            .unwrap()
            .generate()
            .unwrap();

        assert_eq!(lines.len(), 6);
        for (i, line) in lines.iter().enumerate() {
            let y = 2.0 * i as f64;
            assert_eq!(line.len(), 2);
            assert_abs_diff_eq!(line[0], Point2d::new(0.0, y), epsilon = 1e-9);
            assert_abs_diff_eq!(line[1], Point2d::new(10.0, y), epsilon = 1e-9);
        }
    }

    #[test]
    fn survey_lines_in_square() {
        let lines = AnalyticLineGenerator::new(&square(), LineFamily::Survey, FRAC_PI_2, 2.0)
            .unwrap()
            .generate()
            .unwrap();

        assert_eq!(lines.len(), 6);
        for (i, line) in lines.iter().enumerate() {
            let x = 2.0 * i as f64;
            assert_abs_diff_eq!(line[0], Point2d::new(x, 0.0), epsilon = 1e-9);
            assert_abs_diff_eq!(line[1], Point2d::new(x, 10.0), epsilon = 1e-9);
        }
    }

    #[test]
    fn first_line_passes_through_start_corners() {
        let corners = square();
        let lines = AnalyticLineGenerator::new(&corners, LineFamily::Tie, 0.0, 3.0)
            .unwrap()
            .generate()
            .unwrap();
        assert_abs_diff_eq!(lines[0][0], corners[0], epsilon = 1e-9);
        assert_abs_diff_eq!(lines[0][1], corners[3], epsilon = 1e-9);
    }

    fn skewed() -> [Point2d; 4] {
        [
            Point2d::new(0.0, 0.0),
            Point2d::new(2.0, 10.0),
            Point2d::new(12.0, 11.0),
            Point2d::new(10.0, 0.0),
        ]
    }

    #[test]
    fn last_line_is_clipped_by_end_edge() {
        let lines = AnalyticLineGenerator::new(&skewed(), LineFamily::Tie, 0.0, 0.5)
            .unwrap()
            .generate()
            .unwrap();

        assert_eq!(lines.len(), 22);
        let last = lines.last().unwrap();
        assert_abs_diff_eq!(last[0], Point2d::new(7.0, 10.5), epsilon = 1e-9);
        assert_abs_diff_eq!(last[1].y, 10.5, epsilon = 1e-9);
        assert_abs_diff_eq!(last[1].x, 10.0 + 21.0 / 11.0, epsilon = 1e-9);
    }

    #[test]
    fn offsets_grow_by_spacing() {
        let heading = 10f64.to_radians();
        let lines = AnalyticLineGenerator::new(&skewed(), LineFamily::Tie, heading, 0.75)
            .unwrap()
            .generate()
            .unwrap();
        assert!(lines.len() > 2);

        let normal = Vector2::new(-heading.sin(), heading.cos());
        let offsets: Vec<f64> = lines
            .iter()
            .map(|line| normal.dot(&line[0].coords))
            .collect();
        for pair in offsets.windows(2) {
            assert_abs_diff_eq!(pair[1] - pair[0], 0.75, epsilon = 1e-9);
        }

        for line in &lines {
            let direction = line[1] - line[0];
            assert_abs_diff_eq!(normal.dot(&direction), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn first_line_respects_heading() {
        let heading = 10f64.to_radians();
        let corners = skewed();
        let lines = AnalyticLineGenerator::new(&corners, LineFamily::Tie, heading, 1.0)
            .unwrap()
            .generate()
            .unwrap();

        assert_eq!(lines[0][1], corners[3]);
        let start = lines[0][0];
        let shift = start - corners[0];
        assert_abs_diff_eq!(
            shift.dot(&Vector2::new(heading.cos(), heading.sin())),
            0.0,
            epsilon = 1e-9
        );
        assert!(start.x < corners[3].x);
    }

    #[test]
    fn terminates_for_small_spacing() {
        let lines = AnalyticLineGenerator::new(&skewed(), LineFamily::Survey, 1.4, 0.01)
            .unwrap()
            .generate()
            .unwrap();
        assert!(!lines.is_empty());
        assert!(lines.len() < 1100);
    }

    #[test]
    fn custom_end_boundary() {
        let generator =
            AnalyticLineGenerator::new(&skewed(), LineFamily::Tie, 0.0, 0.3).unwrap();
        assert_eq!(generator.generate().unwrap().len(), 37);

        let unreachable = Segment(Point2d::new(100.0, 100.0), Point2d::new(101.0, 100.0));
        let lines = generator.generate_with_end_boundary(unreachable).unwrap();
        assert_eq!(lines.len(), 34);
        assert_abs_diff_eq!(lines[33][0].y, 9.9, epsilon = 1e-9);
    }

    #[test]
    fn collinear_corners() {
        let corners = [
            Point2d::new(0.0, 0.0),
            Point2d::new(5.0, 0.0),
            Point2d::new(10.0, 0.0),
            Point2d::new(10.0, 5.0),
        ];
        let result = AnalyticLineGenerator::new(&corners, LineFamily::Survey, 0.3, 1.0)
            .unwrap()
            .generate();
        assert_matches!(result, Err(AerogenError::GeometryConstruction(_)));
    }

    #[test]
    fn heading_along_rail() {
        let result = AnalyticLineGenerator::new(&square(), LineFamily::Tie, FRAC_PI_2, 1.0)
            .unwrap()
            .generate();
        assert_matches!(result, Err(AerogenError::GeometryConstruction(_)));
    }

    #[test]
    fn survey_lines_need_heading_across_rails() {
        let along = AnalyticLineGenerator::new(&square(), LineFamily::Survey, 0.0, 2.0)
            .unwrap()
            .generate();
        assert_matches!(along, Err(AerogenError::GeometryConstruction(_)));

        let across = AnalyticLineGenerator::new(&square(), LineFamily::Survey, FRAC_PI_2, 2.0)
            .unwrap()
            .generate()
            .unwrap();
        assert_eq!(across.len(), 6);
    }

    #[test]
    fn too_many_lines() {
        let result = AnalyticLineGenerator::new(&square(), LineFamily::Tie, 0.0, 1e-300)
            .unwrap()
            .generate();
        assert_matches!(result, Err(AerogenError::GeometryConstruction(msg)) if msg.contains("too small"));
    }

    #[test]
    fn invalid_input() {
        assert_matches!(
            AnalyticLineGenerator::new(&square()[..3], LineFamily::Tie, 0.0, 1.0),
            Err(AerogenError::InsufficientLinePoints(_))
        );
        assert_matches!(
            AnalyticLineGenerator::new(&square(), LineFamily::Tie, 0.0, 0.0),
            Err(AerogenError::GeometryConstruction(_))
        );
        assert_matches!(
            AnalyticLineGenerator::new(&square(), LineFamily::Tie, 0.0, f64::NAN),
            Err(AerogenError::GeometryConstruction(_))
        );
    }
}
