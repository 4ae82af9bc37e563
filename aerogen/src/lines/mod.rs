//! Survey and tie flight lines.
//!
//! Lines are produced either by the [`AnalyticLineGenerator`] from the four corners of the survey area, or by the
//! [`LineFileCorrector`] from raw per-line coordinates stored in auxiliary `.xyz` files.

mod analytic;
mod correction;
mod records;

use std::path::{Path, PathBuf};

use aerogen_types::cartesian::Point2d;
use aerogen_types::geo::{Crs, CrsTransform};
use aerogen_types::{AerogenTypesError, Contour};
use serde::{Deserialize, Serialize};

use crate::error::AerogenError;

pub use analytic::AnalyticLineGenerator;
pub use correction::{
    correct_first_segment, correct_interior, turn_angle, LineFileCorrector,
    FIRST_SEGMENT_TOLERANCE, INTERIOR_TOLERANCE,
};
pub use records::{parse_line_records, read_line_records, LineRecord};

/// Coordinates with both components at or below this magnitude are not accepted as an intersection point.
///
/// Some platforms report a spurious intersection at the origin for segments that do not meet. This is a heuristic
/// threshold for that artifact, not a derived numeric bound.
pub const FALSE_INTERSECTION_TOLERANCE: f64 = 1e-12;

/// Whether an intersection point is a real one rather than the near-origin artifact.
pub fn is_real_intersection(point: &Point2d) -> bool {
    point.x.abs() > FALSE_INTERSECTION_TOLERANCE || point.y.abs() > FALSE_INTERSECTION_TOLERANCE
}

/// A flight line. Open contour of points in flight order.
pub type Polyline = aerogen_types::impls::Contour<Point2d>;

/// Family of parallel flight lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineFamily {
    /// Survey lines, the main acquisition lines.
    Survey,
    /// Tie lines, flown roughly across survey lines for calibration.
    Tie,
}

/// Indices into the four line corners `P0..P3` that describe how a family is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CornerLayout {
    /// Vertices of the triangle solved to place the first line: start of the first line, its far corner and the
    /// corner opposite to the start.
    pub triangle: [usize; 3],
    /// The two rails the sweep moves along, as `(from, to)` pairs.
    pub rails: [(usize, usize); 2],
    /// Edge the sweep terminates against.
    pub end_edge: (usize, usize),
}

const SURVEY_LAYOUT: CornerLayout = CornerLayout {
    triangle: [0, 1, 2],
    rails: [(0, 3), (1, 2)],
    end_edge: (3, 2),
};

const TIE_LAYOUT: CornerLayout = CornerLayout {
    triangle: [0, 3, 2],
    rails: [(0, 1), (3, 2)],
    end_edge: (1, 2),
};

impl LineFamily {
    /// Both families, survey lines first.
    pub const ALL: [LineFamily; 2] = [LineFamily::Survey, LineFamily::Tie];

    /// Suffix appended to the layout file stem to get the auxiliary file name.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            LineFamily::Survey => "_sl",
            LineFamily::Tie => "_tl",
        }
    }

    /// Header key of the heading of this family.
    pub fn heading_key(&self) -> &'static str {
        match self {
            LineFamily::Survey => "HSL",
            LineFamily::Tie => "HTL",
        }
    }

    /// Header key of the spacing of this family.
    pub fn spacing_key(&self) -> &'static str {
        match self {
            LineFamily::Survey => "spacing SL",
            LineFamily::Tie => "spacing TL",
        }
    }

    /// Path of the auxiliary line file belonging to the given layout file: `<dir>/<stem>_sl.xyz` or
    /// `<dir>/<stem>_tl.xyz`.
    pub fn auxiliary_file(&self, layout: &Path) -> PathBuf {
        let stem = layout
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        layout.with_file_name(format!("{stem}{}.xyz", self.file_suffix()))
    }

    pub(crate) fn layout(&self) -> &'static CornerLayout {
        match self {
            LineFamily::Survey => &SURVEY_LAYOUT,
            LineFamily::Tie => &TIE_LAYOUT,
        }
    }
}

/// Lines of one family, in generation order, with the CRS their coordinates are in.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedLineSet {
    family: LineFamily,
    crs: Crs,
    lines: Vec<Polyline>,
}

impl GeneratedLineSet {
    /// Creates a new line set.
    pub fn new(family: LineFamily, crs: Crs, lines: Vec<Polyline>) -> Self {
        Self { family, crs, lines }
    }

    /// Family of the lines.
    pub fn family(&self) -> LineFamily {
        self.family
    }

    /// CRS of the line coordinates.
    pub fn crs(&self) -> Crs {
        self.crs
    }

    /// The lines.
    pub fn lines(&self) -> &[Polyline] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the set has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Consumes the set returning the lines.
    pub fn into_lines(self) -> Vec<Polyline> {
        self.lines
    }

    /// Transforms the lines into the target CRS of `transform`.
    ///
    /// The transform's source CRS must be the CRS of this set.
    pub fn reproject(self, transform: &CrsTransform) -> Result<Self, AerogenError> {
        if transform.source() != self.crs {
            return Err(AerogenTypesError::Conversion(format!(
                "line set is in {} but the transformation expects {}",
                self.crs,
                transform.source()
            ))
            .into());
        }

        if transform.is_identity() {
            return Ok(self);
        }

        let lines = self
            .lines
            .iter()
            .map(|line| {
                line.project_points(transform).ok_or_else(|| {
                    AerogenTypesError::Projection(format!(
                        "failed to transform a line from {} to {}",
                        transform.source(),
                        transform.target()
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            family: self.family,
            crs: transform.target(),
            lines,
        })
    }
}
