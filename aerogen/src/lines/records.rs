use std::fs;
use std::path::Path;

use aerogen_types::cartesian::{CartesianPoint2dFloat, Point2d};

use crate::error::AerogenError;
use crate::parser::parse_number;

const LINE_HEADER: &str = "Line";

/// Raw points of one line read from an auxiliary file, ordered by their sort key.
///
/// The first two points are keyed by the point id declared in the file. Every later point is keyed by the key of the
/// second point plus its distance from the second point, so points listed out of order in the file end up ordered
/// along the flight path. A point with the same key as an earlier one replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    line_id: String,
    entries: Vec<(f64, Point2d)>,
    anchor: Option<(f64, Point2d)>,
    pushed: usize,
}

impl LineRecord {
    /// Creates an empty record.
    pub fn new(line_id: impl Into<String>) -> Self {
        Self {
            line_id: line_id.into(),
            entries: vec![],
            anchor: None,
            pushed: 0,
        }
    }

    /// Identifier from the `Line <id>` header.
    pub fn line_id(&self) -> &str {
        &self.line_id
    }

    /// Adds a point with the id it has in the file.
    pub fn push(&mut self, point_id: f64, point: Point2d) {
        let key = match (self.pushed, self.anchor) {
            (0, _) => point_id,
            (1, _) => {
                self.anchor = Some((point_id, point));
                point_id
            }
            (_, Some((anchor_key, anchor))) => anchor_key + anchor.distance(&point),
            (_, None) => point_id,
        };
        self.pushed += 1;

        match self
            .entries
            .binary_search_by(|(existing, _)| existing.total_cmp(&key))
        {
            Ok(index) => self.entries[index] = (key, point),
            Err(index) => self.entries.insert(index, (key, point)),
        }
    }

    /// Points in key order.
    pub fn points(&self) -> impl Iterator<Item = Point2d> + '_ {
        self.entries.iter().map(|(_, point)| *point)
    }

    /// Sort keys in order.
    pub fn keys(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record has no points.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reads line records from an auxiliary `.xyz` file.
pub fn read_line_records(path: &Path) -> Result<Vec<LineRecord>, AerogenError> {
    let data = fs::read_to_string(path).map_err(|source| AerogenError::FileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_line_records(&data)?;
    log::debug!("Read {} line records from {path:?}", records.len());

    Ok(records)
}

/// Parses line records.
///
/// A record starts with a `Line <id>` row and collects the following point rows. A point row is any row whose first
/// whitespace separated token is a number and carries at least `index x y`, optionally followed by the point id. The
/// point id is the sort key of the row when present and numeric, the leading index otherwise. Other rows are
/// ignored.
pub fn parse_line_records(data: &str) -> Result<Vec<LineRecord>, AerogenError> {
    let mut records: Vec<LineRecord> = vec![];
    for (index, raw) in data.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if let Some(id) = line.strip_prefix(LINE_HEADER) {
            records.push(LineRecord::new(id.trim()));
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(leading_id) = tokens.next().and_then(parse_number) else {
            continue;
        };

        let Some(record) = records.last_mut() else {
            return Err(AerogenError::MalformedRecord {
                line: line_no,
                reason: "point row before the first line header".to_string(),
            });
        };

        let mut coordinate = |name: &str| {
            tokens
                .next()
                .and_then(parse_number)
                .ok_or_else(|| AerogenError::MalformedRecord {
                    line: line_no,
                    reason: format!("missing or invalid {name} coordinate in '{line}'"),
                })
        };
        let x = coordinate("x")?;
        let y = coordinate("y")?;
        let point_id = tokens.next().and_then(parse_number).unwrap_or(leading_id);

        record.push(point_id, Point2d::new(x, y));
    }

    if records.is_empty() {
        return Err(AerogenError::InsufficientLinePoints(
            "no line records found".to_string(),
        ));
    }

    if let Some(empty) = records.iter().find(|record| record.is_empty()) {
        return Err(AerogenError::InsufficientLinePoints(format!(
            "line {} has no points",
            empty.line_id()
        )));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    #[test]
    fn reorders_by_distance_from_second_point() {
        let data = "\
Line 1
1 0 0
2 0 10
3 0 40
4 0 20
5 0 30
";
        let records = parse_line_records(data).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line_id(), "1");

        let points: Vec<_> = records[0].points().collect();
        assert_eq!(
            points,
            vec![
                Point2d::new(0.0, 0.0),
                Point2d::new(0.0, 10.0),
                Point2d::new(0.0, 20.0),
                Point2d::new(0.0, 30.0),
                Point2d::new(0.0, 40.0),
            ]
        );

        let keys: Vec<_> = records[0].keys().collect();
        assert_abs_diff_eq!(keys[4], 32.0);
    }

    #[test]
    fn first_points_keyed_by_id() {
        let mut record = LineRecord::new("7");
        record.push(20.0, Point2d::new(1.0, 1.0));
        record.push(10.0, Point2d::new(2.0, 2.0));
        assert_eq!(
            record.points().collect::<Vec<_>>(),
            vec![Point2d::new(2.0, 2.0), Point2d::new(1.0, 1.0)]
        );
    }

    #[test]
    fn point_id_column_takes_precedence() {
        let records = parse_line_records("Line 1\n1 0 0 20\n2 0 10 10\n3 0 30 label\n").unwrap();
        let keys: Vec<_> = records[0].keys().collect();
        assert_eq!(keys[..2], [10.0, 20.0]);
        assert_eq!(
            records[0].points().collect::<Vec<_>>(),
            vec![
                Point2d::new(0.0, 10.0),
                Point2d::new(0.0, 0.0),
                Point2d::new(0.0, 30.0),
            ]
        );
    }

    #[test]
    fn equal_keys_replace() {
        let mut record = LineRecord::new("1");
        record.push(1.0, Point2d::new(0.0, 0.0));
        record.push(2.0, Point2d::new(0.0, 10.0));
        record.push(3.0, Point2d::new(0.0, 15.0));
        record.push(4.0, Point2d::new(5.0, 10.0));
        assert_eq!(record.len(), 3);
        assert_eq!(
            record.points().last(),
            Some(Point2d::new(5.0, 10.0))
        );
    }

    #[test]
    fn multiple_records_and_noise() {
        let data = "\
/ exported lines
Line 10
1 100,5 200 55
2 100,5 300 56
Line 20 a
    1 110 300
    2 110 200
";
        let records = parse_line_records(data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line_id(), "10");
        assert_eq!(records[1].line_id(), "20 a");
        assert_eq!(records[0].points().next(), Some(Point2d::new(100.5, 200.0)));
        assert_eq!(records[1].len(), 2);
    }

    #[test]
    fn malformed_rows() {
        assert_matches!(
            parse_line_records("1 0 0\nLine 1\n"),
            Err(AerogenError::MalformedRecord { line: 1, .. })
        );
        assert_matches!(
            parse_line_records("Line 1\n1 0\n"),
            Err(AerogenError::MalformedRecord { line: 2, .. })
        );
        assert_matches!(
            parse_line_records("Line 1\n1 0 y\n"),
            Err(AerogenError::MalformedRecord { line: 2, .. })
        );
    }

    #[test]
    fn missing_points() {
        assert_matches!(
            parse_line_records("nothing here\n"),
            Err(AerogenError::InsufficientLinePoints(_))
        );
        assert_matches!(
            parse_line_records("Line 1\n1 0 0\nLine 2\n"),
            Err(AerogenError::InsufficientLinePoints(msg)) if msg.contains("line 2")
        );
    }

    #[test]
    fn unreadable_file() {
        assert_matches!(
            read_line_records(Path::new("/nonexistent/layout_sl.xyz")),
            Err(AerogenError::FileUnreadable { .. })
        );
    }
}
