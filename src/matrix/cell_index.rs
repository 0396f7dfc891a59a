use chrono::NaiveDate;
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::calendar::fmt_date;
use crate::model::{Assignment, FixedAssignment, OffDay, Position, ShiftCode};

/// Lookup key for one staff member on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub staff_id: i64,
    pub day: NaiveDate,
}

pub fn cell_key(staff_id: i64, day: NaiveDate) -> CellKey {
    CellKey { staff_id, day }
}

/// Renders as `{staff_id}|{YYYY-MM-DD}`
impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.staff_id, fmt_date(self.day))
    }
}

impl Serialize for CellKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Resolved content of one matrix cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub code: ShiftCode,
    pub position: Option<Position>,
}

/// Where a resolved cell came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CellSource {
    Off,
    Fixed,
    Assignment,
}

#[derive(Debug, Clone, Default)]
pub struct CellIndex {
    cells: HashMap<CellKey, (Cell, CellSource)>,
    /// Keys that appear more than once in the raw assignments, sorted
    pub duplicate_assignments: Vec<CellKey>,
}

impl CellIndex {
    pub fn get(&self, staff_id: i64, day: NaiveDate) -> Option<&Cell> {
        self.cells.get(&cell_key(staff_id, day)).map(|(cell, _)| cell)
    }

    pub fn source(&self, staff_id: i64, day: NaiveDate) -> Option<CellSource> {
        self.cells.get(&cell_key(staff_id, day)).map(|(_, source)| *source)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellKey, &Cell)> {
        self.cells.iter().map(|(key, (cell, _))| (key, cell))
    }

    fn claim(&mut self, key: CellKey, cell: Cell, source: CellSource) -> bool {
        match self.cells.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert((cell, source));
                true
            }
            Entry::Occupied(_) => false,
        }
    }
}

/// Merges off-days, fixed assignments and assignments into one index
///
/// Precedence: off-day > fixed > assignment. Once a key is set it is never
/// overwritten, so input order inside each collection only matters for
/// duplicates of the same source; the first one wins. Duplicate raw
/// assignments are reported, not hidden.
pub fn build_cell_index(assignments: &[Assignment], fixed: &[FixedAssignment], off_days: &[OffDay]) -> CellIndex {
    let mut index = CellIndex::default();

    // Off-days win unconditionally
    for off in off_days {
        index.claim(
            cell_key(off.staff_id, off.day),
            Cell {
                code: ShiftCode::P,
                position: None,
            },
            CellSource::Off,
        );
    }

    for pinned in fixed {
        index.claim(
            cell_key(pinned.staff_id, pinned.day),
            Cell {
                code: pinned.shift_code.clone(),
                position: pinned.position,
            },
            CellSource::Fixed,
        );
    }

    let mut seen: HashSet<CellKey> = HashSet::with_capacity(assignments.len());
    let mut duplicates: HashSet<CellKey> = HashSet::new();
    for assignment in assignments {
        let key = cell_key(assignment.staff_id, assignment.day);
        if !seen.insert(key) {
            duplicates.insert(key);
            continue;
        }
        index.claim(
            key,
            Cell {
                code: assignment.shift_code.clone(),
                position: assignment.position,
            },
            CellSource::Assignment,
        );
    }

    let mut duplicates: Vec<CellKey> = duplicates.into_iter().collect();
    duplicates.sort();
    for key in &duplicates {
        log::warn!("duplicate assignment rows for {}, keeping the first", key);
    }
    index.duplicate_assignments = duplicates;

    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
    }

    fn assignment(staff_id: i64, day: u32, code: &str) -> Assignment {
        Assignment::new(d(day), staff_id, ShiftCode::parse(code), Some(Position::TD))
    }

    fn fixed(staff_id: i64, day: u32, code: &str) -> FixedAssignment {
        FixedAssignment {
            id: None,
            staff_id,
            day: d(day),
            shift_code: ShiftCode::parse(code),
            position: Some(Position::PGD),
            note: None,
        }
    }

    fn off(staff_id: i64, day: u32) -> OffDay {
        OffDay {
            id: None,
            staff_id,
            day: d(day),
            reason: Some("phép".to_string()),
        }
    }

    #[test]
    fn test_key_format() {
        assert_eq!(cell_key(12, d(3)).to_string(), "12|2025-09-03");
    }

    #[test]
    fn test_off_day_beats_everything() {
        let index = build_cell_index(&[assignment(1, 1, "CA1")], &[fixed(1, 1, "K")], &[off(1, 1)]);
        let cell = index.get(1, d(1)).unwrap();
        assert_eq!(cell.code, ShiftCode::P);
        assert_eq!(cell.position, None);
        assert_eq!(index.source(1, d(1)), Some(CellSource::Off));
    }

    #[test]
    fn test_fixed_beats_assignment() {
        let index = build_cell_index(&[assignment(1, 1, "CA1")], &[fixed(1, 1, "K")], &[]);
        let cell = index.get(1, d(1)).unwrap();
        assert_eq!(cell.code, ShiftCode::K);
        assert_eq!(cell.position, Some(Position::PGD));
    }

    #[test]
    fn test_presence_iff_some_source() {
        let index = build_cell_index(&[assignment(1, 1, "CA1")], &[fixed(2, 2, "HC")], &[off(3, 3)]);
        assert_eq!(index.len(), 3);
        assert!(index.get(1, d(2)).is_none());
        assert!(index.get(4, d(1)).is_none());
    }

    #[test]
    fn test_duplicate_assignments_reported_first_wins() {
        let rows = vec![assignment(1, 1, "CA1"), assignment(1, 1, "CA2"), assignment(2, 1, "K")];
        let index = build_cell_index(&rows, &[], &[]);
        assert_eq!(index.get(1, d(1)).unwrap().code, ShiftCode::Ca1);
        assert_eq!(index.duplicate_assignments, vec![cell_key(1, d(1))]);
    }

    #[test]
    fn test_duplicate_detected_even_when_overridden() {
        let rows = vec![assignment(1, 1, "CA1"), assignment(1, 1, "CA2")];
        let index = build_cell_index(&rows, &[], &[off(1, 1)]);
        assert_eq!(index.get(1, d(1)).unwrap().code, ShiftCode::P);
        assert_eq!(index.duplicate_assignments.len(), 1);
    }
}
