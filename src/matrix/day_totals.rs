use chrono::Datelike;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::calendar::{days_in_month, in_month};
use crate::model::{Assignment, Position, Role, ShiftCode, Staff};

/// Per-code counters for one place on one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceTotals {
    pub counts: BTreeMap<ShiftCode, u32>,
    pub total: u32,
}

impl Default for PlaceTotals {
    fn default() -> Self {
        // Every known code is present so renderers never hit a missing entry
        let counts = ShiftCode::KNOWN.iter().map(|code| (code.clone(), 0)).collect();
        Self { counts, total: 0 }
    }
}

impl PlaceTotals {
    pub fn count(&self, code: &ShiftCode) -> u32 {
        self.counts.get(code).copied().unwrap_or(0)
    }

    fn bump(&mut self, code: &ShiftCode) {
        *self.counts.entry(code.clone()).or_insert(0) += 1;
        self.total += 1;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LeaderCounts {
    /// K at TD
    pub day: u32,
    /// Night shift at TD held by a TC staff member
    pub night: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DayTotals {
    pub td: PlaceTotals,
    pub pgd: PlaceTotals,
    pub leaders: LeaderCounts,
}

/// Buckets the month's raw assignments by day, place and shift code
///
/// Works on raw assignments, not on the merged cell index: fixed and
/// off-day overrides do not change these totals. Every day of the month
/// gets an entry, all zero when nothing is assigned.
pub fn aggregate_day_totals(
    year: i32,
    month: u32,
    assignments: &[Assignment],
    staff: &[Staff],
) -> BTreeMap<u32, DayTotals> {
    let roles: HashMap<i64, Role> = staff.iter().map(|s| (s.id, s.role)).collect();

    let mut totals: BTreeMap<u32, DayTotals> = (1..=days_in_month(year, month))
        .map(|day| (day, DayTotals::default()))
        .collect();

    for assignment in assignments.iter().filter(|a| in_month(a.day, year, month)) {
        let entry = match totals.get_mut(&assignment.day.day()) {
            Some(entry) => entry,
            None => continue,
        };

        match assignment.position {
            Some(Position::TD) => entry.td.bump(&assignment.shift_code),
            Some(Position::PGD) => entry.pgd.bump(&assignment.shift_code),
            // K_WHITE, unknown and missing positions stay out of place totals
            _ => {}
        }

        if assignment.position != Some(Position::TD) {
            continue;
        }
        match assignment.shift_code {
            ShiftCode::K => entry.leaders.day += 1,
            ShiftCode::Dem => {
                if roles.get(&assignment.staff_id) == Some(&Role::TC) {
                    entry.leaders.night += 1;
                }
            }
            _ => {}
        }
    }

    totals
}

/// Leader counts only, in day order
pub fn leader_counts(totals: &BTreeMap<u32, DayTotals>) -> BTreeMap<u32, LeaderCounts> {
    totals.iter().map(|(day, t)| (*day, t.leaders)).collect()
}
