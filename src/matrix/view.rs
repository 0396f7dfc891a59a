use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

use super::cell_index::{build_cell_index, Cell, CellIndex, CellKey};
use super::day_totals::{aggregate_day_totals, leader_counts, DayTotals};
use super::summary::{staff_balance, summarize_roster, StaffBalance, StaffSummary};
use super::validator::{validate_leaders, LeaderReport};
use crate::calendar::{in_month, is_weekend, month_days, weekday_label, working_days};
use crate::model::{display_order, Assignment, FixedAssignment, Holiday, OffDay, Staff};

/// Everything fetched for one (year, month) selection
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub year: i32,
    pub month: u32,
    pub staff: Vec<Staff>,
    pub assignments: Vec<Assignment>,
    pub fixed: Vec<FixedAssignment>,
    pub off_days: Vec<OffDay>,
    pub holidays: Vec<Holiday>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayHeader {
    pub day: u32,
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub weekend: bool,
    pub holiday: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StaffRow {
    pub staff: Staff,
    pub code: String,
    /// One entry per day of the month, `None` for no shift
    pub cells: Vec<Option<Cell>>,
    pub summary: StaffSummary,
    pub balance: StaffBalance,
}

/// Derived view of one month, ready for rendering
#[derive(Debug, Clone, Serialize)]
pub struct MatrixView {
    pub year: i32,
    pub month: u32,
    pub days: Vec<DayHeader>,
    pub rows: Vec<StaffRow>,
    pub day_totals: BTreeMap<u32, DayTotals>,
    pub leader_report: LeaderReport,
    pub duplicate_assignments: Vec<CellKey>,
    pub working_days: u32,
    #[serde(skip)]
    pub index: CellIndex,
}

impl MatrixView {
    pub fn summary(&self, staff_id: i64) -> Option<&StaffSummary> {
        self.rows.iter().find(|r| r.staff.id == staff_id).map(|r| &r.summary)
    }
}

/// Composes the pure aggregation steps over one snapshot
pub fn build_view(snapshot: &Snapshot) -> MatrixView {
    let (year, month) = (snapshot.year, snapshot.month);
    let dates = month_days(year, month);

    let index = build_cell_index(&snapshot.assignments, &snapshot.fixed, &snapshot.off_days);
    let mut summaries: HashMap<i64, StaffSummary> = summarize_roster(&snapshot.staff, &dates, &index);

    let holiday_names: HashMap<NaiveDate, String> = snapshot
        .holidays
        .iter()
        .filter(|h| in_month(h.day, year, month))
        .map(|h| (h.day, h.name.clone()))
        .collect();
    let holiday_set: HashSet<NaiveDate> = holiday_names.keys().copied().collect();

    let days = dates
        .iter()
        .map(|date| DayHeader {
            day: date.day(),
            date: *date,
            weekday: weekday_label(*date),
            weekend: is_weekend(*date),
            holiday: holiday_names.get(date).cloned(),
        })
        .collect();

    let working_days = working_days(year, month, &holiday_set);
    let rows = display_order(&snapshot.staff)
        .into_iter()
        .map(|staff| {
            let summary = summaries.remove(&staff.id).unwrap_or_default();
            let balance = staff_balance(&staff, &summary, working_days);
            let cells = dates.iter().map(|date| index.get(staff.id, *date).cloned()).collect();
            StaffRow {
                code: staff.display_code(),
                staff,
                cells,
                summary,
                balance,
            }
        })
        .collect();

    let day_totals = aggregate_day_totals(year, month, &snapshot.assignments, &snapshot.staff);
    let leader_report = validate_leaders(&leader_counts(&day_totals));

    MatrixView {
        year,
        month,
        days,
        rows,
        day_totals,
        leader_report,
        duplicate_assignments: index.duplicate_assignments.clone(),
        working_days,
        index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Position, Role, ShiftCode};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
    }

    fn snapshot() -> Snapshot {
        let staff = vec![
            Staff {
                id: 1,
                name: "Lan".to_string(),
                role: Role::TC,
                can_night: true,
                base_quota: 22.0,
                notes: Some("[CODE:1978][RANK:2]".to_string()),
            },
            Staff {
                id: 2,
                name: "Minh".to_string(),
                role: Role::GDV,
                can_night: false,
                base_quota: 22.0,
                notes: Some("[RANK:1]".to_string()),
            },
        ];
        let mut assignments = Vec::new();
        for day in 1..=30 {
            assignments.push(Assignment::new(d(day), 1, ShiftCode::K, Some(Position::TD)));
        }
        assignments.push(Assignment::new(d(1), 2, ShiftCode::Ca1, Some(Position::PGD)));
        Snapshot {
            year: 2025,
            month: 9,
            staff,
            assignments,
            fixed: vec![],
            off_days: vec![OffDay {
                id: Some(9),
                staff_id: 1,
                day: d(2),
                reason: None,
            }],
            holidays: vec![Holiday {
                day: d(2),
                name: "Quốc khánh".to_string(),
            }],
        }
    }

    #[test]
    fn test_build_view_composes_everything() {
        let view = build_view(&snapshot());
        assert_eq!(view.days.len(), 30);
        assert_eq!(view.days[1].holiday.as_deref(), Some("Quốc khánh"));
        assert_eq!(view.rows[0].staff.id, 2);
        assert_eq!(view.rows[1].code, "1978");
        assert_eq!(view.rows[1].cells[1].as_ref().unwrap().code, ShiftCode::P);

        // Staff 1: 29 K + 1 P
        let summary = view.summary(1).unwrap();
        assert_eq!(summary.count(&ShiftCode::K), 29);
        assert_eq!(summary.credit, 36.25);

        // Day totals come from raw assignments, so the off-day does not remove the leader
        assert!(view.leader_report.is_clean());
        assert_eq!(view.day_totals[&1].pgd.count(&ShiftCode::Ca1), 1);
        assert_eq!(view.working_days, 21);
        assert_eq!(view.rows[1].balance.working_days, 21);
        assert_eq!(view.rows[1].balance.delta, 14.25);
        assert!(view.duplicate_assignments.is_empty());
    }

    #[test]
    fn test_view_serializes() {
        let json = serde_json::to_value(build_view(&snapshot())).unwrap();
        assert_eq!(json["rows"][1]["cells"][0]["code"], "K");
        assert_eq!(json["day_totals"]["1"]["leaders"]["day"], 1);
    }
}
