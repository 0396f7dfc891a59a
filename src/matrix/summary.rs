use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::cell_index::CellIndex;
use crate::model::{ShiftCode, Staff};

/// Monthly totals for one staff member
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StaffSummary {
    pub counts: BTreeMap<ShiftCode, u32>,
    /// Weighted credit, rounded once to 2 decimals
    pub credit: f64,
    pub day_count: u32,
    pub night_count: u32,
}

impl StaffSummary {
    pub fn count(&self, code: &ShiftCode) -> u32 {
        self.counts.get(code).copied().unwrap_or(0)
    }
}

/// Quota versus earned credit for one staff member
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffBalance {
    pub staff_id: i64,
    pub quota: f64,
    pub credit: f64,
    pub delta: f64,
    pub working_days: u32,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Walks every day of the month for one staff member
pub fn summarize_staff(staff_id: i64, days: &[NaiveDate], index: &CellIndex) -> StaffSummary {
    let mut summary = StaffSummary::default();
    // Raw float sum, rounded only at the end
    let mut raw_credit = 0.0_f64;

    for day in days {
        let cell = match index.get(staff_id, *day) {
            Some(cell) => cell,
            None => continue,
        };
        *summary.counts.entry(cell.code.clone()).or_insert(0) += 1;
        raw_credit += cell.code.credit();
        if cell.code.is_day() {
            summary.day_count += 1;
        } else if cell.code.is_night() {
            summary.night_count += 1;
        }
    }

    summary.credit = round2(raw_credit);
    summary
}

/// Summaries for the whole roster, keyed by staff id
pub fn summarize_roster(staff: &[Staff], days: &[NaiveDate], index: &CellIndex) -> HashMap<i64, StaffSummary> {
    staff
        .iter()
        .map(|s| (s.id, summarize_staff(s.id, days, index)))
        .collect()
}

// Staff without a configured quota owe one shift per working day
pub fn staff_balance(staff: &Staff, summary: &StaffSummary, working_days: u32) -> StaffBalance {
    let quota = if staff.base_quota > 0.0 {
        staff.base_quota
    } else {
        working_days as f64
    };
    StaffBalance {
        staff_id: staff.id,
        quota,
        credit: summary.credit,
        delta: round2(summary.credit - quota),
        working_days,
    }
}
