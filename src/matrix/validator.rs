use serde::Serialize;
use std::collections::BTreeMap;

use super::day_totals::LeaderCounts;

/// A day whose day-leader count is not exactly one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeaderError {
    pub day: u32,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeaderReport {
    /// Days with zero or more than one day leader, in day order
    pub leader_errors: Vec<LeaderError>,
    /// Some day has more than one day leader or more than one night leader
    pub has_leader_dup: bool,
}

impl LeaderReport {
    pub fn is_clean(&self) -> bool {
        self.leader_errors.is_empty() && !self.has_leader_dup
    }
}

/// Checks the one-day-leader / at-most-one-night-leader policy
pub fn validate_leaders(counts: &BTreeMap<u32, LeaderCounts>) -> LeaderReport {
    let leader_errors = counts
        .iter()
        .filter(|(_, c)| c.day != 1)
        .map(|(day, c)| LeaderError { day: *day, count: c.day })
        .collect();
    let has_leader_dup = counts.values().any(|c| c.day > 1 || c.night > 1);

    LeaderReport {
        leader_errors,
        has_leader_dup,
    }
}
