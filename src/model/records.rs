use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::shift::ShiftCode;

/// Organizational place or display variant of an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// Headquarters (Tổng đài)
    TD,
    /// Branch office (Phòng giao dịch)
    PGD,
    /// Leader shift rendered with the white variant
    #[serde(rename = "K_WHITE")]
    KWhite,
    #[serde(other)]
    Other,
}

/// One generated or persisted shift assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub day: NaiveDate,
    pub staff_id: i64,
    pub shift_code: ShiftCode,
    #[serde(default)]
    pub position: Option<Position>,
}

/// A manually pinned shift for one staff member on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedAssignment {
    #[serde(default)]
    pub id: Option<i64>,
    pub staff_id: i64,
    pub day: NaiveDate,
    pub shift_code: ShiftCode,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffDay {
    #[serde(default)]
    pub id: Option<i64>,
    pub staff_id: i64,
    pub day: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    pub day: NaiveDate,
    #[serde(default)]
    pub name: String,
}

impl Assignment {
    pub fn new(day: NaiveDate, staff_id: i64, shift_code: ShiftCode, position: Option<Position>) -> Self {
        Self {
            day,
            staff_id,
            shift_code,
            position,
        }
    }

    /// Day leader: K at headquarters
    pub fn is_day_leader(&self) -> bool {
        self.shift_code == ShiftCode::K && self.position == Some(Position::TD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_wire_shape() {
        let a: Assignment =
            serde_json::from_str(r#"{"day":"2025-09-01","staff_id":3,"shift_code":"K","position":"TD"}"#).unwrap();
        assert_eq!(a.day, NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
        assert!(a.is_day_leader());

        let b: Assignment =
            serde_json::from_str(r#"{"day":"2025-09-01","staff_id":3,"shift_code":"K","position":null}"#).unwrap();
        assert_eq!(b.position, None);
        assert!(!b.is_day_leader());
    }

    #[test]
    fn test_position_variants() {
        let p: Position = serde_json::from_str("\"K_WHITE\"").unwrap();
        assert_eq!(p, Position::KWhite);
        let other: Position = serde_json::from_str("\"CN2\"").unwrap();
        assert_eq!(other, Position::Other);
    }

    #[test]
    fn test_missing_optional_fields() {
        let f: FixedAssignment =
            serde_json::from_str(r#"{"staff_id":1,"day":"2025-09-02","shift_code":"CA1"}"#).unwrap();
        assert_eq!(f.position, None);
        assert_eq!(f.id, None);
        let h: Holiday = serde_json::from_str(r#"{"day":"2025-09-02"}"#).unwrap();
        assert!(h.name.is_empty());
    }
}
