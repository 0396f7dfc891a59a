#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, Notify};

use shift_matrix::backend::wire::normalize_conflicts;
use shift_matrix::backend::{ConflictReport, GenerateRequest, GenerateResponse, ResetMode, ScheduleBackend};
use shift_matrix::model::{Assignment, FixedAssignment, Holiday, OffDay, Position, Role, ShiftCode, Staff};
use shift_matrix::{Result, ScheduleError};

/// In-memory backend that records what the client sent
pub struct FakeBackend {
    pub staff: Mutex<Vec<Staff>>,
    pub persisted: Mutex<Vec<Assignment>>,
    pub fixed: Mutex<Vec<FixedAssignment>>,
    pub off_days: Mutex<Vec<OffDay>>,
    pub holidays: Mutex<Vec<Holiday>>,
    pub planned: Mutex<Vec<Assignment>>,
    pub validate_body: Mutex<Value>,
    pub csv: Mutex<String>,
    pub generate_requests: Mutex<Vec<GenerateRequest>>,
    pub resets: Mutex<Vec<ResetMode>>,
    pub fail_generate: Mutex<Option<String>>,
    pub generate_gate: Option<Notify>,
    pub reset_gate: Option<Notify>,
    pub fetch_calls: AtomicU64,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            staff: Mutex::new(roster()),
            persisted: Mutex::new(Vec::new()),
            fixed: Mutex::new(Vec::new()),
            off_days: Mutex::new(Vec::new()),
            holidays: Mutex::new(Vec::new()),
            planned: Mutex::new(Vec::new()),
            validate_body: Mutex::new(serde_json::json!({"ok": true, "conflicts": []})),
            csv: Mutex::new(String::new()),
            generate_requests: Mutex::new(Vec::new()),
            resets: Mutex::new(Vec::new()),
            fail_generate: Mutex::new(None),
            generate_gate: None,
            reset_gate: None,
            fetch_calls: AtomicU64::new(0),
        }
    }
}

impl FakeBackend {
    pub fn gated() -> Self {
        Self {
            generate_gate: Some(Notify::new()),
            ..Self::default()
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.generate_gate {
            gate.notify_one();
        }
    }

    // Holds reset calls until release_reset
    pub fn reset_gated() -> Self {
        Self {
            reset_gate: Some(Notify::new()),
            ..Self::default()
        }
    }

    pub fn release_reset(&self) {
        if let Some(gate) = &self.reset_gate {
            gate.notify_one();
        }
    }
}

#[async_trait]
impl ScheduleBackend for FakeBackend {
    async fn fetch_staff(&self) -> Result<Vec<Staff>> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.staff.lock().await.clone())
    }

    async fn fetch_assignments(&self, _year: i32, _month: u32) -> Result<Vec<Assignment>> {
        Ok(self.persisted.lock().await.clone())
    }

    async fn fetch_fixed(&self, _year: i32, _month: u32) -> Result<Vec<FixedAssignment>> {
        Ok(self.fixed.lock().await.clone())
    }

    async fn fetch_off_days(&self, _year: i32, _month: u32) -> Result<Vec<OffDay>> {
        Ok(self.off_days.lock().await.clone())
    }

    async fn fetch_holidays(&self, _year: i32, _month: u32) -> Result<Vec<Holiday>> {
        Ok(self.holidays.lock().await.clone())
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        self.generate_requests.lock().await.push(request.clone());
        if let Some(gate) = &self.generate_gate {
            gate.notified().await;
        }
        if let Some(message) = self.fail_generate.lock().await.clone() {
            return Err(ScheduleError::Transport(message));
        }
        let planned = self.planned.lock().await.clone();
        if request.save {
            *self.persisted.lock().await = planned.clone();
        }
        Ok(GenerateResponse { ok: true, planned })
    }

    async fn validate(&self, _year: i32, _month: u32) -> Result<ConflictReport> {
        Ok(normalize_conflicts(&self.validate_body.lock().await.clone()))
    }

    async fn export_csv(&self, _year: i32, _month: u32) -> Result<String> {
        Ok(self.csv.lock().await.clone())
    }

    async fn reset(&self, _year: i32, _month: u32, mode: ResetMode) -> Result<()> {
        self.resets.lock().await.push(mode);
        if let Some(gate) = &self.reset_gate {
            gate.notified().await;
        }
        self.persisted.lock().await.clear();
        if mode == ResetMode::Hard {
            self.fixed.lock().await.clear();
            self.off_days.lock().await.clear();
        }
        Ok(())
    }
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
}

pub fn roster() -> Vec<Staff> {
    vec![
        Staff {
            id: 1,
            name: "Lan".to_string(),
            role: Role::TC,
            can_night: true,
            base_quota: 22.0,
            notes: Some("[CODE:1978][RANK:1]".to_string()),
        },
        Staff {
            id: 2,
            name: "Minh".to_string(),
            role: Role::TC,
            can_night: true,
            base_quota: 22.0,
            notes: None,
        },
        Staff {
            id: 3,
            name: "Hoa".to_string(),
            role: Role::GDV,
            can_night: false,
            base_quota: 22.0,
            notes: Some("[RANK:2]".to_string()),
        },
    ]
}

/// One K@TD leader per day of September 2025, staff 1 and 2 alternating
pub fn leader_plan() -> Vec<Assignment> {
    (1..=30)
        .map(|d| Assignment::new(day(d), if d % 2 == 0 { 2 } else { 1 }, ShiftCode::K, Some(Position::TD)))
        .collect()
}
