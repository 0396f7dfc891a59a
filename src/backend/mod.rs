pub mod client;
pub mod wire;

pub use client::{HttpBackend, ScheduleBackend};
pub use wire::{
    csv_row_count, normalize_conflicts, Conflict, ConflictReport, GenerateRequest, GenerateResponse, ResetMode,
};
