pub mod cell_index;
pub mod day_totals;
pub mod summary;
pub mod validator;
pub mod view;

pub use cell_index::{build_cell_index, cell_key, Cell, CellIndex, CellKey, CellSource};
pub use day_totals::{aggregate_day_totals, leader_counts, DayTotals, LeaderCounts, PlaceTotals};
pub use summary::{staff_balance, summarize_roster, summarize_staff, StaffBalance, StaffSummary};
pub use validator::{validate_leaders, LeaderError, LeaderReport};
pub use view::{build_view, DayHeader, MatrixView, Snapshot, StaffRow};
