pub mod records;
pub mod shift;
pub mod staff;

pub use records::{Assignment, FixedAssignment, Holiday, OffDay, Position};
pub use shift::{ShiftCode, ShiftGroup};
pub use staff::{display_order, parse_staff_notes, Role, Staff, StaffTags};
