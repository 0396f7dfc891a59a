use serde::{Deserialize, Serialize};
use std::fmt;

/// Shift codes used in the matrix
///
/// The closed set is `CA1, CA2, HC, K, Đ, P`. Anything else the backend sends
/// is kept as `Other` so unknown or future codes degrade to zero credit
/// instead of failing the whole month.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShiftCode {
    Ca1,
    Ca2,
    Hc,
    /// Team-leader day shift
    K,
    /// Night shift (Đ)
    Dem,
    /// Off / absence marker
    P,
    Other(String),
}

/// Which half of the day a shift belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShiftGroup {
    Day,
    Night,
    Off,
}

impl ShiftCode {
    /// Known codes in display priority order
    pub const KNOWN: [ShiftCode; 6] = [
        ShiftCode::K,
        ShiftCode::Ca1,
        ShiftCode::Ca2,
        ShiftCode::Hc,
        ShiftCode::Dem,
        ShiftCode::P,
    ];

    pub fn parse(value: &str) -> ShiftCode {
        match value.trim() {
            "CA1" => ShiftCode::Ca1,
            "CA2" => ShiftCode::Ca2,
            "HC" => ShiftCode::Hc,
            "K" => ShiftCode::K,
            // Night code, plus the ASCII alias some exports use
            "Đ" | "D" => ShiftCode::Dem,
            "P" => ShiftCode::P,
            other => ShiftCode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ShiftCode::Ca1 => "CA1",
            ShiftCode::Ca2 => "CA2",
            ShiftCode::Hc => "HC",
            ShiftCode::K => "K",
            ShiftCode::Dem => "Đ",
            ShiftCode::P => "P",
            ShiftCode::Other(code) => code,
        }
    }

    /// Work credit for one occurrence of the shift. Unknown codes earn nothing.
    pub fn credit(&self) -> f64 {
        match self {
            ShiftCode::Ca1 | ShiftCode::Ca2 | ShiftCode::Hc => 1.0,
            ShiftCode::K => 1.25,
            ShiftCode::Dem => 1.5,
            ShiftCode::P | ShiftCode::Other(_) => 0.0,
        }
    }

    pub fn group(&self) -> Option<ShiftGroup> {
        match self {
            ShiftCode::Ca1 | ShiftCode::Ca2 | ShiftCode::Hc | ShiftCode::K => Some(ShiftGroup::Day),
            ShiftCode::Dem => Some(ShiftGroup::Night),
            ShiftCode::P => Some(ShiftGroup::Off),
            ShiftCode::Other(_) => None,
        }
    }

    pub fn is_day(&self) -> bool {
        self.group() == Some(ShiftGroup::Day)
    }

    pub fn is_night(&self) -> bool {
        self.group() == Some(ShiftGroup::Night)
    }

    /// Background color of the cell in the rendered matrix
    pub fn color(&self) -> &'static str {
        match self {
            ShiftCode::K => "#fde68a",
            ShiftCode::Ca1 => "#bfdbfe",
            ShiftCode::Ca2 => "#c7d2fe",
            ShiftCode::Hc => "#e5e7eb",
            ShiftCode::Dem => "#1e3a8a",
            ShiftCode::P => "#fecaca",
            ShiftCode::Other(_) => "#ffffff",
        }
    }

    /// Column order for count columns, lower comes first
    pub fn priority(&self) -> u8 {
        match self {
            ShiftCode::K => 0,
            ShiftCode::Ca1 => 1,
            ShiftCode::Ca2 => 2,
            ShiftCode::Hc => 3,
            ShiftCode::Dem => 4,
            ShiftCode::P => 5,
            ShiftCode::Other(_) => u8::MAX,
        }
    }
}

impl From<String> for ShiftCode {
    fn from(value: String) -> Self {
        ShiftCode::parse(&value)
    }
}

impl From<&str> for ShiftCode {
    fn from(value: &str) -> Self {
        ShiftCode::parse(value)
    }
}

impl From<ShiftCode> for String {
    fn from(code: ShiftCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for ShiftCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
