use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Staff role. Only `TC` staff can be night leaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    TC,
    GDV,
    HC,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub id: i64,
    #[serde(alias = "full_name")]
    pub name: String,
    pub role: Role,
    #[serde(default, alias = "allow_night")]
    pub can_night: bool,
    #[serde(default)]
    pub base_quota: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Metadata embedded in the staff notes field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StaffTags {
    pub code: Option<String>,
    pub rank: Option<u32>,
}

fn code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\[CODE:\s*([^\]]*?)\s*\]").expect("valid CODE pattern"))
}

fn rank_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\[RANK:\s*([^\]]*?)\s*\]").expect("valid RANK pattern"))
}

// [CODE:x] and [RANK:n] anywhere in free text, first well-formed tag wins
pub fn parse_staff_notes(notes: &str) -> StaffTags {
    let code = code_pattern()
        .captures_iter(notes)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .find(|value| !value.is_empty());

    let rank = rank_pattern()
        .captures_iter(notes)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| m.as_str().parse::<u32>().ok());

    StaffTags { code, rank }
}

impl Staff {
    pub fn tags(&self) -> StaffTags {
        self.notes.as_deref().map(parse_staff_notes).unwrap_or_default()
    }

    /// Display code from notes, falling back to the numeric id
    pub fn display_code(&self) -> String {
        self.tags().code.unwrap_or_else(|| self.id.to_string())
    }

    pub fn is_team_leader(&self) -> bool {
        self.role == Role::TC
    }
}

/// Orders staff for display: by rank (rank-less last), then name, then id
pub fn display_order(staff: &[Staff]) -> Vec<Staff> {
    let mut ordered: Vec<(Option<u32>, &Staff)> = staff.iter().map(|s| (s.tags().rank, s)).collect();
    ordered.sort_by(|(rank_a, a), (rank_b, b)| {
        let by_rank = match (rank_a, rank_b) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_rank.then_with(|| a.name.cmp(&b.name)).then_with(|| a.id.cmp(&b.id))
    });
    ordered.into_iter().map(|(_, s)| s.clone()).collect()
}
