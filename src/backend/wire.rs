use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ScheduleError};
use crate::model::Assignment;

/// Body of `POST /schedule/generate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub year: i32,
    pub month: u32,
    pub shuffle: bool,
    pub seed: Option<u32>,
    pub save: bool,
    pub fill_hc: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default = "default_ok")]
    pub ok: bool,
    #[serde(default)]
    pub planned: Vec<Assignment>,
}

fn default_ok() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetMode {
    Soft,
    Hard,
}

/// Body of `POST /schedule/reset`
#[derive(Debug, Clone, Serialize)]
pub struct ResetRequest {
    pub year: i32,
    pub month: u32,
    pub mode: ResetMode,
}

/// One conflict reported by `GET /schedule/validate`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    pub kind: Option<String>,
    pub detail: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConflictReport {
    pub ok: bool,
    pub conflicts: Vec<Conflict>,
    pub has_leader_dup: bool,
}

const LEADER_DUP_KINDS: [&str; 2] = ["leader_day_dup", "leader_night_dup"];

fn kind_of(item: &Value) -> Option<String> {
    ["type", "kind", "code"]
        .iter()
        .find_map(|field| item.get(*field).and_then(Value::as_str))
        .map(str::to_string)
}

/// Flattens `conflicts`, sent either as a flat array or keyed by conflict type
pub fn normalize_conflicts(body: &Value) -> ConflictReport {
    let ok = body.get("ok").and_then(Value::as_bool).unwrap_or(true);
    let mut conflicts = Vec::new();

    match body.get("conflicts") {
        Some(Value::Array(items)) => {
            for item in items {
                conflicts.push(Conflict {
                    kind: kind_of(item),
                    detail: item.clone(),
                });
            }
        }
        Some(Value::Object(groups)) => {
            for (kind, details) in groups {
                match details {
                    Value::Array(items) => {
                        for item in items {
                            conflicts.push(Conflict {
                                kind: Some(kind.clone()),
                                detail: item.clone(),
                            });
                        }
                    }
                    Value::Null => {}
                    other => conflicts.push(Conflict {
                        kind: Some(kind.clone()),
                        detail: other.clone(),
                    }),
                }
            }
        }
        _ => {}
    }

    let has_leader_dup = conflicts
        .iter()
        .any(|c| c.kind.as_deref().map(|k| LEADER_DUP_KINDS.contains(&k)).unwrap_or(false));

    ConflictReport {
        ok,
        conflicts,
        has_leader_dup,
    }
}

/// Data rows in an exported CSV: non-empty lines minus the header
pub fn csv_row_count(text: &str) -> usize {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .count()
        .saturating_sub(1)
}

// JSON `error` field first, then the raw body, then the status text
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        match json.get("error") {
            Some(Value::String(message)) if !message.trim().is_empty() => return message.clone(),
            Some(Value::Null) | None => {}
            Some(Value::String(_)) => {}
            Some(other) => return other.to_string(),
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

/// Passes the body of a 2xx response through, anything else becomes `Status`
pub fn check_status(status: StatusCode, body: String) -> Result<String> {
    if !status.is_success() {
        return Err(ScheduleError::Status {
            status: status.as_u16(),
            message: error_message(status, &body),
        });
    }
    Ok(body)
}

/// Decodes a JSON response; a 2xx body that does not parse is `InvalidResponse`
pub fn decode_response<T: DeserializeOwned>(status: StatusCode, body: String) -> Result<T> {
    let body = check_status(status, body)?;
    serde_json::from_str(&body).map_err(|e| ScheduleError::InvalidResponse(e.to_string()))
}
