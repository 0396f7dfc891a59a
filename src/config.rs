use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";
pub const DEFAULT_PORT: u16 = 8080;

/// Runtime settings, read from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base: String,
    pub timeout: Duration,
    pub admin_password: String,
    pub fill_hc: bool,
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = lookup("SCHEDULE_API_BASE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let timeout_secs = lookup("SCHEDULE_API_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(20);
        let admin_password = lookup("ADMIN_PASSWORD").unwrap_or_else(|| {
            log::warn!("ADMIN_PASSWORD not set, using the default password");
            "admin123".to_string()
        });
        let fill_hc = lookup("FILL_HC").and_then(|v| parse_flag(&v)).unwrap_or(true);

        Self {
            api_base,
            timeout: Duration::from_secs(timeout_secs),
            admin_password,
            fill_hc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(config.admin_password, "admin123");
        assert!(config.fill_hc);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("SCHEDULE_API_BASE", "https://schedule.local/api"),
            ("SCHEDULE_API_TIMEOUT_SECS", "5"),
            ("ADMIN_PASSWORD", "s3cret"),
            ("FILL_HC", "no"),
        ]));
        assert_eq!(config.api_base, "https://schedule.local/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.admin_password, "s3cret");
        assert!(!config.fill_hc);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = AppConfig::from_lookup(lookup_from(&[("SCHEDULE_API_TIMEOUT_SECS", "0"), ("FILL_HC", "maybe")]));
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert!(config.fill_hc);
    }
}
