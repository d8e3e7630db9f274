use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How slot times that are not a clean `HH:MM` are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePolicy {
    /// Anything that does not parse counts as midnight; no range checks
    #[default]
    Lenient,
    /// Non-empty times must be a valid 24h clock time
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("'{0}' is not a valid HH:MM time")]
    Malformed(String),
}

/// Parses a time string (HH:MM) to minutes since midnight using the given policy.
/// An empty string is an unset time and is always 0.
pub fn time_to_minutes(time_str: &str, policy: TimePolicy) -> Result<u32, TimeError> {
    match policy {
        TimePolicy::Lenient => Ok(lenient_minutes(time_str)),
        TimePolicy::Strict => strict_minutes(time_str),
    }
}

/// Permissive conversion used by the dashboard: "25:99" is 1599, "abc" is 0
pub fn lenient_minutes(time_str: &str) -> u32 {
    let time_str = time_str.trim();
    if time_str.is_empty() {
        return 0;
    }
    let mut parts = time_str.split(':');
    let hours = parts.next().and_then(|h| h.trim().parse::<u32>().ok());
    let minutes = parts.next().and_then(|m| m.trim().parse::<u32>().ok());
    match (hours, minutes) {
        (Some(h), Some(m)) => h.saturating_mul(60).saturating_add(m),
        _ => 0,
    }
}

fn strict_minutes(time_str: &str) -> Result<u32, TimeError> {
    let time_str = time_str.trim();
    if time_str.is_empty() {
        return Ok(0);
    }
    let time = NaiveTime::parse_from_str(time_str, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time_str, "%H:%M:%S"))
        .map_err(|_| TimeError::Malformed(time_str.to_string()))?;
    Ok(time.hour() * 60 + time.minute())
}

/// Formats minutes since midnight to time string (HH:MM)
pub fn minutes_to_time_string(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    format!("{:02}:{:02}", hours % 24, mins)
}
