use serde::{Deserialize, Serialize};

use crate::slots::MAX_SLOTS_PER_DAY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    #[default]
    Normal,
    TimeLimited,
}

/// The "Bot Settings" part of the dashboard form
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventSettings {
    pub event_type: EventType,
    pub event_name: String,
    pub slots_per_day: String, // raw text from the number input
    pub event_days: Option<u32>,
    pub pass_points: Option<u32>,
}

impl EventSettings {
    pub fn slot_count(&self) -> usize {
        parse_slot_count(&self.slots_per_day)
    }
}

/// Reads the slots-per-day field the way the form does: the leading integer, or 0
pub fn parse_slot_count(value: &str) -> usize {
    let trimmed = value.trim();
    let digits_end = trimmed
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && (*c == '+' || *c == '-'))))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    match trimmed[..digits_end].parse::<i64>() {
        Ok(n) if n > 0 => n as usize,
        _ => 0,
    }
}

/// Validates event settings before the slot configuration is saved
pub fn validate_settings(settings: &EventSettings) -> Result<(), String> {
    if settings.event_name.trim().is_empty() {
        return Err("Event name is required".to_string());
    }

    let count = settings.slot_count();
    if count == 0 {
        return Err("Slots per day must be at least 1".to_string());
    }
    if count > MAX_SLOTS_PER_DAY {
        return Err(format!("Slots per day cannot exceed {}", MAX_SLOTS_PER_DAY));
    }

    if settings.event_type == EventType::TimeLimited {
        match settings.event_days {
            Some(days) if days >= 1 => {}
            _ => return Err("Time-limited events need at least 1 day".to_string()),
        }
        if settings.pass_points.is_none() {
            return Err("Time-limited events need pass points".to_string());
        }
    }

    Ok(())
}
