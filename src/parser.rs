use csv::Reader;
use std::fs;
use std::path::Path;

use crate::slots::{ButtonPrompt, Slot, SlotKind};

/// Separator used inside the button name/value columns
pub const BUTTON_SEPARATOR: char = '|';

/// Parses a boolean value from various string representations
fn parse_bool(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    lower == "yes" || lower == "true" || lower == "1"
}

/// Parses a point value, returning 0 if empty or invalid. Negative values are kept.
fn parse_points(value: &str) -> i32 {
    value.trim().parse().unwrap_or(0)
}

fn parse_kind(value: &str) -> SlotKind {
    match value.trim().to_lowercase().as_str() {
        "button" => SlotKind::Button,
        _ => SlotKind::Media,
    }
}

/// Builds the button list from the `|`-separated columns.
/// The name column decides the button count; missing or empty values are 0
/// and keep their position.
fn parse_buttons(names: &str, values: &str) -> ButtonPrompt {
    let split = |column: &str| -> Vec<String> {
        if column.trim().is_empty() {
            Vec::new()
        } else {
            column.split(BUTTON_SEPARATOR).map(|v| v.trim().to_string()).collect()
        }
    };
    let names = split(names);
    let parsed_values: Vec<i32> = split(values).iter().map(|v| parse_points(v)).collect();

    let mut prompt = ButtonPrompt {
        values: parsed_values,
        names,
    };
    let count = prompt.names.len().max(1);
    prompt.set_count(count);
    prompt
}

/// Loads slots from a CSV file with the columns
/// `name,mandatory,start_time,end_time,points,kind,button_names,button_values`.
///
/// Columns are looked up by header name; `kind` and the button columns are optional.
pub fn load_slots_csv<P: AsRef<Path>>(csv_path: P) -> Result<Vec<Slot>, Box<dyn std::error::Error>> {
    let mut reader = Reader::from_path(csv_path)?;
    let headers = reader.headers()?.clone();

    let column = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
    let name_col = column("name").unwrap_or(0);
    let mandatory_col = column("mandatory").unwrap_or(1);
    let start_col = column("start_time").unwrap_or(2);
    let end_col = column("end_time").unwrap_or(3);
    let points_col = column("points").unwrap_or(4);
    let kind_col = column("kind");
    let button_names_col = column("button_names");
    let button_values_col = column("button_values");

    let mut slots = Vec::new();
    for result in reader.records() {
        let record = result?;

        if record.iter().all(|field| field.trim().is_empty()) {
            continue; // Skip blank lines
        }

        let field = |col: Option<usize>| col.and_then(|c| record.get(c)).unwrap_or("");

        let mut slot = Slot {
            name: field(Some(name_col)).trim().to_string(),
            mandatory: parse_bool(field(Some(mandatory_col))),
            start_time: field(Some(start_col)).trim().to_string(),
            end_time: field(Some(end_col)).trim().to_string(),
            points: parse_points(field(Some(points_col))),
            ..Slot::default()
        };

        if parse_kind(field(kind_col)) == SlotKind::Button {
            slot.kind = SlotKind::Button;
            slot.buttons = Some(parse_buttons(field(button_names_col), field(button_values_col)));
        }

        slots.push(slot);
    }

    Ok(slots)
}

/// Loads slots from a JSON array of camelCase slot objects
pub fn load_slots_json<P: AsRef<Path>>(json_path: P) -> Result<Vec<Slot>, Box<dyn std::error::Error>> {
    let data = fs::read_to_string(json_path)?;
    let mut slots: Vec<Slot> = serde_json::from_str(&data)?;
    for slot in &mut slots {
        // keep kind and buttons in agreement, whatever the file said
        let kind = slot.kind;
        slot.set_kind(kind);
        if let Some(buttons) = slot.buttons.as_mut() {
            let count = buttons.names.len().max(1);
            buttons.set_count(count);
        }
    }
    Ok(slots)
}

/// Picks the loader from the file extension (`.json`, anything else is CSV)
pub fn load_slots<P: AsRef<Path>>(path: P) -> Result<Vec<Slot>, Box<dyn std::error::Error>> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        load_slots_json(path)
    } else {
        load_slots_csv(path)
    }
}
