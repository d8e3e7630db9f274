use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::parser::BUTTON_SEPARATOR;
use crate::slots::{Slot, SlotKind};

const HEADERS: [&str; 8] = [
    "name",
    "mandatory",
    "start_time",
    "end_time",
    "points",
    "kind",
    "button_names",
    "button_values",
];

/// Writes slots as CSV in the format [`crate::parser::load_slots_csv`] reads
pub fn write_slots_csv<W: Write>(slots: &[Slot], writer: W) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(HEADERS)?;

    for slot in slots {
        let mandatory = if slot.mandatory { "yes" } else { "no" };
        let points = slot.points.to_string();
        let kind = match slot.kind {
            SlotKind::Media => "media",
            SlotKind::Button => "button",
        };

        let separator = BUTTON_SEPARATOR.to_string();
        let (button_names, button_values) = match &slot.buttons {
            Some(buttons) => (
                buttons.names.join(&separator),
                buttons
                    .values
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(&separator),
            ),
            None => (String::new(), String::new()),
        };

        wtr.write_record([
            slot.name.as_str(),
            mandatory,
            slot.start_time.as_str(),
            slot.end_time.as_str(),
            points.as_str(),
            kind,
            button_names.as_str(),
            button_values.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports slots to a CSV file, replacing it if it exists
pub fn export_slots_to_csv(slots: &[Slot], csv_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(csv_path)?;
    write_slots_csv(slots, file)
}
