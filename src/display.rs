use chrono::Local;
use std::fs::File;
use std::io::Write;

use crate::slots::time::lenient_minutes;
use crate::slots::{minutes_to_time_string, Slot, SlotKind, ValidationReport, POINT_BUDGET};

/// Warning text shown when the point budget is exceeded
pub const POINTS_WARNING: &str = "Total points cannot exceed 100.";
/// Warning text shown when two slots overlap
pub const OVERLAP_WARNING: &str = "Time slots overlap.";

/// Warnings for a report, in display order
pub fn report_warnings(report: &ValidationReport) -> Vec<&'static str> {
    let mut warnings = Vec::new();
    if report.total_points_exceeded {
        warnings.push(POINTS_WARNING);
    }
    if report.has_overlap {
        warnings.push(OVERLAP_WARNING);
    }
    warnings
}

/// Formats one slot as a single line: `Slot N: HH:MM-HH:MM name (points) [flags]`
pub fn format_slot_line(index: usize, slot: &Slot) -> String {
    let show = |t: &str| if t.is_empty() { "--:--".to_string() } else { t.to_string() };
    let name = if slot.name.is_empty() { "[UNNAMED]" } else { slot.name.as_str() };

    let mut line = format!(
        "Slot {}: {}-{} {} ({} pts)",
        index + 1,
        show(&slot.start_time),
        show(&slot.end_time),
        name,
        slot.points
    );
    if slot.mandatory {
        line.push_str(" [mandatory]");
    }
    if slot.kind == SlotKind::Button {
        if let Some(buttons) = &slot.buttons {
            let labels: Vec<String> = buttons
                .names
                .iter()
                .zip(&buttons.values)
                .map(|(n, v)| format!("{}={}", n, v))
                .collect();
            line.push_str(&format!(" buttons: {}", labels.join(", ")));
        }
    }
    line
}

/// The shared part of two overlapping slots as "HH:MM-HH:MM"
fn overlap_window(a: &Slot, b: &Slot) -> String {
    let start = lenient_minutes(&a.start_time).max(lenient_minutes(&b.start_time));
    let end = lenient_minutes(&a.end_time).min(lenient_minutes(&b.end_time));
    format!("{}-{}", minutes_to_time_string(start), minutes_to_time_string(end))
}

fn report_lines(title: &str, slots: &[Slot], report: &ValidationReport) -> Vec<String> {
    let mut lines = vec![format!("** {} **", title)];
    for (index, slot) in slots.iter().enumerate() {
        lines.push(format_slot_line(index, slot));
    }
    lines.push(format!("Total points: {}/{}", report.total_points, POINT_BUDGET));
    for warning in report_warnings(report) {
        lines.push(format!("WARNING: {}", warning));
    }
    if let Some((a, b)) = report.overlap {
        lines.push(format!(
            "  first overlap: slot {} and slot {} ({})",
            a + 1,
            b + 1,
            overlap_window(&slots[a], &slots[b])
        ));
    }
    if report.is_clean() {
        lines.push("OK: no warnings".to_string());
    }
    lines
}

/// Prints a slot configuration and its warnings in a readable format
pub fn print_slot_report(title: &str, slots: &[Slot], report: &ValidationReport) {
    println!();
    for line in report_lines(title, slots, report) {
        println!("{}", line);
    }
}

/// Writes the same report to a text file with a generation timestamp
pub fn write_report_to_file(
    title: &str,
    slots: &[Slot],
    report: &ValidationReport,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;
    writeln!(file, "# generated {}", Local::now().format("%Y-%m-%d %H:%M"))?;
    for line in report_lines(title, slots, report) {
        writeln!(file, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::{validate, ButtonPrompt};

    #[test]
    fn test_warnings_follow_flags() {
        let report = ValidationReport {
            total_points_exceeded: true,
            has_overlap: true,
            total_points: 120,
            overlap: Some((0, 1)),
        };
        assert_eq!(report_warnings(&report), vec![POINTS_WARNING, OVERLAP_WARNING]);
        assert!(report_warnings(&ValidationReport::default()).is_empty());
    }

    #[test]
    fn test_format_slot_line() {
        let mut slot = Slot::new("Water", "10:21", "10:23", 2);
        slot.mandatory = true;
        slot.kind = SlotKind::Button;
        slot.buttons = Some(ButtonPrompt {
            names: vec!["Yes".to_string(), "No".to_string()],
            values: vec![2, 0],
        });
        assert_eq!(
            format_slot_line(0, &slot),
            "Slot 1: 10:21-10:23 Water (2 pts) [mandatory] buttons: Yes=2, No=0"
        );
        assert_eq!(format_slot_line(4, &Slot::default()), "Slot 5: --:-----:-- [UNNAMED] (0 pts)");
    }

    #[test]
    fn test_report_file() {
        let slots = vec![Slot::new("A", "09:00", "10:30", 60), Slot::new("B", "10:00", "11:00", 50)];
        let report = validate(&slots);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        write_report_to_file("Day", &slots, &report, path.to_str().unwrap()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("** Day **"));
        assert!(text.contains("Total points: 110/100"));
        assert!(text.contains("WARNING: Total points cannot exceed 100."));
        assert!(text.contains("WARNING: Time slots overlap."));
        assert!(text.contains("first overlap: slot 1 and slot 2 (10:00-10:30)"));
    }
}
