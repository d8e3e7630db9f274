use serde::{Deserialize, Serialize};

/// What the bot sends when a slot opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    #[default]
    Media,
    Button,
}

/// Buttons offered by a button slot. `names` and `values` always have the same length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonPrompt {
    pub names: Vec<String>,
    pub values: Vec<i32>,
}

impl ButtonPrompt {
    pub fn with_count(count: usize) -> Self {
        Self {
            names: vec![String::new(); count],
            values: vec![0; count],
        }
    }

    pub fn count(&self) -> usize {
        self.names.len()
    }

    /// Pads or truncates both lists to `count` entries
    pub fn set_count(&mut self, count: usize) {
        self.names.resize(count, String::new());
        self.values.resize(count, 0);
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        !self.names.is_empty() && self.names.len() == self.values.len()
    }
}

impl Default for ButtonPrompt {
    fn default() -> Self {
        Self::with_count(1)
    }
}

/// One scheduled content unit within a day
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Slot {
    pub name: String,
    pub mandatory: bool,
    pub start_time: String, // "HH:MM", empty while unset
    pub end_time: String,
    pub points: i32,
    pub kind: SlotKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttons: Option<ButtonPrompt>,
}

impl Slot {
    pub fn new(name: &str, start_time: &str, end_time: &str, points: i32) -> Self {
        Self {
            name: name.to_string(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            points,
            ..Self::default()
        }
    }

    /// Switches the slot kind, creating or dropping the button list to match
    pub fn set_kind(&mut self, kind: SlotKind) {
        self.kind = kind;
        match kind {
            SlotKind::Media => self.buttons = None,
            SlotKind::Button => {
                if self.buttons.is_none() {
                    self.buttons = Some(ButtonPrompt::default());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_slot_is_unset_media() {
        let slot = Slot::default();
        assert_eq!(slot.name, "");
        assert!(!slot.mandatory);
        assert_eq!(slot.start_time, "");
        assert_eq!(slot.points, 0);
        assert_eq!(slot.kind, SlotKind::Media);
        assert!(slot.buttons.is_none());
    }

    #[test]
    fn test_set_kind_manages_buttons() {
        let mut slot = Slot::default();
        slot.set_kind(SlotKind::Button);
        assert_eq!(slot.buttons.as_ref().map(ButtonPrompt::count), Some(1));
        slot.set_kind(SlotKind::Media);
        assert!(slot.buttons.is_none());
    }

    #[test]
    fn test_button_count_keeps_lists_aligned() {
        let mut prompt = ButtonPrompt::with_count(2);
        prompt.names[0] = "Yes".to_string();
        prompt.set_count(4);
        assert_eq!(prompt.names.len(), 4);
        assert_eq!(prompt.values.len(), 4);
        assert_eq!(prompt.names[0], "Yes");
        prompt.set_count(1);
        assert!(prompt.is_consistent());
        assert_eq!(prompt.names, vec!["Yes".to_string()]);
    }

    #[test]
    fn test_slot_json_uses_camel_case() {
        let slot = Slot::new("Breakfast", "08:00", "09:00", 10);
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["startTime"], "08:00");
        assert_eq!(json["endTime"], "09:00");
        assert_eq!(json["kind"], "media");
        assert!(json.get("buttons").is_none());

        let parsed: Slot = serde_json::from_str(r#"{"name":"Water","points":5}"#).unwrap();
        assert_eq!(parsed.name, "Water");
        assert_eq!(parsed.start_time, "");
        assert_eq!(parsed.points, 5);
    }
}
