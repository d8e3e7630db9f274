use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::time::TimePolicy;
use super::types::{Slot, SlotKind};
use super::validate::{validate_with, SlotError, ValidationReport};

/// What happens to existing slots when the slots-per-day count changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizePolicy {
    /// Throw every slot away and start from defaults
    #[default]
    Reset,
    /// Keep slots whose index is still in range
    Preserve,
}

/// A single-field change coming from the slot form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum SlotEdit {
    Name(String),
    Mandatory(bool),
    StartTime(String),
    EndTime(String),
    Points(i32),
    Kind(SlotKind),
    ButtonCount(usize),
    ButtonName { button: usize, name: String },
    ButtonValue { button: usize, value: i32 },
}

/// One slot every 15 minutes is the densest day the form allows
pub const MAX_SLOTS_PER_DAY: usize = 96;
pub const MAX_BUTTONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("slot {index} does not exist (board has {len} slots)")]
    NoSuchSlot { index: usize, len: usize },
    #[error("slot {0} is not a button slot")]
    NotAButtonSlot(usize),
    #[error("slot {slot} has no button {button}")]
    NoSuchButton { slot: usize, button: usize },
    #[error("a button slot needs between 1 and {max} buttons (got {0})", max = MAX_BUTTONS)]
    InvalidButtonCount(usize),
    #[error("at most {max} slots per day are allowed (got {count})")]
    TooManySlots { count: usize, max: usize },
}

/// The slot collection behind the configuration form.
///
/// Every mutation drops the cached report; [`SlotBoard::report`] recomputes on demand.
#[derive(Debug, Clone, Default)]
pub struct SlotBoard {
    slots: Vec<Slot>,
    resize_policy: ResizePolicy,
    time_policy: TimePolicy,
    cached: Option<ValidationReport>,
}

impl SlotBoard {
    pub fn new(resize_policy: ResizePolicy, time_policy: TimePolicy) -> Self {
        Self {
            slots: Vec::new(),
            resize_policy,
            time_policy,
            cached: None,
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn time_policy(&self) -> TimePolicy {
        self.time_policy
    }

    /// Sets the number of slots according to the board's resize policy.
    /// Counts above [`MAX_SLOTS_PER_DAY`] leave the board untouched.
    pub fn resize(&mut self, count: usize) -> Result<(), BoardError> {
        if count > MAX_SLOTS_PER_DAY {
            return Err(BoardError::TooManySlots { count, max: MAX_SLOTS_PER_DAY });
        }
        match self.resize_policy {
            ResizePolicy::Reset => {
                self.slots = vec![Slot::default(); count];
            }
            ResizePolicy::Preserve => {
                self.slots.resize(count, Slot::default());
            }
        }
        self.cached = None;
        tracing::debug!(count, policy = ?self.resize_policy, "resized slot board");
        Ok(())
    }

    /// Replaces the whole collection, e.g. after loading a file
    pub fn replace(&mut self, slots: Vec<Slot>) {
        self.slots = slots;
        self.cached = None;
    }

    pub fn update(&mut self, index: usize, edit: SlotEdit) -> Result<(), BoardError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(BoardError::NoSuchSlot { index, len })?;

        match edit {
            SlotEdit::Name(name) => slot.name = name,
            SlotEdit::Mandatory(mandatory) => slot.mandatory = mandatory,
            SlotEdit::StartTime(time) => slot.start_time = time,
            SlotEdit::EndTime(time) => slot.end_time = time,
            SlotEdit::Points(points) => slot.points = points,
            SlotEdit::Kind(kind) => slot.set_kind(kind),
            SlotEdit::ButtonCount(count) => {
                if count == 0 || count > MAX_BUTTONS {
                    return Err(BoardError::InvalidButtonCount(count));
                }
                let buttons = slot.buttons.as_mut().ok_or(BoardError::NotAButtonSlot(index))?;
                buttons.set_count(count);
            }
            SlotEdit::ButtonName { button, name } => {
                let buttons = slot.buttons.as_mut().ok_or(BoardError::NotAButtonSlot(index))?;
                let entry = buttons
                    .names
                    .get_mut(button)
                    .ok_or(BoardError::NoSuchButton { slot: index, button })?;
                *entry = name;
            }
            SlotEdit::ButtonValue { button, value } => {
                let buttons = slot.buttons.as_mut().ok_or(BoardError::NotAButtonSlot(index))?;
                let entry = buttons
                    .values
                    .get_mut(button)
                    .ok_or(BoardError::NoSuchButton { slot: index, button })?;
                *entry = value;
            }
        }

        self.cached = None;
        Ok(())
    }

    /// Current warnings, recomputed only after a mutation
    pub fn report(&mut self) -> Result<ValidationReport, SlotError> {
        if let Some(report) = self.cached {
            return Ok(report);
        }
        let report = validate_with(&self.slots, self.time_policy)?;
        self.cached = Some(report);
        Ok(report)
    }

    #[cfg(test)]
    pub(crate) fn is_cached(&self) -> bool {
        self.cached.is_some()
    }
}
