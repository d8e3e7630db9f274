pub mod types;
pub mod time;
pub mod validate;
pub mod board;

pub use types::{ButtonPrompt, Slot, SlotKind};
pub use time::{minutes_to_time_string, TimePolicy};
pub use validate::{validate, validate_with, SlotError, ValidationReport, POINT_BUDGET};
pub use board::{BoardError, ResizePolicy, SlotBoard, SlotEdit, MAX_SLOTS_PER_DAY};
