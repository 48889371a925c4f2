//! Runtime plumbing shared by the pipeline worker and its consumers

pub mod hotkeys;
pub mod narration;
pub mod pacing;
pub mod settings;
pub mod slot;

pub use hotkeys::{Action, HotkeyBindings, HotkeyError, Key};
pub use narration::{Admission, LogSpeaker, NarrationEvent, NarrationGate, Narrator, Speaker, enemy_advisories};
pub use pacing::{PacedWorker, PacingConfig, StepOutcome};
pub use settings::Settings;
pub use slot::SummarySlot;
