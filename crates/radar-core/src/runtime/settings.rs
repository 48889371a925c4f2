//! Shared runtime toggles
//!
//! One writer (hotkeys / console), many readers (pipeline worker, presenter,
//! narrator). Relaxed visibility is fine: a toggle seen one cycle late is not
//! an error.

use super::hotkeys::{Action, HotkeyBindings};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{PoisonError, RwLock};

#[derive(Debug)]
pub struct Settings {
    detection_enabled: AtomicBool,
    presentation_enabled: AtomicBool,
    show_team: AtomicBool,
    voice_enabled: AtomicBool,
    /// Percent, 0..=100
    volume: AtomicU8,
    hotkeys: RwLock<HotkeyBindings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            detection_enabled: AtomicBool::new(true),
            presentation_enabled: AtomicBool::new(true),
            show_team: AtomicBool::new(true),
            voice_enabled: AtomicBool::new(false),
            volume: AtomicU8::new(100),
            hotkeys: RwLock::new(HotkeyBindings::default()),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detection_enabled(&self) -> bool {
        self.detection_enabled.load(Ordering::Relaxed)
    }

    pub fn set_detection_enabled(&self, enabled: bool) {
        self.detection_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn presentation_enabled(&self) -> bool {
        self.presentation_enabled.load(Ordering::Relaxed)
    }

    pub fn set_presentation_enabled(&self, enabled: bool) {
        self.presentation_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn show_team(&self) -> bool {
        self.show_team.load(Ordering::Relaxed)
    }

    pub fn set_show_team(&self, enabled: bool) {
        self.show_team.store(enabled, Ordering::Relaxed);
    }

    pub fn voice_enabled(&self) -> bool {
        self.voice_enabled.load(Ordering::Relaxed)
    }

    pub fn set_voice_enabled(&self, enabled: bool) {
        self.voice_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn volume_percent(&self) -> u8 {
        self.volume.load(Ordering::Relaxed)
    }

    /// Volume as a 0.0..=1.0 gain.
    pub fn volume(&self) -> f32 {
        f32::from(self.volume_percent()) / 100.0
    }

    /// Values above 100 are clamped.
    pub fn set_volume_percent(&self, percent: u8) {
        self.volume.store(percent.min(100), Ordering::Relaxed);
    }

    /// Snapshot of the current bindings.
    pub fn hotkeys(&self) -> HotkeyBindings {
        self.hotkeys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Run `f` against the bindings under the write lock.
    pub fn update_hotkeys<R>(&self, f: impl FnOnce(&mut HotkeyBindings) -> R) -> R {
        let mut guard = self.hotkeys.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Apply the toggle side of an action. `Quit` is left to the caller.
    ///
    /// Returns the new state of the toggled flag, or `None` for `Quit`.
    pub fn apply(&self, action: Action) -> Option<bool> {
        let flag = match action {
            Action::Quit => return None,
            Action::ToggleDisplay => &self.presentation_enabled,
            Action::ToggleTeam => &self.show_team,
            Action::ToggleDetection => &self.detection_enabled,
            Action::ToggleVoice => &self.voice_enabled,
        };
        Some(!flag.fetch_xor(true, Ordering::Relaxed))
    }
}
