//! Logical actions and their rebindable trigger keys

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Quit,
    ToggleDisplay,
    ToggleTeam,
    ToggleDetection,
    ToggleVoice,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Quit,
        Action::ToggleDisplay,
        Action::ToggleTeam,
        Action::ToggleDetection,
        Action::ToggleVoice,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::Quit => "quit",
            Action::ToggleDisplay => "display",
            Action::ToggleTeam => "team",
            Action::ToggleDetection => "detection",
            Action::ToggleVoice => "voice",
        }
    }

    fn default_key(self) -> &'static str {
        match self {
            Action::Quit => "F12",
            Action::ToggleDisplay => "F11",
            Action::ToggleTeam => "F10",
            Action::ToggleDetection => "F9",
            Action::ToggleVoice => "F8",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = HotkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Action::ALL
            .into_iter()
            .find(|action| action.name() == wanted)
            .ok_or_else(|| HotkeyError::UnknownAction(s.to_string()))
    }
}

/// Trigger key name, normalized to upper case (`f9` and `F9` are the same key)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key(String);

impl Key {
    pub fn new(name: &str) -> Option<Self> {
        let name = name.trim();
        (!name.is_empty()).then(|| Self(name.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HotkeyError {
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("key name is empty")]
    EmptyKey,

    #[error("key {key} is already bound to {bound_to}")]
    Conflict { key: Key, bound_to: Action },
}

/// Action -> key table. Each key triggers at most one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeyBindings {
    bindings: Vec<(Action, Option<Key>)>,
}

impl Default for HotkeyBindings {
    fn default() -> Self {
        Self {
            bindings: Action::ALL
                .into_iter()
                .map(|action| (action, Key::new(action.default_key())))
                .collect(),
        }
    }
}

impl HotkeyBindings {
    pub fn key_for(&self, action: Action) -> Option<&Key> {
        self.bindings
            .iter()
            .find(|(a, _)| *a == action)
            .and_then(|(_, key)| key.as_ref())
    }

    pub fn action_for(&self, key: &str) -> Option<Action> {
        let key = Key::new(key)?;
        self.bindings
            .iter()
            .find(|(_, bound)| bound.as_ref() == Some(&key))
            .map(|(action, _)| *action)
    }

    /// Swap the key for `action`, returning the key it replaces.
    ///
    /// Fails without changing anything if the key already triggers another
    /// action.
    pub fn rebind(&mut self, action: Action, key: &str) -> Result<Option<Key>, HotkeyError> {
        let key = Key::new(key).ok_or(HotkeyError::EmptyKey)?;

        if let Some(bound_to) = self.action_for(key.as_str()) {
            if bound_to != action {
                return Err(HotkeyError::Conflict { key, bound_to });
            }
        }

        Ok(self.slot_mut(action).replace(key))
    }

    /// Remove the key for `action`, returning it.
    pub fn unbind(&mut self, action: Action) -> Option<Key> {
        self.slot_mut(action).take()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Action, Option<&Key>)> + '_ {
        self.bindings.iter().map(|(action, key)| (*action, key.as_ref()))
    }

    fn slot_mut(&mut self, action: Action) -> &mut Option<Key> {
        let index = self.bindings.iter().position(|(a, _)| *a == action);
        let index = match index {
            Some(index) => index,
            None => {
                self.bindings.push((action, None));
                self.bindings.len() - 1
            }
        };
        &mut self.bindings[index].1
    }
}
