//! Stdin hotkey console
//!
//! Each line is a key name (`F9`), or one of `bind <action> <key>`,
//! `unbind <action>`, `volume <0-100>`, `keys`.

use anyhow::{Context, anyhow, bail};
use radar_core::Settings;
use radar_core::runtime::{Action, Key};
use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    Toggled { action: Action, enabled: bool },
    Rebound { action: Action, key: Key, previous: Option<Key> },
    Unbound { action: Action, previous: Option<Key> },
    Volume(u8),
    Bindings(Vec<(Action, Option<Key>)>),
    /// Blank line or a key with no action
    Ignored,
}

/// Interpret one console line against the shared settings.
pub fn execute(line: &str, settings: &Settings) -> anyhow::Result<Outcome> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Outcome::Ignored);
    };
    let args: Vec<&str> = words.collect();

    match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("bind", [action, key]) => {
            let action: Action = action.parse()?;
            let previous = settings.update_hotkeys(|keys| keys.rebind(action, key))?;
            let key = Key::new(key).ok_or_else(|| anyhow!("key name is empty"))?;
            Ok(Outcome::Rebound { action, key, previous })
        }
        ("unbind", [action]) => {
            let action: Action = action.parse()?;
            let previous = settings.update_hotkeys(|keys| keys.unbind(action));
            Ok(Outcome::Unbound { action, previous })
        }
        ("volume", [percent]) => {
            let percent: u8 = percent
                .parse()
                .with_context(|| format!("invalid volume '{percent}'"))?;
            if percent > 100 {
                bail!("volume must be 0-100, got {percent}");
            }
            settings.set_volume_percent(percent);
            Ok(Outcome::Volume(percent))
        }
        ("keys", []) => Ok(Outcome::Bindings(
            settings
                .hotkeys()
                .iter()
                .map(|(action, key)| (action, key.cloned()))
                .collect(),
        )),
        ("bind" | "unbind" | "volume" | "keys", _) => bail!("wrong arguments for '{head}'"),
        (_, []) => {
            let Some(action) = settings.hotkeys().action_for(head) else {
                return Ok(Outcome::Ignored);
            };
            Ok(match settings.apply(action) {
                Some(enabled) => Outcome::Toggled { action, enabled },
                None => Outcome::Quit,
            })
        }
        _ => bail!("unrecognized command '{}'", line.trim()),
    }
}

/// Read commands on a background thread. Only the quit key raises `quit`.
pub fn spawn(settings: Arc<Settings>, quit: Arc<AtomicBool>) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("radar-console".into())
        .spawn(move || serve(std::io::stdin().lock(), &settings, &quit))
}

/// Execute every line of `input`.
///
/// End of input or a read error ends the console only; the radar keeps
/// running without it.
pub fn serve(input: impl BufRead, settings: &Settings, quit: &AtomicBool) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Console read failed, hotkeys disabled: {}", e);
                return;
            }
        };
        match execute(&line, settings) {
            Ok(Outcome::Quit) => {
                info!("Shutting down");
                quit.store(true, Ordering::Relaxed);
                return;
            }
            Ok(outcome) => report(&outcome),
            Err(e) => warn!("{:#}", e),
        }
    }
    debug!("Console input closed, hotkeys disabled");
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Toggled { action, enabled } => {
            info!("{} {}", action, if *enabled { "on" } else { "off" })
        }
        Outcome::Rebound { action, key, previous } => match previous {
            Some(previous) => info!("{} rebound {} -> {}", action, previous, key),
            None => info!("{} bound to {}", action, key),
        },
        Outcome::Unbound { action, previous } => {
            info!("{} unbound (was {})", action, previous.as_ref().map_or("none", Key::as_str))
        }
        Outcome::Volume(percent) => info!("Volume {}%", percent),
        Outcome::Bindings(bindings) => {
            for (action, key) in bindings {
                info!("{:>10}: {}", action.name(), key.as_ref().map_or("-", Key::as_str));
            }
        }
        Outcome::Quit | Outcome::Ignored => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_default_keys_toggle() -> anyhow::Result<()> {
        let settings = Settings::new();

        assert_eq!(
            execute("f9", &settings)?,
            Outcome::Toggled { action: Action::ToggleDetection, enabled: false }
        );
        assert!(!settings.detection_enabled());

        assert_eq!(
            execute("F8", &settings)?,
            Outcome::Toggled { action: Action::ToggleVoice, enabled: true }
        );
        assert_eq!(execute("F12", &settings)?, Outcome::Quit);
        Ok(())
    }

    #[test]
    fn test_unknown_key_is_ignored() -> anyhow::Result<()> {
        let settings = Settings::new();
        assert_eq!(execute("F1", &settings)?, Outcome::Ignored);
        assert_eq!(execute("   ", &settings)?, Outcome::Ignored);
        Ok(())
    }

    #[test]
    fn test_bind_moves_action_to_new_key() -> anyhow::Result<()> {
        let settings = Settings::new();

        let outcome = execute("bind team F2", &settings)?;
        assert_eq!(
            outcome,
            Outcome::Rebound {
                action: Action::ToggleTeam,
                key: Key::new("F2").unwrap(),
                previous: Key::new("F10"),
            }
        );

        assert_eq!(execute("F10", &settings)?, Outcome::Ignored);
        assert_eq!(
            execute("f2", &settings)?,
            Outcome::Toggled { action: Action::ToggleTeam, enabled: false }
        );
        Ok(())
    }

    #[test]
    fn test_bind_conflict_is_rejected() {
        let settings = Settings::new();
        assert!(execute("bind team F9", &settings).is_err());
        assert_eq!(settings.hotkeys().action_for("F10"), Some(Action::ToggleTeam));
        assert!(execute("bind nonsense F2", &settings).is_err());
    }

    #[test]
    fn test_unbind() -> anyhow::Result<()> {
        let settings = Settings::new();
        assert_eq!(
            execute("unbind quit", &settings)?,
            Outcome::Unbound { action: Action::Quit, previous: Key::new("F12") }
        );
        assert_eq!(execute("F12", &settings)?, Outcome::Ignored);
        Ok(())
    }

    #[test]
    fn test_volume() -> anyhow::Result<()> {
        let settings = Settings::new();
        assert_eq!(execute("volume 40", &settings)?, Outcome::Volume(40));
        assert_eq!(settings.volume_percent(), 40);

        assert!(execute("volume 140", &settings).is_err());
        assert!(execute("volume loud", &settings).is_err());
        assert!(execute("volume", &settings).is_err());
        assert_eq!(settings.volume_percent(), 40);
        Ok(())
    }

    #[test]
    fn test_end_of_input_keeps_running() {
        let settings = Settings::new();
        let quit = AtomicBool::new(false);

        serve(Cursor::new("F9\nvolume 30\n"), &settings, &quit);

        assert!(!quit.load(Ordering::Relaxed));
        assert!(!settings.detection_enabled());
        assert_eq!(settings.volume_percent(), 30);

        serve(Cursor::new(""), &settings, &quit);
        assert!(!quit.load(Ordering::Relaxed));
    }

    #[test]
    fn test_quit_key_stops_reading() {
        let settings = Settings::new();
        let quit = AtomicBool::new(false);

        serve(Cursor::new("F12\nF9\n"), &settings, &quit);

        assert!(quit.load(Ordering::Relaxed));
        assert!(settings.detection_enabled());
    }

    #[test]
    fn test_keys_lists_every_action() -> anyhow::Result<()> {
        let settings = Settings::new();
        let Outcome::Bindings(bindings) = execute("keys", &settings)? else {
            panic!("expected bindings");
        };
        assert_eq!(bindings.len(), Action::ALL.len());
        Ok(())
    }
}
