//! Out-of-band zone announcements
//!
//! Events travel on their own channel to a dedicated worker that handles one
//! at a time in arrival order. The worker drops events older than
//! [`NarrationGate::DEFAULT_MAX_AGE`] and repeats of a zone spoken within
//! [`NarrationGate::DEFAULT_DEDUP_WINDOW`]. A slow speaker only backs up this
//! channel.

use super::settings::Settings;
use crate::markers::FrameSummary;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// A zone worth announcing, stamped when it was produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationEvent {
    pub issued_at: Instant,
    pub zone: String,
}

impl NarrationEvent {
    pub fn new(zone: impl Into<String>, issued_at: Instant) -> Self {
        Self {
            issued_at,
            zone: zone.into(),
        }
    }
}

/// One event per enemy zone of a freshly consumed summary.
pub fn enemy_advisories(summary: &FrameSummary, now: Instant) -> Vec<NarrationEvent> {
    summary
        .enemy_zones
        .iter()
        .map(|zone| NarrationEvent::new(zone.clone(), now))
        .collect()
}

/// Speech backend. Volume is a 0.0..=1.0 gain read at call time.
pub trait Speaker {
    fn speak(&mut self, text: &str, volume: f32) -> anyhow::Result<()>;
}

/// Speaker that writes the utterance to the log.
#[derive(Debug, Default)]
pub struct LogSpeaker;

impl Speaker for LogSpeaker {
    fn speak(&mut self, text: &str, volume: f32) -> anyhow::Result<()> {
        info!("🔊 {} (volume {:.0}%)", text, volume * 100.0);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Speak,
    /// Older than the staleness limit when dequeued
    Stale,
    /// Same zone spoken within the dedup window
    Duplicate,
}

/// Staleness guard plus per-zone dedup table
#[derive(Debug, Clone)]
pub struct NarrationGate {
    max_age: Duration,
    dedup_window: Duration,
    last_spoken: HashMap<String, Instant>,
}

impl Default for NarrationGate {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_AGE, Self::DEFAULT_DEDUP_WINDOW)
    }
}

impl NarrationGate {
    pub const DEFAULT_MAX_AGE: Duration = Duration::from_millis(1500);
    pub const DEFAULT_DEDUP_WINDOW: Duration = Duration::from_secs(5);

    pub fn new(max_age: Duration, dedup_window: Duration) -> Self {
        Self {
            max_age,
            dedup_window,
            last_spoken: HashMap::new(),
        }
    }

    /// Decide whether `event`, dequeued at `now`, may be spoken. Admitted
    /// events are recorded in the dedup table.
    pub fn admit(&mut self, event: &NarrationEvent, now: Instant) -> Admission {
        if now.saturating_duration_since(event.issued_at) > self.max_age {
            return Admission::Stale;
        }

        if let Some(last) = self.last_spoken.get(&event.zone) {
            if now.saturating_duration_since(*last) < self.dedup_window {
                return Admission::Duplicate;
            }
        }

        self.last_spoken.insert(event.zone.clone(), now);
        Admission::Speak
    }
}

/// Consumer side of the narration channel
pub struct Narrator<S> {
    gate: NarrationGate,
    speaker: S,
    settings: Arc<Settings>,
}

impl<S: Speaker> Narrator<S> {
    pub fn new(speaker: S, settings: Arc<Settings>) -> Self {
        Self::with_gate(NarrationGate::default(), speaker, settings)
    }

    pub fn with_gate(gate: NarrationGate, speaker: S, settings: Arc<Settings>) -> Self {
        Self {
            gate,
            speaker,
            settings,
        }
    }

    /// Process one dequeued event.
    pub fn handle(&mut self, event: &NarrationEvent, now: Instant) -> Admission {
        let admission = self.gate.admit(event, now);
        match admission {
            Admission::Speak => {
                if let Err(e) = self.speaker.speak(&event.zone, self.settings.volume()) {
                    warn!("Narration of '{}' failed: {:#}", event.zone, e);
                }
            }
            Admission::Stale => debug!("Dropping stale narration for '{}'", event.zone),
            Admission::Duplicate => debug!("Suppressing repeat narration for '{}'", event.zone),
        }
        admission
    }

    /// Block on the channel until every sender is gone.
    pub fn run(mut self, events: Receiver<NarrationEvent>) {
        for event in events {
            self.handle(&event, Instant::now());
        }
        debug!("Narration channel closed");
    }

    pub fn speaker(&self) -> &S {
        &self.speaker
    }
}

impl<S: Speaker + Send + 'static> Narrator<S> {
    pub fn spawn(self, events: Receiver<NarrationEvent>) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("radar-narration".into())
            .spawn(move || self.run(events))
    }
}
