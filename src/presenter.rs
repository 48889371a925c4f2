//! Console presentation layer
//!
//! Polls the summary slot on its own cadence and redraws the latest summary.
//! An empty slot keeps the previous rendering.

use radar_core::runtime::{NarrationEvent, enemy_advisories};
use radar_core::{FrameSummary, Settings, SummarySlot};
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const BUCKETS_PER_ROW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Redrawn text block
    Text,
    /// One JSON object per consumed summary
    Json,
}

pub struct Presenter<W> {
    settings: Arc<Settings>,
    slot: Arc<SummarySlot>,
    format: OutputFormat,
    narration: Option<Sender<NarrationEvent>>,
    out: W,
    showing: bool,
}

impl<W: Write> Presenter<W> {
    pub fn new(settings: Arc<Settings>, slot: Arc<SummarySlot>, format: OutputFormat, out: W) -> Self {
        Self {
            settings,
            slot,
            format,
            narration: None,
            out,
            showing: false,
        }
    }

    /// Feed enemy zones to the narration worker while voice is enabled
    pub fn with_narration(mut self, narration: Sender<NarrationEvent>) -> Self {
        self.narration = Some(narration);
        self
    }

    /// One poll of the slot.
    pub fn tick(&mut self, now: Instant) -> io::Result<()> {
        if !self.settings.detection_enabled() {
            self.slot.clear();
            if self.showing {
                self.clear()?;
            }
            return Ok(());
        }

        let Some(summary) = self.slot.try_take() else {
            return Ok(());
        };

        if self.settings.voice_enabled() {
            self.announce(&summary, now);
        }

        if self.settings.presentation_enabled() {
            self.render(&summary)?;
        } else if self.showing {
            self.clear()?;
        }
        Ok(())
    }

    /// Poll until `quit` is raised.
    pub fn run(mut self, quit: &AtomicBool) -> io::Result<()> {
        while !quit.load(Ordering::Relaxed) {
            self.tick(Instant::now())?;
            thread::sleep(POLL_INTERVAL);
        }
        debug!("Presenter stopped");
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn announce(&mut self, summary: &FrameSummary, now: Instant) {
        let Some(narration) = &self.narration else {
            return;
        };
        for event in enemy_advisories(summary, now) {
            if narration.send(event).is_err() {
                warn!("Narration worker is gone, disabling voice");
                self.narration = None;
                return;
            }
        }
    }

    fn render(&mut self, summary: &FrameSummary) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                let text = render_text(summary, self.settings.show_team());
                write!(self.out, "{CLEAR_SCREEN}{text}")?;
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, summary)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        self.showing = true;
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        if self.format == OutputFormat::Text {
            write!(self.out, "{CLEAR_SCREEN}")?;
            self.out.flush()?;
        }
        self.showing = false;
        Ok(())
    }
}

/// Text block for one summary: bucket rows (when `show_team`), then the
/// enemy and device lines.
pub fn render_text(summary: &FrameSummary, show_team: bool) -> String {
    let mut text = String::new();

    if show_team {
        for row in summary.team_counts.chunks(BUCKETS_PER_ROW) {
            let cells: Vec<String> = row
                .iter()
                .map(|cell| match cell.count {
                    0 => format!("{}:", cell.bucket),
                    n => format!("{}:{}", cell.bucket, n),
                })
                .collect();
            text.push_str(&cells.join("  "));
            text.push('\n');
        }
        text.push('\n');
    } else {
        // Two blank rows stand in for the hidden team block
        text.push_str("\n\n");
    }

    text.push_str(&format!("敌人:{}\n", summary.enemy_text()));
    text.push_str(&format!("C4:{}\n", summary.object_text()));
    text
}
