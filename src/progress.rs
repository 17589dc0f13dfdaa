use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::mpsc::SyncSender;

/// `ProgressEvent::level` value for run-wide events
pub const GLOBAL_LEVEL: u8 = 0;

/// Milestone reached by the generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Starting,
    Loading,
    Building,
    Constraints,
    Solving,
    Extracting,
    Completed,
    Finalizing,
    Failed,
    Error,
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProgressStatus::Starting => "starting",
            ProgressStatus::Loading => "loading",
            ProgressStatus::Building => "building",
            ProgressStatus::Constraints => "constraints",
            ProgressStatus::Solving => "solving",
            ProgressStatus::Extracting => "extracting",
            ProgressStatus::Completed => "completed",
            ProgressStatus::Finalizing => "finalizing",
            ProgressStatus::Failed => "failed",
            ProgressStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// A structured progress update emitted at each orchestration milestone.
/// `level` is 0 for run-wide events; `percentage` never decreases over the
/// lifetime of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub level: u8,
    pub status: ProgressStatus,
    pub percentage: f64,
    pub message: String,
}

/// Destination for progress events. Events arrive in emission order.
pub trait ProgressSink {
    fn emit(&self, event: ProgressEvent);
}

/// Discards all events
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: ProgressEvent) {}
}

/// Forwards events into a bounded channel. The consumer (e.g. a websocket
/// bridge) drains the receiver; a full queue applies backpressure to the
/// orchestrator so event order is preserved.
pub struct ChannelSink {
    tx: SyncSender<ProgressEvent>,
}

impl ChannelSink {
    pub fn new(tx: SyncSender<ProgressEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&self, event: ProgressEvent) {
        // A disconnected consumer is not the generator's problem
        let _ = self.tx.send(event);
    }
}

/// Renders events on an indicatif progress bar
pub struct ConsoleSink {
    bar: ProgressBar,
}

impl ConsoleSink {
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(100);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            pb
        };
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish();
    }
}

impl ProgressSink for ConsoleSink {
    fn emit(&self, event: ProgressEvent) {
        self.bar.set_position(event.percentage.round() as u64);
        if event.level == GLOBAL_LEVEL {
            self.bar.set_message(event.message);
        } else {
            self.bar
                .set_message(format!("[Level {}] {}", event.level, event.message));
        }
    }
}

/// Records events in memory; used by tests to assert milestone sequences
#[derive(Default)]
pub struct RecordingSink {
    events: std::sync::Mutex<Vec<ProgressEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_channel_sink_preserves_order() {
        let (tx, rx) = mpsc::sync_channel(16);
        let sink = ChannelSink::new(tx);

        for (i, status) in [
            ProgressStatus::Starting,
            ProgressStatus::Solving,
            ProgressStatus::Completed,
        ]
        .into_iter()
        .enumerate()
        {
            sink.emit(ProgressEvent {
                level: 5,
                status,
                percentage: i as f64 * 10.0,
                message: String::new(),
            });
        }

        let received: Vec<ProgressStatus> = rx.try_iter().map(|e| e.status).collect();
        assert_eq!(
            received,
            vec![
                ProgressStatus::Starting,
                ProgressStatus::Solving,
                ProgressStatus::Completed
            ]
        );
    }

    #[test]
    fn test_event_serialises_with_lowercase_status() {
        let event = ProgressEvent {
            level: 4,
            status: ProgressStatus::Finalizing,
            percentage: 95.0,
            message: "Combining all levels".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""status":"finalizing""#));
    }
}
