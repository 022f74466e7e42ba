//! Status Timeline
//!
//! Records each status change observed while tracking a job, for progress
//! reports at the end of a run.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::model::ExecutionStatus;

/// A single observed status.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StatusEvent {
    pub status: ExecutionStatus,
    pub message: Option<String>,
    pub percent_completed: Option<u32>,
    /// When the client parsed the status
    pub observed_at: DateTime<Utc>,
}

/// Ordered status history of one execution.
#[derive(Serialize, Debug, Clone)]
pub struct StatusTimeline {
    events: Vec<StatusEvent>,
    start_time: DateTime<Utc>,
}

impl Default for StatusTimeline {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusTimeline {
    /// Creates an empty timeline starting now.
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            start_time: Utc::now(),
        }
    }

    /// Records a status if it differs from the last one (status or progress).
    ///
    /// Returns true if an event was added.
    pub fn record(
        &mut self,
        status: &ExecutionStatus,
        message: Option<&str>,
        percent_completed: Option<u32>,
    ) -> bool {
        if let Some(last) = self.events.last() {
            if last.status == *status && last.percent_completed == percent_completed {
                return false;
            }
        }

        self.events.push(StatusEvent {
            status: status.clone(),
            message: message.map(str::to_string),
            percent_completed,
            observed_at: Utc::now(),
        });
        true
    }

    pub fn events(&self) -> &[StatusEvent] {
        &self.events
    }

    /// Returns the time elapsed since the timeline was created.
    pub fn elapsed(&self) -> Duration {
        Utc::now() - self.start_time
    }

    /// Renders one line per event with its offset from the start.
    pub fn summary(&self) -> String {
        let mut output = String::from("\nStatus Timeline:\n\n");

        for event in &self.events {
            let offset = (event.observed_at - self.start_time).num_milliseconds();
            let progress = event
                .percent_completed
                .map(|p| format!(" ({}%)", p))
                .unwrap_or_default();
            output.push_str(&format!(
                "{:>8} ms  {}{}",
                offset, event.status, progress
            ));
            if let Some(message) = &event.message {
                output.push_str(&format!("  {}", message));
            }
            output.push('\n');
        }

        output.push_str(&format!("\nTotal: {} ms\n", self.elapsed().num_milliseconds()));
        output
    }
}
