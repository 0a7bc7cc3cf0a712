//! Run report

use std::time::Duration;

use dispatcher::ConsumerReport;
use ingestion::{ReaderOutcome, StopReason};

/// What a pipeline run did
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Reader counters and stop reason
    pub reader: ReaderOutcome,

    /// One report per consumer, in registration order
    pub consumers: Vec<ConsumerReport>,

    /// Frames taken off the primary channel
    pub frames_dispatched: u64,

    /// Wall time of the run
    pub duration: Duration,
}

impl RunReport {
    /// Accepted frames per second of wall time
    pub fn fps(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.frames_dispatched as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// No I/O failure and every consumer hook succeeded
    pub fn is_success(&self) -> bool {
        !self.reader.is_failure() && self.consumers.iter().all(ConsumerReport::is_ok)
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Trajectory Run Summary ===\n");

        println!("Reader");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Files opened: {}", self.reader.files_opened);
        println!("   ├─ Frames read: {}", self.reader.frames_read);
        println!("   ├─ Frames accepted: {}", self.reader.frames_accepted);
        println!("   ├─ Frames/s: {:.2}", self.fps());
        println!("   └─ Stopped: {}", describe_stop(&self.reader.stop_reason));

        println!("\nConsumers ({})", self.consumers.len());
        for (i, c) in self.consumers.iter().enumerate() {
            let prefix = if i + 1 == self.consumers.len() { "└─" } else { "├─" };
            println!(
                "   {} [{}] {}: {} processed, {} failed, latency ms {}",
                prefix, c.id, c.name, c.frames_processed, c.process_failures, c.latency_ms
            );
            if let Some(ref e) = c.setup_error {
                println!("        setup error: {}", e);
            }
            if let Some(ref e) = c.teardown_error {
                println!("        teardown error: {}", e);
            }
        }

        println!();
    }
}

fn describe_stop(reason: &StopReason) -> String {
    match reason {
        StopReason::EndOfData => "end of data".to_string(),
        StopReason::EndOfInterval { frame } => format!("end of interval at frame {frame}"),
        StopReason::DownstreamClosed => "no consumer left".to_string(),
        StopReason::Failed(msg) => format!("failed: {msg}"),
    }
}
