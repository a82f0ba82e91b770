use std::io::Write;
use std::sync::Mutex;

use crate::domain::ports::{Notice, Notifier, Outcome};

/// Sends notices to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.outcome {
            Outcome::Pending => tracing::debug!("{}...", notice.action),
            Outcome::Progress(pct) => tracing::debug!("{}... {}%", notice.action, pct),
            Outcome::Success => tracing::info!("{}", notice.action),
            Outcome::Failure(reason) => tracing::warn!("{}: {}", notice.action, reason),
        }
    }
}

/// Status line on stderr. Pending and progress notices overwrite each other
/// on one line until a terminal notice replaces them.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        let mut err = std::io::stderr().lock();
        let _ = match notice.outcome {
            Outcome::Pending => write!(err, "\r⏳ {}...", notice.action),
            Outcome::Progress(pct) => write!(err, "\r⏳ {}... {}%", notice.action, pct),
            Outcome::Success => writeln!(err, "\r✅ {}", notice.action),
            Outcome::Failure(reason) => writeln!(err, "\r❌ {}: {}", notice.action, reason),
        };
        let _ = err.flush();
    }
}

/// Keeps every notice; for embedding and tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().unwrap_or_else(|e| e.into_inner()).last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap_or_else(|e| e.into_inner()).push(notice);
    }
}
