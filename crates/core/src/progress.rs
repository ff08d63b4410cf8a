//! Advisory progress notifications and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// A progress event emitted while a report is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// A source row was processed; `current` is 1-based.
    Row { current: usize, total: usize },
    /// The divider row will be spliced in at `position` (0-based) of the final sequence.
    Divider { position: usize },
    /// Free-text status.
    Status(String),
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Progress::Row { current, total } => write!(f, "Added row {current} of {total}"),
            Progress::Divider { position } => write!(f, "Found divider row at index {position}"),
            Progress::Status(message) => write!(f, "{message}"),
        }
    }
}

/// Receives progress events. Implementations must return promptly.
pub trait ProgressObserver {
    fn notify(&self, event: Progress);
}

impl<F> ProgressObserver for F
where
    F: Fn(Progress),
{
    fn notify(&self, event: Progress) {
        self(event);
    }
}

/// Forwards events into a standard channel; a dropped receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: Sender<Progress>,
}

impl ChannelObserver {
    #[must_use]
    pub fn new(sender: Sender<Progress>) -> Self {
        ChannelObserver { sender }
    }
}

impl ProgressObserver for ChannelObserver {
    fn notify(&self, event: Progress) {
        let _ = self.sender.send(event);
    }
}

/// Shared flag checked between rows.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; builds observe it before their next row.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
