//! Request queue error types.

/// Failure conditions for queue admission and settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum QueueErrorKind {
    /// Admission rejected: the queue already holds its maximum of pending tasks.
    #[display("Request queue is full; too many pending requests")]
    Overflow,
    /// The task waited in the queue longer than the expiry window.
    #[display("Request timeout: queued too long")]
    Timeout,
    /// The queue was shut down before the task could run.
    #[display("Request queue was shut down before the request could run")]
    Shutdown,
}

/// Queue error with source location tracking.
///
/// # Examples
///
/// ```
/// use tootline_error::{QueueError, QueueErrorKind};
///
/// let err = QueueError::new(QueueErrorKind::Overflow);
/// assert!(format!("{}", err).contains("queue is full"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Queue Error: {} at line {} in {}", kind, line, file)]
pub struct QueueError {
    /// The kind of error that occurred
    pub kind: QueueErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl QueueError {
    /// Create a new QueueError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: QueueErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
