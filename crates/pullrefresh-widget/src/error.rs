use thiserror::Error;

/// Contract violations surfaced by the refresh coordinator.
///
/// Both variants indicate a programming error in the caller or in a refresh
/// manager; they are reported, never recovered from internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// The requested operation is not allowed in the current state, such as
    /// swapping managers while a refresh or gesture is in flight.
    #[error("illegal state: {reason}")]
    IllegalState { reason: &'static str },
    /// A manager reported consuming more than it was offered, or in the
    /// opposite direction.
    #[error("refresh manager consumed too much: offered dy={offered}, consumed={consumed}")]
    ConsumedTooMuch { offered: i32, consumed: i32 },
}
