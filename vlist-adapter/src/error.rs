use alloc::string::String;

/// A renderer contract violation on the measurement path.
///
/// These are recovered locally: the offending registration is dropped and the rest of the
/// system continues with no cache mutation. (A detached element is *not* an error; that
/// is an expected lifecycle event and handled silently.)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeasureError {
    #[error("row element carries no index attribute")]
    MissingIndex,
    #[error("row element index attribute {0:?} is not a valid integer")]
    InvalidIndex(String),
    #[error("row element index {index} is out of bounds (count={count})")]
    OutOfBounds { index: usize, count: usize },
}
