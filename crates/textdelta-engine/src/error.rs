use thiserror::Error;

/// Errors raised while applying, reversing or remapping change sets.
///
/// `PositionOutOfBounds`, `UnorderedChanges` and `PatchMismatch` all mean the
/// change sequence does not fit the text it is being interpreted against.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Invalid selection range: start {start} is after end {end}")]
    InvalidRange { start: usize, end: usize },

    #[error("Change at {position} lies outside the source text of length {len}")]
    PositionOutOfBounds { position: usize, len: usize },

    #[error("Change at {position} precedes the current cursor {cursor}")]
    UnorderedChanges { position: usize, cursor: usize },

    #[error("Removed text at {position} does not match: expected {expected:?}, found {actual:?}")]
    PatchMismatch {
        position: usize,
        expected: String,
        actual: String,
    },

    #[error("Unknown cleanup policy `{0}` (expected none, semantic or efficiency)")]
    UnknownPolicy(String),
}

pub type Result<T> = std::result::Result<T, Error>;
