use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// A half-open range `[start, end)` of character offsets.
///
/// `start == end` is a collapsed caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SelectionBounds")]
pub struct Selection {
    start: usize,
    end: usize,
}

/// Unchecked wire form of [`Selection`]; deserializing goes through
/// [`Selection::new`].
#[derive(Deserialize)]
struct SelectionBounds {
    start: usize,
    end: usize,
}

impl TryFrom<SelectionBounds> for Selection {
    type Error = Error;

    fn try_from(bounds: SelectionBounds) -> Result<Self> {
        Selection::new(bounds.start, bounds.end)
    }
}

impl Selection {
    /// Create a selection, rejecting `start > end`.
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A collapsed caret at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Same as [`Selection::is_empty`], named for callers thinking in carets.
    pub fn is_collapsed(&self) -> bool {
        self.is_empty()
    }

    // Callers inside the crate keep start <= end themselves.
    pub(crate) fn from_bounds(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "selection bounds out of order: {start}..{end}");
        Self { start, end }
    }
}

impl TryFrom<std::ops::Range<usize>> for Selection {
    type Error = Error;

    fn try_from(range: std::ops::Range<usize>) -> Result<Self> {
        Selection::new(range.start, range.end)
    }
}

impl From<Selection> for std::ops::Range<usize> {
    fn from(selection: Selection) -> Self {
        selection.start..selection.end
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
