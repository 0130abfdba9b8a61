use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a change inserts or deletes text.
///
/// Unchanged spans are never recorded, so there is no third variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
}

impl ChangeKind {
    /// The kind that undoes this one.
    pub fn inverse(self) -> Self {
        match self {
            ChangeKind::Added => ChangeKind::Removed,
            ChangeKind::Removed => ChangeKind::Added,
        }
    }

    fn sign(self) -> char {
        match self {
            ChangeKind::Added => '+',
            ChangeKind::Removed => '-',
        }
    }
}

/// Common shape of character and line changes.
///
/// `position` and `len` are measured in the unit of the implementing type:
/// characters for [`Change`], whole lines for [`LineChange`]. The position is
/// always expressed against the unedited source text the sequence was built
/// from.
pub trait Edit: Sized {
    fn new(position: usize, kind: ChangeKind, text: String) -> Self;
    fn position(&self) -> usize;
    fn kind(&self) -> ChangeKind;
    fn text(&self) -> &str;

    /// Length of `text` in units.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One insertion or deletion of characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Change {
    pub position: usize,
    pub kind: ChangeKind,
    pub text: String,
}

impl Change {
    pub fn added(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            kind: ChangeKind::Added,
            text: text.into(),
        }
    }

    pub fn removed(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            kind: ChangeKind::Removed,
            text: text.into(),
        }
    }

    /// Exclusive end of the source span a removal covers.
    pub fn end(&self) -> usize {
        self.position + self.len()
    }
}

impl Edit for Change {
    fn new(position: usize, kind: ChangeKind, text: String) -> Self {
        Self {
            position,
            kind,
            text,
        }
    }

    fn position(&self) -> usize {
        self.position
    }

    fn kind(&self) -> ChangeKind {
        self.kind
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} {:?}", self.kind.sign(), self.position, self.text)
    }
}

/// One insertion or deletion of whole lines. `position` is a line index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineChange {
    pub position: usize,
    pub kind: ChangeKind,
    /// Whole lines, each keeping its terminator (the last line of a text
    /// may have none).
    pub text: String,
}

impl LineChange {
    pub fn added(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            kind: ChangeKind::Added,
            text: text.into(),
        }
    }

    pub fn removed(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            kind: ChangeKind::Removed,
            text: text.into(),
        }
    }
}

impl Edit for LineChange {
    fn new(position: usize, kind: ChangeKind, text: String) -> Self {
        Self {
            position,
            kind,
            text,
        }
    }

    fn position(&self) -> usize {
        self.position
    }

    fn kind(&self) -> ChangeKind {
        self.kind
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn len(&self) -> usize {
        line_count(&self.text)
    }
}

impl fmt::Display for LineChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} {:?}", self.kind.sign(), self.position, self.text)
    }
}

/// Number of lines in `text`, counting a trailing unterminated line.
pub(crate) fn line_count(text: &str) -> usize {
    text.split_inclusive('\n').count()
}
