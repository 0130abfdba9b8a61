use std::iter;

use crate::change::{Change, ChangeKind, Edit, LineChange};
use crate::error::{Error, Result};

/// Whether removed spans are compared against the text recorded in the
/// change before being skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Validation {
    #[default]
    Strict,
    /// Only positions are checked; removed text is trusted.
    Lenient,
}

/// Replay `changes` against `source`, checking every removed span.
pub fn apply(source: &str, changes: &[Change]) -> Result<String> {
    apply_with(source, changes, Validation::Strict)
}

pub fn apply_with(source: &str, changes: &[Change], validation: Validation) -> Result<String> {
    let boundaries: Vec<usize> = source
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(iter::once(source.len()))
        .collect();
    replay(source, &boundaries, changes, validation)
}

/// Replay line changes against `source`, checking every removed line.
pub fn apply_lines(source: &str, changes: &[LineChange]) -> Result<String> {
    apply_lines_with(source, changes, Validation::Strict)
}

pub fn apply_lines_with(
    source: &str,
    changes: &[LineChange],
    validation: Validation,
) -> Result<String> {
    let mut boundaries = vec![0];
    let mut offset = 0;
    for line in source.split_inclusive('\n') {
        offset += line.len();
        boundaries.push(offset);
    }
    replay(source, &boundaries, changes, validation)
}

/// `boundaries[i]` is the byte offset of unit `i`; the last entry is
/// `source.len()`.
fn replay<E: Edit>(
    source: &str,
    boundaries: &[usize],
    changes: &[E],
    validation: Validation,
) -> Result<String> {
    let units = boundaries.len() - 1;
    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;

    for change in changes {
        let position = change.position();
        if position < cursor {
            return Err(Error::UnorderedChanges { position, cursor });
        }
        if position > units {
            return Err(Error::PositionOutOfBounds {
                position,
                len: units,
            });
        }

        output.push_str(&source[boundaries[cursor]..boundaries[position]]);
        cursor = position;

        match change.kind() {
            ChangeKind::Added => output.push_str(change.text()),
            ChangeKind::Removed => {
                let end = position + change.len();
                if end > units {
                    return Err(Error::PositionOutOfBounds {
                        position,
                        len: units,
                    });
                }
                let actual = &source[boundaries[position]..boundaries[end]];
                if validation == Validation::Strict && actual != change.text() {
                    return Err(Error::PatchMismatch {
                        position,
                        expected: change.text().to_string(),
                        actual: actual.to_string(),
                    });
                }
                cursor = end;
            }
        }
    }

    output.push_str(&source[boundaries[cursor]..]);
    Ok(output)
}
