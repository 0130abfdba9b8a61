use crate::change::{ChangeKind, Edit};
use crate::error::{Error, Result};

/// Invert a change sequence so it turns the modified text back into the
/// source.
///
/// Each change is re-anchored into the modified text: everything removed
/// before it is gone there, everything added before it is present. Removals
/// become insertions at that point and insertions become removals.
pub fn reverse<E: Edit>(changes: &[E]) -> Result<Vec<E>> {
    let mut removed = 0;
    let mut added = 0;

    changes
        .iter()
        .map(|change| {
            let position = reproject(change.position(), removed, added)?;
            match change.kind() {
                ChangeKind::Removed => removed += change.len(),
                ChangeKind::Added => added += change.len(),
            }
            Ok(E::new(
                position,
                change.kind().inverse(),
                change.text().to_string(),
            ))
        })
        .collect()
}

/// Move a source position into the frame where `removed` units before it
/// have been deleted and `added` units before it have been inserted.
pub(crate) fn reproject(position: usize, removed: usize, added: usize) -> Result<usize> {
    (position + added)
        .checked_sub(removed)
        .ok_or(Error::UnorderedChanges {
            position,
            cursor: removed,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::{Change, LineChange};
    use crate::patch::{apply, apply_lines};
    use pretty_assertions::assert_eq;

    #[test]
    fn swaps_kinds_and_reanchors_positions() {
        let changes = vec![Change::removed(1, "1b2c3"), Change::added(6, "7b8c9")];
        assert_eq!(
            reverse(&changes).unwrap(),
            vec![Change::added(1, "1b2c3"), Change::removed(1, "7b8c9")]
        );
    }

    #[test]
    fn reversed_changes_undo_the_edit() {
        let changes = vec![
            Change::removed(5, "1e2f3"),
            Change::added(10, "7e8f9"),
            Change::added(14, " opq"),
        ];
        let reversed = reverse(&changes).unwrap();
        assert_eq!(
            reversed,
            vec![
                Change::added(5, "1e2f3"),
                Change::removed(5, "7e8f9"),
                Change::removed(14, " opq"),
            ]
        );
        assert_eq!(apply("abc d7e8f9 xyz opq", &reversed).unwrap(), "abc d1e2f3 xyz");
    }

    #[test]
    fn reversing_twice_restores_the_sequence() {
        let changes = vec![
            Change::added(0, ">> "),
            Change::removed(4, "quick "),
            Change::added(10, "slow "),
            Change::removed(20, "!"),
        ];
        assert_eq!(reverse(&reverse(&changes).unwrap()).unwrap(), changes);
    }

    #[test]
    fn empty_sequence_reverses_to_empty() {
        assert_eq!(reverse::<Change>(&[]).unwrap(), vec![]);
    }

    #[test]
    fn line_changes_are_counted_in_lines() {
        let changes = vec![
            LineChange::removed(1, "b\nc\n"),
            LineChange::added(3, "x\n"),
        ];
        let reversed = reverse(&changes).unwrap();
        assert_eq!(
            reversed,
            vec![LineChange::added(1, "b\nc\n"), LineChange::removed(1, "x\n")]
        );
        assert_eq!(apply_lines("a\nx\nd\n", &reversed).unwrap(), "a\nb\nc\nd\n");
    }

    #[test]
    fn rejects_changes_anchored_inside_an_earlier_removal() {
        let changes = vec![Change::removed(0, "abc"), Change::added(1, "x")];
        assert_eq!(
            reverse(&changes),
            Err(Error::UnorderedChanges {
                position: 1,
                cursor: 3
            })
        );
    }
}
