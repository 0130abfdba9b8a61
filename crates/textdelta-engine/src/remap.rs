//! Carrying a caret or selection across a change set.
//!
//! An insertion at the selection's start lands before it and pushes it right;
//! an insertion at its end lands after it. A removal that touches only the
//! trailing edge leaves it alone. A removal that swallows the whole selection
//! collapses it to the removal's start.

use crate::change::{Change, ChangeKind, Edit};
use crate::error::Result;
use crate::reverse::reproject;
use crate::selection::Selection;

/// Where an edited span lies relative to a selection `[start, end)`.
///
/// Insertions are points, so they are only ever `Before`, `Inside` or
/// `After`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Entirely at or before `start`.
    Before,
    /// Begins before `start` and ends strictly inside the selection.
    OverlapsFront,
    /// Covers the whole selection.
    Contains,
    /// Begins at or after `start` and ends strictly before `end`.
    Inside,
    /// Begins inside the selection and reaches `end` or beyond.
    OverlapsBack,
    /// Entirely at or after `end`.
    After,
}

impl Relation {
    pub fn of_insertion(position: usize, selection: Selection) -> Self {
        if position <= selection.start() {
            Relation::Before
        } else if position < selection.end() {
            Relation::Inside
        } else {
            Relation::After
        }
    }

    /// Relation of the removed span `[start, end)`.
    pub fn of_removal(start: usize, end: usize, selection: Selection) -> Self {
        if end <= selection.start() {
            Relation::Before
        } else if start >= selection.end() {
            Relation::After
        } else if start <= selection.start() && end >= selection.end() {
            Relation::Contains
        } else if start < selection.start() {
            Relation::OverlapsFront
        } else if end < selection.end() {
            Relation::Inside
        } else {
            Relation::OverlapsBack
        }
    }
}

/// Map `selection` from source coordinates to modified coordinates.
///
/// `changes` must be anchored to the source text, as produced by
/// [`crate::ChangeSetBuilder`]. Each change is first moved into the frame the
/// selection has reached after the changes before it, then applied.
pub fn remap(selection: Selection, changes: &[Change]) -> Result<Selection> {
    let mut removed = 0;
    let mut added = 0;
    let mut selection = selection;

    for change in changes {
        let position = reproject(change.position, removed, added)?;
        let len = change.len();
        selection = remap_edit(selection, position, change.kind, len);
        match change.kind {
            ChangeKind::Removed => removed += len,
            ChangeKind::Added => added += len,
        }
    }
    Ok(selection)
}

/// Apply a single change whose position is expressed in the same frame as
/// `selection`. Callers chaining edits one at a time use this directly.
pub fn remap_change(selection: Selection, change: &Change) -> Selection {
    remap_edit(selection, change.position, change.kind, change.len())
}

fn remap_edit(selection: Selection, position: usize, kind: ChangeKind, len: usize) -> Selection {
    let (start, end) = (selection.start(), selection.end());

    let (start, end) = match kind {
        ChangeKind::Added => match Relation::of_insertion(position, selection) {
            Relation::Before => (start + len, end + len),
            Relation::Inside => (start, end + len),
            _ => (start, end),
        },
        ChangeKind::Removed => match Relation::of_removal(position, position + len, selection) {
            Relation::Before => (start - len, end - len),
            Relation::OverlapsFront => (position, end - len),
            Relation::Contains => (position, position),
            Relation::Inside => (start, end - len),
            Relation::OverlapsBack => (start, position),
            Relation::After => (start, end),
        },
    };

    Selection::from_bounds(start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    // 0 1 2 3 4 5 6 7 8 9      characters
    // 0 1 2 3 4 5 6 7 8 9 10   caret positions
    //       ^-------^          selection 3..7 ("3456")

    fn sel(start: usize, end: usize) -> Selection {
        Selection::new(start, end).unwrap()
    }

    #[rstest]
    #[case::after_caret(4, sel(3, 3))]
    #[case::before_caret(2, sel(6, 6))]
    #[case::at_caret(3, sel(6, 6))]
    fn insertion_around_caret(#[case] position: usize, #[case] expected: Selection) {
        let change = Change::added(position, "abc");
        assert_eq!(remap_change(Selection::caret(3), &change), expected);
    }

    #[rstest]
    #[case::after_selection(8, sel(3, 7))]
    #[case::before_selection(2, sel(6, 10))]
    #[case::at_trailing_edge(7, sel(3, 7))]
    #[case::at_leading_edge(3, sel(6, 10))]
    #[case::inside_selection(5, sel(3, 10))]
    fn insertion_around_selection(#[case] position: usize, #[case] expected: Selection) {
        let change = Change::added(position, "abc");
        assert_eq!(remap_change(sel(3, 7), &change), expected);
    }

    #[rstest]
    #[case::after_caret(4, "456", sel(3, 3))]
    #[case::before_caret(0, "012", sel(0, 0))]
    #[case::covering_caret(1, "1234", sel(1, 1))]
    #[case::starting_at_caret(3, "34", sel(3, 3))]
    fn removal_around_caret(
        #[case] position: usize,
        #[case] text: &str,
        #[case] expected: Selection,
    ) {
        let change = Change::removed(position, text);
        assert_eq!(remap_change(Selection::caret(3), &change), expected);
    }

    #[rstest]
    #[case::after_selection(8, "89", sel(3, 7))]
    #[case::before_selection(0, "01", sel(1, 5))]
    #[case::ending_at_leading_edge(1, "12", sel(1, 5))]
    #[case::front_into_middle(1, "1234", sel(1, 3))]
    #[case::front_to_end(1, "123456", sel(1, 1))]
    #[case::front_past_end(1, "12345678", sel(1, 1))]
    #[case::front_one_past_end(1, "1234567", sel(1, 1))]
    #[case::start_into_middle(3, "34", sel(3, 5))]
    #[case::start_to_end(3, "3456", sel(3, 3))]
    #[case::start_past_end(3, "345678", sel(3, 3))]
    #[case::middle_into_middle(5, "5", sel(3, 6))]
    #[case::middle_to_end(5, "56", sel(3, 5))]
    #[case::middle_one_past_end(5, "567", sel(3, 5))]
    #[case::middle_past_end(5, "5678", sel(3, 5))]
    #[case::at_trailing_edge(7, "78", sel(3, 7))]
    fn removal_around_selection(
        #[case] position: usize,
        #[case] text: &str,
        #[case] expected: Selection,
    ) {
        let change = Change::removed(position, text);
        assert_eq!(remap_change(sel(3, 7), &change), expected);
    }

    #[test]
    fn relation_is_computed_from_bounds() {
        let selection = sel(3, 7);
        assert_eq!(Relation::of_insertion(3, selection), Relation::Before);
        assert_eq!(Relation::of_insertion(4, selection), Relation::Inside);
        assert_eq!(Relation::of_insertion(7, selection), Relation::After);
        assert_eq!(Relation::of_removal(0, 3, selection), Relation::Before);
        assert_eq!(Relation::of_removal(1, 5, selection), Relation::OverlapsFront);
        assert_eq!(Relation::of_removal(3, 7, selection), Relation::Contains);
        assert_eq!(Relation::of_removal(4, 6, selection), Relation::Inside);
        assert_eq!(Relation::of_removal(5, 9, selection), Relation::OverlapsBack);
        assert_eq!(Relation::of_removal(7, 9, selection), Relation::After);
    }

    #[test]
    fn single_change_sequence_matches_single_change() {
        let change = Change::removed(1, "123456");
        assert_eq!(remap(sel(3, 7), &[change.clone()]).unwrap(), sel(1, 1));
        assert_eq!(remap_change(sel(3, 7), &change), sel(1, 1));
    }

    #[test]
    fn later_changes_are_reprojected_past_earlier_ones() {
        // "0123456789" -> "034ab56789"
        let changes = vec![Change::removed(1, "12"), Change::added(5, "ab")];
        assert_eq!(remap(sel(3, 7), &changes).unwrap(), sel(1, 7));
    }

    #[test]
    fn chaining_single_changes_needs_positions_in_the_running_frame() {
        let selection = remap_change(sel(3, 7), &Change::removed(1, "12"));
        assert_eq!(selection, sel(1, 5));
        // The insertion was at source offset 5; after the removal that is 3.
        let selection = remap_change(selection, &Change::added(3, "ab"));
        assert_eq!(selection, sel(1, 7));
    }

    #[test]
    fn insertion_before_removal_at_the_same_position() {
        // "0123456789" -> "0xy23456789"
        let changes = vec![Change::added(1, "xy"), Change::removed(1, "1")];
        assert_eq!(remap(sel(3, 7), &changes).unwrap(), sel(4, 8));
        assert_eq!(remap(Selection::caret(1), &changes).unwrap(), Selection::caret(3));
    }

    #[test]
    fn empty_change_set_keeps_selection() {
        assert_eq!(remap(sel(2, 5), &[]).unwrap(), sel(2, 5));
    }
}
