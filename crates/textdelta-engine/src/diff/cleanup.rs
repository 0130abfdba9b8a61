//! Consolidation passes over character-level edit scripts.
//!
//! All lengths compared against thresholds are in characters; all slicing is
//! done at byte offsets derived from whole characters.

use std::mem;

use super::{Operation, Segment};

/// Join adjacent edits between equalities into one deletion followed by one
/// insertion, move text shared by both ends of such a pair into the
/// neighbouring equalities, then slide lone edits sideways when that removes
/// an equality. Repeats until stable.
pub(super) fn merge(segments: Vec<Segment>) -> Vec<Segment> {
    let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());
    let mut deleted = String::new();
    let mut inserted = String::new();

    for segment in segments.into_iter().chain(std::iter::once(Segment::equal(""))) {
        match segment.op {
            Operation::Delete => deleted.push_str(&segment.text),
            Operation::Insert => inserted.push_str(&segment.text),
            Operation::Equal => {
                let mut trailing = segment.text;
                if !deleted.is_empty() && !inserted.is_empty() {
                    let prefix = common_prefix(&deleted, &inserted);
                    if prefix > 0 {
                        push_equal(&mut merged, &inserted[..prefix]);
                        inserted.drain(..prefix);
                        deleted.drain(..prefix);
                    }
                    let suffix = common_suffix(&deleted, &inserted);
                    if suffix > 0 {
                        trailing.insert_str(0, &inserted[inserted.len() - suffix..]);
                        inserted.truncate(inserted.len() - suffix);
                        deleted.truncate(deleted.len() - suffix);
                    }
                }
                if !deleted.is_empty() {
                    merged.push(Segment::delete(mem::take(&mut deleted)));
                }
                if !inserted.is_empty() {
                    merged.push(Segment::insert(mem::take(&mut inserted)));
                }
                push_equal(&mut merged, &trailing);
            }
        }
    }

    if slide_lone_edits(&mut merged) {
        merge(merged)
    } else {
        merged
    }
}

/// `=A +BA =C` becomes `+AB =AC`, and `=A +BC =B` becomes `=AB +CB`.
fn slide_lone_edits(segments: &mut Vec<Segment>) -> bool {
    let mut changed = false;
    let mut i = 1;
    while i + 1 < segments.len() {
        if segments[i - 1].op == Operation::Equal && segments[i + 1].op == Operation::Equal {
            let before = segments[i - 1].text.clone();
            let after = segments[i + 1].text.clone();
            let edit = segments[i].text.clone();
            if edit.ends_with(before.as_str()) {
                let kept = &edit[..edit.len() - before.len()];
                segments[i].text = format!("{before}{kept}");
                segments[i + 1].text = format!("{before}{after}");
                segments.remove(i - 1);
                changed = true;
            } else if edit.starts_with(after.as_str()) {
                let kept = &edit[after.len()..];
                segments[i - 1].text.push_str(&after);
                segments[i].text = format!("{kept}{after}");
                segments.remove(i + 1);
                changed = true;
            }
        }
        i += 1;
    }
    changed
}

/// Fold short equalities into the edits around them when doing so saves
/// edits. An equality shorter than `edit_cost` surrounded by an insertion and
/// a deletion on both sides is always folded; one shorter than half of it is
/// folded when three of those four edits are present.
pub(super) fn efficiency(mut segments: Vec<Segment>, edit_cost: usize) -> Vec<Segment> {
    let mut changed = false;
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<String> = None;
    let (mut pre_ins, mut pre_del) = (false, false);
    let (mut post_ins, mut post_del) = (false, false);

    let mut i = 0;
    while i < segments.len() {
        if segments[i].op == Operation::Equal {
            if segments[i].len() < edit_cost && (post_ins || post_del) {
                equalities.push(i);
                pre_ins = post_ins;
                pre_del = post_del;
                last_equality = Some(segments[i].text.clone());
            } else {
                equalities.clear();
                last_equality = None;
            }
            post_ins = false;
            post_del = false;
        } else {
            if segments[i].op == Operation::Delete {
                post_del = true;
            } else {
                post_ins = true;
            }

            let sides = [pre_ins, pre_del, post_ins, post_del]
                .iter()
                .filter(|side| **side)
                .count();
            let worth_folding = last_equality.as_ref().is_some_and(|equality| {
                sides == 4 || (sides == 3 && equality.chars().count() * 2 < edit_cost)
            });

            if worth_folding
                && let Some(at) = equalities.pop()
                && let Some(equality) = last_equality.take()
            {
                segments.insert(at, Segment::delete(equality));
                segments[at + 1].op = Operation::Insert;
                changed = true;

                if pre_ins && pre_del {
                    post_ins = true;
                    post_del = true;
                    equalities.clear();
                } else {
                    equalities.pop();
                    i = equalities.last().map_or(0, |&index| index + 1);
                    post_ins = false;
                    post_del = false;
                    continue;
                }
            }
        }
        i += 1;
    }

    if changed { merge(segments) } else { segments }
}

/// Fold equalities that are no longer than the edits on either side of them,
/// align the remaining lone edits to word and line boundaries, and turn
/// deletion/insertion pairs that overlap by at least half into an equality
/// between them.
pub(super) fn semantic(mut segments: Vec<Segment>) -> Vec<Segment> {
    let mut changed = false;
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<usize> = None;
    let (mut inserted_before, mut deleted_before) = (0, 0);
    let (mut inserted_after, mut deleted_after) = (0, 0);

    let mut i = 0;
    while i < segments.len() {
        let len = segments[i].len();
        match segments[i].op {
            Operation::Equal => {
                equalities.push(i);
                inserted_before = inserted_after;
                deleted_before = deleted_after;
                inserted_after = 0;
                deleted_after = 0;
                last_equality = Some(len);
            }
            op => {
                if op == Operation::Insert {
                    inserted_after += len;
                } else {
                    deleted_after += len;
                }

                if let Some(equality) = last_equality
                    && equality <= usize::max(inserted_before, deleted_before)
                    && equality <= usize::max(inserted_after, deleted_after)
                    && let Some(at) = equalities.pop()
                {
                    let text = segments[at].text.clone();
                    segments.insert(at, Segment::delete(text));
                    segments[at + 1].op = Operation::Insert;
                    equalities.pop();
                    i = equalities.last().map_or(0, |&index| index + 1);
                    inserted_before = 0;
                    deleted_before = 0;
                    inserted_after = 0;
                    deleted_after = 0;
                    last_equality = None;
                    changed = true;
                    continue;
                }
            }
        }
        i += 1;
    }

    let mut segments = if changed { merge(segments) } else { segments };
    align_to_boundaries(&mut segments);
    split_overlaps(&mut segments);
    segments
}

/// Slide each edit surrounded by equalities to the position where its edges
/// fall on the most natural boundaries (blank lines, then line breaks, then
/// sentence ends, then whitespace, then punctuation).
fn align_to_boundaries(segments: &mut Vec<Segment>) {
    let mut i = 1;
    while i + 1 < segments.len() {
        if segments[i - 1].op == Operation::Equal && segments[i + 1].op == Operation::Equal {
            let mut before = segments[i - 1].text.clone();
            let mut edit = segments[i].text.clone();
            let mut after = segments[i + 1].text.clone();

            // Start from the leftmost position the edit can occupy.
            let shared = common_suffix(&before, &edit);
            if shared > 0 {
                let tail = edit[edit.len() - shared..].to_string();
                before.truncate(before.len() - shared);
                edit.truncate(edit.len() - shared);
                edit.insert_str(0, &tail);
                after.insert_str(0, &tail);
            }

            let mut best_score = boundary_score(&before, &edit) + boundary_score(&edit, &after);
            let mut best = (before.clone(), edit.clone(), after.clone());
            while let Some(c) = edit.chars().next()
                && after.starts_with(c)
            {
                before.push(c);
                edit.remove(0);
                edit.push(c);
                after.remove(0);
                let score = boundary_score(&before, &edit) + boundary_score(&edit, &after);
                // Ties go right, so trailing whitespace stays in the equality.
                if score >= best_score {
                    best_score = score;
                    best = (before.clone(), edit.clone(), after.clone());
                }
            }

            let (best_before, best_edit, best_after) = best;
            if segments[i - 1].text != best_before {
                let mut removed = 0;
                segments[i].text = best_edit;
                if best_after.is_empty() {
                    segments.remove(i + 1);
                    removed += 1;
                } else {
                    segments[i + 1].text = best_after;
                }
                if best_before.is_empty() {
                    segments.remove(i - 1);
                    removed += 1;
                } else {
                    segments[i - 1].text = best_before;
                }
                i = i.saturating_sub(removed);
            }
        }
        i += 1;
    }
}

/// Score in `0..=6` of how natural the boundary between `one` and `two` is.
fn boundary_score(one: &str, two: &str) -> u8 {
    let (Some(last), Some(first)) = (one.chars().next_back(), two.chars().next()) else {
        return 6;
    };

    let symbol_last = !last.is_ascii_alphanumeric();
    let symbol_first = !first.is_ascii_alphanumeric();
    let space_last = symbol_last && last.is_whitespace();
    let space_first = symbol_first && first.is_whitespace();
    let break_last = space_last && matches!(last, '\r' | '\n');
    let break_first = space_first && matches!(first, '\r' | '\n');
    let blank_last = break_last && (one.ends_with("\n\n") || one.ends_with("\n\r\n"));
    let blank_first = break_first
        && ["\n\n", "\n\r\n", "\r\n\n", "\r\n\r\n"]
            .iter()
            .any(|blank| two.starts_with(blank));

    if blank_last || blank_first {
        5
    } else if break_last || break_first {
        4
    } else if symbol_last && !space_last && space_first {
        3
    } else if space_last || space_first {
        2
    } else if symbol_last || symbol_first {
        1
    } else {
        0
    }
}

/// `-abcxxx +xxxdef` becomes `-abc =xxx +def`; `-xxxabc +defxxx` becomes
/// `+def =xxx -abc`. Applied only when the overlap covers at least half of
/// either edit.
fn split_overlaps(segments: &mut Vec<Segment>) {
    let mut i = 1;
    while i < segments.len() {
        if segments[i - 1].op == Operation::Delete && segments[i].op == Operation::Insert {
            let deletion = segments[i - 1].text.clone();
            let insertion = segments[i].text.clone();
            let deletion_len = deletion.chars().count();
            let insertion_len = insertion.chars().count();
            let forward = common_overlap(&deletion, &insertion);
            let backward = common_overlap(&insertion, &deletion);

            if forward >= backward {
                if forward * 2 >= deletion_len || forward * 2 >= insertion_len {
                    let split = byte_offset(&insertion, forward);
                    segments.insert(i, Segment::equal(&insertion[..split]));
                    segments[i - 1].text = deletion[..deletion.len() - split].to_string();
                    segments[i + 1].text = insertion[split..].to_string();
                    i += 1;
                }
            } else if backward * 2 >= deletion_len || backward * 2 >= insertion_len {
                let split = byte_offset(&deletion, backward);
                segments.insert(i, Segment::equal(&deletion[..split]));
                segments[i - 1] = Segment::insert(&insertion[..insertion.len() - split]);
                segments[i + 1] = Segment::delete(&deletion[split..]);
                i += 1;
            }
            i += 1;
        }
        i += 1;
    }
    segments.retain(|segment| !segment.is_empty());
}

fn push_equal(segments: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    match segments.last_mut() {
        Some(last) if last.op == Operation::Equal => last.text.push_str(text),
        _ => segments.push(Segment::equal(text)),
    }
}

/// Byte length of the longest common prefix, on character boundaries.
fn common_prefix(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(c, _)| c.len_utf8())
        .sum()
}

/// Byte length of the longest common suffix, on character boundaries.
fn common_suffix(a: &str, b: &str) -> usize {
    a.chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(x, y)| x == y)
        .map(|(c, _)| c.len_utf8())
        .sum()
}

/// Number of characters by which the end of `a` overlaps the start of `b`.
fn common_overlap(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let longest = a.len().min(b.len());
    (1..=longest)
        .rev()
        .find(|&len| a[a.len() - len..] == b[..len])
        .unwrap_or(0)
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(offset, _)| offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn merge_joins_interleaved_edits() {
        let merged = merge(vec![
            Segment::equal("a"),
            Segment::insert("x"),
            Segment::delete("b"),
            Segment::insert("y"),
            Segment::delete("c"),
            Segment::equal("d"),
        ]);
        assert_eq!(
            merged,
            vec![
                Segment::equal("a"),
                Segment::delete("bc"),
                Segment::insert("xy"),
                Segment::equal("d"),
            ]
        );
    }

    #[test]
    fn merge_factors_out_common_prefix_and_suffix() {
        let merged = merge(vec![
            Segment::equal("x"),
            Segment::delete("abc"),
            Segment::insert("abd"),
            Segment::equal("y"),
        ]);
        assert_eq!(
            merged,
            vec![
                Segment::equal("xab"),
                Segment::delete("c"),
                Segment::insert("d"),
                Segment::equal("y"),
            ]
        );

        let merged = merge(vec![Segment::delete("ac"), Segment::insert("bc")]);
        assert_eq!(
            merged,
            vec![Segment::delete("a"), Segment::insert("b"), Segment::equal("c")]
        );
    }

    #[test]
    fn merge_slides_lone_edits_to_remove_equalities() {
        let merged = merge(vec![
            Segment::equal("a"),
            Segment::insert("ba"),
            Segment::equal("c"),
        ]);
        assert_eq!(merged, vec![Segment::insert("ab"), Segment::equal("ac")]);

        let merged = merge(vec![
            Segment::equal("a"),
            Segment::delete("bc"),
            Segment::equal("b"),
        ]);
        assert_eq!(merged, vec![Segment::equal("ab"), Segment::delete("cb")]);
    }

    #[test]
    fn merge_respects_multibyte_characters() {
        let merged = merge(vec![Segment::delete("世界a"), Segment::insert("世界b")]);
        assert_eq!(
            merged,
            vec![Segment::equal("世界"), Segment::delete("a"), Segment::insert("b")]
        );
    }

    #[test]
    fn efficiency_folds_equality_between_four_edits() {
        let cleaned = efficiency(
            vec![
                Segment::delete("ab"),
                Segment::insert("12"),
                Segment::equal("xyz"),
                Segment::delete("cd"),
                Segment::insert("34"),
            ],
            4,
        );
        assert_eq!(
            cleaned,
            vec![Segment::delete("abxyzcd"), Segment::insert("12xyz34")]
        );
    }

    #[test]
    fn efficiency_keeps_equality_between_three_edits_unless_tiny() {
        let script = vec![
            Segment::insert("12"),
            Segment::equal("x"),
            Segment::delete("cd"),
            Segment::insert("34"),
        ];
        assert_eq!(
            efficiency(script, 4),
            vec![Segment::delete("xcd"), Segment::insert("12x34")]
        );

        let script = vec![
            Segment::insert("12"),
            Segment::equal("xyz"),
            Segment::delete("cd"),
            Segment::insert("34"),
        ];
        assert_eq!(efficiency(script.clone(), 4), script);
    }

    #[test]
    fn boundary_scores_rank_blank_lines_highest() {
        assert_eq!(boundary_score("", "x"), 6);
        assert_eq!(boundary_score("a\n\n", "b"), 5);
        assert_eq!(boundary_score("a\n", "b"), 4);
        assert_eq!(boundary_score("a.", " b"), 3);
        assert_eq!(boundary_score("a ", "b"), 2);
        assert_eq!(boundary_score("a", "-b"), 1);
        assert_eq!(boundary_score("a", "b"), 0);
    }

    #[test]
    fn alignment_moves_edit_onto_word_boundary() {
        let mut segments = vec![
            Segment::equal("The c"),
            Segment::insert("ow and the c"),
            Segment::equal("at."),
        ];
        align_to_boundaries(&mut segments);
        assert_eq!(
            segments,
            vec![
                Segment::equal("The "),
                Segment::insert("cow and the "),
                Segment::equal("cat."),
            ]
        );
    }

    #[test]
    fn overlaps_become_equalities() {
        let mut segments = vec![Segment::delete("abcxxx"), Segment::insert("xxxdef")];
        split_overlaps(&mut segments);
        assert_eq!(
            segments,
            vec![
                Segment::delete("abc"),
                Segment::equal("xxx"),
                Segment::insert("def"),
            ]
        );

        let mut segments = vec![Segment::delete("xxxabc"), Segment::insert("defxxx")];
        split_overlaps(&mut segments);
        assert_eq!(
            segments,
            vec![
                Segment::insert("def"),
                Segment::equal("xxx"),
                Segment::delete("abc"),
            ]
        );

        let mut segments = vec![Segment::delete("abcxx"), Segment::insert("xxdefgh")];
        let unchanged = segments.clone();
        split_overlaps(&mut segments);
        assert_eq!(segments, unchanged);
    }

    #[test]
    fn overlap_counts_characters() {
        assert_eq!(common_overlap("", "abc"), 0);
        assert_eq!(common_overlap("abc", "abcd"), 3);
        assert_eq!(common_overlap("123456", "abcd"), 0);
        assert_eq!(common_overlap("123456xxx", "xxxabcd"), 3);
        assert_eq!(common_overlap("ab世界", "世界cd"), 2);
    }
}
