//! Edit-script discovery between two texts.
//!
//! The raw script comes from a Myers diff (the `similar` crate) over either
//! characters or interned lines. Adjacent edits are then merged so that every
//! run between two equalities reads as one deletion followed by one
//! insertion, and a [`CleanupPolicy`] can consolidate the script further:
//!
//! ```text
//! "a1b2c3" vs "a7b8c9"
//!   None        =a -1 +7 =b -2 +8 =c -3 +9
//!   Efficiency  =a -1b2c3 +7b8c9
//! ```
//!
//! The engine is a plain value: build one with [`DiffEngine::new`] and pass it
//! to whoever needs it.

mod cleanup;

use serde::{Deserialize, Serialize};
use similar::{Algorithm, DiffTag};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::ops::Range;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::error::Error;

/// How the raw edit script is consolidated before changes are built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupPolicy {
    /// Keep the script as fragmented as the diff produced it.
    None,
    /// Merge for human readability, favouring word and line boundaries.
    Semantic,
    /// Merge to minimize the number of edits.
    #[default]
    Efficiency,
}

impl FromStr for CleanupPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(CleanupPolicy::None),
            "semantic" => Ok(CleanupPolicy::Semantic),
            "efficiency" => Ok(CleanupPolicy::Efficiency),
            _ => Err(Error::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for CleanupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CleanupPolicy::None => "none",
            CleanupPolicy::Semantic => "semantic",
            CleanupPolicy::Efficiency => "efficiency",
        };
        f.write_str(name)
    }
}

/// Tuning for [`DiffEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffConfig {
    /// Cost of one extra edit, measured in characters. Efficiency cleanup
    /// folds an equality shorter than this into the surrounding edits.
    pub edit_cost: usize,
    /// Upper bound on the time spent searching for a minimal script. When it
    /// runs out the script is still valid, just not minimal.
    pub timeout: Option<Duration>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            edit_cost: 4,
            timeout: Some(Duration::from_secs(1)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Equal,
    Insert,
    Delete,
}

/// One element of an edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub op: Operation,
    pub text: String,
}

impl Segment {
    pub fn new(op: Operation, text: impl Into<String>) -> Self {
        Self {
            op,
            text: text.into(),
        }
    }

    pub fn equal(text: impl Into<String>) -> Self {
        Self::new(Operation::Equal, text)
    }

    pub fn insert(text: impl Into<String>) -> Self {
        Self::new(Operation::Insert, text)
    }

    pub fn delete(text: impl Into<String>) -> Self {
        Self::new(Operation::Delete, text)
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Two texts split into lines, each line replaced by its index in `lines`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTokens {
    pub source: Vec<usize>,
    pub modified: Vec<usize>,
    /// Every distinct line, terminator included, in first-seen order.
    pub lines: Vec<String>,
}

impl LineTokens {
    fn decode(&self, ids: &[usize]) -> String {
        ids.iter().map(|&id| self.lines[id].as_str()).collect()
    }
}

/// Span of units in one of the two sequences being compared: the source for
/// `Equal` and `Delete`, the modified sequence for `Insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Run {
    op: Operation,
    range: Range<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    config: DiffConfig,
}

impl DiffEngine {
    pub fn new(config: DiffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Character-level edit script from `source` to `modified`.
    ///
    /// Within each run between equalities the deletion precedes the
    /// insertion, and text common to both ends of such a run is folded into
    /// the neighbouring equalities.
    pub fn compare(&self, source: &str, modified: &str) -> Vec<Segment> {
        let old: Vec<char> = source.chars().collect();
        let new: Vec<char> = modified.chars().collect();

        let segments = self
            .runs(&old, &new)
            .into_iter()
            .map(|run| {
                let units = match run.op {
                    Operation::Insert => &new[run.range],
                    Operation::Equal | Operation::Delete => &old[run.range],
                };
                Segment::new(run.op, units.iter().collect::<String>())
            })
            .collect();

        let segments = cleanup::merge(segments);
        log::debug!(
            "compared {} -> {} chars into {} segments",
            old.len(),
            new.len(),
            segments.len()
        );
        segments
    }

    /// Consolidate a character-level script according to `policy`.
    pub fn cleanup(&self, segments: Vec<Segment>, policy: CleanupPolicy) -> Vec<Segment> {
        match policy {
            CleanupPolicy::None => segments,
            CleanupPolicy::Semantic => cleanup::semantic(segments),
            CleanupPolicy::Efficiency => cleanup::efficiency(segments, self.config.edit_cost),
        }
    }

    /// [`DiffEngine::compare`] followed by [`DiffEngine::cleanup`].
    pub fn diff(&self, source: &str, modified: &str, policy: CleanupPolicy) -> Vec<Segment> {
        self.cleanup(self.compare(source, modified), policy)
    }

    /// Intern the lines of both texts so they can be compared as atoms.
    pub fn tokenize_lines(&self, source: &str, modified: &str) -> LineTokens {
        let mut ids: HashMap<&str, usize> = HashMap::new();
        let mut lines = Vec::new();
        let source = intern_lines(source, &mut ids, &mut lines);
        let modified = intern_lines(modified, &mut ids, &mut lines);
        LineTokens {
            source,
            modified,
            lines,
        }
    }

    /// Line-level edit script over tokens from [`DiffEngine::tokenize_lines`],
    /// decoded back into line text. Every segment holds whole lines.
    pub fn compare_lines(&self, tokens: &LineTokens) -> Vec<Segment> {
        let segments: Vec<Segment> = self
            .runs(&tokens.source, &tokens.modified)
            .into_iter()
            .map(|run| {
                let ids = match run.op {
                    Operation::Insert => &tokens.modified[run.range],
                    Operation::Equal | Operation::Delete => &tokens.source[run.range],
                };
                Segment::new(run.op, tokens.decode(ids))
            })
            .collect();

        log::debug!(
            "compared {} -> {} lines into {} segments",
            tokens.source.len(),
            tokens.modified.len(),
            segments.len()
        );
        segments
    }

    /// Myers diff of two unit sequences, grouped so that consecutive
    /// equalities are joined and each region between them yields at most one
    /// delete run followed by at most one insert run.
    fn runs<T: Eq + Hash + Ord>(&self, old: &[T], new: &[T]) -> Vec<Run> {
        let deadline = self.config.timeout.map(|timeout| Instant::now() + timeout);
        let ops = similar::capture_diff_slices_deadline(Algorithm::Myers, old, new, deadline);

        let mut runs: Vec<Run> = Vec::with_capacity(ops.len());
        let mut deleted: Option<Range<usize>> = None;
        let mut inserted: Option<Range<usize>> = None;

        for op in ops {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            match tag {
                DiffTag::Equal => {
                    flush(&mut runs, deleted.take(), inserted.take());
                    match runs.last_mut() {
                        Some(last) if last.op == Operation::Equal => last.range.end = old_range.end,
                        _ => runs.push(Run {
                            op: Operation::Equal,
                            range: old_range,
                        }),
                    }
                }
                DiffTag::Delete => extend(&mut deleted, old_range),
                DiffTag::Insert => extend(&mut inserted, new_range),
                DiffTag::Replace => {
                    extend(&mut deleted, old_range);
                    extend(&mut inserted, new_range);
                }
            }
        }
        flush(&mut runs, deleted, inserted);
        runs.retain(|run| !run.range.is_empty());
        runs
    }
}

fn intern_lines<'a>(
    text: &'a str,
    ids: &mut HashMap<&'a str, usize>,
    lines: &mut Vec<String>,
) -> Vec<usize> {
    text.split_inclusive('\n')
        .map(|line| {
            *ids.entry(line).or_insert_with(|| {
                lines.push(line.to_string());
                lines.len() - 1
            })
        })
        .collect()
}

fn extend(pending: &mut Option<Range<usize>>, range: Range<usize>) {
    match pending {
        Some(existing) => existing.end = range.end,
        None => *pending = Some(range),
    }
}

fn flush(runs: &mut Vec<Run>, deleted: Option<Range<usize>>, inserted: Option<Range<usize>>) {
    if let Some(range) = deleted {
        runs.push(Run {
            op: Operation::Delete,
            range,
        });
    }
    if let Some(range) = inserted {
        runs.push(Run {
            op: Operation::Insert,
            range,
        });
    }
}
