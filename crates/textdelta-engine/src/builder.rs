use crate::change::{Change, LineChange, line_count};
use crate::diff::{CleanupPolicy, DiffEngine, Operation, Segment};

/// Turns edit scripts into change sequences anchored to the source text.
///
/// A cursor walks the source: insertions are recorded at the cursor without
/// moving it, deletions are recorded at the cursor and then skipped, and
/// equalities are skipped without being recorded. Positions are therefore
/// non-decreasing and always refer to the unedited source.
#[derive(Debug, Clone, Default)]
pub struct ChangeSetBuilder {
    engine: DiffEngine,
}

impl ChangeSetBuilder {
    pub fn new(engine: DiffEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &DiffEngine {
        &self.engine
    }

    /// Character-granular changes turning `source` into `modified`.
    pub fn build_character_changes(
        &self,
        source: &str,
        modified: &str,
        policy: CleanupPolicy,
    ) -> Vec<Change> {
        let segments = self.engine.diff(source, modified, policy);
        let changes = anchor(
            segments,
            |segment| segment.len(),
            Change::added,
            Change::removed,
        );
        log::debug!("built {} character changes ({policy})", changes.len());
        changes
    }

    /// Line-granular changes turning `source` into `modified`. Positions are
    /// zero-based line indices into `source`.
    pub fn build_line_changes(&self, source: &str, modified: &str) -> Vec<LineChange> {
        let tokens = self.engine.tokenize_lines(source, modified);
        let segments = self.engine.compare_lines(&tokens);
        let changes = anchor(
            segments,
            |segment| line_count(&segment.text),
            LineChange::added,
            LineChange::removed,
        );
        log::debug!("built {} line changes", changes.len());
        changes
    }
}

fn anchor<C>(
    segments: Vec<Segment>,
    units: impl Fn(&Segment) -> usize,
    added: impl Fn(usize, String) -> C,
    removed: impl Fn(usize, String) -> C,
) -> Vec<C> {
    let mut changes = Vec::new();
    let mut cursor = 0;
    for segment in segments {
        match segment.op {
            Operation::Insert => changes.push(added(cursor, segment.text)),
            Operation::Delete => {
                let len = units(&segment);
                changes.push(removed(cursor, segment.text));
                cursor += len;
            }
            Operation::Equal => cursor += units(&segment),
        }
    }
    changes
}
