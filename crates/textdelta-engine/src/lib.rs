//! # textdelta-engine
//!
//! Change sets between two versions of a text: build them from a diff, replay
//! them, invert them for undo, and carry a caret or selection across them.
//!
//! ## Coordinates
//!
//! Every position in a change sequence refers to the **unedited source**.
//! Insertions are recorded at the point where they go in; removals at the
//! first unit they take out. Positions never decrease along a sequence, and
//! when an insertion and a removal share a position the insertion comes first.
//!
//! ```text
//! source    a 1 b 2 c 3
//!           0 1 2 3 4 5 6
//! modified  a 7 b 8 c 9
//!
//! Efficiency cleanup: [-1 "1b2c3", +6 "7b8c9"]
//! ```
//!
//! Character changes count Unicode scalar values. Line changes count lines,
//! each carrying its trailing newline.
//!
//! ## Module Structure
//!
//! ```text
//! textdelta-engine/
//! ├── lib.rs        # Public API
//! ├── error.rs      # Error enum and Result alias
//! ├── change.rs     # Change, LineChange and the Edit trait
//! ├── selection.rs  # Selection / caret ranges
//! ├── diff/
//! │   ├── mod.rs    # DiffEngine, Segment, CleanupPolicy, line tokens
//! │   └── cleanup.rs# Merge, semantic and efficiency passes
//! ├── builder.rs    # ChangeSetBuilder: segments -> anchored changes
//! ├── patch.rs      # Replaying changes against a source
//! ├── reverse.rs    # Inverting a change sequence
//! └── remap.rs      # Carrying selections across changes
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use textdelta_engine::{ChangeSetBuilder, CleanupPolicy, Selection, apply, remap, reverse};
//!
//! let source = "hello foo";
//! let modified = "hello bar";
//!
//! let changes = ChangeSetBuilder::default()
//!     .build_character_changes(source, modified, CleanupPolicy::Semantic);
//! assert_eq!(apply(source, &changes).unwrap(), modified);
//!
//! let undo = reverse(&changes).unwrap();
//! assert_eq!(apply(modified, &undo).unwrap(), source);
//!
//! // A caret after "hello" stays put.
//! let caret = remap(Selection::caret(5), &changes).unwrap();
//! assert_eq!(caret, Selection::caret(5));
//! ```

pub mod builder;
pub mod change;
pub mod diff;
pub mod error;
pub mod patch;
pub mod remap;
pub mod reverse;
pub mod selection;

pub use builder::ChangeSetBuilder;
pub use change::{Change, ChangeKind, Edit, LineChange};
pub use diff::{CleanupPolicy, DiffConfig, DiffEngine, LineTokens, Operation, Segment};
pub use error::{Error, Result};
pub use patch::{Validation, apply, apply_lines, apply_lines_with, apply_with};
pub use remap::{Relation, remap, remap_change};
pub use reverse::reverse;
pub use selection::Selection;
