//! Diff engine for diff viewers.
//!
//! [`parse_diff`] turns unified diff text (as printed by `git diff`) into
//! files, hunks and changes. [`compute_word_diff`] finds the words that
//! differ between a removed line and its replacement, and
//! [`pair_changes_for_split`] lays a hunk out as side-by-side rows.
//!
//! ```
//! use diffscape_engine::{compute_word_diff, pair_changes_for_split, parse_diff};
//!
//! let diff = parse_diff(
//!     "diff --git a/foo.txt b/foo.txt\n\
//!      --- a/foo.txt\n\
//!      +++ b/foo.txt\n\
//!      @@ -1,2 +1,2 @@\n\
//!      -hello world\n\
//!      +hello there\n unchanged\n",
//! );
//! assert_eq!(diff.stats.files_changed, 1);
//!
//! let hunk = &diff.files[0].hunks[0];
//! let rows = pair_changes_for_split(&hunk.changes);
//! assert_eq!(rows.len(), 2);
//!
//! let (old, new) = rows[0].replacement().unwrap();
//! let segments = compute_word_diff(old.content(), new.content());
//! assert_eq!(segments[0].value, "hello ");
//! ```

pub mod diff_file;
pub mod parser;
pub mod split;
pub mod word_diff;


pub use diff_file::{
    Change, ChangeKind, DiffStats, FileDiff, FileStats, FileStatus, Hunk, HunkRange, ParsedDiff,
};
pub use parser::parse_diff;
pub use split::{SplitLine, pair_changes_for_split};
pub use word_diff::{SegmentKind, WordDiffSegment, compute_word_diff};
