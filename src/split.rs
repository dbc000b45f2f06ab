use crate::diff_file::{Change, ChangeKind};

/// One row of a side-by-side view. At least one side is always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitLine<'a> {
    pub left: Option<&'a Change>,
    pub right: Option<&'a Change>,
}

impl<'a> SplitLine<'a> {
    fn both(left: &'a Change, right: &'a Change) -> Self {
        Self {
            left: Some(left),
            right: Some(right),
        }
    }

    fn left_only(change: &'a Change) -> Self {
        Self {
            left: Some(change),
            right: None,
        }
    }

    fn right_only(change: &'a Change) -> Self {
        Self {
            left: None,
            right: Some(change),
        }
    }

    /// The deletion and addition this row pairs, if it is a replaced line.
    pub fn replacement(&self) -> Option<(&'a Change, &'a Change)> {
        match (self.left, self.right) {
            (Some(left), Some(right))
                if left.kind() == ChangeKind::Del && right.kind() == ChangeKind::Add =>
            {
                Some((left, right))
            }
            _ => None,
        }
    }
}

/// Arranges one hunk's changes into side-by-side rows.
///
/// Context lines sit on both sides. A run of deletions directly followed by a
/// run of additions is paired up line by line; whatever is left of the longer
/// run follows as one-sided rows, deletions before additions. Deletions or
/// additions without a counterpart run get one-sided rows.
pub fn pair_changes_for_split(changes: &[Change]) -> Vec<SplitLine<'_>> {
    let mut rows = Vec::with_capacity(changes.len());
    let mut i = 0;

    while i < changes.len() {
        let run = run_of(&changes[i..]);

        match run[0].kind() {
            ChangeKind::Ctx => rows.extend(run.iter().map(|change| SplitLine::both(change, change))),
            ChangeKind::Add => rows.extend(run.iter().map(SplitLine::right_only)),
            ChangeKind::Del => {
                let next = &changes[i + run.len()..];
                let adds: &[Change] = match next.first().map(Change::kind) {
                    Some(ChangeKind::Add) => run_of(next),
                    _ => &[],
                };

                let paired = run.len().min(adds.len());
                rows.extend(
                    run.iter()
                        .zip(adds)
                        .map(|(del, add)| SplitLine::both(del, add)),
                );
                rows.extend(run[paired..].iter().map(SplitLine::left_only));
                rows.extend(adds[paired..].iter().map(SplitLine::right_only));

                i += adds.len();
            }
        }

        i += run.len();
    }

    rows
}

/// The maximal prefix of `changes` sharing the first change's kind.
fn run_of(changes: &[Change]) -> &[Change] {
    let Some(first) = changes.first() else {
        return changes;
    };
    let len = changes
        .iter()
        .take_while(|change| change.kind() == first.kind())
        .count();
    &changes[..len]
}
