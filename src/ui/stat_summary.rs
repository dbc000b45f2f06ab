use std::io::{self, Write};

use diffscape_engine::{DiffStats, ParsedDiff};
use unicode_width::UnicodeWidthStr;

use crate::ui::diff_utils::{Painter, Tone};

const BAR_WIDTH: usize = 40;

/// `git diff --stat` style listing: one line per file and a totals line.
pub fn render_stat_summary<W: Write>(
    out: &mut W,
    diff: &ParsedDiff,
    painter: &Painter,
) -> io::Result<()> {
    let names: Vec<String> = diff.files.iter().map(|file| file.display_name()).collect();
    let name_width = names.iter().map(|name| name.width()).max().unwrap_or(0);
    let max_changes = diff
        .files
        .iter()
        .map(|file| file.stats.additions + file.stats.deletions)
        .max()
        .unwrap_or(0);
    let count_width = max_changes.to_string().len();

    for (file, name) in diff.files.iter().zip(&names) {
        let padding = " ".repeat(name_width - name.width());

        if file.is_binary {
            writeln!(out, " {name}{padding} | Bin")?;
            continue;
        }

        let total = file.stats.additions + file.stats.deletions;
        let (plus, minus) = scale_bar(file.stats.additions, file.stats.deletions, max_changes);
        writeln!(
            out,
            " {name}{padding} | {total:>count_width$} {}{}",
            painter.paint(&"+".repeat(plus), Tone::Added),
            painter.paint(&"-".repeat(minus), Tone::Removed),
        )?;
    }

    writeln!(out, " {}", summary_line(&diff.stats))
}

pub fn summary_line(stats: &DiffStats) -> String {
    let plural = |n: usize, one: &str, many: &str| {
        format!("{n} {}", if n == 1 { one } else { many })
    };

    let mut parts = vec![plural(stats.files_changed, "file changed", "files changed")];
    if stats.additions > 0 || stats.deletions == 0 {
        parts.push(plural(stats.additions, "insertion(+)", "insertions(+)"));
    }
    if stats.deletions > 0 || stats.additions == 0 {
        parts.push(plural(stats.deletions, "deletion(-)", "deletions(-)"));
    }
    parts.join(", ")
}

/// Shrinks the +/- bar so the busiest file fits in `BAR_WIDTH`, keeping at
/// least one mark for any non-zero count.
fn scale_bar(additions: usize, deletions: usize, max_changes: usize) -> (usize, usize) {
    if max_changes <= BAR_WIDTH {
        return (additions, deletions);
    }
    let scale = |n: usize| {
        if n == 0 {
            0
        } else {
            (n * BAR_WIDTH / max_changes).max(1)
        }
    };
    (scale(additions), scale(deletions))
}
