use std::io::{self, Write};

use diffscape_engine::{ParsedDiff, diff_file::Change, split::pair_changes_for_split};
use unicode_width::UnicodeWidthStr;

use crate::{
    config::ViewOptions,
    ui::diff_utils::{
        IntraLineRanges, Painter, Piece, Tone, clip, content_pieces, intra_line_ranges,
        write_file_header, write_line,
    },
};

const GUTTER_WIDTH: usize = 5; // "1234 "
const SEPARATOR: &str = " │ ";

pub fn render_side_by_side_diff<W: Write>(
    out: &mut W,
    diff: &ParsedDiff,
    options: &ViewOptions,
    painter: &Painter,
) -> io::Result<()> {
    let panel_width = usize::from(options.width).saturating_sub(SEPARATOR.width()) / 2;
    let content_width = panel_width.saturating_sub(GUTTER_WIDTH);

    for file in &diff.files {
        write_file_header(out, painter, file)?;

        if file.is_binary {
            writeln!(out, "{}", painter.paint("    binary file, no text diff", Tone::Gutter))?;
            continue;
        }

        for hunk in &file.hunks {
            writeln!(out, "{}", painter.paint(&hunk.header, Tone::HunkHeader))?;

            let ranges = intra_line_ranges(hunk, options.word_diff_max_len);
            for row in pair_changes_for_split(&hunk.changes) {
                let mut pieces = panel_pieces(row.left, Change::old_line_no, &ranges, content_width);
                pieces.push(Piece::new(SEPARATOR, Tone::Gutter));
                pieces.extend(panel_pieces(row.right, Change::new_line_no, &ranges, content_width));
                write_line(out, painter, &pieces)?;
            }
        }
    }

    Ok(())
}

fn panel_pieces(
    change: Option<&Change>,
    line_no: fn(&Change) -> Option<u32>,
    ranges: &IntraLineRanges,
    content_width: usize,
) -> Vec<Piece> {
    let Some(change) = change else {
        // Empty side, filled to the panel width.
        return vec![Piece::new(&" ".repeat(GUTTER_WIDTH + content_width), Tone::Filler)];
    };

    let mut pieces = vec![Piece::new(
        &format!("{:4} ", line_no(change).unwrap_or(0)),
        Tone::Gutter,
    )];
    pieces.extend(clip(content_pieces(change, ranges), content_width));
    pieces
}
