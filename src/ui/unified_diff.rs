use std::io::{self, Write};

use diffscape_engine::{ParsedDiff, diff_file::ChangeKind};

use crate::{
    config::ViewOptions,
    ui::diff_utils::{
        Painter, Piece, Tone, content_pieces, intra_line_ranges, write_file_header, write_line,
    },
};

pub fn render_unified_diff<W: Write>(
    out: &mut W,
    diff: &ParsedDiff,
    options: &ViewOptions,
    painter: &Painter,
) -> io::Result<()> {
    for file in &diff.files {
        write_file_header(out, painter, file)?;

        if file.is_binary {
            writeln!(out, "{}", painter.paint("    binary file, no text diff", Tone::Gutter))?;
            continue;
        }

        for hunk in &file.hunks {
            writeln!(out, "{}", painter.paint(&hunk.header, Tone::HunkHeader))?;

            let ranges = intra_line_ranges(hunk, options.word_diff_max_len);
            for change in &hunk.changes {
                let line_num_text = match (change.old_line_no(), change.new_line_no()) {
                    (Some(old), Some(new)) => format!("{:4}:{:4} ", old, new),
                    (Some(old), None) => format!("{:4}:     ", old),
                    (None, Some(new)) => format!("    :{:4} ", new),
                    (None, None) => "          ".to_string(),
                };

                let (prefix, tone) = match change.kind() {
                    ChangeKind::Add => ("+ ", Tone::Added),
                    ChangeKind::Del => ("- ", Tone::Removed),
                    ChangeKind::Ctx => ("  ", Tone::Plain),
                };

                let mut pieces = vec![
                    Piece::new(&line_num_text, Tone::Gutter),
                    Piece::new(prefix, tone),
                ];
                pieces.extend(content_pieces(change, &ranges));
                write_line(out, painter, &pieces)?;
            }
        }
    }

    Ok(())
}
