use std::io::{self, Write};

use diffscape_engine::ParsedDiff;

use crate::{
    config::{ViewMode, ViewOptions},
    ui::{
        diff_utils::Painter, side_by_side_diff::render_side_by_side_diff,
        stat_summary::render_stat_summary, unified_diff::render_unified_diff,
    },
};

pub fn render<W: Write>(out: &mut W, diff: &ParsedDiff, options: &ViewOptions) -> io::Result<()> {
    let painter = Painter::new(options.color);

    match options.mode.resolve(options.width) {
        ViewMode::Stat => render_stat_summary(out, diff, &painter),
        ViewMode::Split => render_side_by_side_diff(out, diff, options, &painter),
        ViewMode::Unified => render_unified_diff(out, diff, options, &painter),
    }
}
