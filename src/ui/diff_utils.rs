use std::collections::HashMap;
use std::io::{self, Write};
use std::ops::Range;

use crossterm::style::{Color, ContentStyle, Stylize};
use diffscape_engine::{
    diff_file::{Change, ChangeKind, FileDiff, Hunk},
    split::pair_changes_for_split,
    word_diff::{changed_ranges, word_diff_within},
};
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Gutter,
    FileHeader,
    HunkHeader,
    Added,
    AddedEmphasis,
    Removed,
    RemovedEmphasis,
    Filler,
}

/// A run of text rendered in one tone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub text: String,
    pub tone: Tone,
}

impl Piece {
    pub fn new(text: &str, tone: Tone) -> Self {
        Self {
            text: text.to_string(),
            tone,
        }
    }
}

impl Tone {
    fn style(self) -> ContentStyle {
        match self {
            Tone::Plain => ContentStyle::new(),
            Tone::Gutter => ContentStyle::new().with(Color::DarkGrey),
            Tone::FileHeader => ContentStyle::new().with(Color::Yellow).bold(),
            Tone::HunkHeader => ContentStyle::new().with(Color::Cyan),
            Tone::Added => ContentStyle::new().with(Color::Green),
            Tone::AddedEmphasis => ContentStyle::new()
                .with(Color::White)
                .on(Color::Rgb { r: 0, g: 100, b: 0 }),
            Tone::Removed => ContentStyle::new().with(Color::Red),
            Tone::RemovedEmphasis => ContentStyle::new()
                .with(Color::White)
                .on(Color::Rgb { r: 139, g: 0, b: 0 }),
            Tone::Filler => ContentStyle::new().on(Color::Rgb { r: 40, g: 40, b: 40 }),
        }
    }
}

/// Applies ANSI styling, or passes text through when colour is off.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.enabled || tone == Tone::Plain || text.is_empty() {
            return text.to_string();
        }
        tone.style().apply(text).to_string()
    }
}

pub fn write_line<W: Write>(out: &mut W, painter: &Painter, pieces: &[Piece]) -> io::Result<()> {
    for piece in pieces {
        write!(out, "{}", painter.paint(&piece.text, piece.tone))?;
    }
    writeln!(out)
}

pub fn write_file_header<W: Write>(out: &mut W, painter: &Painter, file: &FileDiff) -> io::Result<()> {
    let title = format!(
        "{} {}  +{} -{}",
        file.status().code(),
        file.display_name(),
        file.stats.additions,
        file.stats.deletions
    );
    writeln!(out, "{}", painter.paint(&title, Tone::FileHeader))
}

/// Changed byte ranges per replaced line of a hunk, keyed by the change kind
/// and its own line number.
pub type IntraLineRanges = HashMap<(ChangeKind, u32), Vec<Range<usize>>>;

pub fn intra_line_ranges(hunk: &Hunk, max_len: usize) -> IntraLineRanges {
    let mut ranges = IntraLineRanges::new();

    for row in pair_changes_for_split(&hunk.changes) {
        let Some((del, add)) = row.replacement() else {
            continue;
        };
        let Some(segments) = word_diff_within(del.content(), add.content(), max_len) else {
            continue;
        };

        let (old_ranges, new_ranges) = changed_ranges(&segments);
        if let Some(line_no) = del.old_line_no() {
            ranges.insert((ChangeKind::Del, line_no), old_ranges);
        }
        if let Some(line_no) = add.new_line_no() {
            ranges.insert((ChangeKind::Add, line_no), new_ranges);
        }
    }

    ranges
}

/// Content of a change split into base and emphasised pieces.
pub fn content_pieces(change: &Change, ranges: &IntraLineRanges) -> Vec<Piece> {
    let (base, emphasis, key) = match change {
        Change::Add { new_line_no, .. } => (
            Tone::Added,
            Tone::AddedEmphasis,
            Some((ChangeKind::Add, *new_line_no)),
        ),
        Change::Del { old_line_no, .. } => (
            Tone::Removed,
            Tone::RemovedEmphasis,
            Some((ChangeKind::Del, *old_line_no)),
        ),
        Change::Ctx { .. } => (Tone::Plain, Tone::Plain, None),
    };

    let changed = key
        .and_then(|key| ranges.get(&key))
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    apply_diff_highlight(change.content(), changed, base, emphasis)
}

/// Splits `content` so the bytes inside `diff_ranges` get `highlight` and the
/// rest gets `base`. Ranges must be sorted and on char boundaries.
pub fn apply_diff_highlight(
    content: &str,
    diff_ranges: &[Range<usize>],
    base: Tone,
    highlight: Tone,
) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut last_processed = 0;

    for range in diff_ranges {
        let start = range.start.clamp(last_processed, content.len());
        let end = range.end.min(content.len());
        if start >= end {
            continue;
        }

        if start > last_processed {
            pieces.push(Piece::new(&content[last_processed..start], base));
        }
        pieces.push(Piece::new(&content[start..end], highlight));
        last_processed = end;
    }

    if last_processed < content.len() {
        pieces.push(Piece::new(&content[last_processed..], base));
    }

    pieces
}

/// Fits pieces into exactly `width` terminal columns, cutting or padding
/// with spaces. A wide char that would straddle the edge is dropped and the
/// gap padded.
///
/// Tabs are expanded to four spaces here, after highlighting: the pieces have
/// already been split at byte offsets of the raw content, so expanding inside
/// a piece never shifts a highlight boundary.
pub fn clip(pieces: Vec<Piece>, width: usize) -> Vec<Piece> {
    let mut clipped = Vec::with_capacity(pieces.len() + 1);
    let mut used = 0;

    'pieces: for piece in pieces {
        let mut text = String::new();
        for ch in piece.text.replace('\t', "    ").chars() {
            let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
            if used + ch_width > width {
                if !text.is_empty() {
                    clipped.push(Piece { text, tone: piece.tone });
                }
                break 'pieces;
            }
            used += ch_width;
            text.push(ch);
        }
        if !text.is_empty() {
            clipped.push(Piece { text, tone: piece.tone });
        }
    }

    if used < width {
        clipped.push(Piece::new(&" ".repeat(width - used), Tone::Plain));
    }

    clipped
}
