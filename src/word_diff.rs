use similar::{Algorithm, DiffTag, capture_diff_slices};
use std::ops::Range;

/// Lines longer than this (in chars) are left to whole-line highlighting.
pub const DEFAULT_WORD_DIFF_MAX_LEN: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Equal,
    Add,
    Del,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordDiffSegment {
    pub kind: SegmentKind,
    pub value: String,
}

impl WordDiffSegment {
    pub fn new(kind: SegmentKind, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Splits a line into alternating runs of whitespace and non-whitespace.
/// Concatenating the tokens gives back the input.
pub fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_whitespace = None;

    for (idx, ch) in line.char_indices() {
        let is_whitespace = ch.is_whitespace();
        if in_whitespace.is_some_and(|prev| prev != is_whitespace) {
            tokens.push(&line[start..idx]);
            start = idx;
        }
        in_whitespace = Some(is_whitespace);
    }

    if start < line.len() {
        tokens.push(&line[start..]);
    }

    tokens
}

/// Computes the word-level edit script that turns `old_line` into `new_line`.
///
/// Tokens are aligned with Myers' algorithm. Between two unchanged stretches
/// all removed tokens form one `Del` segment followed by one `Add` segment
/// holding all inserted tokens.
pub fn compute_word_diff(old_line: &str, new_line: &str) -> Vec<WordDiffSegment> {
    let old_tokens = tokenize(old_line);
    let new_tokens = tokenize(new_line);
    let ops = capture_diff_slices(Algorithm::Myers, &old_tokens, &new_tokens);

    let mut segments = Vec::new();
    let mut removed = String::new();
    let mut inserted = String::new();

    for op in ops {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => {
                flush_changed(&mut segments, &mut removed, &mut inserted);
                push_segment(&mut segments, SegmentKind::Equal, &old_tokens[old_range].concat());
            }
            DiffTag::Delete => removed.push_str(&old_tokens[old_range].concat()),
            DiffTag::Insert => inserted.push_str(&new_tokens[new_range].concat()),
            DiffTag::Replace => {
                removed.push_str(&old_tokens[old_range].concat());
                inserted.push_str(&new_tokens[new_range].concat());
            }
        }
    }
    flush_changed(&mut segments, &mut removed, &mut inserted);

    segments
}

/// Word diff guarded by a length limit. Returns `None` when either line is
/// longer than `max_len` characters.
pub fn word_diff_within(
    old_line: &str,
    new_line: &str,
    max_len: usize,
) -> Option<Vec<WordDiffSegment>> {
    if old_line.chars().count() > max_len || new_line.chars().count() > max_len {
        log::trace!("line pair over {max_len} chars, skipping word diff");
        return None;
    }
    Some(compute_word_diff(old_line, new_line))
}

fn flush_changed(segments: &mut Vec<WordDiffSegment>, removed: &mut String, inserted: &mut String) {
    if !removed.is_empty() {
        push_segment(segments, SegmentKind::Del, removed);
        removed.clear();
    }
    if !inserted.is_empty() {
        push_segment(segments, SegmentKind::Add, inserted);
        inserted.clear();
    }
}

fn push_segment(segments: &mut Vec<WordDiffSegment>, kind: SegmentKind, value: &str) {
    if value.is_empty() {
        return;
    }
    match segments.last_mut() {
        Some(last) if last.kind == kind => last.value.push_str(value),
        _ => segments.push(WordDiffSegment::new(kind, value)),
    }
}

/// Byte ranges of the removed text in the old line and of the inserted text
/// in the new line.
pub fn changed_ranges(segments: &[WordDiffSegment]) -> (Vec<Range<usize>>, Vec<Range<usize>>) {
    let mut old_ranges: Vec<Range<usize>> = Vec::new();
    let mut new_ranges: Vec<Range<usize>> = Vec::new();
    let mut old_idx = 0;
    let mut new_idx = 0;

    for segment in segments {
        let len = segment.value.len();
        match segment.kind {
            SegmentKind::Equal => {
                old_idx += len;
                new_idx += len;
            }
            SegmentKind::Del => {
                extend_ranges(&mut old_ranges, old_idx..old_idx + len);
                old_idx += len;
            }
            SegmentKind::Add => {
                extend_ranges(&mut new_ranges, new_idx..new_idx + len);
                new_idx += len;
            }
        }
    }

    (old_ranges, new_ranges)
}

fn extend_ranges(ranges: &mut Vec<Range<usize>>, range: Range<usize>) {
    match ranges.last_mut() {
        Some(last) if last.end == range.start => last.end = range.end,
        _ => ranges.push(range),
    }
}
