//! Line-oriented parser for `git diff` style unified diffs.
//!
//! Parsing never fails. Input that does not fit the expected shape is kept
//! where it can be (unknown hunk lines become context) and skipped where it
//! cannot (text before the first file header), with a `log` record either way.

use crate::diff_file::{Change, DEV_NULL, FileDiff, Hunk, HunkRange, ParsedDiff};

pub fn parse_diff(diff_text: &str) -> ParsedDiff {
    let mut parser = DiffParser::default();
    for line in diff_text.lines() {
        parser.feed(line);
    }
    parser.finish()
}

#[derive(Default)]
struct DiffParser {
    files: Vec<FileDiff>,
    current_file: Option<FileDiff>,
    seen_old_header: bool,
    current_hunk: Option<HunkCursor>,
}

/// A hunk being filled, with the running line numbers for each side and the
/// number of lines its header still promises.
struct HunkCursor {
    hunk: Hunk,
    old_line: u32,
    new_line: u32,
    old_remaining: u32,
    new_remaining: u32,
    // False when the header could not be read; such a hunk runs until the
    // next header instead of ending after its declared lines.
    bounded: bool,
}

impl HunkCursor {
    fn new(hunk: Hunk, bounded: bool) -> Self {
        Self {
            bounded,
            old_line: hunk.old_range.start,
            new_line: hunk.new_range.start,
            old_remaining: hunk.old_range.len,
            new_remaining: hunk.new_range.len,
            hunk,
        }
    }

    fn expects_more(&self) -> bool {
        !self.bounded || self.old_remaining > 0 || self.new_remaining > 0
    }

    fn push_line(&mut self, line: &str) {
        match line.as_bytes().first() {
            Some(b'+') => {
                self.hunk.add_change(Change::added(&line[1..], self.new_line));
                self.new_line = self.new_line.saturating_add(1);
                self.new_remaining = self.new_remaining.saturating_sub(1);
            }
            Some(b'-') => {
                self.hunk.add_change(Change::removed(&line[1..], self.old_line));
                self.old_line = self.old_line.saturating_add(1);
                self.old_remaining = self.old_remaining.saturating_sub(1);
            }
            first => {
                let content = if first == Some(&b' ') {
                    &line[1..]
                } else {
                    if !line.is_empty() {
                        log::debug!("treating unrecognized hunk line as context: {line:?}");
                    }
                    line
                };
                self.hunk
                    .add_change(Change::context(content, self.old_line, self.new_line));
                self.old_line = self.old_line.saturating_add(1);
                self.new_line = self.new_line.saturating_add(1);
                self.old_remaining = self.old_remaining.saturating_sub(1);
                self.new_remaining = self.new_remaining.saturating_sub(1);
            }
        }
    }
}

impl DiffParser {
    fn feed(&mut self, line: &str) {
        if let Some(rest) = line.strip_prefix("diff --git ") {
            self.start_git_file(rest);
            return;
        }

        if line.starts_with("\\ ") {
            // "\ No newline at end of file" annotates the previous line.
            return;
        }

        if line.starts_with("@@") {
            self.start_hunk(line);
            return;
        }

        if let Some(hunk) = self.current_hunk.as_mut() {
            // The header says how many lines belong to the hunk; anything
            // after them (a patch signature, the next commit in `git log -p`)
            // is not content.
            if hunk.expects_more() {
                hunk.push_line(line);
                return;
            }
            self.close_hunk();
        }

        self.feed_header(line);
    }

    fn feed_header(&mut self, line: &str) {
        if let Some(path) = line.strip_prefix("--- ") {
            self.old_file_header(path);
        } else if let Some(path) = line.strip_prefix("+++ ") {
            self.new_file_header(path);
        } else if is_binary_notice(line) {
            self.binary_notice(line);
        } else if let Some(file) = self.current_file.as_mut() {
            if let Some(path) = line.strip_prefix("rename from ") {
                file.old_name = unquote_path(path);
                file.is_renamed = true;
            } else if let Some(path) = line.strip_prefix("rename to ") {
                file.new_name = unquote_path(path);
                file.is_renamed = true;
            } else if line.starts_with("new file mode") {
                file.is_new = true;
                file.old_name = DEV_NULL.to_string();
            } else if line.starts_with("deleted file mode") {
                file.is_deleted = true;
                file.new_name = DEV_NULL.to_string();
            } else {
                log::trace!("ignoring extended header line: {line:?}");
            }
        } else {
            log::trace!("skipping line outside of any file: {line:?}");
        }
    }

    fn start_git_file(&mut self, names: &str) {
        self.close_file();

        let (old_name, new_name) = split_git_header_names(names);
        log::trace!("starting file {old_name} -> {new_name}");
        self.current_file = Some(FileDiff::new(&old_name, &new_name));
    }

    fn old_file_header(&mut self, path: &str) {
        // A second "---" (or one with no file open) starts a file of plain
        // `diff -u` output, which has no "diff --git" line.
        let needs_new_file = match &self.current_file {
            None => true,
            Some(file) => self.seen_old_header || file.is_binary || !file.hunks.is_empty(),
        };
        if needs_new_file {
            self.close_file();
            self.current_file = Some(FileDiff::default());
        }

        self.seen_old_header = true;
        if let Some(file) = self.current_file.as_mut() {
            let name = header_path(path, "a/");
            if name == DEV_NULL {
                file.is_new = true;
            }
            file.old_name = name;
        }
    }

    fn new_file_header(&mut self, path: &str) {
        let Some(file) = self.current_file.as_mut() else {
            log::debug!("ignoring \"+++\" header with no file open: {path:?}");
            return;
        };

        let name = header_path(path, "b/");
        if name == DEV_NULL {
            file.is_deleted = true;
        }
        file.new_name = name;
    }

    fn binary_notice(&mut self, line: &str) {
        let standalone = match &self.current_file {
            None => true,
            Some(file) => file.is_binary || !file.hunks.is_empty(),
        };

        if standalone {
            // `diff -r` prints the notice with no file header of its own.
            self.close_file();
            let (old_name, new_name) = binary_notice_names(line).unwrap_or_default();
            let mut file = FileDiff::new(&old_name, &new_name);
            file.is_new = old_name == DEV_NULL;
            file.is_deleted = new_name == DEV_NULL;
            self.current_file = Some(file);
        }

        if let Some(file) = self.current_file.as_mut() {
            log::debug!("binary file {}", file.display_name());
            file.is_binary = true;
            file.hunks.clear();
        }
    }

    fn start_hunk(&mut self, line: &str) {
        self.close_hunk();

        match self.current_file.as_ref() {
            None => {
                log::debug!("skipping hunk header with no file open: {line:?}");
                return;
            }
            Some(file) if file.is_binary => {
                log::debug!("skipping hunk header in binary file: {line:?}");
                return;
            }
            Some(_) => {}
        }

        let cursor = match parse_hunk_header(line) {
            Some((old_range, new_range)) => HunkCursor::new(Hunk::new(line, old_range, new_range), true),
            None => {
                log::warn!("malformed hunk header, numbering lines from 1: {line:?}");
                HunkCursor::new(Hunk::new(line, HunkRange::default(), HunkRange::default()), false)
            }
        };

        self.current_hunk = Some(cursor);
    }

    fn close_hunk(&mut self) {
        if let Some(cursor) = self.current_hunk.take()
            && let Some(file) = self.current_file.as_mut()
        {
            file.add_hunk(cursor.hunk);
        }
    }

    fn close_file(&mut self) {
        self.close_hunk();
        self.seen_old_header = false;

        let Some(mut file) = self.current_file.take() else {
            return;
        };

        if file.is_binary {
            file.hunks.clear();
        }

        let both_real = file.old_name != DEV_NULL
            && file.new_name != DEV_NULL
            && !file.old_name.is_empty()
            && !file.new_name.is_empty();
        file.is_renamed = both_real && file.old_name != file.new_name;

        file.refresh_stats();
        self.files.push(file);
    }

    fn finish(mut self) -> ParsedDiff {
        self.close_file();
        let parsed = ParsedDiff::new(self.files);
        log::debug!(
            "parsed {} files (+{} -{})",
            parsed.stats.files_changed,
            parsed.stats.additions,
            parsed.stats.deletions
        );
        parsed
    }
}

/// Parses `@@ -old_start[,old_len] +new_start[,new_len] @@`; omitted lengths are 1.
pub fn parse_hunk_header(line: &str) -> Option<(HunkRange, HunkRange)> {
    let rest = line.strip_prefix("@@ -")?;
    let (ranges, _) = rest.split_once(" @@")?;
    let (old, new) = ranges.split_once(" +")?;
    Some((parse_range(old)?, parse_range(new)?))
}

fn parse_range(range: &str) -> Option<HunkRange> {
    match range.split_once(',') {
        Some((start, len)) => Some(HunkRange::new(start.parse().ok()?, len.parse().ok()?)),
        None => Some(HunkRange::new(range.parse().ok()?, 1)),
    }
}

fn is_binary_notice(line: &str) -> bool {
    line == "GIT binary patch"
        || (line.starts_with("Binary files ") && line.ends_with(" differ") && line.contains(" and "))
}

fn binary_notice_names(line: &str) -> Option<(String, String)> {
    let names = line.strip_prefix("Binary files ")?.strip_suffix(" differ")?;
    let (old, new) = names.split_once(" and ")?;
    Some((header_path(old, "a/"), header_path(new, "b/")))
}

/// Path from a `---`/`+++` line: unquoted, trailing timestamp dropped,
/// side prefix removed.
fn header_path(path: &str, prefix: &str) -> String {
    let path = unquote_path(path.split('\t').next().unwrap_or(path));
    if path == DEV_NULL {
        return path;
    }
    match path.strip_prefix(prefix) {
        Some(stripped) => stripped.to_string(),
        None => path,
    }
}

/// Splits the `a/<old> b/<new>` tail of a `diff --git` line.
fn split_git_header_names(names: &str) -> (String, String) {
    if names.starts_with('"') {
        let (old, rest) = take_quoted(names);
        return (strip_side(&old, "a/"), strip_side(&unquote_path(rest.trim_start()), "b/"));
    }

    if let Some(idx) = names.find(" \"") {
        return (
            strip_side(&names[..idx], "a/"),
            strip_side(&unquote_path(&names[idx + 1..]), "b/"),
        );
    }

    // Unchanged paths may contain spaces; the split that yields two equal
    // names is the right one.
    if names.len() % 2 == 1 {
        let mid = names.len() / 2;
        if names.is_char_boundary(mid) && names.as_bytes()[mid] == b' ' {
            let old = strip_side(&names[..mid], "a/");
            let new = strip_side(&names[mid + 1..], "b/");
            if old == new {
                return (old, new);
            }
        }
    }

    let (old, new) = names
        .split_once(" b/")
        .map(|(old, new)| (old.to_string(), format!("b/{new}")))
        .or_else(|| {
            names
                .split_once(' ')
                .map(|(old, new)| (old.to_string(), new.to_string()))
        })
        .unwrap_or_else(|| (names.to_string(), names.to_string()));

    (strip_side(&old, "a/"), strip_side(&new, "b/"))
}

fn strip_side(path: &str, prefix: &str) -> String {
    path.strip_prefix(prefix).unwrap_or(path).to_string()
}

fn unquote_path(path: &str) -> String {
    if path.starts_with('"') {
        take_quoted(path).0
    } else {
        path.to_string()
    }
}

/// Decodes a C-style quoted path as git writes it for unusual file names.
/// Returns the decoded path and whatever follows the closing quote.
fn take_quoted(text: &str) -> (String, &str) {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 1;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => return (String::from_utf8_lossy(&out).into_owned(), &text[i + 1..]),
            b'\\' if i + 1 < bytes.len() => {
                let escaped = bytes[i + 1];
                i += 2;
                match escaped {
                    b'n' => out.push(b'\n'),
                    b't' => out.push(b'\t'),
                    b'r' => out.push(b'\r'),
                    b'a' => out.push(0x07),
                    b'b' => out.push(0x08),
                    b'f' => out.push(0x0c),
                    b'v' => out.push(0x0b),
                    b'0'..=b'7' => {
                        let mut value = u32::from(escaped - b'0');
                        let mut digits = 1;
                        while digits < 3 && i < bytes.len() && (b'0'..=b'7').contains(&bytes[i]) {
                            value = value * 8 + u32::from(bytes[i] - b'0');
                            i += 1;
                            digits += 1;
                        }
                        out.push(value as u8);
                    }
                    other => out.push(other),
                }
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }

    // Unterminated quote: keep everything after the opening quote.
    (String::from_utf8_lossy(&out).into_owned(), "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff_file::ChangeKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_hunk_header() {
        assert_eq!(
            parse_hunk_header("@@ -1,2 +1,3 @@"),
            Some((HunkRange::new(1, 2), HunkRange::new(1, 3)))
        );
        assert_eq!(
            parse_hunk_header("@@ -5 +7 @@ impl Foo"),
            Some((HunkRange::new(5, 1), HunkRange::new(7, 1)))
        );
        assert_eq!(
            parse_hunk_header("@@ -0,0 +1 @@"),
            Some((HunkRange::new(0, 0), HunkRange::new(1, 1)))
        );
        assert_eq!(parse_hunk_header("@@ nonsense @@"), None);
    }

    #[test]
    fn test_split_git_header_names() {
        assert_eq!(
            split_git_header_names("a/src/lib.rs b/src/lib.rs"),
            ("src/lib.rs".to_string(), "src/lib.rs".to_string())
        );
        assert_eq!(
            split_git_header_names("a/my file.txt b/my file.txt"),
            ("my file.txt".to_string(), "my file.txt".to_string())
        );
        assert_eq!(
            split_git_header_names("a/old name.txt b/new name.txt"),
            ("old name.txt".to_string(), "new name.txt".to_string())
        );
        assert_eq!(
            split_git_header_names("test.txt test.txt"),
            ("test.txt".to_string(), "test.txt".to_string())
        );
        assert_eq!(
            split_git_header_names("\"a/tab\\there\" \"b/tab\\there\""),
            ("tab\there".to_string(), "tab\there".to_string())
        );
    }

    #[test]
    fn test_take_quoted_octal_utf8() {
        let (path, rest) = take_quoted("\"a/caf\\303\\251.txt\" tail");
        assert_eq!(path, "a/café.txt");
        assert_eq!(rest, " tail");
    }

    #[test]
    fn test_hunk_counters_reset_per_hunk() {
        let diff = "diff --git a/f b/f
--- a/f
+++ b/f
@@ -1,2 +1,2 @@
-a
+b
 c
@@ -10,1 +10,2 @@
 x
+y";
        let parsed = parse_diff(diff);
        let hunks = &parsed.files[0].hunks;
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[1].changes[0], Change::context("x", 10, 10));
        assert_eq!(hunks[1].changes[1], Change::added("y", 11));
    }

    #[test]
    fn test_triple_dash_content_inside_hunk() {
        let diff = "diff --git a/notes.md b/notes.md
--- a/notes.md
+++ b/notes.md
@@ -1,2 +1,2 @@
---- old rule
++++ new rule
 tail";
        let parsed = parse_diff(diff);
        let file = &parsed.files[0];
        assert_eq!(file.old_name, "notes.md");
        let changes = &file.hunks[0].changes;
        assert_eq!(changes[0], Change::removed("--- old rule", 1));
        assert_eq!(changes[1], Change::added("+++ new rule", 1));
        assert_eq!(changes[2].kind(), ChangeKind::Ctx);
    }

    #[test]
    fn test_no_newline_marker_is_dropped() {
        let diff = "diff --git a/f b/f
--- a/f
+++ b/f
@@ -1 +1 @@
-old
\\ No newline at end of file
+new
\\ No newline at end of file";
        let parsed = parse_diff(diff);
        let changes = &parsed.files[0].hunks[0].changes;
        assert_eq!(changes, &vec![Change::removed("old", 1), Change::added("new", 1)]);
    }

    #[test]
    fn test_unrecognized_and_empty_lines_become_context() {
        let diff = "diff --git a/f b/f
--- a/f
+++ b/f
@@ -1,3 +1,3 @@
 first

garbage";
        let parsed = parse_diff(diff);
        let changes = &parsed.files[0].hunks[0].changes;
        assert_eq!(changes[1], Change::context("", 2, 2));
        assert_eq!(changes[2], Change::context("garbage", 3, 3));
    }

    #[test]
    fn test_malformed_hunk_header_still_collects_lines() {
        let diff = "diff --git a/f b/f
--- a/f
+++ b/f
@@ broken @@
+added";
        let parsed = parse_diff(diff);
        let hunk = &parsed.files[0].hunks[0];
        assert_eq!(hunk.header, "@@ broken @@");
        assert_eq!(hunk.changes, vec![Change::added("added", 1)]);
    }

    #[test]
    fn test_line_numbers_at_u32_limit() {
        let diff = "diff --git a/f b/f
--- a/f
+++ b/f
@@ -4294967295,2 +4294967294,3 @@
-a
-b
 c
+d
+e";
        let parsed = parse_diff(diff);
        let changes = &parsed.files[0].hunks[0].changes;
        assert_eq!(changes[0], Change::removed("a", u32::MAX));
        assert_eq!(changes[1], Change::removed("b", u32::MAX));
        assert_eq!(changes[2], Change::context("c", u32::MAX, u32::MAX - 1));
        assert_eq!(changes[4], Change::added("e", u32::MAX));
        assert_eq!(parsed.stats.deletions, 2);
    }

    #[test]
    fn test_lines_after_hunk_span_are_not_content() {
        let patch = "From 0123456789abcdef Mon Sep 17 00:00:00 2001
From: Someone <someone@example.com>
Subject: [PATCH] Change a to b

---
 f | 2 +-
 1 file changed, 1 insertion(+), 1 deletion(-)

diff --git a/f b/f
index 1111111..2222222 100644
--- a/f
+++ b/f
@@ -1 +1 @@
-a
+b
-- 
2.39.0

";
        let parsed = parse_diff(patch);
        assert_eq!(parsed.files.len(), 1);
        assert_eq!(parsed.stats.additions, 1);
        assert_eq!(parsed.stats.deletions, 1);
        assert_eq!(
            parsed.files[0].hunks[0].changes,
            vec![Change::removed("a", 1), Change::added("b", 1)]
        );
    }

    #[test]
    fn test_git_log_with_two_commits() {
        let log = "commit 1111111111111111111111111111111111111111
Author: Someone <someone@example.com>
Date:   Mon Jan 1 10:00:00 2024 +0000

    Second change

diff --git a/f b/f
--- a/f
+++ b/f
@@ -1,2 +1,2 @@
-a
+b
 c

commit 2222222222222222222222222222222222222222
Author: Someone <someone@example.com>
Date:   Sun Dec 31 10:00:00 2023 +0000

    First change

diff --git a/g b/g
--- a/g
+++ b/g
@@ -1 +1 @@
-x
+y
";
        let parsed = parse_diff(log);
        assert_eq!(parsed.files.len(), 2);
        assert_eq!(parsed.files[0].hunks[0].changes.len(), 3);
        assert_eq!(parsed.files[1].new_name, "g");
        assert_eq!(parsed.files[1].hunks[0].changes.len(), 2);
        assert_eq!(parsed.stats.additions, 2);
        assert_eq!(parsed.stats.deletions, 2);
    }

    #[test]
    fn test_rename_from_differing_names_alone() {
        let diff = "diff --git a/x.txt b/y.txt
index 1111111..2222222 100644
--- a/x.txt
+++ b/y.txt
@@ -1 +1 @@
-old
+new";
        let parsed = parse_diff(diff);
        let file = &parsed.files[0];
        assert!(file.is_renamed);
        assert_eq!(file.old_name, "x.txt");
        assert_eq!(file.new_name, "y.txt");
        assert_eq!(file.hunks[0].changes.len(), 2);
    }

    #[test]
    fn test_plain_unified_diff_without_git_headers() {
        let diff = "--- a/one.txt\t2024-01-01 10:00:00
+++ b/one.txt\t2024-01-02 10:00:00
@@ -1 +1 @@
-1
+one
--- a/two.txt
+++ b/two.txt
@@ -1 +1,2 @@
 2
+two";
        let parsed = parse_diff(diff);
        assert_eq!(parsed.files.len(), 2);
        assert_eq!(parsed.files[0].new_name, "one.txt");
        assert_eq!(parsed.files[1].old_name, "two.txt");
        assert_eq!(parsed.stats.additions, 2);
        assert_eq!(parsed.stats.deletions, 1);
    }

    #[test]
    fn test_preamble_is_skipped() {
        let diff = "commit 0123456789abcdef
Author: Someone <someone@example.com>

    Fix the thing

diff --git a/f b/f
--- a/f
+++ b/f
@@ -1 +1 @@
-x
+y";
        let parsed = parse_diff(diff);
        assert_eq!(parsed.files.len(), 1);
        assert_eq!(parsed.stats.additions, 1);
    }

    #[test]
    fn test_standalone_binary_notice() {
        let diff = "Binary files /dev/null and b/logo.png differ";
        let parsed = parse_diff(diff);
        let file = &parsed.files[0];
        assert!(file.is_binary);
        assert!(file.is_new);
        assert_eq!(file.new_name, "logo.png");
        assert!(file.hunks.is_empty());
    }

    #[test]
    fn test_git_binary_patch() {
        let diff = "diff --git a/blob.bin b/blob.bin
index 1111111..2222222 100644
GIT binary patch
literal 12
Tcmd;JWMp7vU|?WnU|;|M0RR91

literal 4
LcmZQzU|;|M00aO5
";
        let parsed = parse_diff(diff);
        let file = &parsed.files[0];
        assert!(file.is_binary);
        assert!(file.hunks.is_empty());
        assert_eq!(file.stats.additions, 0);
    }
}
