/// Path git prints in place of a file that does not exist on one side.
pub const DEV_NULL: &str = "/dev/null";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDiff {
    pub files: Vec<FileDiff>,
    pub stats: DiffStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub files_changed: usize,
    pub additions: usize,
    pub deletions: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    pub additions: usize,
    pub deletions: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDiff {
    pub old_name: String,
    pub new_name: String,
    pub is_new: bool,
    pub is_deleted: bool,
    pub is_renamed: bool,
    pub is_binary: bool,
    pub hunks: Vec<Hunk>,
    pub stats: FileStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Deleted,
    Renamed,
    Modified,
    Binary,
}

/// Line span of one side of a hunk, as written in `@@ -start,len +start,len @@`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkRange {
    pub start: u32,
    pub len: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub header: String,
    pub old_range: HunkRange,
    pub new_range: HunkRange,
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Add,
    Del,
    Ctx,
}

/// One body line of a hunk. Each variant carries exactly the line numbers
/// that exist for it: additions only on the new side, deletions only on the
/// old side, context on both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Add {
        content: String,
        new_line_no: u32,
    },
    Del {
        content: String,
        old_line_no: u32,
    },
    Ctx {
        content: String,
        old_line_no: u32,
        new_line_no: u32,
    },
}

impl ParsedDiff {
    pub fn new(files: Vec<FileDiff>) -> Self {
        let stats = files.iter().fold(
            DiffStats {
                files_changed: files.len(),
                ..DiffStats::default()
            },
            |acc, file| DiffStats {
                additions: acc.additions + file.stats.additions,
                deletions: acc.deletions + file.stats.deletions,
                ..acc
            },
        );

        Self { files, stats }
    }
}

impl FileDiff {
    pub fn new(old_name: &str, new_name: &str) -> Self {
        Self {
            old_name: old_name.to_string(),
            new_name: new_name.to_string(),
            ..Self::default()
        }
    }

    pub fn add_hunk(&mut self, hunk: Hunk) {
        self.hunks.push(hunk);
    }

    pub fn status(&self) -> FileStatus {
        if self.is_binary {
            FileStatus::Binary
        } else if self.is_new {
            FileStatus::Added
        } else if self.is_deleted {
            FileStatus::Deleted
        } else if self.is_renamed {
            FileStatus::Renamed
        } else {
            FileStatus::Modified
        }
    }

    /// Name to show in a file list: the surviving path, or `old → new` for renames.
    pub fn display_name(&self) -> String {
        if self.is_deleted {
            self.old_name.clone()
        } else if self.is_renamed {
            format!("{} → {}", self.old_name, self.new_name)
        } else {
            self.new_name.clone()
        }
    }

    /// Recounts additions and deletions from the hunks.
    pub(crate) fn refresh_stats(&mut self) {
        let mut stats = FileStats::default();
        for change in self.hunks.iter().flat_map(|hunk| &hunk.changes) {
            match change.kind() {
                ChangeKind::Add => stats.additions += 1,
                ChangeKind::Del => stats.deletions += 1,
                ChangeKind::Ctx => {}
            }
        }
        self.stats = stats;
    }
}

impl FileStatus {
    pub fn code(self) -> char {
        match self {
            FileStatus::Added => 'A',
            FileStatus::Deleted => 'D',
            FileStatus::Renamed => 'R',
            FileStatus::Modified => 'M',
            FileStatus::Binary => 'B',
        }
    }
}

impl HunkRange {
    pub fn new(start: u32, len: u32) -> Self {
        Self { start, len }
    }
}

impl Default for HunkRange {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl Hunk {
    pub fn new(header: &str, old_range: HunkRange, new_range: HunkRange) -> Self {
        Self {
            header: header.to_string(),
            old_range,
            new_range,
            changes: Vec::new(),
        }
    }

    pub fn add_change(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Text git appends after the closing `@@`, usually the enclosing function.
    pub fn section(&self) -> Option<&str> {
        let rest = self.header.strip_prefix("@@")?;
        let (_, section) = rest.split_once("@@")?;
        let section = section.trim();
        (!section.is_empty()).then_some(section)
    }
}

impl Change {
    pub fn added(content: &str, new_line_no: u32) -> Self {
        Change::Add {
            content: content.to_string(),
            new_line_no,
        }
    }

    pub fn removed(content: &str, old_line_no: u32) -> Self {
        Change::Del {
            content: content.to_string(),
            old_line_no,
        }
    }

    pub fn context(content: &str, old_line_no: u32, new_line_no: u32) -> Self {
        Change::Ctx {
            content: content.to_string(),
            old_line_no,
            new_line_no,
        }
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            Change::Add { .. } => ChangeKind::Add,
            Change::Del { .. } => ChangeKind::Del,
            Change::Ctx { .. } => ChangeKind::Ctx,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Change::Add { content, .. } | Change::Del { content, .. } | Change::Ctx { content, .. } => {
                content
            }
        }
    }

    pub fn old_line_no(&self) -> Option<u32> {
        match self {
            Change::Del { old_line_no, .. } | Change::Ctx { old_line_no, .. } => Some(*old_line_no),
            Change::Add { .. } => None,
        }
    }

    pub fn new_line_no(&self) -> Option<u32> {
        match self {
            Change::Add { new_line_no, .. } | Change::Ctx { new_line_no, .. } => Some(*new_line_no),
            Change::Del { .. } => None,
        }
    }
}
