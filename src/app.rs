use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use diffscape_engine::{ParsedDiff, parse_diff};

use crate::{config::ViewOptions, ui::render_ui::render};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffSource {
    Stdin,
    Path(PathBuf),
}

pub struct App {
    pub diff: ParsedDiff,
    pub options: ViewOptions,
}

impl DiffSource {
    /// No path, or `-`, means stdin.
    pub fn from_arg(path: Option<&Path>) -> Self {
        match path {
            Some(path) if path != Path::new("-") => DiffSource::Path(path.to_path_buf()),
            _ => DiffSource::Stdin,
        }
    }
}

impl App {
    pub fn new(options: ViewOptions) -> Self {
        Self {
            diff: ParsedDiff::default(),
            options,
        }
    }

    pub fn load_diff(&mut self, source: &DiffSource) -> Result<()> {
        let bytes = match source {
            DiffSource::Stdin => {
                let mut buf = Vec::new();
                io::stdin()
                    .lock()
                    .read_to_end(&mut buf)
                    .context("failed to read diff from stdin")?;
                buf
            }
            DiffSource::Path(path) => fs::read(path)
                .with_context(|| format!("failed to read diff from {}", path.display()))?,
        };

        let diff_text = String::from_utf8_lossy(&bytes);
        self.load_str(&diff_text);

        Ok(())
    }

    pub fn load_str(&mut self, diff_text: &str) {
        self.diff = parse_diff(diff_text);
        log::info!(
            "loaded {} files, +{} -{}",
            self.diff.stats.files_changed,
            self.diff.stats.additions,
            self.diff.stats.deletions
        );
    }

    pub fn render<W: Write>(&self, out: &mut W) -> Result<()> {
        render(out, &self.diff, &self.options)?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewMode;

    const DIFF: &str = "diff --git a/foo.txt b/foo.txt
--- a/foo.txt
+++ b/foo.txt
@@ -1,2 +1,2 @@
-hello world
+hello there
 unchanged
";

    fn options(mode: ViewMode) -> ViewOptions {
        ViewOptions {
            mode,
            color: false,
            word_diff_max_len: 2000,
            width: 120,
        }
    }

    #[test]
    fn test_source_from_arg() {
        assert_eq!(DiffSource::from_arg(None), DiffSource::Stdin);
        assert_eq!(DiffSource::from_arg(Some(Path::new("-"))), DiffSource::Stdin);
        assert_eq!(
            DiffSource::from_arg(Some(Path::new("x.diff"))),
            DiffSource::Path(PathBuf::from("x.diff"))
        );
    }

    #[test]
    fn test_missing_file_reports_path() {
        let mut app = App::new(options(ViewMode::Unified));
        let err = app
            .load_diff(&DiffSource::Path(PathBuf::from("/nonexistent/change.diff")))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/change.diff"));
    }

    #[test]
    fn test_load_and_render_stat() {
        let mut app = App::new(options(ViewMode::Stat));
        app.load_str(DIFF);

        let mut out = Vec::new();
        app.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("foo.txt | 2 +-"));
        assert!(text.contains("1 file changed, 1 insertion(+), 1 deletion(-)"));
    }
}
