use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use diffscape_engine::word_diff::DEFAULT_WORD_DIFF_MAX_LEN;

use crate::{
    app::{App, DiffSource},
    config::{ColorChoice, ViewMode, ViewOptions, terminal_width},
};

mod app;
mod config;
mod ui;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Diff file to read (e.g. the output of `git diff > change.diff`); stdin when absent or "-"
    file: Option<PathBuf>,

    /// Show old and new side by side (needs at least 120 columns)
    #[arg(short, long)]
    split: bool,

    /// Only list changed files with their insertion/deletion counts
    #[arg(long, conflicts_with = "split")]
    stat: bool,

    /// When to colour the output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Skip word highlighting for lines longer than this many characters
    #[arg(long, default_value_t = DEFAULT_WORD_DIFF_MAX_LEN)]
    word_diff_max_len: usize,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn view_options(&self) -> ViewOptions {
        let mode = if self.stat {
            ViewMode::Stat
        } else if self.split {
            ViewMode::Split
        } else {
            ViewMode::Unified
        };

        ViewOptions {
            mode,
            color: self.color.enabled(),
            word_diff_max_len: self.word_diff_max_len,
            width: terminal_width(),
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut app = App::new(args.view_options());
    app.load_diff(&DiffSource::from_arg(args.file.as_deref()))?;

    let res = app.render(&mut io::stdout().lock());

    // Piping into `head` closes stdout early; that is not a failure.
    match res {
        Err(err)
            if err
                .downcast_ref::<io::Error>()
                .is_some_and(|err| err.kind() == io::ErrorKind::BrokenPipe) =>
        {
            Ok(())
        }
        res => res,
    }
}
