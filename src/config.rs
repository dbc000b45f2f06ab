use std::io;

use clap::ValueEnum;
use crossterm::tty::IsTty;

/// Narrowest terminal that still gets a side-by-side view.
pub const MIN_SPLIT_WIDTH: u16 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Unified,
    Split,
    Stat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    pub mode: ViewMode,
    pub color: bool,
    pub word_diff_max_len: usize,
    pub width: u16,
}

impl ViewMode {
    /// Split view needs room for two panels; narrower terminals get unified.
    pub fn resolve(self, width: u16) -> Self {
        match self {
            ViewMode::Split if width < MIN_SPLIT_WIDTH => {
                log::info!("terminal is {width} columns wide, using unified view");
                ViewMode::Unified
            }
            mode => mode,
        }
    }
}

impl ColorChoice {
    pub fn enabled(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::env::var_os("NO_COLOR").is_none() && io::stdout().is_tty(),
        }
    }
}

pub fn terminal_width() -> u16 {
    crossterm::terminal::size()
        .map(|(width, _)| width)
        .unwrap_or(MIN_SPLIT_WIDTH)
}
