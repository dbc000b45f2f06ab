pub mod diff_utils;
pub mod render_ui;
pub mod side_by_side_diff;
pub mod stat_summary;
pub mod unified_diff;
