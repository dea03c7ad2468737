pub mod board;
pub mod check;
pub mod filter;
pub mod ordering;
pub mod outline;
pub mod timeline;

pub use board::{board_columns, board_stats, board_view, plan_column_removal, resolve_drop};
pub use check::check_snapshot;
pub use filter::filter_tasks;
pub use ordering::{plan_reorder, sort_tasks};
pub use outline::{outline_rows, toggle_expanded};
pub use timeline::project_timeline;
