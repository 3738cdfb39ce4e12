//! Application services

pub mod grouping;
pub mod menu;
pub mod toggle;

pub use grouping::{GroupSummary, GroupingEngine, HeaderIndex};
pub use menu::{InitReport, MenuService};
pub use toggle::{apply_state, controlled_selector, current_state, ToggleController};
