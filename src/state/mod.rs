pub mod config;
pub mod history;

pub use config::{GraphConfig, DEFAULT_PRIMARY_BRANCH_PATTERN};
pub use history::HistoryController;
