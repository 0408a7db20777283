//! # gitk-graph
//!
//! Commit graph construction and lane layout for Git history browsers.
//!
//! Raw `git log` output goes in; a [`HistoryView`] comes out: one row per
//! commit, a lane and column for every row, colored connectors for every
//! parent edge, and display metadata (short hash, date, refs) for each commit.
//!
//! ## Architecture
//!
//! - [`git`] - log parsing, ref decorations, log sources and errors
//! - [`graph`] - the commit DAG, lane keys, colors and the layout engine
//! - [`models`] - plain data types shared with renderers
//! - [`state`] - configuration and the [`HistoryController`]
//!
//! ## Example
//!
//! ```rust
//! use gitk_graph::{GraphConfig, HistoryBuilder};
//!
//! # fn main() -> Result<(), gitk_graph::GraphError> {
//! let config = GraphConfig { delimiter: '|', ..GraphConfig::default() };
//! let builder = HistoryBuilder::new(&config)?;
//!
//! let view = builder.build("b|a|bob|200|Add feature|HEAD -> main\na||alice|100|Initial commit|")?;
//! assert_eq!(view.layout.len(), 2);
//! assert_eq!(view.layout.connectors.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod git;
pub mod graph;
pub mod models;
pub mod state;

pub use git::{GraphError, LogSource, ParseWarning};
pub use graph::{CommitGraph, HistoryBuilder, LayoutEngine};
pub use models::{CommitRecord, GraphLayout, HistoryView};
pub use state::{GraphConfig, HistoryController};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
