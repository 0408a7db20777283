pub mod builder;
pub mod colors;
pub mod lanes;
pub mod layout;
pub mod metadata;

pub use builder::{CommitGraph, CommitNode, NodeId};
pub use colors::{Palette, DEFAULT_PALETTE};
pub use lanes::{BranchKeyResolver, BranchRules, LaneKey};
pub use layout::LayoutEngine;
pub use metadata::MetadataFormatter;

use tracing::debug;

use crate::git::{GraphError, LogParser};
use crate::models::HistoryView;
use crate::state::GraphConfig;

/// Full text-to-view pipeline: parse, build, lay out, describe.
///
/// Holds only immutable settings, so one instance can serve concurrent
/// rebuilds.
#[derive(Debug, Clone)]
pub struct HistoryBuilder {
    parser: LogParser,
    engine: LayoutEngine,
    metadata: MetadataFormatter,
}

impl HistoryBuilder {
    pub fn new(config: &GraphConfig) -> Result<Self, GraphError> {
        config.validate()?;
        Ok(Self {
            parser: LogParser::new(config.delimiter),
            engine: LayoutEngine::new(config)?,
            metadata: MetadataFormatter::new(
                config.short_hash_length,
                config.date_format.clone(),
                config.remote_names.clone(),
            )?,
        })
    }

    pub fn parser(&self) -> &LogParser {
        &self.parser
    }

    pub fn build(&self, text: &str) -> Result<HistoryView, GraphError> {
        self.build_cancellable(text, 0, || false)
    }

    /// Like [`build`](Self::build), but gives up with
    /// [`GraphError::Superseded`] as soon as `is_cancelled` reports true
    /// at a stage boundary.
    pub fn build_cancellable(
        &self,
        text: &str,
        generation: u64,
        is_cancelled: impl Fn() -> bool,
    ) -> Result<HistoryView, GraphError> {
        let checkpoint = || {
            if is_cancelled() {
                Err(GraphError::superseded(generation))
            } else {
                Ok(())
            }
        };

        let parsed = self.parser.parse(text);
        checkpoint()?;

        let graph = CommitGraph::build(parsed.records)?;
        checkpoint()?;

        let layout = self.engine.layout(&graph);
        checkpoint()?;

        let commits = graph.iter().map(|(_, node)| self.metadata.describe(node)).collect();

        debug!("Rebuild {} produced {} rows", generation, layout.len());
        Ok(HistoryView {
            generation,
            layout,
            commits,
            warnings: parsed.warnings,
            partial_history: graph.has_partial_history(),
        })
    }
}
