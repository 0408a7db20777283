use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

use crate::git::{ErrorReporter, GraphError, LogSource};
use crate::graph::HistoryBuilder;
use crate::models::HistoryView;
use crate::state::GraphConfig;

#[derive(Debug, Default)]
struct Published {
    view: Arc<HistoryView>,
    last_error: Option<String>,
}

/// Owns the currently displayed history and serializes rebuild requests.
///
/// Every request takes a fresh generation number. Only the newest request
/// may publish; older ones stop at the next stage boundary or are dropped
/// when they try to publish. A failed rebuild leaves the previous view in
/// place and records the error for the caller to surface.
#[derive(Debug, Clone)]
pub struct HistoryController {
    builder: Arc<HistoryBuilder>,
    generation: Arc<AtomicU64>,
    published: Arc<RwLock<Published>>,
}

impl HistoryController {
    pub fn new(config: &GraphConfig) -> Result<Self, GraphError> {
        Ok(Self {
            builder: Arc::new(HistoryBuilder::new(config)?),
            generation: Arc::new(AtomicU64::new(0)),
            published: Arc::new(RwLock::new(Published::default())),
        })
    }

    /// Currently published view; empty before the first successful rebuild.
    pub fn current(&self) -> Arc<HistoryView> {
        let published = self.published.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&published.view)
    }

    /// Message of the most recent failed rebuild, cleared by a successful one.
    pub fn last_error(&self) -> Option<String> {
        let published = self.published.read().unwrap_or_else(|e| e.into_inner());
        published.last_error.clone()
    }

    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Rebuild synchronously from already available text.
    pub fn rebuild_from_text(&self, text: &str) -> Result<Arc<HistoryView>, GraphError> {
        let generation = self.next_generation();
        let latest = Arc::clone(&self.generation);
        let result = self
            .builder
            .build_cancellable(text, generation, || latest.load(Ordering::SeqCst) != generation);
        self.publish(generation, result)
    }

    /// Fetch from `source`, then rebuild off the async runtime.
    pub async fn refresh<S: LogSource + ?Sized>(&self, source: &S) -> Result<Arc<HistoryView>, GraphError> {
        let generation = self.next_generation();
        info!("Refreshing history {} from {}", generation, source.describe());

        let text = match source.fetch_log().await {
            Ok(text) => text,
            Err(e) => return self.publish(generation, Err(e)),
        };

        if self.latest_generation() != generation {
            return self.publish(generation, Err(GraphError::superseded(generation)));
        }

        let builder = Arc::clone(&self.builder);
        let latest = Arc::clone(&self.generation);
        let result = tokio::task::spawn_blocking(move || {
            builder.build_cancellable(&text, generation, || latest.load(Ordering::SeqCst) != generation)
        })
        .await
        .map_err(GraphError::from)
        .and_then(|result| result);

        self.publish(generation, result)
    }

    /// Swap in the result of rebuild `generation` if it is still the newest.
    fn publish(
        &self,
        generation: u64,
        result: Result<HistoryView, GraphError>,
    ) -> Result<Arc<HistoryView>, GraphError> {
        let mut published = self.published.write().unwrap_or_else(|e| e.into_inner());

        // Checked under the write lock so a stale rebuild can never overwrite
        // a newer one that published first.
        if self.generation.load(Ordering::SeqCst) != generation {
            return Err(match result {
                Err(e @ GraphError::Superseded { .. }) => e,
                _ => GraphError::superseded(generation),
            });
        }

        match result {
            Ok(view) => {
                info!(
                    "Published history {}: {} commits, {} lanes",
                    generation,
                    view.layout.len(),
                    view.layout.lane_count
                );
                let view = Arc::new(view);
                published.view = Arc::clone(&view);
                published.last_error = None;
                Ok(view)
            }
            Err(e @ GraphError::Superseded { .. }) => Err(e),
            Err(e) => {
                ErrorReporter::log_error(&e, "history rebuild");
                warn!("Keeping history {} after failed rebuild", published.view.generation);
                published.last_error = Some(ErrorReporter::user_message(&e));
                Err(e)
            }
        }
    }
}
