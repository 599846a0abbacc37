//! Debounced metadata fetching.
//!
//! Every locator edit bumps a generation counter and aborts the pending
//! timer/request. A fetch only starts after the locator has been quiet for
//! the debounce period, and its outcome is accepted only if its generation is
//! still current, so a late response for an old locator can never overwrite
//! fresher state.

use std::sync::Arc;
use std::time::Duration;

use cog_client::MetadataSource;
use cog_common::{RasterMetadata, ViewerResult};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Quiet period before a locator edit triggers a request.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Result of one settled fetch, tagged with the generation that issued it.
#[derive(Debug)]
pub struct FetchOutcome {
    pub generation: u64,
    pub locator: String,
    pub result: ViewerResult<RasterMetadata>,
}

/// What a locator edit did to the fetch pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorChange {
    /// Blank locator: metadata is absent right away, nothing is requested.
    Cleared,
    /// A request is scheduled after the debounce period.
    Scheduled { generation: u64 },
}

pub struct MetadataFetcher<S: MetadataSource> {
    source: Arc<S>,
    debounce: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<FetchOutcome>,
}

impl<S: MetadataSource> MetadataFetcher<S> {
    /// Create a fetcher and the channel its outcomes arrive on.
    pub fn new(
        source: Arc<S>,
        debounce: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<FetchOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let fetcher = Self {
            source,
            debounce,
            generation: 0,
            pending: None,
            tx,
        };
        (fetcher, rx)
    }

    /// Whether a timer or request is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// React to a new locator value. Must be called within a tokio runtime.
    pub fn locator_changed(&mut self, locator: &str) -> LocatorChange {
        self.cancel_pending();
        self.generation += 1;

        if locator.trim().is_empty() {
            debug!(generation = self.generation, "Locator cleared");
            return LocatorChange::Cleared;
        }

        let generation = self.generation;
        let locator = locator.to_string();
        let source = Arc::clone(&self.source);
        let debounce = self.debounce;
        let tx = self.tx.clone();

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            debug!(generation, locator = %locator, "Fetching raster info");
            let result = source.fetch_info(&locator).await;
            // Receiver gone means the session is shutting down
            let _ = tx.send(FetchOutcome {
                generation,
                locator,
                result,
            });
        }));

        LocatorChange::Scheduled { generation }
    }

    /// Turn an outcome into a metadata update.
    ///
    /// `None` for a superseded outcome (ignore it). Otherwise the new
    /// metadata state: a failed fetch collapses to no metadata.
    pub fn accept(&self, outcome: FetchOutcome) -> Option<Option<RasterMetadata>> {
        if outcome.generation != self.generation {
            debug!(
                generation = outcome.generation,
                current = self.generation,
                locator = %outcome.locator,
                "Discarding stale raster info"
            );
            return None;
        }

        match outcome.result {
            Ok(metadata) => Some(Some(metadata)),
            Err(e) => {
                warn!(locator = %outcome.locator, error = %e, "Failed to fetch raster info");
                Some(None)
            }
        }
    }

    /// Abort any pending timer or request.
    pub fn shutdown(&mut self) {
        self.cancel_pending();
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<S: MetadataSource> Drop for MetadataFetcher<S> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
