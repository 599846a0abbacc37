//! In-memory stand-ins for the metadata service and the map engine.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cog_client::MetadataSource;
use cog_common::{BoundingBox, RasterMetadata, ViewerError, ViewerResult};
use viewer::{LayerId, MapHandle, Padding};

/// Metadata source answering from a fixed table.
///
/// Unknown locators fail like a 404 from the service. Every request is
/// recorded; an optional per-locator delay simulates slow responses.
#[derive(Clone, Default)]
pub struct StaticMetadataSource {
    responses: Arc<Mutex<HashMap<String, RasterMetadata>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StaticMetadataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, locator: &str, metadata: RasterMetadata) -> Self {
        self.insert(locator, metadata);
        self
    }

    pub fn with_delay(self, locator: &str, delay: Duration) -> Self {
        lock(&self.delays).insert(locator.to_string(), delay);
        self
    }

    pub fn insert(&self, locator: &str, metadata: RasterMetadata) {
        lock(&self.responses).insert(locator.to_string(), metadata);
    }

    /// Locators requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait]
impl MetadataSource for StaticMetadataSource {
    async fn fetch_info(&self, locator: &str) -> ViewerResult<RasterMetadata> {
        lock(&self.requests).push(locator.to_string());

        let delay = lock(&self.delays).get(locator).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = lock(&self.responses).get(locator).cloned();
        response.ok_or_else(|| ViewerError::ServiceStatus {
            status: 404,
            detail: format!("{} not found", locator),
        })
    }
}

/// A call made on a [`RecordingMap`].
#[derive(Debug, Clone, PartialEq)]
pub enum MapCall {
    AddTileLayer(LayerId),
    SetLayerUrl(LayerId, String),
    FitExtent(BoundingBox, Padding),
    Detach,
}

/// Map handle that records calls into a shared log.
#[derive(Clone, Default)]
pub struct RecordingMap {
    calls: Arc<Mutex<Vec<MapCall>>>,
    next_layer: u32,
}

impl RecordingMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<MapCall> {
        lock(&self.calls).clone()
    }

    /// URLs pushed to any layer, in order.
    pub fn urls(&self) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| match c {
                MapCall::SetLayerUrl(_, url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_url(&self) -> Option<String> {
        self.urls().pop()
    }

    /// Extents the view was fit to, in order.
    pub fn fits(&self) -> Vec<BoundingBox> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| match c {
                MapCall::FitExtent(extent, _) => Some(*extent),
                _ => None,
            })
            .collect()
    }

    pub fn is_detached(&self) -> bool {
        lock(&self.calls).contains(&MapCall::Detach)
    }
}

impl MapHandle for RecordingMap {
    fn add_tile_layer(&mut self) -> LayerId {
        self.next_layer += 1;
        let layer = LayerId(self.next_layer);
        lock(&self.calls).push(MapCall::AddTileLayer(layer));
        layer
    }

    fn set_layer_url(&mut self, layer: LayerId, url: &str) {
        lock(&self.calls).push(MapCall::SetLayerUrl(layer, url.to_string()));
    }

    fn fit_extent(&mut self, extent: BoundingBox, padding: Padding) {
        lock(&self.calls).push(MapCall::FitExtent(extent, padding));
    }

    fn detach(&mut self) {
        lock(&self.calls).push(MapCall::Detach);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
