//! Viewer session: the single dispatcher all state changes go through.
//!
//! Propagation rules:
//! - locator edit: metadata is cleared, a debounced fetch is scheduled
//!   (or nothing, for a blank locator)
//! - metadata arrival/loss: the resolution is re-derived and the band
//!   selection clamped; the tile layer is *not* touched
//! - styling edit (colormap, band, min, max, nodata): the tile URL is
//!   re-synthesized and pushed immediately if the locator is non-blank
//! - show: push the tile URL, then fit the viewport to the raster bounds
//!
//! A command that leaves state unchanged triggers nothing.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use cog_client::MetadataSource;
use cog_common::{BoundingBox, Colormap, RasterMetadata, TilingScheme, ViewerError, ViewerResult};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::fetcher::{FetchOutcome, LocatorChange, MetadataFetcher, DEFAULT_DEBOUNCE};
use crate::map::{MapContext, MapHandle, Padding};
use crate::params::{BandType, RenderParameters};
use crate::resolver::{resolve, Resolution};
use crate::synthesizer::{synthesize, TileEndpoint};
use crate::viewport::{fit_viewport, FitOutcome};

/// Session-wide settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub endpoint: TileEndpoint,
    pub debounce: Duration,
    pub padding: Padding,
}

impl SessionConfig {
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            endpoint: TileEndpoint::new(service_url, TilingScheme::WebMercatorQuad),
            debounce: DEFAULT_DEBOUNCE,
            padding: Padding::default(),
        }
    }
}

/// A user action or query.
#[derive(Debug)]
pub enum ViewerCommand {
    SetLocator(String),
    SetBandType(BandType),
    SetBand(u32),
    SetColormap(Colormap),
    SetMin(Option<f64>),
    SetMax(Option<f64>),
    SetNodata(Option<f64>),
    Show,
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Shutdown,
}

/// Point-in-time copy of the session state.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub locator: String,
    pub metadata: Option<RasterMetadata>,
    pub params: RenderParameters,
    pub resolution: Resolution,
    pub tile_url: Option<String>,
    pub last_fit: Option<BoundingBox>,
    pub fetch_pending: bool,
}

pub struct ViewerSession<M: MapHandle, S: MetadataSource> {
    config: SessionConfig,
    locator: String,
    metadata: Option<RasterMetadata>,
    params: RenderParameters,
    resolution: Resolution,
    last_fit: Option<BoundingBox>,
    map: Option<MapContext<M>>,
    fetcher: MetadataFetcher<S>,
    outcomes: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl<M: MapHandle, S: MetadataSource> ViewerSession<M, S> {
    /// Start a session on `map`. The COG tile layer is created here, before
    /// any URL can be pushed to it.
    pub fn new(config: SessionConfig, map: M, source: Arc<S>) -> Self {
        let (fetcher, outcomes) = MetadataFetcher::new(source, config.debounce);
        let params = RenderParameters::default();
        let resolution = resolve(None, &params);

        Self {
            config,
            locator: String::new(),
            metadata: None,
            params,
            resolution,
            last_fit: None,
            map: Some(MapContext::attach(map)),
            fetcher,
            outcomes,
        }
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn metadata(&self) -> Option<&RasterMetadata> {
        self.metadata.as_ref()
    }

    pub fn params(&self) -> &RenderParameters {
        &self.params
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn map(&self) -> Option<&M> {
        self.map.as_ref().map(MapContext::map)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            locator: self.locator.clone(),
            metadata: self.metadata.clone(),
            params: self.params.clone(),
            resolution: self.resolution.clone(),
            tile_url: self
                .map
                .as_ref()
                .and_then(|ctx| ctx.current_url().map(str::to_string)),
            last_fit: self.last_fit,
            fetch_pending: self.fetcher.is_pending(),
        }
    }

    /// Apply one command. Breaks after shutdown.
    pub fn dispatch(&mut self, command: ViewerCommand) -> ControlFlow<()> {
        match command {
            ViewerCommand::SetLocator(locator) => self.set_locator(locator),
            ViewerCommand::SetBandType(band_type) => {
                if self.params.band_type != band_type {
                    debug!(?band_type, "Band type changed");
                    self.params.band_type = band_type;
                }
            }
            ViewerCommand::SetBand(band) => {
                let count = self.band_selection_count();
                self.edit_style(|p| {
                    p.selected_band = band;
                    match count {
                        Some(count) => {
                            p.clamp_band(count);
                        }
                        None => p.selected_band = band.max(1),
                    }
                })
            }
            ViewerCommand::SetColormap(colormap) => self.edit_style(|p| p.colormap = colormap),
            ViewerCommand::SetMin(value) => self.edit_style(|p| p.min_value = value),
            ViewerCommand::SetMax(value) => self.edit_style(|p| p.max_value = value),
            ViewerCommand::SetNodata(value) => self.edit_style(|p| p.nodata_value = value),
            ViewerCommand::Show => self.show(),
            ViewerCommand::Snapshot(reply) => {
                // Requester gone; nothing to report to
                let _ = reply.send(self.snapshot());
            }
            ViewerCommand::Shutdown => {
                self.shutdown();
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Apply a settled fetch, ignoring it if a newer locator superseded it.
    pub fn handle_fetch(&mut self, outcome: FetchOutcome) {
        if let Some(metadata) = self.fetcher.accept(outcome) {
            self.set_metadata(metadata);
        }
    }

    /// Wait for the next fetch to settle and apply it. Returns false when no
    /// fetch is outstanding, e.g. after a blank locator.
    pub async fn process_next_fetch(&mut self) -> bool {
        if !self.fetcher.is_pending() {
            // A finished task has already queued its outcome
            return match self.outcomes.try_recv() {
                Ok(outcome) => {
                    self.handle_fetch(outcome);
                    true
                }
                Err(_) => false,
            };
        }

        match self.outcomes.recv().await {
            Some(outcome) => {
                self.handle_fetch(outcome);
                true
            }
            None => false,
        }
    }

    /// Drive the session from a command channel until shutdown or until all
    /// senders are dropped. Returns the detached map.
    pub async fn run(mut self, mut commands: mpsc::Receiver<ViewerCommand>) -> Option<M> {
        loop {
            tokio::select! {
                command = commands.recv() => {
                    match command {
                        None | Some(ViewerCommand::Shutdown) => break,
                        Some(command) => {
                            if self.dispatch(command).is_break() {
                                break;
                            }
                        }
                    }
                }
                Some(outcome) = self.outcomes.recv() => self.handle_fetch(outcome),
            }
        }
        self.shutdown()
    }

    /// Run the session on its own task.
    pub fn spawn(self) -> (SessionHandle, JoinHandle<Option<M>>) {
        let (tx, rx) = mpsc::channel(64);
        let task = tokio::spawn(self.run(rx));
        (SessionHandle { tx }, task)
    }

    /// Cancel pending fetches and detach the map. Idempotent.
    pub fn shutdown(&mut self) -> Option<M> {
        self.fetcher.shutdown();
        let map = self.map.take().map(MapContext::detach);
        if map.is_some() {
            info!("Viewer session shut down");
        }
        map
    }

    fn set_locator(&mut self, locator: String) {
        if locator == self.locator {
            return;
        }
        self.locator = locator;

        // Metadata for the previous locator is never shown for the new one
        self.set_metadata(None);

        match self.fetcher.locator_changed(&self.locator) {
            LocatorChange::Cleared => debug!("Locator blank; no metadata"),
            LocatorChange::Scheduled { generation } => {
                debug!(generation, locator = %self.locator, "Scheduled raster info fetch")
            }
        }
    }

    fn set_metadata(&mut self, metadata: Option<RasterMetadata>) {
        if self.metadata == metadata {
            return;
        }
        self.metadata = metadata;

        if let Some(count) = self.band_selection_count() {
            let previous = self.params.selected_band;
            if self.params.clamp_band(count) {
                debug!(
                    previous,
                    band = self.params.selected_band,
                    count,
                    "Clamped band selection to new raster"
                );
            }
        }

        self.resolution = resolve(self.metadata.as_ref(), &self.params);
        debug!(resolution = ?self.resolution, "Metadata changed");
    }

    fn edit_style(&mut self, edit: impl FnOnce(&mut RenderParameters)) {
        let before = self.params.clone();
        edit(&mut self.params);
        if self.params == before {
            return;
        }

        self.resolution = resolve(self.metadata.as_ref(), &self.params);
        if self.locator.trim().is_empty() {
            debug!("Styling changed with blank locator; tile source untouched");
            return;
        }
        self.apply_tile_source();
    }

    fn show(&mut self) {
        self.apply_tile_source();

        let Some(ctx) = self.map.as_mut() else {
            return;
        };
        match fit_viewport(ctx, self.metadata.as_ref(), self.config.padding) {
            FitOutcome::Fitted(extent) => self.last_fit = Some(extent),
            FitOutcome::NoBounds => debug!("No raster bounds; viewport unchanged"),
            FitOutcome::Skipped(_) => {}
        }
    }

    fn apply_tile_source(&mut self) -> bool {
        let Some(ctx) = self.map.as_mut() else {
            return false;
        };
        match synthesize(&self.config.endpoint, &self.locator, &self.resolution) {
            Some(template) => ctx.apply_tile_url(&template),
            None => {
                debug!("Nothing to render; tile source untouched");
                false
            }
        }
    }

    /// Band count when band selection applies (multi-band, non-RGB).
    fn band_selection_count(&self) -> Option<u32> {
        self.metadata
            .as_ref()
            .map(|m| m.count)
            .filter(|&count| count > 1 && count != 3)
    }
}

impl<M: MapHandle, S: MetadataSource> Drop for ViewerSession<M, S> {
    fn drop(&mut self) {
        if let Some(ctx) = self.map.take() {
            ctx.detach();
        }
    }
}

/// Cloneable sender for a spawned session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<ViewerCommand>,
}

impl SessionHandle {
    pub async fn send(&self, command: ViewerCommand) -> ViewerResult<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| ViewerError::InternalError("viewer session closed".to_string()))
    }

    pub async fn set_locator(&self, locator: impl Into<String>) -> ViewerResult<()> {
        self.send(ViewerCommand::SetLocator(locator.into())).await
    }

    pub async fn show(&self) -> ViewerResult<()> {
        self.send(ViewerCommand::Show).await
    }

    pub async fn snapshot(&self) -> ViewerResult<SessionSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(ViewerCommand::Snapshot(reply)).await?;
        rx.await
            .map_err(|_| ViewerError::InternalError("viewer session closed".to_string()))
    }

    pub async fn shutdown(&self) -> ViewerResult<()> {
        self.send(ViewerCommand::Shutdown).await
    }
}
