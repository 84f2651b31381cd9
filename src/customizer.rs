//! Customizer - wires access, resolver, loader, catalog and editor together.
//!
//! ## Load flow
//!
//! ```text
//! load_background(id) -> resolve -> fetch -> decode   (worker thread)
//!                                              |
//! pump() <-------------------------------------+      (owning thread)
//!   request still the latest?  -> set background, clear layers
//!   otherwise                   -> StaleLoadDiscarded
//! ```
//!
//! Asset loads are tagged with the scene generation instead of a request id:
//! a layer decoded for an older background is dropped rather than placed on
//! the new one. Nothing touches the scene until a decode has succeeded, so a
//! failed load always leaves the last good scene on screen.

use crate::access::{AccessGate, AccessSignal};
use crate::background::{BackgroundExecutor, Completed};
use crate::catalog::AssetCatalog;
use crate::constants::RELAY_BIND_ADDR;
use crate::editor::Editor;
use crate::error::{Error, Result};
use crate::export::{export_file_name, export_png, save_png};
use crate::geometry::{Point, Rect};
use crate::loader::{AssetLoader, DecodedImage, Fetch, HttpFetcher, ImageSource};
use crate::observe::{EditorEvent, SceneObserver, TracingObserver};
use crate::relay::RelayServer;
use crate::resolver::{BackgroundResolver, MetadataResolver};
use crate::scene::{AddLayerOutcome, DefaultPlacement};
use crate::settings::Settings;
use serde::Serialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// User-facing outcome of an asynchronous action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum Notice {
    BackgroundLoaded {
        identifier: Option<String>,
        display_name: Option<String>,
    },
    LayerAdded {
        asset_id: String,
    },
    AlreadyPresent {
        asset_id: String,
    },
    Failed {
        message: String,
    },
}

/// A finished export.
#[derive(Debug, Clone, PartialEq)]
pub struct Exported {
    pub file_name: String,
    pub png: Vec<u8>,
}

/// Where the current background came from, for reset and export naming.
#[derive(Debug, Clone)]
struct BackgroundOrigin {
    identifier: Option<String>,
    source: ImageSource,
}

/// Payload handed back by loader tasks.
enum LoadOutcome {
    Background {
        request: u64,
        identifier: Option<String>,
        result: Result<(ImageSource, Option<String>, DecodedImage)>,
    },
    Asset {
        generation: u64,
        asset_id: String,
        display_name: String,
        placement: DefaultPlacement,
        result: Result<DecodedImage>,
    },
}

pub struct Customizer {
    editor: Editor,
    loader: AssetLoader,
    executor: BackgroundExecutor<LoadOutcome>,
    gate: AccessGate,
    catalog: AssetCatalog,
    settings: Settings,
    resolver: Option<Arc<dyn BackgroundResolver>>,
    latest_request: u64,
    background: Option<BackgroundOrigin>,
    selected_asset: Option<String>,
    /// Asset id -> scene generation it was requested under
    in_flight: HashMap<String, u64>,
    notices: Vec<Notice>,
    /// Relay started by `from_settings`. Stays declared after `executor`.
    relay: Option<RelayServer>,
}

impl Customizer {
    pub fn new(settings: Settings, loader: AssetLoader, catalog: AssetCatalog, observer: Arc<dyn SceneObserver>) -> Self {
        let gate = AccessGate::new(settings.minimum_balance, settings.token_decimals);
        let mut editor = Editor::new(settings.canvas_size(), observer);
        editor.set_access_granted(gate.is_granted());

        Self {
            editor,
            loader,
            executor: BackgroundExecutor::new(settings.loader_threads),
            gate,
            catalog,
            settings,
            resolver: None,
            latest_request: 0,
            background: None,
            selected_asset: None,
            in_flight: HashMap::new(),
            notices: Vec::new(),
            relay: None,
        }
    }

    /// Production wiring: HTTP fetcher, relay, optional metadata resolver,
    /// catalog from settings, tracing observer.
    ///
    /// Without a configured `relay_endpoint` a relay is started on a loopback
    /// port and lives as long as the customizer.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let fetcher: Arc<dyn Fetch> = Arc::new(HttpFetcher::new(settings.app_origin.clone())?);
        let (relay, endpoint) = match settings.relay_endpoint {
            Some(ref endpoint) => (None, endpoint.clone()),
            None => {
                let relay = RelayServer::start(RELAY_BIND_ADDR, Arc::clone(&fetcher))?;
                let endpoint = relay.endpoint();
                info!(endpoint = %endpoint, "Started local image relay");
                (Some(relay), endpoint)
            }
        };
        let loader = AssetLoader::new(fetcher, settings.app_origin.clone()).with_relay(Some(endpoint));
        let catalog = match settings.catalog_path {
            Some(ref path) => AssetCatalog::load_from(path)?,
            None => AssetCatalog::builtin("assets"),
        };
        let resolver = match settings.metadata_endpoint {
            Some(ref endpoint) => Some(Arc::new(MetadataResolver::new(
                endpoint.clone(),
                settings.metadata_api_key.clone(),
            )?) as Arc<dyn BackgroundResolver>),
            None => None,
        };

        let mut customizer = Self::new(settings, loader, catalog, Arc::new(TracingObserver));
        customizer.resolver = resolver;
        customizer.relay = relay;
        Ok(customizer)
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn BackgroundResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_access_gate(mut self, gate: AccessGate) -> Self {
        self.editor.set_access_granted(gate.is_granted());
        self.gate = gate;
        self
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    /// Address of the relay this customizer started, if any.
    pub fn local_relay(&self) -> Option<SocketAddr> {
        self.relay.as_ref().map(RelayServer::addr)
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn access(&self) -> &AccessGate {
        &self.gate
    }

    /// Re-evaluate access from a fresh wallet snapshot.
    pub fn refresh_access(&mut self, signal: AccessSignal) -> bool {
        let granted = self.gate.refresh(signal);
        self.editor.set_access_granted(granted);
        granted
    }

    /// Asset the UI shows as selected in its asset list.
    pub fn selected_asset(&self) -> Option<&str> {
        self.selected_asset.as_deref()
    }

    /// Identifier of the loaded background, if it came from one.
    pub fn background_identifier(&self) -> Option<&str> {
        self.background.as_ref().and_then(|origin| origin.identifier.as_deref())
    }

    pub fn set_bounding_box(&mut self, bounding_box: Rect) {
        self.editor.set_bounding_box(bounding_box);
    }

    fn require_access(&self) -> Result<()> {
        if self.gate.is_granted() {
            Ok(())
        } else {
            Err(Error::AccessDenied)
        }
    }

    /// Resolve `identifier` and load its image as the new background.
    pub fn load_background(&mut self, identifier: &str) -> Result<()> {
        self.require_access()?;
        let identifier = identifier.trim().to_string();
        if identifier.is_empty() {
            return Err(Error::NotFound { identifier });
        }
        let resolver = self
            .resolver
            .clone()
            .ok_or_else(|| Error::Fetch("No background resolver configured".to_string()))?;

        let request = self.next_request();
        let loader = self.loader.clone();
        let task_identifier = identifier.clone();
        self.executor.spawn(&format!("background {}", identifier), move || {
            let result = resolver.resolve(&task_identifier).and_then(|metadata| {
                let source = ImageSource::Url(metadata.image_url);
                let image = loader.load_blocking(&source)?;
                Ok((source, Some(metadata.display_name), image))
            });
            LoadOutcome::Background {
                request,
                identifier: Some(task_identifier),
                result,
            }
        });
        Ok(())
    }

    /// Load a background straight from `source`, skipping the resolver.
    pub fn load_background_source(&mut self, source: ImageSource, identifier: Option<&str>) -> Result<()> {
        self.require_access()?;
        self.spawn_background(source, identifier.map(str::to_string));
        Ok(())
    }

    /// Reload the current background from where it came from. Layers and
    /// selection are cleared once the reload decodes.
    pub fn reset(&mut self) -> Result<()> {
        self.require_access()?;
        let origin = self.background.clone().ok_or(Error::NoBackground)?;
        self.spawn_background(origin.source, origin.identifier);
        Ok(())
    }

    fn spawn_background(&mut self, source: ImageSource, identifier: Option<String>) {
        let request = self.next_request();
        let task_source = source.clone();
        self.loader.spawn_load(&self.executor, source, move |result| LoadOutcome::Background {
            request,
            identifier,
            result: result.map(|image| (task_source, None, image)),
        });
    }

    fn next_request(&mut self) -> u64 {
        self.latest_request += 1;
        self.latest_request
    }

    /// Place a catalog asset with its default placement.
    pub fn add_asset(&mut self, asset_id: &str) -> Result<()> {
        self.require_access()?;
        if !self.editor.scene().has_background() {
            return Err(Error::NoBackground);
        }
        let asset = self.catalog.get(asset_id).ok_or_else(|| Error::UnknownAsset {
            asset_id: asset_id.to_string(),
        })?;

        let generation = self.editor.scene().generation();
        if self.editor.scene().contains_asset(asset_id) || self.in_flight.get(asset_id) == Some(&generation) {
            self.notices.push(Notice::AlreadyPresent {
                asset_id: asset_id.to_string(),
            });
            return Ok(());
        }

        let source = ImageSource::File(self.catalog.image_path(asset));
        let (task_id, display_name, placement) =
            (asset.id.clone(), asset.display_name.clone(), asset.default_placement);
        self.in_flight.insert(task_id.clone(), generation);
        self.loader.spawn_load(&self.executor, source, move |result| LoadOutcome::Asset {
            generation,
            asset_id: task_id,
            display_name,
            placement,
            result,
        });
        Ok(())
    }

    /// Remove a placed asset. Returns false when it was not on the canvas.
    pub fn remove_asset(&mut self, asset_id: &str) -> Result<bool> {
        self.require_access()?;
        let removed = self.editor.remove_layer(asset_id);
        if self.selected_asset.as_deref() == Some(asset_id) {
            self.selected_asset = None;
        }
        Ok(removed)
    }

    /// Drop every layer, keeping the background.
    pub fn clear(&mut self) -> Result<()> {
        self.require_access()?;
        self.editor.clear();
        self.selected_asset = None;
        Ok(())
    }

    pub fn pointer_down(&mut self, client: Point) {
        self.editor.pointer_down(client);
    }

    pub fn pointer_move(&mut self, client: Point) {
        self.editor.pointer_move(client);
    }

    pub fn pointer_up(&mut self, client: Point) {
        self.editor.pointer_up(client);
    }

    pub fn pointer_leave(&mut self) {
        self.editor.pointer_leave();
    }

    /// Loads still running.
    pub fn pending_loads(&self) -> usize {
        self.executor.pending_count()
    }

    /// Apply every load that has finished. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let finished = self.executor.process_results();
        let count = finished.len();
        for completed in finished {
            self.apply(completed);
        }
        count
    }

    /// Block until in-flight loads settle or `timeout` passes, applying them.
    pub fn wait_idle(&mut self, timeout: Duration) -> usize {
        let finished = self.executor.wait_for_all(timeout);
        let count = finished.len();
        for completed in finished {
            self.apply(completed);
        }
        count
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn apply(&mut self, completed: Completed<LoadOutcome>) {
        let Completed { name, result, elapsed } = completed;
        debug!(task = %name, elapsed_ms = elapsed.as_secs_f64() * 1000.0, "Load finished");

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(panic) => {
                warn!(task = %name, "Load task panicked: {}", panic);
                self.notices.push(Notice::Failed { message: panic });
                return;
            }
        };

        match outcome {
            LoadOutcome::Background {
                request,
                identifier,
                result,
            } => {
                if request != self.latest_request {
                    self.editor.emit(EditorEvent::StaleLoadDiscarded { task: name });
                    return;
                }
                match result {
                    Ok((source, display_name, image)) => {
                        self.editor.set_background(image);
                        self.selected_asset = None;
                        self.in_flight.clear();
                        info!(identifier = ?identifier, source = %source.describe(), "Background loaded");
                        self.background = Some(BackgroundOrigin {
                            identifier: identifier.clone(),
                            source,
                        });
                        self.notices.push(Notice::BackgroundLoaded {
                            identifier,
                            display_name,
                        });
                    }
                    Err(e) => self.fail(&name, e),
                }
            }
            LoadOutcome::Asset {
                generation,
                asset_id,
                display_name,
                placement,
                result,
            } => {
                if self.in_flight.get(&asset_id) == Some(&generation) {
                    self.in_flight.remove(&asset_id);
                }
                if generation != self.editor.scene().generation() {
                    self.editor.emit(EditorEvent::StaleLoadDiscarded { task: name });
                    return;
                }
                match result {
                    Ok(image) => match self.editor.add_layer(&asset_id, &display_name, image, placement) {
                        AddLayerOutcome::Added(_) => {
                            self.selected_asset = Some(asset_id.clone());
                            self.notices.push(Notice::LayerAdded { asset_id });
                        }
                        AddLayerOutcome::AlreadyPresent(_) => {
                            self.notices.push(Notice::AlreadyPresent { asset_id });
                        }
                    },
                    Err(e) => self.fail(&name, e),
                }
            }
        }
    }

    fn fail(&mut self, task: &str, error: Error) {
        warn!(task = %task, "Load failed: {}", error);
        self.notices.push(Notice::Failed {
            message: error.to_string(),
        });
    }

    /// Flatten the canvas to PNG, named after the background identifier.
    pub fn export(&mut self) -> Result<Exported> {
        let png = export_png(&mut self.editor)?;
        let file_name = export_file_name(&self.settings.export_prefix, self.background_identifier());
        Ok(Exported { file_name, png })
    }

    /// Export and write the PNG into `dir`.
    pub fn save(&mut self, dir: &Path) -> Result<PathBuf> {
        let exported = self.export()?;
        save_png(dir, &exported.file_name, &exported.png)
    }
}
