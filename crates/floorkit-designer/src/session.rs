//! Editor session: one store, one controller, one repository.
//!
//! A session replaces process-wide editor state. Several sessions can run
//! side by side (e.g. in tests) without sharing anything but an optional
//! event bus.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use floorkit_core::{EditorEvent, EventBus, LayoutEvent, Notification, Result};
use floorkit_settings::EditorConfig;

use crate::interaction::{ElementDetails, InteractionController, InteractionEvent};
use crate::layout::Layout;
use crate::layout_store::LayoutStore;
use crate::model::Point;
use crate::persistence::{LayoutBackend, LayoutRepository};
use crate::reconciliation::{LeasingPosition, PositionRecord, PositionStore, ReconciliationBridge};
use crate::renderer::{encode_png, render_layout, RasterRenderer, RenderError};
use crate::svg_renderer::SvgRenderer;

pub struct EditorSession<B: LayoutBackend> {
    config: EditorConfig,
    store: LayoutStore,
    controller: InteractionController,
    repository: LayoutRepository<B>,
    bridge: ReconciliationBridge,
    events: Option<Arc<EventBus>>,
}

impl<B: LayoutBackend> EditorSession<B> {
    pub fn new(config: EditorConfig, backend: B) -> Self {
        Self {
            store: LayoutStore::with_max_depth(config.history.max_depth),
            controller: InteractionController::from_config(&config),
            repository: LayoutRepository::configured(backend, &config),
            bridge: ReconciliationBridge::from_config(&config),
            events: None,
            config,
        }
    }

    /// Publish layout events and toasts on `bus`
    pub fn with_events(mut self, bus: Arc<EventBus>) -> Self {
        self.bridge = ReconciliationBridge::from_config(&self.config).with_events(bus.clone());
        self.events = Some(bus);
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &LayoutStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LayoutStore {
        &mut self.store
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut InteractionController {
        &mut self.controller
    }

    pub fn repository_mut(&mut self) -> &mut LayoutRepository<B> {
        &mut self.repository
    }

    pub fn bridge(&self) -> &ReconciliationBridge {
        &self.bridge
    }

    /// Load the layout of a store into the editor.
    ///
    /// Returns false and leaves the editor untouched when the store has no
    /// layout; the host then offers [`Self::create_store_layout`].
    pub async fn open_store_layout(&mut self, object_id: &str) -> Result<bool> {
        match self.repository.get_layout_by_object_id(object_id).await? {
            Some(layout) => {
                self.publish(LayoutEvent::Loaded {
                    layout_id: layout.id.clone(),
                    element_count: layout.elements.len(),
                });
                self.store.load(Some(layout));
                Ok(true)
            }
            None => {
                tracing::info!("No layout for store {}", object_id);
                self.publish(LayoutEvent::NotFound {
                    object_id: object_id.to_string(),
                });
                Ok(false)
            }
        }
    }

    /// Load a layout by its own id
    pub async fn open_layout(&mut self, id: &str) -> Result<bool> {
        match self.repository.get_layout_by_id(id).await? {
            Some(layout) => {
                self.publish(LayoutEvent::Loaded {
                    layout_id: layout.id.clone(),
                    element_count: layout.elements.len(),
                });
                self.store.load(Some(layout));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Create, persist and open an empty layout for a store
    pub async fn create_store_layout(&mut self, object_id: &str, name: &str) -> Result<()> {
        let layout = self
            .repository
            .create_layout_for_store(object_id, name)
            .await?;
        self.publish(LayoutEvent::Loaded {
            layout_id: layout.id.clone(),
            element_count: 0,
        });
        self.store.load(Some(layout));
        Ok(())
    }

    /// Persist the active layout.
    ///
    /// On failure the edits stay in the store, still flagged as modified,
    /// and an error toast is published.
    pub async fn save(&mut self) -> Result<Layout> {
        let layout = self.store.layout().clone();
        match self.repository.save_layout(&layout).await {
            Ok(saved) => {
                self.store.mark_saved(&saved);
                self.publish(LayoutEvent::Saved {
                    layout_id: saved.id.clone(),
                });
                self.toast(Notification::success(format!("Saved '{}'", saved.name)));
                Ok(saved)
            }
            Err(e) => {
                tracing::warn!("Saving layout '{}' failed: {}", layout.name, e);
                self.publish(LayoutEvent::SaveFailed {
                    layout_id: layout.id.clone(),
                    reason: e.to_string(),
                });
                self.toast(Notification::error(e.user_message()));
                Err(e)
            }
        }
    }

    /// Delete the active layout and clear the editor
    pub async fn delete_active_layout(&mut self) -> Result<bool> {
        let id = self.store.layout().id.clone();
        if id.is_empty() {
            return Ok(false);
        }
        let deleted = self.repository.delete_layout(&id).await?;
        if deleted {
            self.publish(LayoutEvent::Deleted { layout_id: id });
            self.store.load(None);
        }
        Ok(deleted)
    }

    pub fn pointer_down(&mut self, point: Point) -> Vec<InteractionEvent> {
        self.controller.pointer_down(&mut self.store, point)
    }

    pub fn pointer_move(&mut self, point: Point) {
        self.controller.pointer_move(point);
    }

    pub fn pointer_up(&mut self) -> Vec<InteractionEvent> {
        self.controller.pointer_up(&mut self.store)
    }

    pub fn pointer_leave(&mut self) -> Vec<InteractionEvent> {
        self.controller.pointer_leave(&mut self.store)
    }

    pub fn double_click(&self, point: Point) -> Vec<InteractionEvent> {
        self.controller.double_click(&self.store, point)
    }

    pub fn details(&self, id: &str) -> Option<ElementDetails> {
        ElementDetails::from_store(&self.store, id)
    }

    /// Confirm the details editor for an element
    pub async fn commit_details<P: PositionStore + ?Sized>(
        &mut self,
        details: ElementDetails,
        positions: &P,
    ) -> Result<PositionRecord> {
        self.bridge
            .commit_details(&mut self.store, details, positions)
            .await
    }

    /// Mirror every element of the active layout into position records
    pub async fn mirror_positions<P: PositionStore + ?Sized>(&self, positions: &P) -> Result<usize> {
        self.bridge.mirror_layout(&self.store, positions).await
    }

    /// Sync a leasing position onto its store's layout.
    ///
    /// When it lands on the open layout and there are no unsaved edits, the
    /// editor reloads it.
    pub async fn sync_position(&mut self, position: &LeasingPosition) -> Result<Layout> {
        let layout = self
            .bridge
            .sync_position_on_layout(&mut self.repository, position)
            .await?;
        if layout.id == self.store.layout().id {
            if self.store.is_modified() {
                tracing::warn!(
                    "Layout {} has unsaved edits; synced position shows after reload",
                    layout.id
                );
            } else {
                self.store.load(Some(layout.clone()));
            }
        }
        Ok(layout)
    }

    pub fn render_svg(&self) -> String {
        render_layout(&self.store, &self.controller, SvgRenderer::new())
    }

    pub fn render_raster(&self, zoom: f32) -> std::result::Result<tiny_skia::Pixmap, RenderError> {
        render_layout(&self.store, &self.controller, RasterRenderer::with_zoom(zoom))
    }

    /// Render the active layout to a PNG file
    pub fn export_png(&self, path: &Path, zoom: f32) -> anyhow::Result<()> {
        let pixmap = self
            .render_raster(zoom)
            .context("Failed to render layout")?;
        let bytes = encode_png(&pixmap).context("Failed to encode layout image")?;
        std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    fn publish(&self, event: LayoutEvent) {
        if let Some(bus) = &self.events {
            let _ = bus.publish(EditorEvent::Layout(event));
        }
    }

    fn toast(&self, notification: Notification) {
        if let Some(bus) = &self.events {
            let _ = bus.publish(EditorEvent::Notification(notification));
        }
    }
}
