//! Interaction Controller
//!
//! Turns ordered pointer input (down, zero or more moves, then up or leave)
//! into Layout Store calls. During a gesture only the controller's preview
//! changes; the store sees a single `update_element` when it ends. Pointer
//! leave ends a gesture exactly like pointer up.
//!
//! Only one gesture can be active. A pointer-down arriving while a gesture
//! is in progress is ignored.

pub mod gesture;

pub use gesture::{resize_geometry, rotation_towards, Gesture};
pub use hit_test::{hit_test, HandleSet, HitTarget, ResizeHandle};

use floorkit_settings::{EditorConfig, GridSettings, InteractionSettings};

use crate::layout_store::LayoutStore;
use crate::model::{Element, LeasingMetadata, Point};

/// Editing mode of the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    /// Clicks select and manipulate existing elements
    #[default]
    Select,
    /// Clicks on empty canvas request a new element
    Create,
}

/// Notifications for the host UI
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    Selected { id: String },
    SelectionCleared,
    /// Empty canvas clicked in create mode; the host opens a form and
    /// calls `add_element` on confirmation.
    CreateRequested { x: f64, y: f64 },
    /// Element double-clicked; the host opens the details editor.
    EditDetailsRequested { id: String },
    /// A gesture wrote its result to the store.
    Committed { id: String },
}

/// Everything the details editor shows and edits for one element
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDetails {
    pub element: Element,
    pub leasing: LeasingMetadata,
}

impl ElementDetails {
    pub fn new(element: Element, leasing: LeasingMetadata) -> Self {
        Self { element, leasing }
    }

    /// Pre-populate the editor from the store
    pub fn from_store(store: &LayoutStore, id: &str) -> Option<Self> {
        let element = store.element(id)?.clone();
        let leasing = store.leasing(id).cloned().unwrap_or_default();
        Some(Self { element, leasing })
    }
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    settings: InteractionSettings,
    grid: GridSettings,
    mode: EditorMode,
    gesture: Gesture,
}

impl InteractionController {
    pub fn new(settings: InteractionSettings, grid: GridSettings) -> Self {
        Self {
            settings,
            grid,
            mode: EditorMode::default(),
            gesture: Gesture::Idle,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.interaction.clone(), config.grid.clone())
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    pub fn grid(&self) -> &GridSettings {
        &self.grid
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.grid.snap_enabled = enabled;
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Live element of the active gesture, for renderers
    pub fn preview(&self) -> Option<&Element> {
        self.gesture.preview()
    }

    /// Handle positions for the selected element (or its live preview)
    pub fn handles(&self, store: &LayoutStore) -> Option<HandleSet> {
        let selected = store.selected_element()?;
        let element = self
            .preview()
            .filter(|p| p.id == selected.id)
            .unwrap_or(selected);
        Some(HandleSet::for_element(element, &self.settings))
    }

    pub fn pointer_down(&mut self, store: &mut LayoutStore, point: Point) -> Vec<InteractionEvent> {
        if !self.gesture.is_idle() {
            tracing::debug!("pointer down ignored during {}", self.gesture.name());
            return Vec::new();
        }

        match hit_test(store.layout(), store.selected_element(), point, &self.settings) {
            HitTarget::Resize(id, handle) => {
                if let Some(element) = store.element(&id) {
                    self.gesture = Gesture::resize(element, handle, point);
                    tracing::debug!("resize {} from {:?}", id, handle);
                }
                Vec::new()
            }
            HitTarget::Rotate(id) => {
                if let Some(element) = store.element(&id) {
                    self.gesture = Gesture::rotate(element);
                    tracing::debug!("rotate {}", id);
                }
                Vec::new()
            }
            HitTarget::Element(id) => {
                store.select_element(Some(&id));
                if let Some(element) = store.element(&id) {
                    self.gesture = Gesture::drag(element, point);
                    tracing::debug!("drag {}", id);
                }
                vec![InteractionEvent::Selected { id }]
            }
            HitTarget::Empty => {
                let mut events = Vec::new();
                if !store.selection().is_empty() {
                    store.select_element(None);
                    events.push(InteractionEvent::SelectionCleared);
                }
                if self.mode == EditorMode::Create {
                    events.push(InteractionEvent::CreateRequested {
                        x: point.x,
                        y: point.y,
                    });
                }
                events
            }
        }
    }

    pub fn pointer_move(&mut self, point: Point) {
        self.gesture.update(point, &self.settings);
    }

    /// Finish the active gesture, committing its result
    pub fn pointer_up(&mut self, store: &mut LayoutStore) -> Vec<InteractionEvent> {
        let gesture = std::mem::take(&mut self.gesture);
        let name = gesture.name();
        match gesture.finish(&self.grid) {
            Some(element) => {
                let id = element.id.clone();
                if store.update_element(element) {
                    tracing::debug!("{} committed for {}", name, id);
                    vec![InteractionEvent::Committed { id }]
                } else {
                    Vec::new()
                }
            }
            None => Vec::new(),
        }
    }

    /// Pointer left the surface; commits like pointer up
    pub fn pointer_leave(&mut self, store: &mut LayoutStore) -> Vec<InteractionEvent> {
        self.pointer_up(store)
    }

    pub fn double_click(&self, store: &LayoutStore, point: Point) -> Vec<InteractionEvent> {
        store
            .layout()
            .elements
            .iter()
            .rev()
            .find(|e| e.contains_point(point))
            .map(|e| vec![InteractionEvent::EditDetailsRequested { id: e.id.clone() }])
            .unwrap_or_default()
    }
}
