//! # Floorkit Designer
//!
//! Floor-plan layout editor for retail leasing. Store managers place,
//! resize, rotate and annotate rectangular fixtures on a scaled store
//! layout; the editor persists layouts and keeps them consistent with the
//! relational position records used for leasing.
//!
//! ## Core Components
//!
//! - **Model**: [`Element`], its kind and leasing status, [`Layout`]
//! - **Layout Store**: active layout, selection, bounded undo/redo of full
//!   element-list snapshots
//! - **Interaction**: pointer gestures (drag, corner resize, rotate,
//!   create, double-click) as an explicit state machine
//! - **Persistence**: cached layout repository over a JSON file or memory
//!   backend, with bundled sample layouts
//! - **Reconciliation**: leasing positions onto the canvas and canvas
//!   elements back into position records
//! - **Analysis**: import of percentage rectangles from floor-plan analysis
//! - **Rendering**: SVG and raster adapters behind one trait
//!
//! ## Architecture
//!
//! ```text
//! pointer events
//!   └── InteractionController (gesture state machine)
//!         └── LayoutStore (mutation + history)
//!               ├── LayoutRepository (explicit save)
//!               ├── ReconciliationBridge (position records)
//!               └── render_layout (SvgRenderer / RasterRenderer)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use floorkit_designer::{Element, ElementKind, LayoutStore};
//!
//! let mut store = LayoutStore::new();
//! let shelf = Element::new(ElementKind::Shelf, "S-01", 40.0, 40.0, 180.0, 60.0);
//! store.add_element(shelf.clone());
//!
//! let mut moved = shelf.clone();
//! moved.x = 100.0;
//! store.update_element(moved);
//!
//! store.undo();
//! assert_eq!(store.element(&shelf.id).map(|e| e.x), Some(40.0));
//! ```

pub mod analysis;
pub mod interaction;
pub mod layout;
pub mod layout_store;
pub mod model;
pub mod persistence;
pub mod reconciliation;
pub mod renderer;
pub mod serialization;
pub mod session;
pub mod svg_renderer;

pub use analysis::{
    candidates_to_elements, candidates_to_positions, import_analysis, AnalysisCandidate,
    AnalysisResult, FloorplanAnalyzer,
};
pub use interaction::{
    EditorMode, ElementDetails, Gesture, HandleSet, HitTarget, InteractionController,
    InteractionEvent, ResizeHandle,
};
pub use layout::Layout;
pub use layout_store::LayoutStore;
pub use model::{Element, ElementKind, ElementStatus, LeasingMetadata, Point};
pub use persistence::{JsonFileBackend, LayoutBackend, LayoutRepository, MemoryBackend};
pub use reconciliation::{
    InMemoryPositionStore, LeasingPosition, PositionRecord, PositionStore, ReconciliationBridge,
};
pub use renderer::{render_layout, ElementStyle, RasterRenderer, RenderAdapter, RenderError};
pub use session::EditorSession;
pub use svg_renderer::SvgRenderer;
