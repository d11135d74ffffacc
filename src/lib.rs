//! # Floorkit
//!
//! Core of a retail-space leasing floor-plan editor:
//! - Scaled store layouts (millimetres on the floor, pixels on the canvas)
//! - Fixtures that can be placed, dragged, corner-resized and rotated
//! - Bounded undo/redo of whole-layout snapshots
//! - Explicit save to a layout store, with bundled sample layouts
//! - Reconciliation with the relational position records used for leasing
//!
//! ## Architecture
//!
//! Floorkit is organized as a workspace with three crates:
//!
//! 1. **floorkit-core** - Units and grid snapping, errors, editor event bus
//! 2. **floorkit-settings** - Editor configuration and its persistence
//! 3. **floorkit-designer** - Element model, layout store, interaction,
//!    persistence, reconciliation, rendering
//!
//! This crate re-exports the public surface and sets up logging for hosts.

pub use floorkit_core::units;
pub use floorkit_designer as designer;

pub use floorkit_core::{
    AnalysisError, EditorEvent, Error, EventBus, EventBusConfig, EventFilter, LayoutEvent,
    Notification, NotificationLevel, ReconciliationEvent, Result, Scale, StorageError,
};

pub use floorkit_settings::{
    default_config_path, EditorConfig, GridSettings, HistorySettings, InteractionSettings,
    LeasingSettings, PlacementSettings, RotationLimit, StorageSettings,
};

pub use floorkit_designer::{
    render_layout, EditorMode, EditorSession, Element, ElementDetails, ElementKind,
    ElementStatus, Gesture, HitTarget, InMemoryPositionStore, InteractionController,
    InteractionEvent, JsonFileBackend, Layout, LayoutBackend, LayoutRepository, LayoutStore,
    LeasingMetadata, LeasingPosition, MemoryBackend, Point, PositionRecord, PositionStore,
    RasterRenderer, ReconciliationBridge, ResizeHandle, SvgRenderer,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support, `info` otherwise
///
/// Fails if a global subscriber is already installed.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!("Floorkit {} (built {})", VERSION, BUILD_DATE);
    Ok(())
}

/// Initialize logging as one JSON object per line, for hosts that ship logs
/// to a collector.
pub fn init_json_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().with_current_span(false))
        .try_init()?;
    Ok(())
}
