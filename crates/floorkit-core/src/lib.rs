//! # Floorkit Core
//!
//! Core types and utilities shared by the Floorkit crates:
//! unit and grid conversion, the error taxonomy, and the editor event bus.

pub mod error;
pub mod event_bus;
pub mod units;

pub use error::{AnalysisError, Error, Result, StorageError};

pub use event_bus::{
    EditorEvent, EventBus, EventBusConfig, EventCategory, EventFilter, LayoutEvent, Notification,
    NotificationLevel, ReconciliationEvent, SubscriptionId,
};

pub use units::{
    cm_to_mm, mm_to_cm, normalize_degrees, percent_to_pixels, pixels_to_percent, snap,
    to_millimeters, to_pixels, Scale,
};
