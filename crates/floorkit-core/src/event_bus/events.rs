//! Event type definitions for the event bus.
//!
//! Events are cloneable and serializable so the host UI can log or replay
//! them. Toast notifications travel as `EditorEvent::Notification`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Root event enum for all editor events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EditorEvent {
    /// Layout lifecycle events
    Layout(LayoutEvent),
    /// Leasing reconciliation events
    Reconciliation(ReconciliationEvent),
    /// User-visible transient notification
    Notification(Notification),
}

impl EditorEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            EditorEvent::Layout(_) => EventCategory::Layout,
            EditorEvent::Reconciliation(_) => EventCategory::Reconciliation,
            EditorEvent::Notification(_) => EventCategory::Notification,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            EditorEvent::Layout(e) => e.description(),
            EditorEvent::Reconciliation(e) => e.description(),
            EditorEvent::Notification(n) => format!("{}: {}", n.level, n.message),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Layout lifecycle events.
    Layout,
    /// Reconciliation events.
    Reconciliation,
    /// Toast notifications.
    Notification,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Layout => write!(f, "Layout"),
            EventCategory::Reconciliation => write!(f, "Reconciliation"),
            EventCategory::Notification => write!(f, "Notification"),
        }
    }
}

/// Layout lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LayoutEvent {
    /// A layout became the active layout.
    Loaded {
        /// Layout identifier.
        layout_id: String,
        /// Number of elements on the layout.
        element_count: usize,
    },
    /// No layout exists for the requested store.
    NotFound {
        /// Store (retail object) identifier.
        object_id: String,
    },
    /// A layout was persisted.
    Saved {
        /// Layout identifier.
        layout_id: String,
    },
    /// Persisting a layout failed; in-memory edits are kept.
    SaveFailed {
        /// Layout identifier.
        layout_id: String,
        /// Failure reason.
        reason: String,
    },
    /// A layout was deleted.
    Deleted {
        /// Layout identifier.
        layout_id: String,
    },
}

impl LayoutEvent {
    fn description(&self) -> String {
        match self {
            LayoutEvent::Loaded {
                layout_id,
                element_count,
            } => format!("Loaded layout {} ({} elements)", layout_id, element_count),
            LayoutEvent::NotFound { object_id } => {
                format!("No layout for store {}", object_id)
            }
            LayoutEvent::Saved { layout_id } => format!("Saved layout {}", layout_id),
            LayoutEvent::SaveFailed { layout_id, reason } => {
                format!("Saving layout {} failed: {}", layout_id, reason)
            }
            LayoutEvent::Deleted { layout_id } => format!("Deleted layout {}", layout_id),
        }
    }
}

/// Reconciliation events between canvas elements and position records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReconciliationEvent {
    /// A leasing position was written onto a layout.
    PositionSynced {
        /// Layout identifier.
        layout_id: String,
        /// Element / position identifier.
        element_id: String,
        /// Whether the element was newly created.
        created: bool,
    },
    /// Canvas elements were mirrored into position records.
    RecordsMirrored {
        /// Store identifier.
        store_id: String,
        /// Number of records written.
        count: usize,
    },
}

impl ReconciliationEvent {
    fn description(&self) -> String {
        match self {
            ReconciliationEvent::PositionSynced {
                layout_id,
                element_id,
                created,
            } => format!(
                "Position {} {} on layout {}",
                element_id,
                if *created { "placed" } else { "updated" },
                layout_id
            ),
            ReconciliationEvent::RecordsMirrored { store_id, count } => {
                format!("Mirrored {} positions for store {}", count, store_id)
            }
        }
    }
}

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationLevel {
    /// Informational.
    Info,
    /// Success confirmation.
    Success,
    /// Warning (non-blocking).
    Warning,
    /// Error.
    Error,
}

impl std::fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationLevel::Info => write!(f, "Info"),
            NotificationLevel::Success => write!(f, "Success"),
            NotificationLevel::Warning => write!(f, "Warning"),
            NotificationLevel::Error => write!(f, "Error"),
        }
    }
}

/// Toast-style notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Message shown to the user.
    pub message: String,
    /// When the notification was raised.
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Create a notification stamped with the current time
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Shorthand for an error notification
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    /// Shorthand for a success notification
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }
}
