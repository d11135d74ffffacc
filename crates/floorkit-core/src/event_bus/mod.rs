//! # Event Bus Module
//!
//! Decoupled publish/subscribe between the editor core and the host UI.
//! The core publishes layout lifecycle changes, reconciliation results and
//! toast notifications; the UI subscribes and renders them.
//!
//! ## Usage
//!
//! ```rust
//! use floorkit_core::event_bus::{EditorEvent, EventBus, EventCategory, EventFilter, Notification};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Notification]),
//!     |event| {
//!         if let EditorEvent::Notification(toast) = event {
//!             println!("toast: {}", toast.message);
//!         }
//!     },
//! );
//!
//! bus.publish(EditorEvent::Notification(Notification::error("Saving failed"))).ok();
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
