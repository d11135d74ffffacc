//! Reconciliation Bridge
//!
//! Keeps canvas elements and the relational position records consistent.
//! Leasing-side changes become visible on the floor plan through
//! [`ReconciliationBridge::sync_position_on_layout`]; canvas edits flow back
//! through [`ReconciliationBridge::mirror_layout`] and
//! [`ReconciliationBridge::commit_details`].
//!
//! Elements and records are matched by id, never by label. Writes are
//! last-write-wins; there is no version check.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use floorkit_core::{EditorEvent, Error, EventBus, ReconciliationEvent, Result, Scale};
use floorkit_settings::{EditorConfig, PlacementSettings};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::interaction::ElementDetails;
use crate::layout::Layout;
use crate::layout_store::LayoutStore;
use crate::model::{Element, ElementKind, ElementStatus, LeasingMetadata};
use crate::persistence::{LayoutBackend, LayoutRepository};

/// Leasing-side position as edited in the admin console.
///
/// Sizes are in centimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeasingPosition {
    pub id: String,
    /// Position number shown as the element label
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: ElementKind,
    #[serde(default)]
    pub status: ElementStatus,
    pub width_cm: f64,
    pub height_cm: f64,
    pub retail_object_id: String,
    #[serde(default)]
    pub tenant: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
}

/// Relational position row, keyed by `(store_id, position_number)`.
///
/// Geometry is in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    pub store_id: String,
    pub position_number: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub status: ElementStatus,
    #[serde(default)]
    pub tenant: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub display_type: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl PositionRecord {
    pub fn key(&self) -> (String, String) {
        (self.store_id.clone(), self.position_number.clone())
    }
}

/// Relational store of position records
#[async_trait]
pub trait PositionStore: Send + Sync {
    async fn find_by_store(&self, store_id: &str) -> Result<Vec<PositionRecord>>;

    /// Insert or replace by `(store_id, position_number)`
    async fn upsert(&self, record: PositionRecord) -> Result<()>;
}

/// Position store held in memory
#[derive(Debug, Default)]
pub struct InMemoryPositionStore {
    records: RwLock<BTreeMap<(String, String), PositionRecord>>,
}

impl InMemoryPositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, store_id: &str, position_number: &str) -> Option<PositionRecord> {
        self.records
            .read()
            .get(&(store_id.to_string(), position_number.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl PositionStore for InMemoryPositionStore {
    async fn find_by_store(&self, store_id: &str) -> Result<Vec<PositionRecord>> {
        Ok(self
            .records
            .read()
            .values()
            .filter(|r| r.store_id == store_id)
            .cloned()
            .collect())
    }

    async fn upsert(&self, record: PositionRecord) -> Result<()> {
        self.records.write().insert(record.key(), record);
        Ok(())
    }
}

/// Size used when a position arrives without a usable size
const FALLBACK_SIZE_PX: f64 = 40.0;

pub struct ReconciliationBridge {
    scale: Scale,
    placement: PlacementSettings,
    expiring_soon_days: i64,
    events: Option<Arc<EventBus>>,
}

impl ReconciliationBridge {
    pub fn new(scale: Scale, placement: PlacementSettings, expiring_soon_days: i64) -> Self {
        Self {
            scale,
            placement,
            expiring_soon_days,
            events: None,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(
            config.scale,
            config.placement.clone(),
            config.leasing.expiring_soon_days,
        )
    }

    /// Publish reconciliation events on `bus`
    pub fn with_events(mut self, bus: Arc<EventBus>) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Write a leasing position onto its store's layout and save it.
    ///
    /// Creates the layout when the store has none. Calling this twice with
    /// the same position leaves exactly one element for it.
    pub async fn sync_position_on_layout<B: LayoutBackend>(
        &self,
        repository: &mut LayoutRepository<B>,
        position: &LeasingPosition,
    ) -> Result<Layout> {
        let store_id = &position.retail_object_id;
        let mut layout = match repository.get_layout_by_object_id(store_id).await? {
            Some(layout) => layout,
            None => {
                tracing::info!("No layout for store {}, creating one", store_id);
                repository
                    .create_layout_for_store(store_id, &format!("Layout {}", store_id))
                    .await?
            }
        };

        let created = self.apply_position(&mut layout, position);
        let saved = repository.save_layout(&layout).await?;

        self.publish(ReconciliationEvent::PositionSynced {
            layout_id: saved.id.clone(),
            element_id: position.id.clone(),
            created,
        });
        Ok(saved)
    }

    /// Apply a position to a layout in memory.
    ///
    /// Existing elements keep `x`, `y` and rotation; new ones get the next
    /// row-major grid slot. Returns true when an element was created.
    pub fn apply_position(&self, layout: &mut Layout, position: &LeasingPosition) -> bool {
        let width = positive_or_fallback(self.scale.cm_to_pixels(position.width_cm));
        let height = positive_or_fallback(self.scale.cm_to_pixels(position.height_cm));
        let status = self.derive_status(
            position.status,
            position.expiry_date,
            Utc::now().date_naive(),
        );

        if let Some(element) = layout.element_mut(&position.id) {
            element.label = position.name.clone();
            element.kind = position.kind;
            element.status = status;
            element.width = width;
            element.height = height;
            element.tenant = position.tenant.clone();
            element.updated_at = Some(Utc::now());
            layout.touch();
            return false;
        }

        let (x, y) = self.grid_slot(layout.elements.len());
        let mut element = Element::with_id(
            position.id.clone(),
            position.kind,
            position.name.clone(),
            x,
            y,
            width,
            height,
        )
        .with_status(status);
        element.tenant = position.tenant.clone();
        element.updated_at = Some(Utc::now());
        layout.elements.push(element);
        layout.touch();
        true
    }

    /// Default top-left corner for the `index`-th element of a layout
    pub fn grid_slot(&self, index: usize) -> (f64, f64) {
        let columns = self.placement.columns.max(1);
        let col = (index % columns) as f64;
        let row = (index / columns) as f64;
        (
            self.placement.origin_x + col * self.placement.spacing_x,
            self.placement.origin_y + row * self.placement.spacing_y,
        )
    }

    /// Relational record for an element, geometry converted to millimetres
    pub fn position_record_for(
        &self,
        element: &Element,
        store_id: &str,
        metadata: Option<&LeasingMetadata>,
    ) -> PositionRecord {
        let meta = metadata.cloned().unwrap_or_default();
        PositionRecord {
            store_id: store_id.to_string(),
            position_number: element.position_number().to_string(),
            x: self.scale.to_millimeters(element.x),
            y: self.scale.to_millimeters(element.y),
            width: self.scale.to_millimeters(element.width),
            height: self.scale.to_millimeters(element.height),
            status: element.status,
            tenant: element.tenant.clone(),
            expiry_date: meta.expiry_date,
            format: meta.format,
            display_type: meta.display_type,
            department: meta.department,
            category: meta.category,
        }
    }

    /// Upsert one record per element of the active layout
    pub async fn mirror_layout<P: PositionStore + ?Sized>(
        &self,
        store: &LayoutStore,
        positions: &P,
    ) -> Result<usize> {
        let layout = store.layout();
        let mut count = 0;
        for element in layout.elements.iter().filter(|e| !e.kind.is_structural()) {
            let record =
                self.position_record_for(element, &layout.object_id, store.leasing(&element.id));
            positions.upsert(record).await?;
            count += 1;
        }
        tracing::info!(
            "Mirrored {} positions for store {}",
            count,
            layout.object_id
        );
        self.publish(ReconciliationEvent::RecordsMirrored {
            store_id: layout.object_id.clone(),
            count,
        });
        Ok(count)
    }

    /// Confirm the details editor: update the canvas element and its record.
    ///
    /// An id not yet on the layout is added, which is how elements requested
    /// through create mode arrive.
    pub async fn commit_details<P: PositionStore + ?Sized>(
        &self,
        store: &mut LayoutStore,
        details: ElementDetails,
        positions: &P,
    ) -> Result<PositionRecord> {
        let ElementDetails {
            mut element,
            leasing,
        } = details;
        element.status = self.derive_status(
            element.status,
            leasing.expiry_date,
            Utc::now().date_naive(),
        );

        let id = element.id.clone();
        if store.element(&id).is_some() {
            store.update_element(element);
        } else {
            store.add_element(element);
        }
        store.set_leasing(&id, leasing);

        let record = match store.element(&id) {
            Some(element) => {
                self.position_record_for(element, &store.layout().object_id, store.leasing(&id))
            }
            None => return Err(Error::other(format!("element {} vanished", id))),
        };
        positions.upsert(record.clone()).await?;
        Ok(record)
    }

    /// Status shown on the canvas for a lease.
    ///
    /// Reserved or occupied positions whose lease ends within the warning
    /// window show as `ExpiringSoon`.
    pub fn derive_status(
        &self,
        status: ElementStatus,
        expiry: Option<NaiveDate>,
        today: NaiveDate,
    ) -> ElementStatus {
        // A window past the calendar's range leaves the status as is.
        let window_end = Duration::try_days(self.expiring_soon_days)
            .and_then(|window| today.checked_add_signed(window));
        match (status, expiry, window_end) {
            (ElementStatus::Reserved | ElementStatus::Occupied, Some(expiry), Some(end))
                if expiry >= today && expiry <= end =>
            {
                ElementStatus::ExpiringSoon
            }
            _ => status,
        }
    }

    fn publish(&self, event: ReconciliationEvent) {
        if let Some(bus) = &self.events {
            let _ = bus.publish(EditorEvent::Reconciliation(event));
        }
    }
}

fn positive_or_fallback(px: f64) -> f64 {
    if px.is_finite() && px > 0.0 {
        px
    } else {
        FALLBACK_SIZE_PX
    }
}
