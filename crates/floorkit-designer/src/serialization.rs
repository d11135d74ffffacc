//! Persisted layout document format.
//!
//! Layouts are stored as a JSON array of camelCase documents:
//!
//! ```json
//! [{ "id": "...", "name": "...", "objectId": "...",
//!    "boundaryWidth": 1200, "boundaryHeight": 800,
//!    "elements": [{ "id": "...", "label": "...", "type": "gondola",
//!                   "status": "available", "width": 180, "height": 120,
//!                   "x": 40, "y": 40, "rotation": 0,
//!                   "supplier": "...", "note": "...", "updatedAt": "..." }],
//!    "updatedAt": "..." }]
//! ```

use chrono::{DateTime, Utc};
use floorkit_core::Result;
use serde::{Deserialize, Serialize};

use crate::layout::{Layout, DEFAULT_BOUNDARY_HEIGHT, DEFAULT_BOUNDARY_WIDTH};
use crate::model::{positive_dimension, Element, ElementKind, ElementStatus};

/// Serialized layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub object_id: String,
    #[serde(default = "default_boundary_width")]
    pub boundary_width: f64,
    #[serde(default = "default_boundary_height")]
    pub boundary_height: f64,
    #[serde(default)]
    pub elements: Vec<ElementDocument>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Serialized element
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDocument {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: ElementKind,
    #[serde(default)]
    pub status: ElementStatus,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_boundary_width() -> f64 {
    DEFAULT_BOUNDARY_WIDTH
}
fn default_boundary_height() -> f64 {
    DEFAULT_BOUNDARY_HEIGHT
}

impl From<&Element> for ElementDocument {
    fn from(e: &Element) -> Self {
        Self {
            id: e.id.clone(),
            label: e.label.clone(),
            kind: e.kind,
            status: e.status,
            width: e.width,
            height: e.height,
            x: e.x,
            y: e.y,
            rotation: e.rotation_degrees,
            supplier: e.tenant.clone(),
            note: e.note.clone(),
            updated_at: e.updated_at,
        }
    }
}

impl From<ElementDocument> for Element {
    fn from(doc: ElementDocument) -> Self {
        Self {
            id: doc.id,
            label: doc.label,
            kind: doc.kind,
            status: doc.status,
            x: doc.x,
            y: doc.y,
            width: positive_dimension(doc.width),
            height: positive_dimension(doc.height),
            rotation_degrees: doc.rotation,
            tenant: doc.supplier,
            note: doc.note,
            updated_at: doc.updated_at,
        }
    }
}

impl From<&Layout> for LayoutDocument {
    fn from(layout: &Layout) -> Self {
        Self {
            id: layout.id.clone(),
            name: layout.name.clone(),
            object_id: layout.object_id.clone(),
            boundary_width: layout.boundary_width,
            boundary_height: layout.boundary_height,
            elements: layout.elements.iter().map(ElementDocument::from).collect(),
            updated_at: layout.updated_at,
        }
    }
}

impl From<LayoutDocument> for Layout {
    fn from(doc: LayoutDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            object_id: doc.object_id,
            boundary_width: positive_dimension(doc.boundary_width),
            boundary_height: positive_dimension(doc.boundary_height),
            elements: doc.elements.into_iter().map(Element::from).collect(),
            updated_at: doc.updated_at,
        }
    }
}

/// Serialize a layout collection as a pretty-printed JSON array
pub fn layouts_to_json(layouts: &[Layout]) -> Result<String> {
    let docs: Vec<LayoutDocument> = layouts.iter().map(LayoutDocument::from).collect();
    Ok(serde_json::to_string_pretty(&docs)?)
}

/// Parse a layout collection.
///
/// Any decode failure is reported as corrupt data
/// (`Error::is_corrupt_data`).
pub fn layouts_from_json(json: &str) -> Result<Vec<Layout>> {
    let docs: Vec<LayoutDocument> = serde_json::from_str(json)?;
    Ok(docs.into_iter().map(Layout::from).collect())
}

/// Serialize a single layout document
pub fn layout_to_json(layout: &Layout) -> Result<String> {
    Ok(serde_json::to_string_pretty(&LayoutDocument::from(layout))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_field_names() {
        let mut layout = Layout::new_for_store("S1", "Ground", 1000.0, 600.0);
        layout.elements.push(
            Element::with_id("E1", ElementKind::CashRegister, "7", 40.0, 40.0, 180.0, 120.0)
                .with_tenant("Acme"),
        );
        let value: serde_json::Value =
            serde_json::from_str(&layout_to_json(&layout).unwrap()).unwrap();

        assert_eq!(value["objectId"], "S1");
        assert_eq!(value["boundaryWidth"], 1000.0);
        assert!(value["updatedAt"].is_string());
        let element = &value["elements"][0];
        assert_eq!(element["type"], "cashRegister");
        assert_eq!(element["status"], "available");
        assert_eq!(element["supplier"], "Acme");
        assert_eq!(element["rotation"], 0.0);
        assert!(element.get("note").is_none());
    }

    #[test]
    fn test_lenient_element_fields() {
        let json = r#"[{
            "id": "L1", "name": "Shop", "objectId": "S1",
            "boundaryWidth": 800, "boundaryHeight": 600,
            "updatedAt": "2024-05-01T10:00:00Z",
            "elements": [
                { "id": "E1", "label": "1", "type": "Fridge", "status": "LEASED",
                  "width": 0, "height": 50, "x": 1, "y": 2 }
            ]
        }]"#;
        let layouts = layouts_from_json(json).unwrap();
        let e = &layouts[0].elements[0];
        assert_eq!(e.kind, ElementKind::Gondola);
        assert_eq!(e.status, ElementStatus::Occupied);
        assert!(e.width > 0.0);
        assert_eq!(e.rotation_degrees, 0.0);
    }

    #[test]
    fn test_corrupt_input() {
        let err = layouts_from_json("{ not json").unwrap_err();
        assert!(err.is_corrupt_data());
        let err = layouts_from_json(r#"{"id": "not-an-array"}"#).unwrap_err();
        assert!(err.is_corrupt_data());
    }
}
