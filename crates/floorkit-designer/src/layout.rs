//! Layout document: the canvas for one retail object.

use chrono::{DateTime, Utc};

use crate::model::{positive_dimension, Element};

/// Canvas width used when no boundary is given
pub const DEFAULT_BOUNDARY_WIDTH: f64 = 1200.0;
/// Canvas height used when no boundary is given
pub const DEFAULT_BOUNDARY_HEIGHT: f64 = 800.0;

/// Canvas document for one store.
///
/// Element order carries no meaning but is preserved so re-renders are
/// stable. An empty element list is a valid layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub id: String,
    pub name: String,
    /// Owning retail object (store)
    pub object_id: String,
    pub boundary_width: f64,
    pub boundary_height: f64,
    pub elements: Vec<Element>,
    pub updated_at: DateTime<Utc>,
}

impl Layout {
    /// Empty, unnamed layout not attached to any store
    pub fn empty() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            object_id: String::new(),
            boundary_width: DEFAULT_BOUNDARY_WIDTH,
            boundary_height: DEFAULT_BOUNDARY_HEIGHT,
            elements: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// New layout for a store with a fresh id and no elements
    pub fn new_for_store(
        object_id: impl Into<String>,
        name: impl Into<String>,
        boundary_width: f64,
        boundary_height: f64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            object_id: object_id.into(),
            boundary_width: positive_dimension(boundary_width),
            boundary_height: positive_dimension(boundary_height),
            elements: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether this layout was never attached to a store
    pub fn is_unnamed(&self) -> bool {
        self.id.is_empty() && self.object_id.is_empty()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::empty()
    }
}
