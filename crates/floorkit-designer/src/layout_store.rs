//! Layout Store
//!
//! Authoritative in-memory state for the layout being edited: the element
//! list, the selection, and a bounded undo/redo history of full element-list
//! snapshots.
//!
//! History moves through states `(history_depth, redo_depth)`:
//!
//! ```text
//! load              -> (1, 0)
//! add/update/remove -> (h + 1, 0)
//! undo  (h > 0, r)  -> (h - 1, r + 1)
//! redo  (h, r > 0)  -> (h + 1, r - 1)
//! ```
//!
//! Undo and redo at depth zero are no-ops. Every operation is total: ids
//! that match nothing are ignored without touching history.

use std::collections::{HashMap, VecDeque};

use chrono::Utc;

use crate::layout::Layout;
use crate::model::{positive_dimension, Element, LeasingMetadata};

/// Default number of undo snapshots kept
pub const DEFAULT_MAX_HISTORY: usize = 50;

type Snapshot = Vec<Element>;

/// One editing session's layout state
#[derive(Debug, Clone)]
pub struct LayoutStore {
    layout: Layout,
    selection: Vec<String>,
    history: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_depth: usize,
    modified: bool,
    leasing: HashMap<String, LeasingMetadata>,
}

impl LayoutStore {
    /// Store holding an empty, unnamed layout and no history
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_HISTORY)
    }

    /// Store with a custom history bound (at least one snapshot)
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            layout: Layout::empty(),
            selection: Vec::new(),
            history: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
            modified: false,
            leasing: HashMap::new(),
        }
    }

    /// Make `layout` the active layout, or clear to an empty unnamed layout.
    ///
    /// Selection, leasing metadata and both history stacks are reset; the
    /// loaded element list becomes the only history entry.
    pub fn load(&mut self, layout: Option<Layout>) {
        self.layout = layout.unwrap_or_else(Layout::empty);
        self.selection.clear();
        self.leasing.clear();
        self.history.clear();
        self.redo_stack.clear();
        self.history.push_back(self.layout.elements.clone());
        self.modified = false;
        tracing::info!(
            "Loaded layout '{}' ({} elements)",
            self.layout.name,
            self.layout.elements.len()
        );
    }

    /// Append an element and select it
    pub fn add_element(&mut self, element: Element) {
        self.push_history();
        let mut element = sanitized(element);
        element.updated_at = Some(Utc::now());
        self.selection = vec![element.id.clone()];
        self.layout.elements.push(element);
        self.after_mutation("add");
    }

    /// Append several elements as one undoable step
    pub fn add_elements(&mut self, elements: Vec<Element>) {
        if elements.is_empty() {
            return;
        }
        self.push_history();
        let now = Utc::now();
        self.selection.clear();
        for element in elements {
            let mut element = sanitized(element);
            element.updated_at = Some(now);
            self.selection.push(element.id.clone());
            self.layout.elements.push(element);
        }
        self.after_mutation("add batch");
    }

    /// Replace the element with the same id, keeping list order.
    ///
    /// Returns false (and records nothing) when no element matches.
    pub fn update_element(&mut self, element: Element) -> bool {
        let Some(index) = self.index_of(&element.id) else {
            tracing::debug!("update ignored, no element {}", element.id);
            return false;
        };
        self.push_history();
        let mut element = sanitized(element);
        element.updated_at = Some(Utc::now());
        self.selection = vec![element.id.clone()];
        self.layout.elements[index] = element;
        self.after_mutation("update");
        true
    }

    /// Remove the element with `id` and clear the selection
    pub fn remove_element(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            tracing::debug!("remove ignored, no element {}", id);
            return false;
        };
        self.push_history();
        self.layout.elements.remove(index);
        self.leasing.remove(id);
        self.selection.clear();
        self.after_mutation("remove");
        true
    }

    /// Restore the most recent snapshot
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.layout.elements, snapshot);
        self.redo_stack.push(current);
        self.prune_selection();
        self.modified = true;
        tracing::debug!(
            "undo -> history {}, redo {}",
            self.history.len(),
            self.redo_stack.len()
        );
        true
    }

    /// Re-apply the most recently undone state
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.layout.elements, snapshot);
        self.history.push_back(current);
        self.trim_history();
        self.prune_selection();
        self.modified = true;
        tracing::debug!(
            "redo -> history {}, redo {}",
            self.history.len(),
            self.redo_stack.len()
        );
        true
    }

    /// Replace the selection
    pub fn select_elements<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection = ids.into_iter().map(Into::into).collect();
    }

    /// Select a single element, or clear the selection with `None`
    pub fn select_element(&mut self, id: Option<&str>) {
        self.selection = id.map(|id| vec![id.to_string()]).unwrap_or_default();
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// The selected element, when exactly one is selected
    pub fn selected_element(&self) -> Option<&Element> {
        match self.selection.as_slice() {
            [id] => self.layout.element(id),
            _ => None,
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.iter().any(|s| s == id)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn elements(&self) -> &[Element] {
        &self.layout.elements
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.layout.element(id)
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Whether there are edits since the last load or save
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Record a successful save of `saved`.
    ///
    /// Adopts the persisted id and timestamp without touching elements or
    /// history.
    pub fn mark_saved(&mut self, saved: &Layout) {
        self.layout.id = saved.id.clone();
        self.layout.updated_at = saved.updated_at;
        self.modified = false;
    }

    /// Attach leasing metadata to an element. Not part of undo history.
    pub fn set_leasing(&mut self, id: &str, metadata: LeasingMetadata) {
        if !self.layout.contains(id) {
            tracing::debug!("leasing metadata ignored, no element {}", id);
            return;
        }
        self.leasing.insert(id.to_string(), metadata);
    }

    pub fn leasing(&self, id: &str) -> Option<&LeasingMetadata> {
        self.leasing.get(id)
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.layout.elements.iter().position(|e| e.id == id)
    }

    fn push_history(&mut self) {
        self.history.push_back(self.layout.elements.clone());
        self.trim_history();
        self.redo_stack.clear();
    }

    fn trim_history(&mut self) {
        while self.history.len() > self.max_depth {
            self.history.pop_front();
        }
    }

    fn prune_selection(&mut self) {
        let layout = &self.layout;
        self.selection.retain(|id| layout.contains(id));
    }

    fn after_mutation(&mut self, op: &str) {
        self.layout.touch();
        self.modified = true;
        tracing::debug!(
            "{} -> history {}, redo {}",
            op,
            self.history.len(),
            self.redo_stack.len()
        );
    }
}

impl Default for LayoutStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Stored sizes stay positive whatever the caller wrote into the fields
fn sanitized(mut element: Element) -> Element {
    element.width = positive_dimension(element.width);
    element.height = positive_dimension(element.height);
    element
}
