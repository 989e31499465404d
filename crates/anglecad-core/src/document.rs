//! Drawing document: entities, layers and undo history.

use crate::entity::{DEFAULT_LAYER, EntityId, LineEntity, Pen};
use crate::host::EntityContainer;
use crate::snap::SnapTarget;
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Maximum number of undo cycles to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Entities created inside one undo transaction.
#[derive(Debug, Clone, Default)]
struct UndoCycle {
    created: Vec<EntityId>,
}

/// A drawing document containing all entities and state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    /// All entities, keyed by ID.
    entities: HashMap<EntityId, LineEntity>,
    /// Insertion order of entities.
    order: Vec<EntityId>,
    /// Layer names, in creation order.
    layers: Vec<String>,
    active_layer: String,
    active_pen: Pen,
    #[serde(skip)]
    open_cycle: Option<UndoCycle>,
    #[serde(skip)]
    undo_stack: Vec<UndoCycle>,
    /// Entities removed by undo, restorable by redo.
    #[serde(skip)]
    redo_stack: Vec<Vec<LineEntity>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            entities: HashMap::new(),
            order: Vec::new(),
            layers: vec![DEFAULT_LAYER.to_string()],
            active_layer: DEFAULT_LAYER.to_string(),
            active_pen: Pen::default(),
            open_cycle: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Add a layer if it does not exist yet.
    pub fn add_layer(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.layers.contains(&name) {
            self.layers.push(name);
        }
    }

    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    /// Make `name` the layer new entities go to, creating it if needed.
    pub fn set_active_layer(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.add_layer(name.clone());
        self.active_layer = name;
    }

    pub fn set_active_pen(&mut self, pen: Pen) {
        self.active_pen = pen;
    }

    /// Insert an entity without touching the undo history.
    pub fn insert(&mut self, entity: LineEntity) -> EntityId {
        let id = entity.id();
        self.add_layer(entity.layer.clone());
        if self.entities.insert(id, entity).is_none() {
            self.order.push(id);
        }
        id
    }

    /// Remove an entity without touching the undo history.
    pub fn remove(&mut self, id: EntityId) -> Option<LineEntity> {
        self.order.retain(|&entity_id| entity_id != id);
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&LineEntity> {
        self.entities.get(&id)
    }

    /// Entities in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &LineEntity> {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Most recently inserted entity.
    pub fn last(&self) -> Option<&LineEntity> {
        self.order.last().and_then(|id| self.entities.get(id))
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Get the bounding box of all entities.
    pub fn bounds(&self) -> Option<Rect> {
        self.entities
            .values()
            .map(LineEntity::bounds)
            .reduce(|acc, bounds| acc.union(bounds))
    }

    /// Whether an undo transaction is open.
    pub fn in_undo_cycle(&self) -> bool {
        self.open_cycle.is_some()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Revert the last closed undo cycle.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(cycle) = self.undo_stack.pop() else {
            return false;
        };
        let removed: Vec<LineEntity> = cycle
            .created
            .iter()
            .filter_map(|&id| self.remove(id))
            .collect();
        log::debug!("undo: removed {} entities", removed.len());
        self.redo_stack.push(removed);
        true
    }

    /// Reapply the last undone cycle.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(entities) = self.redo_stack.pop() else {
            return false;
        };
        let created = entities.into_iter().map(|entity| self.insert(entity)).collect();
        self.undo_stack.push(UndoCycle { created });
        true
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl EntityContainer for Document {
    fn active_layer(&self) -> &str {
        &self.active_layer
    }

    fn active_pen(&self) -> Pen {
        self.active_pen
    }

    fn add_entity(&mut self, entity: LineEntity) -> EntityId {
        self.insert(entity)
    }

    fn start_undo_cycle(&mut self) {
        if self.open_cycle.is_some() {
            log::warn!("start_undo_cycle: a cycle is already open, extending it");
            return;
        }
        self.open_cycle = Some(UndoCycle::default());
    }

    fn add_undoable(&mut self, id: EntityId) {
        match self.open_cycle.as_mut() {
            Some(cycle) => cycle.created.push(id),
            None => log::warn!("add_undoable: no open undo cycle, {id} is not undoable"),
        }
    }

    fn end_undo_cycle(&mut self) {
        let Some(cycle) = self.open_cycle.take() else {
            log::warn!("end_undo_cycle: no open undo cycle");
            return;
        };
        if cycle.created.is_empty() {
            return;
        }
        self.redo_stack.clear();
        self.undo_stack.push(cycle);
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    fn snap_targets(&self) -> Vec<SnapTarget> {
        self.entities().flat_map(LineEntity::snap_targets).collect()
    }
}
