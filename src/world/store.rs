use crate::world::entity::{AttributeMap, MutationEvent};
use crate::world::listener::MutationListener;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// Authoritative in-memory world state.
///
/// Maps entity id → attribute map. Absent entities read as empty maps, never
/// as errors. Every mutation notifies the registered listeners synchronously
/// before returning; `clear` is the one silent operation.
pub struct WorldStore {
    /// Lock-free concurrent map for fast reads
    entities: DashMap<String, AttributeMap>,

    /// Mutation listeners, invoked in registration order. Append-only.
    listeners: RwLock<Vec<Arc<dyn MutationListener>>>,
}

impl WorldStore {
    pub fn new() -> Self {
        Self {
            entities: DashMap::new(),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Register a mutation listener. There is no removal; listeners live as
    /// long as the store.
    pub fn add_listener(&self, listener: Arc<dyn MutationListener>) {
        self.listeners.write().unwrap().push(listener);
    }

    /// Set a single attribute on an entity, creating the entity if absent.
    /// Fires one mutation event carrying the entity's full resulting map.
    pub fn set(&self, entity_id: &str, key: &str, value: Value) {
        let mut entry = self.entities.entry(entity_id.to_string()).or_default();
        entry.insert(key.to_string(), value);

        // The entry guard stays held through notification so concurrent
        // mutations of the same entity cannot reorder their events.
        self.notify(entity_id, entry.value());
    }

    /// Overwrite an entity's attribute map wholesale. Fires one mutation
    /// event carrying the new map.
    pub fn replace(&self, entity_id: &str, attributes: AttributeMap) {
        let entry = self
            .entities
            .entry(entity_id.to_string())
            .insert(attributes);

        self.notify(entity_id, entry.value());
    }

    /// Current attribute map for an entity; empty map if the entity does not
    /// exist.
    pub fn get(&self, entity_id: &str) -> AttributeMap {
        self.entities
            .get(entity_id)
            .map(|e| e.value().clone())
            .unwrap_or_default()
    }

    /// Point-in-time copy of the whole world, one `(entity_id, attributes)`
    /// pair per entity. Concurrent mutations may or may not be included.
    pub fn snapshot(&self) -> Vec<(String, AttributeMap)> {
        self.entities
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    /// Discard every entity. Listeners are not notified; subscribers observe
    /// a cleared world only through the snapshot sent on their next attach.
    pub fn clear(&self) {
        self.entities.clear();
        info!("World cleared");
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Invoke all listeners, in registration order, with the entity's full
    /// resulting map. A failing listener is logged and skipped; it never
    /// aborts the mutation or the remaining listeners.
    fn notify(&self, entity_id: &str, attributes: &AttributeMap) {
        let event = MutationEvent {
            entity_id: entity_id.to_string(),
            attributes: attributes.clone(),
        };

        for listener in self.listeners.read().unwrap().iter() {
            if let Err(e) = listener.on_mutation(&event) {
                warn!(error = %e, entity_id = %event.entity_id, "Mutation listener failed");
            }
        }
    }
}

impl Default for WorldStore {
    fn default() -> Self {
        Self::new()
    }
}
