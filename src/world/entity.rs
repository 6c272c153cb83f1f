use serde_json::Value;
use std::collections::HashMap;

/// Key-value attributes of a single entity (domain-specific, schema-free)
pub type AttributeMap = HashMap<String, Value>;

/// Notification carrying an entity's id and its full post-mutation attribute
/// map. Always the resulting state, never a diff — consumers can apply each
/// event as a wholesale replacement without tracking history.
#[derive(Clone, Debug, PartialEq)]
pub struct MutationEvent {
    pub entity_id: String,
    pub attributes: AttributeMap,
}
