use crate::world::{AttributeMap, MutationEvent};
use serde_json::Value;
use std::fmt;

/// One entity's state on the wire.
///
/// Every frame in either direction is a JSON object mapping entity id →
/// attribute map. Outbound frames always carry exactly one entity; inbound
/// frames may carry several, each decoded as its own `EntityFrame`.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityFrame {
    pub entity_id: String,
    pub attributes: AttributeMap,
}

/// Errors decoding an inbound frame
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolError {
    /// Frame is not valid JSON
    Malformed(String),
    /// Frame parsed, but the top level is not an object
    NotAnObject,
    /// An entity's value is not an attribute map
    AttributesNotObject(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Malformed(msg) => write!(f, "malformed frame: {}", msg),
            ProtocolError::NotAnObject => {
                write!(f, "frame must be a JSON object of entity id to attributes")
            }
            ProtocolError::AttributesNotObject(entity_id) => {
                write!(
                    f,
                    "attributes for entity '{}' must be a JSON object",
                    entity_id
                )
            }
        }
    }
}

impl std::error::Error for ProtocolError {}

impl EntityFrame {
    pub fn new(entity_id: impl Into<String>, attributes: AttributeMap) -> Self {
        Self {
            entity_id: entity_id.into(),
            attributes,
        }
    }

    /// Serialize as a single-entity JSON object: `{"<id>": {...attributes}}`.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        let mut outer = serde_json::Map::with_capacity(1);
        outer.insert(
            self.entity_id.clone(),
            serde_json::to_value(&self.attributes)?,
        );
        serde_json::to_string(&Value::Object(outer))
    }

    /// Decode an inbound text frame into one `EntityFrame` per entity key.
    ///
    /// An empty object decodes to an empty vec (a no-op frame). Any entity
    /// whose value is not an object fails the whole frame.
    pub fn decode_incoming(text: &str) -> Result<Vec<EntityFrame>, ProtocolError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))?;

        let Value::Object(entities) = value else {
            return Err(ProtocolError::NotAnObject);
        };

        entities
            .into_iter()
            .map(|(entity_id, attributes)| match attributes {
                Value::Object(map) => Ok(EntityFrame {
                    entity_id,
                    attributes: map.into_iter().collect(),
                }),
                _ => Err(ProtocolError::AttributesNotObject(entity_id)),
            })
            .collect()
    }
}

impl From<&MutationEvent> for EntityFrame {
    fn from(event: &MutationEvent) -> Self {
        Self {
            entity_id: event.entity_id.clone(),
            attributes: event.attributes.clone(),
        }
    }
}
