//! JSON encoding and validating decoding of lifecycle events.
//!
//! Encoding is a single path for every variant: serialize the record and read
//! back the resulting object. Decoding reads `type` first, then picks the
//! variant either from the fixed tags or from a [`TypeRegistry`].

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::EventError;
use crate::event::{EventShape, MessageEvent};
use crate::event_type::{EventType, LAST_MEMORY_TYPE, PING_TYPE, SERVICE_STATUS_TYPE};

/// Maps caller-supplied discriminators to the payload layout they carry.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    shapes: HashMap<EventType, EventShape>,
}

impl TypeRegistry {
    /// Registry that knows no discriminators
    pub fn empty() -> Self {
        Self {
            shapes: HashMap::new(),
        }
    }

    /// Registry preloaded with the discriminators the processing pipeline emits
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(EventType::MEMORY_CREATED, EventShape::Memory);
        registry.register(EventType::MEMORY_PROCESSING_STARTED, EventShape::Memory);
        registry.register(EventType::NEW_MEMORY_CREATED, EventShape::NewMemoryCreated);
        registry.register(
            EventType::NEW_PROCESSING_MEMORY_CREATED,
            EventShape::NewProcessingMemoryCreated,
        );
        registry.register(
            EventType::PROCESSING_MEMORY_STATUS_CHANGED,
            EventShape::ProcessingMemoryStatusChanged,
        );
        registry.register(
            EventType::MEMORY_BACKWARD_SYNCED,
            EventShape::MemoryBackwardSynced,
        );
        registry
    }

    /// Register a discriminator, returning the shape it replaced
    pub fn register(&mut self, event_type: EventType, shape: EventShape) -> Option<EventShape> {
        self.shapes.insert(event_type, shape)
    }

    pub fn resolve(&self, event_type: &str) -> Option<EventShape> {
        self.shapes.get(event_type).copied()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Registered discriminators in sorted order
    pub fn entries(&self) -> Vec<(&EventType, EventShape)> {
        let mut entries: Vec<_> = self.shapes.iter().map(|(t, s)| (t, *s)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Render an event as a JSON object with its discriminator under `type`.
pub fn encode(event: &MessageEvent) -> Result<Map<String, Value>, EventError> {
    match serde_json::to_value(event)? {
        Value::Object(map) => Ok(map),
        other => Err(EventError::validation(format!(
            "event `{}` encoded to {} instead of an object",
            event.event_type(),
            json_kind(&other)
        ))),
    }
}

/// Compact JSON bytes of [`encode`]
pub fn encode_bytes(event: &MessageEvent) -> Result<Vec<u8>, EventError> {
    Ok(serde_json::to_vec(&encode(event)?)?)
}

/// Build an event from a JSON object.
///
/// Fails with [`EventError::Validation`] when the input is not an object, has
/// no string `type`, names a discriminator the registry does not know, or
/// lacks or mistypes a field the variant requires.
pub fn decode(value: Value, registry: &TypeRegistry) -> Result<MessageEvent, EventError> {
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(EventError::validation(format!(
                "event must be a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    let event_type = match map.get("type") {
        Some(Value::String(event_type)) => event_type.clone(),
        Some(other) => {
            return Err(EventError::validation(format!(
                "field `type` must be a string, got {}",
                json_kind(other)
            )))
        }
        None => return Err(EventError::validation("missing field `type`")),
    };

    let value = Value::Object(map);
    let event = match event_type.as_str() {
        PING_TYPE => MessageEvent::Ping(variant(value, &event_type)?),
        SERVICE_STATUS_TYPE => MessageEvent::ServiceStatus(variant(value, &event_type)?),
        LAST_MEMORY_TYPE => MessageEvent::LastMemory(variant(value, &event_type)?),
        other => {
            let shape = registry.resolve(other).ok_or_else(|| {
                EventError::validation(format!("unknown event type `{other}`"))
            })?;
            debug!(event_type = other, shape = %shape, "Resolved event shape");
            match shape {
                EventShape::Memory => MessageEvent::Memory(variant(value, other)?),
                EventShape::NewMemoryCreated => {
                    MessageEvent::NewMemoryCreated(variant(value, other)?)
                }
                EventShape::NewProcessingMemoryCreated => {
                    MessageEvent::NewProcessingMemoryCreated(variant(value, other)?)
                }
                EventShape::ProcessingMemoryStatusChanged => {
                    MessageEvent::ProcessingMemoryStatusChanged(variant(value, other)?)
                }
                EventShape::MemoryBackwardSynced => {
                    MessageEvent::MemoryBackwardSynced(variant(value, other)?)
                }
            }
        }
    };

    Ok(event)
}

/// Parse JSON bytes and [`decode`] them
pub fn decode_bytes(bytes: &[u8], registry: &TypeRegistry) -> Result<MessageEvent, EventError> {
    let value: Value = serde_json::from_slice(bytes)?;
    decode(value, registry)
}

fn variant<T: DeserializeOwned>(value: Value, event_type: &str) -> Result<T, EventError> {
    serde_json::from_value(value)
        .map_err(|e| EventError::validation(format!("invalid `{event_type}` event: {e}")))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl MessageEvent {
    /// JSON object form, see [`encode`]
    pub fn to_json(&self) -> Result<Map<String, Value>, EventError> {
        encode(self)
    }

    /// Serialize event to compact JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, EventError> {
        encode_bytes(self)
    }

    /// Decode with the default registry
    pub fn from_json(value: Value) -> Result<Self, EventError> {
        decode(value, &TypeRegistry::default())
    }

    /// Deserialize event from JSON bytes with the default registry
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EventError> {
        decode_bytes(bytes, &TypeRegistry::default())
    }
}
