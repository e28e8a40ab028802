//! Memory lifecycle event variants.
//!
//! Every variant is a plain value record. The discriminator is stored under
//! the serde name `type`, so the JSON form never contains an `event_type` key.
//! Optional fields serialize as `null`; list fields default to `[]`.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use memory_types::{Memory, Message};

use crate::error::EventError;
use crate::event_type::{EventType, LastMemoryTag, PingTag, ServiceStatusTag};

/// Accept `null` for list fields and treat it as empty.
fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Payload layout of an event whose discriminator is caller-supplied.
///
/// Used by [`TypeRegistry`](crate::TypeRegistry) to decide how a payload with
/// a given `type` is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventShape {
    Memory,
    NewMemoryCreated,
    NewProcessingMemoryCreated,
    ProcessingMemoryStatusChanged,
    MemoryBackwardSynced,
}

impl EventShape {
    pub const ALL: [EventShape; 5] = [
        EventShape::Memory,
        EventShape::NewMemoryCreated,
        EventShape::NewProcessingMemoryCreated,
        EventShape::ProcessingMemoryStatusChanged,
        EventShape::MemoryBackwardSynced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventShape::Memory => "memory",
            EventShape::NewMemoryCreated => "new_memory_created",
            EventShape::NewProcessingMemoryCreated => "new_processing_memory_created",
            EventShape::ProcessingMemoryStatusChanged => "processing_memory_status_changed",
            EventShape::MemoryBackwardSynced => "memory_backward_synced",
        }
    }
}

impl std::fmt::Display for EventShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventShape {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventShape::ALL
            .into_iter()
            .find(|shape| shape.as_str() == s)
            .ok_or_else(|| EventError::validation(format!("unknown event shape `{s}`")))
    }
}

/// Lifecycle state of a processing memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMemoryStatus {
    /// Audio is still being captured
    Capturing,
    /// Capture closed, memory being built
    Processing,
    /// Memory created
    Done,
    /// Memory could not be created
    Failed,
}

impl ProcessingMemoryStatus {
    pub const ALL: [ProcessingMemoryStatus; 4] = [
        ProcessingMemoryStatus::Capturing,
        ProcessingMemoryStatus::Processing,
        ProcessingMemoryStatus::Done,
        ProcessingMemoryStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMemoryStatus::Capturing => "capturing",
            ProcessingMemoryStatus::Processing => "processing",
            ProcessingMemoryStatus::Done => "done",
            ProcessingMemoryStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ProcessingMemoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingMemoryStatus {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProcessingMemoryStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| EventError::validation(format!("unknown processing status `{s}`")))
    }
}

impl From<ProcessingMemoryStatus> for String {
    fn from(status: ProcessingMemoryStatus) -> Self {
        status.as_str().to_string()
    }
}

/// A memory together with the chat messages it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEvent {
    #[serde(rename = "type")]
    event_type: EventType,

    pub memory: Memory,

    #[serde(default, deserialize_with = "nullable_list")]
    pub messages: Vec<Message>,
}

impl MemoryEvent {
    pub fn new(event_type: EventType, memory: Memory) -> Self {
        Self {
            event_type,
            memory,
            messages: Vec::new(),
        }
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    pub fn event_type(&self) -> &str {
        self.event_type.as_str()
    }
}

/// A memory was created, possibly out of a processing memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMemoryCreated {
    #[serde(rename = "type")]
    event_type: EventType,

    #[serde(default)]
    pub processing_memory_id: Option<String>,

    #[serde(default)]
    pub memory_id: Option<String>,

    #[serde(default, deserialize_with = "nullable_list")]
    pub message_ids: Vec<String>,

    pub memory: Memory,

    #[serde(default, deserialize_with = "nullable_list")]
    pub messages: Vec<Message>,
}

impl NewMemoryCreated {
    pub fn new(event_type: EventType, memory: Memory) -> Self {
        Self {
            event_type,
            processing_memory_id: None,
            memory_id: None,
            message_ids: Vec::new(),
            memory,
            messages: Vec::new(),
        }
    }

    pub fn with_processing_memory_id(mut self, id: impl Into<String>) -> Self {
        self.processing_memory_id = Some(id.into());
        self
    }

    pub fn with_memory_id(mut self, id: impl Into<String>) -> Self {
        self.memory_id = Some(id.into());
        self
    }

    pub fn with_message_ids(mut self, message_ids: Vec<String>) -> Self {
        self.message_ids = message_ids;
        self
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    pub fn event_type(&self) -> &str {
        self.event_type.as_str()
    }
}

/// A processing memory started buffering a capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProcessingMemoryCreated {
    #[serde(rename = "type")]
    event_type: EventType,

    #[serde(default)]
    pub processing_memory_id: Option<String>,

    #[serde(default)]
    pub memory_id: Option<String>,
}

impl NewProcessingMemoryCreated {
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            processing_memory_id: None,
            memory_id: None,
        }
    }

    pub fn with_processing_memory_id(mut self, id: impl Into<String>) -> Self {
        self.processing_memory_id = Some(id.into());
        self
    }

    pub fn with_memory_id(mut self, id: impl Into<String>) -> Self {
        self.memory_id = Some(id.into());
        self
    }

    pub fn event_type(&self) -> &str {
        self.event_type.as_str()
    }
}

/// A processing memory moved to another state.
///
/// The status is a free-form string on the wire; [`ProcessingMemoryStatus`]
/// covers the values the processing pipeline emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingMemoryStatusChanged {
    #[serde(rename = "type")]
    event_type: EventType,

    #[serde(default)]
    pub processing_memory_id: Option<String>,

    #[serde(default)]
    pub processing_memory_status: Option<String>,

    #[serde(default)]
    pub memory_id: Option<String>,
}

impl ProcessingMemoryStatusChanged {
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            processing_memory_id: None,
            processing_memory_status: None,
            memory_id: None,
        }
    }

    pub fn with_processing_memory_id(mut self, id: impl Into<String>) -> Self {
        self.processing_memory_id = Some(id.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.processing_memory_status = Some(status.into());
        self
    }

    pub fn with_memory_id(mut self, id: impl Into<String>) -> Self {
        self.memory_id = Some(id.into());
        self
    }

    /// Status parsed into a known value, if it is one
    pub fn known_status(&self) -> Option<ProcessingMemoryStatus> {
        self.processing_memory_status.as_deref()?.parse().ok()
    }

    pub fn event_type(&self) -> &str {
        self.event_type.as_str()
    }
}

/// Offline recordings were synced back and turned into memories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBackwardSyncedEvent {
    #[serde(rename = "type")]
    event_type: EventType,

    /// Name of the synced recording
    #[serde(default)]
    pub name: Option<String>,
}

impl MemoryBackwardSyncedEvent {
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn event_type(&self) -> &str {
        self.event_type.as_str()
    }
}

/// Health of the message service, tagged `service_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageServiceStatusEvent {
    #[serde(rename = "type")]
    event_type: ServiceStatusTag,

    pub status: String,

    #[serde(default)]
    pub status_text: Option<String>,
}

impl MessageServiceStatusEvent {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            event_type: ServiceStatusTag,
            status: status.into(),
            status_text: None,
        }
    }

    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = Some(text.into());
        self
    }

    pub fn event_type(&self) -> &str {
        ServiceStatusTag::VALUE
    }
}

/// Heartbeat, tagged `ping`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingEvent {
    #[serde(rename = "type")]
    event_type: PingTag,
}

impl PingEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_type(&self) -> &str {
        PingTag::VALUE
    }
}

/// Id of the most recent memory, tagged `last_memory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMemoryEvent {
    #[serde(rename = "type")]
    event_type: LastMemoryTag,

    pub memory_id: String,
}

impl LastMemoryEvent {
    pub fn new(memory_id: impl Into<String>) -> Self {
        Self {
            event_type: LastMemoryTag,
            memory_id: memory_id.into(),
        }
    }

    pub fn event_type(&self) -> &str {
        LastMemoryTag::VALUE
    }
}

/// Any memory lifecycle event.
///
/// Serializes as the wrapped variant, so the output is always a flat object
/// with a `type` key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageEvent {
    Memory(MemoryEvent),
    NewMemoryCreated(NewMemoryCreated),
    NewProcessingMemoryCreated(NewProcessingMemoryCreated),
    ProcessingMemoryStatusChanged(ProcessingMemoryStatusChanged),
    MemoryBackwardSynced(MemoryBackwardSyncedEvent),
    ServiceStatus(MessageServiceStatusEvent),
    Ping(PingEvent),
    LastMemory(LastMemoryEvent),
}

impl MessageEvent {
    /// Discriminator written under `type`
    pub fn event_type(&self) -> &str {
        match self {
            MessageEvent::Memory(e) => e.event_type(),
            MessageEvent::NewMemoryCreated(e) => e.event_type(),
            MessageEvent::NewProcessingMemoryCreated(e) => e.event_type(),
            MessageEvent::ProcessingMemoryStatusChanged(e) => e.event_type(),
            MessageEvent::MemoryBackwardSynced(e) => e.event_type(),
            MessageEvent::ServiceStatus(e) => e.event_type(),
            MessageEvent::Ping(e) => e.event_type(),
            MessageEvent::LastMemory(e) => e.event_type(),
        }
    }

    /// Payload layout, or `None` for the fixed-tag events
    pub fn shape(&self) -> Option<EventShape> {
        match self {
            MessageEvent::Memory(_) => Some(EventShape::Memory),
            MessageEvent::NewMemoryCreated(_) => Some(EventShape::NewMemoryCreated),
            MessageEvent::NewProcessingMemoryCreated(_) => {
                Some(EventShape::NewProcessingMemoryCreated)
            }
            MessageEvent::ProcessingMemoryStatusChanged(_) => {
                Some(EventShape::ProcessingMemoryStatusChanged)
            }
            MessageEvent::MemoryBackwardSynced(_) => Some(EventShape::MemoryBackwardSynced),
            MessageEvent::ServiceStatus(_) | MessageEvent::Ping(_) | MessageEvent::LastMemory(_) => {
                None
            }
        }
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for MessageEvent {
                fn from(event: $ty) -> Self {
                    MessageEvent::$variant(event)
                }
            }
        )*
    };
}

impl_from_variant!(
    Memory(MemoryEvent),
    NewMemoryCreated(NewMemoryCreated),
    NewProcessingMemoryCreated(NewProcessingMemoryCreated),
    ProcessingMemoryStatusChanged(ProcessingMemoryStatusChanged),
    MemoryBackwardSynced(MemoryBackwardSyncedEvent),
    ServiceStatus(MessageServiceStatusEvent),
    Ping(PingEvent),
    LastMemory(LastMemoryEvent),
);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_fixed_tags_need_no_event_type() {
        assert_eq!(PingEvent::new().event_type(), "ping");
        assert_eq!(MessageServiceStatusEvent::new("ok").event_type(), "service_status");
        assert_eq!(LastMemoryEvent::new("m1").event_type(), "last_memory");
    }

    #[test]
    fn test_caller_supplied_event_type() {
        let memory = Memory::new("mem-1", Utc::now());
        let event = MemoryEvent::new(EventType::MEMORY_PROCESSING_STARTED, memory);
        assert_eq!(event.event_type(), "memory_processing_started");
        assert!(event.messages.is_empty());
    }

    #[test]
    fn test_list_fields_default_empty() {
        let memory = Memory::new("mem-1", Utc::now());
        let event = NewMemoryCreated::new(EventType::NEW_MEMORY_CREATED, memory)
            .with_processing_memory_id("pm-1");

        assert!(event.message_ids.is_empty());
        assert!(event.messages.is_empty());
        assert_eq!(event.processing_memory_id.as_deref(), Some("pm-1"));
        assert!(event.memory_id.is_none());
    }

    #[test]
    fn test_known_status() {
        let event = ProcessingMemoryStatusChanged::new(EventType::PROCESSING_MEMORY_STATUS_CHANGED)
            .with_status(ProcessingMemoryStatus::Done);
        assert_eq!(event.processing_memory_status.as_deref(), Some("done"));
        assert_eq!(event.known_status(), Some(ProcessingMemoryStatus::Done));

        let custom = ProcessingMemoryStatusChanged::new(EventType::PROCESSING_MEMORY_STATUS_CHANGED)
            .with_status("archived");
        assert_eq!(custom.known_status(), None);
    }

    #[test]
    fn test_message_event_dispatch() {
        let event: MessageEvent = LastMemoryEvent::new("m1").into();
        assert_eq!(event.event_type(), "last_memory");
        assert_eq!(event.shape(), None);

        let event: MessageEvent =
            MemoryBackwardSyncedEvent::new(EventType::MEMORY_BACKWARD_SYNCED).into();
        assert_eq!(event.event_type(), "memory_backward_synced");
        assert_eq!(event.shape(), Some(EventShape::MemoryBackwardSynced));
    }

    #[test]
    fn test_event_shape_display_matches_serde() {
        for shape in EventShape::ALL {
            let json = serde_json::to_value(shape).unwrap();
            assert_eq!(json, serde_json::Value::String(shape.to_string()));
            assert_eq!(shape.as_str().parse::<EventShape>().unwrap(), shape);
        }
        assert!("Memory".parse::<EventShape>().unwrap_err().is_validation());
    }

    #[test]
    fn test_processing_status_parse_matches_serde() {
        for status in ProcessingMemoryStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, serde_json::Value::String(status.as_str().to_string()));
            assert_eq!(status.as_str().parse::<ProcessingMemoryStatus>().unwrap(), status);
        }
        assert!("archived"
            .parse::<ProcessingMemoryStatus>()
            .unwrap_err()
            .is_validation());
    }
}
