//! # memory-events
//!
//! Event payloads that notify clients about memory lifecycle changes:
//! memory creation, processing status transitions and service heartbeats.
//!
//! Each event is an immutable record. Encoding yields a flat JSON object whose
//! `type` key holds the event's discriminator:
//!
//! - `ping`, `service_status` and `last_memory` are fixed per event
//! - the memory events take an [`EventType`] chosen by the caller
//!
//! ## Usage
//!
//! ```rust
//! use memory_events::{LastMemoryEvent, MessageEvent};
//!
//! let event: MessageEvent = LastMemoryEvent::new("m1").into();
//! let json = event.to_json().unwrap();
//! assert_eq!(json["type"], "last_memory");
//! assert_eq!(json["memory_id"], "m1");
//!
//! let decoded = MessageEvent::from_bytes(&event.to_bytes().unwrap()).unwrap();
//! assert_eq!(decoded, event);
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod event;
pub mod event_type;

pub use codec::{decode, decode_bytes, encode, encode_bytes, TypeRegistry};
pub use crate::config::{EventSettings, TypeAlias};
pub use error::EventError;
pub use event::{
    EventShape, LastMemoryEvent, MemoryBackwardSyncedEvent, MemoryEvent, MessageEvent,
    MessageServiceStatusEvent, NewMemoryCreated, NewProcessingMemoryCreated, PingEvent,
    ProcessingMemoryStatus, ProcessingMemoryStatusChanged,
};
pub use event_type::{EventType, LAST_MEMORY_TYPE, PING_TYPE, RESERVED_TYPES, SERVICE_STATUS_TYPE};

// Re-export payload record types for convenience
pub use memory_types::{Memory, Message};
