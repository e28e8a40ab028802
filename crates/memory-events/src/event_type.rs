//! Event discriminators.
//!
//! Three events carry a tag fixed at compile time (`ping`, `service_status`,
//! `last_memory`). The remaining events take an [`EventType`] chosen by the
//! caller when the event is built; it cannot be changed afterwards.

use std::borrow::{Borrow, Cow};
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::EventError;

/// Discriminator of [`PingEvent`](crate::PingEvent)
pub const PING_TYPE: &str = "ping";

/// Discriminator of [`MessageServiceStatusEvent`](crate::MessageServiceStatusEvent)
pub const SERVICE_STATUS_TYPE: &str = "service_status";

/// Discriminator of [`LastMemoryEvent`](crate::LastMemoryEvent)
pub const LAST_MEMORY_TYPE: &str = "last_memory";

/// Discriminators owned by the fixed-tag events.
pub const RESERVED_TYPES: [&str; 3] = [PING_TYPE, SERVICE_STATUS_TYPE, LAST_MEMORY_TYPE];

/// Caller-supplied discriminator of a memory lifecycle event.
///
/// Must be non-empty, free of surrounding whitespace and distinct from the
/// fixed tags in [`RESERVED_TYPES`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventType(Cow<'static, str>);

impl EventType {
    /// A memory finished processing
    pub const MEMORY_CREATED: EventType = EventType(Cow::Borrowed("memory_created"));

    /// Summary generation for a memory started
    pub const MEMORY_PROCESSING_STARTED: EventType =
        EventType(Cow::Borrowed("memory_processing_started"));

    /// A memory was created from a processing memory
    pub const NEW_MEMORY_CREATED: EventType = EventType(Cow::Borrowed("new_memory_created"));

    /// A new capture started buffering
    pub const NEW_PROCESSING_MEMORY_CREATED: EventType =
        EventType(Cow::Borrowed("new_processing_memory_created"));

    pub const PROCESSING_MEMORY_STATUS_CHANGED: EventType =
        EventType(Cow::Borrowed("processing_memory_status_changed"));

    /// Offline recordings were synced back from the device
    pub const MEMORY_BACKWARD_SYNCED: EventType =
        EventType(Cow::Borrowed("memory_backward_synced"));

    /// Validate and wrap a discriminator
    pub fn new(value: impl Into<String>) -> Result<Self, EventError> {
        let value = value.into();
        validate(&value)?;
        Ok(Self(Cow::Owned(value)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate(value: &str) -> Result<(), EventError> {
    if value.is_empty() {
        return Err(EventError::validation("event type must not be empty"));
    }
    if value.trim() != value {
        return Err(EventError::validation(format!(
            "event type `{value}` must not have surrounding whitespace"
        )));
    }
    if RESERVED_TYPES.contains(&value) {
        return Err(EventError::validation(format!(
            "event type `{value}` is reserved for a fixed-tag event"
        )));
    }
    Ok(())
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for EventType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for EventType {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for EventType {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::new(s)
    }
}

impl TryFrom<String> for EventType {
    type Error = EventError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        EventType::new(value)
    }
}

impl TryFrom<&str> for EventType {
    type Error = EventError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        EventType::new(value)
    }
}

impl Serialize for EventType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        EventType::new(value).map_err(de::Error::custom)
    }
}

/// Declares a zero-sized tag that (de)serializes as one fixed string.
macro_rules! fixed_tag {
    ($(#[$meta:meta])* $name:ident => $value:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl $name {
            pub const VALUE: &'static str = $value;
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(Self::VALUE)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                if value == Self::VALUE {
                    Ok($name)
                } else {
                    Err(de::Error::invalid_value(
                        de::Unexpected::Str(&value),
                        &Self::VALUE,
                    ))
                }
            }
        }
    };
}

fixed_tag!(
    /// Tag of heartbeat events
    PingTag => PING_TYPE
);

fixed_tag!(
    /// Tag of service status events
    ServiceStatusTag => SERVICE_STATUS_TYPE
);

fixed_tag!(
    /// Tag of last-memory events
    LastMemoryTag => LAST_MEMORY_TYPE
);
