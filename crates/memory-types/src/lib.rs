//! # memory-types
//!
//! Domain records carried by memory lifecycle events.
//!
//! - `Memory`: a processed conversation with transcript and summary
//! - `Message`: a chat message that may reference memories
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Utc;
//! use memory_types::{Memory, Message, MessageSender};
//!
//! let memory = Memory::new("mem-1", Utc::now());
//! let message = Message::new("msg-1", "Saved it", Utc::now(), MessageSender::Ai);
//! ```

pub mod memory;
pub mod message;

pub use memory::{
    ActionItem, Memory, MemorySource, MemoryStatus, Structured, TranscriptSegment,
};
pub use message::{Message, MessageSender, MessageType};
