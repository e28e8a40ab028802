//! Memory record type.
//!
//! A memory is the processed result of a captured conversation: its transcript,
//! a structured summary and lifecycle flags. Events carry memories by value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the memory was captured from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemorySource {
    /// Wearable device
    #[default]
    Friend,
    /// OpenGlass camera
    Openglass,
    /// Screenpipe desktop capture
    Screenpipe,
    /// Workflow trigger
    Workflow,
    /// Offline audio synced from the device SD card
    Sdcard,
    /// Third-party integration
    ExternalIntegration,
}

/// Processing state of a memory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryStatus {
    /// Still capturing audio
    InProgress,
    /// Capture finished, summary being generated
    Processing,
    /// Summary available
    #[default]
    Completed,
    /// Processing gave up
    Failed,
}

impl std::fmt::Display for MemoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemoryStatus::InProgress => write!(f, "in_progress"),
            MemoryStatus::Processing => write!(f, "processing"),
            MemoryStatus::Completed => write!(f, "completed"),
            MemoryStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A follow-up extracted from the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

/// Generated summary of a memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structured {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default = "default_emoji")]
    pub emoji: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
}

fn default_emoji() -> String {
    "🧠".to_string()
}

fn default_category() -> String {
    "other".to_string()
}

impl Structured {
    /// Create a summary with a title and overview
    pub fn new(title: impl Into<String>, overview: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            overview: overview.into(),
            emoji: default_emoji(),
            category: default_category(),
            action_items: Vec::new(),
        }
    }
}

/// One speaker turn of the transcript.
///
/// `start` and `end` are offsets in seconds from the start of the recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub speaker_id: u32,
    #[serde(default)]
    pub is_user: bool,
    pub start: f64,
    pub end: f64,
}

/// A processed conversation memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    /// Unique identifier
    pub id: String,

    /// When the memory record was created
    pub created_at: DateTime<Utc>,

    /// When capture started
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,

    /// When capture finished
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub source: MemorySource,

    /// Detected transcript language (BCP 47)
    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub structured: Structured,

    #[serde(default)]
    pub transcript_segments: Vec<TranscriptSegment>,

    #[serde(default)]
    pub status: MemoryStatus,

    /// Processing memory this memory was produced from, if any
    #[serde(default)]
    pub processing_memory_id: Option<String>,

    #[serde(default)]
    pub discarded: bool,

    #[serde(default)]
    pub deleted: bool,
}

impl Memory {
    /// Create a completed, empty memory
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            created_at,
            started_at: None,
            finished_at: None,
            source: MemorySource::default(),
            language: None,
            structured: Structured::default(),
            transcript_segments: Vec::new(),
            status: MemoryStatus::default(),
            processing_memory_id: None,
            discarded: false,
            deleted: false,
        }
    }

    /// Set the capture window
    pub fn with_capture_window(
        mut self,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        self.started_at = Some(started_at);
        self.finished_at = Some(finished_at);
        self
    }

    pub fn with_source(mut self, source: MemorySource) -> Self {
        self.source = source;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the generated summary
    pub fn with_structured(mut self, structured: Structured) -> Self {
        self.structured = structured;
        self
    }

    pub fn with_transcript(mut self, segments: Vec<TranscriptSegment>) -> Self {
        self.transcript_segments = segments;
        self
    }

    pub fn with_status(mut self, status: MemoryStatus) -> Self {
        self.status = status;
        self
    }

    /// Link the memory to the processing memory it came from
    pub fn with_processing_memory_id(mut self, id: impl Into<String>) -> Self {
        self.processing_memory_id = Some(id.into());
        self
    }

    /// Full transcript text, one segment per line
    pub fn transcript_text(&self) -> String {
        self.transcript_segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
