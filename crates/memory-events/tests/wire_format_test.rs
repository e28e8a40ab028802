//! Wire format tests for memory lifecycle events.
//!
//! Every event must encode to a flat JSON object carrying its discriminator
//! under `type`, never under `event_type`, and decode back to the same value.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use memory_events::{
    decode, EventError, EventShape, EventType, LastMemoryEvent, MemoryBackwardSyncedEvent,
    MemoryEvent, MessageEvent, MessageServiceStatusEvent, NewMemoryCreated,
    NewProcessingMemoryCreated, PingEvent, ProcessingMemoryStatus, ProcessingMemoryStatusChanged,
    TypeRegistry,
};
use memory_types::{Memory, MemoryStatus, Message, MessageSender, Structured, TranscriptSegment};

fn test_memory(id: &str) -> Memory {
    let created = Utc.with_ymd_and_hms(2026, 1, 30, 12, 0, 0).unwrap();
    let finished = Utc.with_ymd_and_hms(2026, 1, 30, 12, 30, 0).unwrap();
    Memory::new(id, created)
        .with_capture_window(created, finished)
        .with_language("en")
        .with_structured(Structured::new("Planning", "Sprint planning discussion"))
        .with_status(MemoryStatus::Completed)
}

fn test_message(text: &str, memory_id: &str) -> Message {
    let created = Utc.with_ymd_and_hms(2026, 1, 30, 12, 31, 0).unwrap();
    Message::new(ulid::Ulid::new().to_string(), text, created, MessageSender::Ai)
        .with_memory_ids(vec![memory_id.to_string()])
}

/// One instance of every variant.
fn all_events() -> Vec<MessageEvent> {
    let memory = test_memory("mem-1");
    let message = test_message("Saved your planning notes", "mem-1");

    vec![
        MemoryEvent::new(EventType::MEMORY_CREATED, memory.clone())
            .with_messages(vec![message.clone()])
            .into(),
        NewMemoryCreated::new(EventType::NEW_MEMORY_CREATED, memory)
            .with_processing_memory_id("pm-1")
            .with_memory_id("mem-1")
            .with_message_ids(vec![message.id.clone()])
            .with_messages(vec![message])
            .into(),
        NewProcessingMemoryCreated::new(EventType::NEW_PROCESSING_MEMORY_CREATED)
            .with_processing_memory_id("pm-2")
            .into(),
        ProcessingMemoryStatusChanged::new(EventType::PROCESSING_MEMORY_STATUS_CHANGED)
            .with_processing_memory_id("pm-2")
            .with_status(ProcessingMemoryStatus::Processing)
            .into(),
        MemoryBackwardSyncedEvent::new(EventType::MEMORY_BACKWARD_SYNCED)
            .with_name("audio_0042.bin")
            .into(),
        MessageServiceStatusEvent::new("ready")
            .with_status_text("Connected")
            .into(),
        PingEvent::new().into(),
        LastMemoryEvent::new("mem-1").into(),
    ]
}

#[test]
fn test_every_variant_has_type_and_no_event_type() {
    for event in all_events() {
        let json = event.to_json().unwrap();
        assert_eq!(
            json.get("type"),
            Some(&Value::String(event.event_type().to_string()))
        );
        assert!(
            !json.contains_key("event_type"),
            "event_type leaked for {}",
            event.event_type()
        );
    }
}

#[test]
fn test_every_variant_decodes_to_itself() {
    for event in all_events() {
        let bytes = event.to_bytes().unwrap();
        let decoded = MessageEvent::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, event);
    }
}

#[test]
fn test_documented_examples() {
    let ping = MessageEvent::from(PingEvent::new()).to_json().unwrap();
    assert_eq!(Value::Object(ping), json!({"type": "ping"}));

    let last = MessageEvent::from(LastMemoryEvent::new("m1")).to_json().unwrap();
    assert_eq!(
        Value::Object(last),
        json!({"type": "last_memory", "memory_id": "m1"})
    );

    let status = MessageEvent::from(MessageServiceStatusEvent::new("ok"))
        .to_json()
        .unwrap();
    assert_eq!(
        Value::Object(status),
        json!({"type": "service_status", "status": "ok", "status_text": null})
    );
}

#[test]
fn test_optional_fields_present_as_null_or_empty() {
    let event: MessageEvent =
        NewMemoryCreated::new(EventType::NEW_MEMORY_CREATED, test_memory("mem-2")).into();
    let json = event.to_json().unwrap();

    assert_eq!(json["processing_memory_id"], Value::Null);
    assert_eq!(json["memory_id"], Value::Null);
    assert_eq!(json["message_ids"], json!([]));
    assert_eq!(json["messages"], json!([]));

    let event: MessageEvent =
        ProcessingMemoryStatusChanged::new(EventType::PROCESSING_MEMORY_STATUS_CHANGED).into();
    let json = event.to_json().unwrap();
    let mut keys: Vec<_> = json.keys().cloned().collect();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "memory_id",
            "processing_memory_id",
            "processing_memory_status",
            "type"
        ]
    );
}

#[test]
fn test_nested_records_serialize_canonically() {
    let event: MessageEvent = MemoryEvent::new(EventType::MEMORY_CREATED, test_memory("mem-3"))
        .with_messages(vec![test_message("hello", "mem-3")])
        .into();
    let json = event.to_json().unwrap();

    assert_eq!(json["memory"]["id"], "mem-3");
    assert_eq!(json["memory"]["created_at"], "2026-01-30T12:00:00Z");
    assert_eq!(json["memory"]["finished_at"], "2026-01-30T12:30:00Z");
    assert_eq!(json["memory"]["structured"]["title"], "Planning");
    assert_eq!(json["messages"][0]["sender"], "ai");
    assert_eq!(json["messages"][0]["memory_ids"], json!(["mem-3"]));
}

#[test]
fn test_missing_required_fields_fail_validation() {
    let cases = [
        (json!({"type": "memory_created", "messages": []}), "memory"),
        (json!({"type": "new_memory_created"}), "memory"),
        (json!({"type": "service_status", "status_text": "down"}), "status"),
        (json!({"type": "last_memory"}), "memory_id"),
    ];

    for (payload, field) in cases {
        let err = MessageEvent::from_json(payload.clone()).unwrap_err();
        assert!(
            matches!(err, EventError::Validation(_)),
            "expected validation error for {payload}, got {err:?}"
        );
        assert!(
            err.to_string().contains(field),
            "error for {payload} should mention `{field}`, got: {err}"
        );
    }
}

#[test]
fn test_wrong_shape_fails_validation() {
    let err = MessageEvent::from_json(json!({
        "type": "memory_created",
        "memory": "not-a-memory"
    }))
    .unwrap_err();
    assert!(err.is_validation());

    let err = MessageEvent::from_json(json!({
        "type": "new_memory_created",
        "memory": {"id": "mem-4", "created_at": "2026-01-30T12:00:00Z"},
        "message_ids": [1, 2]
    }))
    .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_null_lists_decode_as_empty() {
    let event = MessageEvent::from_json(json!({
        "type": "new_memory_created",
        "memory": {"id": "mem-5", "created_at": "2026-01-30T12:00:00Z"},
        "message_ids": null,
        "messages": null
    }))
    .unwrap();

    let MessageEvent::NewMemoryCreated(created) = event else {
        panic!("expected NewMemoryCreated");
    };
    assert!(created.message_ids.is_empty());
    assert!(created.messages.is_empty());
    assert_eq!(created.memory.id, "mem-5");
}

#[test]
fn test_custom_discriminator_needs_registration() {
    let payload = json!({
        "type": "memory_reprocessed",
        "memory": {"id": "mem-6", "created_at": "2026-01-30T12:00:00Z"}
    });

    let err = decode(payload.clone(), &TypeRegistry::default()).unwrap_err();
    assert!(err.to_string().contains("memory_reprocessed"));

    let mut registry = TypeRegistry::default();
    registry.register(EventType::new("memory_reprocessed").unwrap(), EventShape::Memory);

    let event = decode(payload, &registry).unwrap();
    assert_eq!(event.event_type(), "memory_reprocessed");
    assert_eq!(event.shape(), Some(EventShape::Memory));
}

#[test]
fn test_encoding_is_deterministic() {
    for event in all_events() {
        assert_eq!(event.to_bytes().unwrap(), event.to_bytes().unwrap());
    }
}

fn segment(start: f64, end: f64) -> TranscriptSegment {
    TranscriptSegment {
        text: "Let's move the review to Friday".to_string(),
        speaker: Some("SPEAKER_00".to_string()),
        speaker_id: 0,
        is_user: true,
        start,
        end,
    }
}

#[test]
fn test_transcript_timings_survive_roundtrip() {
    // Fixed-seed LCG so the sweep is the same on every run
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut next = || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 11) as f64 / (1u64 << 53) as f64 * 1000.0
    };

    let mut segments = vec![segment(0.1 + 0.2, 1.0 / 3.0)];
    for _ in 0..1000 {
        let start = next();
        segments.push(segment(start, start + next()));
    }

    let event: MessageEvent = MemoryEvent::new(
        EventType::MEMORY_CREATED,
        test_memory("mem-7").with_transcript(segments.clone()),
    )
    .into();
    let decoded = MessageEvent::from_bytes(&event.to_bytes().unwrap()).unwrap();

    let MessageEvent::Memory(decoded) = decoded else {
        panic!("expected MemoryEvent");
    };
    let timings: Vec<(u64, u64)> = decoded
        .memory
        .transcript_segments
        .iter()
        .map(|s| (s.start.to_bits(), s.end.to_bits()))
        .collect();
    let expected: Vec<(u64, u64)> = segments
        .iter()
        .map(|s| (s.start.to_bits(), s.end.to_bits()))
        .collect();
    assert_eq!(timings, expected);
    assert_eq!(MessageEvent::Memory(decoded), event);
}
