//! Conversation memory and history export.
//!
//! The conversation is an append-only log of turns. Order is the only
//! guarantee: turns are expected to alternate human/assistant but the store
//! does not enforce alternation. Memory is owned exclusively by one agent
//! bound to one session and is not thread-safe by contract.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Human => "human",
            Role::Assistant => "assistant",
        }
    }
}

/// One message in a conversation. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Role, serialized as `type` to match the export format.
    #[serde(rename = "type")]
    pub role: Role,

    /// Message text.
    pub content: String,

    /// Opaque metadata attached by whoever produced the turn. Passed
    /// through export untouched, never reinterpreted.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Turn {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: content.into(),
            metadata: Map::new(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Append-only, insertion-ordered log of turns.
#[derive(Debug, Default)]
pub struct ConversationMemory {
    turns: Vec<Turn>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn. O(1), preserves insertion order.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Read-only snapshot of all turns, in insertion order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Empty the log.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Serialize a conversation as a JSON array of `{type, content, metadata}`
/// objects, pretty-printed with 4-space indentation.
///
/// The result round-trips back into an equivalent conversation; metadata is
/// carried opaquely. An empty conversation exports as `[]`. By convention
/// callers save it as `*-chat-history.json` with MIME `application/json`.
pub fn export_history(memory: &ConversationMemory) -> Result<String, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    memory.turns().serialize(&mut serializer)?;
    // PrettyFormatter only emits UTF-8.
    Ok(String::from_utf8(out).expect("serde_json produced invalid UTF-8"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn append_preserves_insertion_order() {
        let mut memory = ConversationMemory::new();
        memory.append(Turn::human("first"));
        memory.append(Turn::assistant("second"));
        memory.append(Turn::human("third"));

        let contents: Vec<&str> = memory.turns().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn clear_empties_the_log() {
        let mut memory = ConversationMemory::new();
        memory.append(Turn::human("hello"));
        memory.clear();
        assert!(memory.is_empty());
        // Idempotent.
        memory.clear();
        assert!(memory.is_empty());
    }

    #[test]
    fn empty_conversation_exports_as_empty_array() {
        let memory = ConversationMemory::new();
        assert_eq!(export_history(&memory).expect("export"), "[]");
    }

    #[test]
    fn export_uses_four_space_indent_and_type_field() {
        let mut memory = ConversationMemory::new();
        memory.append(Turn::human("Quem foi o primeiro astronauta?"));

        let json = export_history(&memory).expect("export");
        assert!(json.contains("\n    {"));
        assert!(json.contains("\"type\": \"human\""));
        assert!(json.contains("\"content\": \"Quem foi o primeiro astronauta?\""));
    }

    #[test]
    fn export_round_trips_with_opaque_metadata() {
        let mut metadata = Map::new();
        metadata.insert("model".to_string(), json!("gpt-4o-mini"));
        metadata.insert("finish_reason".to_string(), json!({"nested": true}));

        let mut memory = ConversationMemory::new();
        memory.append(Turn::human("hi"));
        memory.append(Turn::assistant("hello").with_metadata(metadata.clone()));

        let json = export_history(&memory).expect("export");
        let parsed: Vec<Turn> = serde_json::from_str(&json).expect("re-parse");

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].role, Role::Human);
        assert_eq!(parsed[1].role, Role::Assistant);
        assert_eq!(parsed[1].metadata, metadata);
    }

    #[test]
    fn export_writes_to_a_history_file() {
        let mut memory = ConversationMemory::new();
        memory.append(Turn::human("oi"));
        memory.append(Turn::assistant("olá"));

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session-chat-history.json");
        std::fs::write(&path, export_history(&memory).expect("export")).expect("write");

        let parsed: Vec<Turn> =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("parse");
        assert_eq!(parsed.len(), 2);
    }
}
