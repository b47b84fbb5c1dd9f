//! Conversation log
//!
//! A [`Conversation`] is an ordered, append-only list of turns. Appending is a
//! pure operation: [`Conversation::append_turn`] returns a new value and never
//! touches the receiver, so a caller can branch a conversation (for a retry or
//! an alternative question) without corrupting the original.
//!
//! Role alternation is deliberately not validated. Two consecutive `User`
//! turns are accepted as-is; whether the remote model tolerates them is
//! between the caller and the service.

use serde::{Deserialize, Serialize};

use super::file::FileHandle;

/// Speaker of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    /// The model; `"model"` is accepted as an alias when deserializing.
    #[serde(alias = "model")]
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One piece of turn content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Part {
    Text { value: String },
    FileRef { handle: FileHandle },
}

impl Part {
    pub fn text(value: impl Into<String>) -> Self {
        Part::Text {
            value: value.into(),
        }
    }

    pub fn file(handle: FileHandle) -> Self {
        Part::FileRef { handle }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { value } => Some(value),
            Part::FileRef { .. } => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileHandle> {
        match self {
            Part::FileRef { handle } => Some(handle),
            Part::Text { .. } => None,
        }
    }
}

/// A role plus its non-empty list of parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl ConversationTurn {
    /// Build a turn: the text part first, then one file part per handle in order.
    pub fn new(role: Role, text: impl Into<String>, handles: &[FileHandle]) -> Self {
        let mut parts = Vec::with_capacity(1 + handles.len());
        parts.push(Part::text(text));
        parts.extend(handles.iter().cloned().map(Part::file));
        Self { role, parts }
    }

    /// Concatenated text of all text parts.
    pub fn text(&self) -> String {
        self.parts.iter().filter_map(Part::as_text).collect()
    }

    /// File handles referenced by this turn.
    pub fn files(&self) -> impl Iterator<Item = &FileHandle> {
        self.parts.iter().filter_map(Part::as_file)
    }
}

/// A `{role, text}` chat log entry as sent by a web client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Ordered, append-only sequence of turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single synthetic user turn used for stateless prompts.
    pub fn prompt(text: impl Into<String>, handles: &[FileHandle]) -> Self {
        Self::new().append_turn(Role::User, text, handles)
    }

    /// Build a conversation from a chat log, attaching `handles` to the first
    /// turn only.
    pub fn from_messages(messages: &[ChatMessage], handles: &[FileHandle]) -> Self {
        messages
            .iter()
            .enumerate()
            .fold(Self::new(), |conversation, (i, message)| {
                let files = if i == 0 { handles } else { &[] };
                conversation.append_turn(message.role, message.text.clone(), files)
            })
    }

    /// Return a new conversation with one more turn; `self` is left unchanged.
    #[must_use]
    pub fn append_turn(&self, role: Role, text: impl Into<String>, handles: &[FileHandle]) -> Self {
        let mut turns = Vec::with_capacity(self.turns.len() + 1);
        turns.extend_from_slice(&self.turns);
        turns.push(ConversationTurn::new(role, text, handles));
        Self { turns }
    }

    /// Shorthand for appending a user turn.
    #[must_use]
    pub fn user(&self, text: impl Into<String>, handles: &[FileHandle]) -> Self {
        self.append_turn(Role::User, text, handles)
    }

    /// Shorthand for appending an assistant turn without files.
    #[must_use]
    pub fn assistant(&self, text: impl Into<String>) -> Self {
        self.append_turn(Role::Assistant, text, &[])
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// Total number of parts across all turns.
    pub fn part_count(&self) -> usize {
        self.turns.iter().map(|t| t.parts.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handles() -> Vec<FileHandle> {
        vec![
            FileHandle::new("https://files.example/a", "application/pdf"),
            FileHandle::new("https://files.example/b", "text/plain"),
        ]
    }

    #[test]
    fn append_leaves_original_untouched() {
        let base = Conversation::new().user("hello", &[]).assistant("hi there");
        let snapshot = base.clone();

        let next = base.append_turn(Role::User, "summarise this", &handles());

        assert_eq!(base, snapshot);
        assert_eq!(next.len(), base.len() + 1);
        assert_eq!(&next.turns()[..base.len()], base.turns());
    }

    #[test]
    fn parts_are_text_then_files_in_order() {
        let files = handles();
        let conversation = Conversation::new().append_turn(Role::User, "look", &files);
        let turn = conversation.last().unwrap();

        assert_eq!(turn.parts.len(), 1 + files.len());
        assert_eq!(turn.parts[0], Part::text("look"));
        let attached: Vec<_> = turn.files().cloned().collect();
        assert_eq!(attached, files);
    }

    #[test]
    fn same_role_turns_are_accepted() {
        let conversation = Conversation::new().user("one", &[]).user("two", &[]);
        assert_eq!(conversation.len(), 2);
        assert!(conversation.turns().iter().all(|t| t.role == Role::User));
    }

    #[test]
    fn branches_diverge_independently() {
        let base = Conversation::prompt("question", &[]);
        let a = base.assistant("answer a");
        let b = base.assistant("answer b");
        assert_eq!(base.len(), 1);
        assert_eq!(a.last().unwrap().text(), "answer a");
        assert_eq!(b.last().unwrap().text(), "answer b");
    }

    #[test]
    fn from_messages_attaches_files_to_first_turn() {
        let messages = vec![
            ChatMessage::user("what is in the notes?"),
            ChatMessage::assistant("they cover recursion"),
            ChatMessage::user("quiz me"),
        ];
        let conversation = Conversation::from_messages(&messages, &handles());

        assert_eq!(conversation.len(), 3);
        assert_eq!(conversation.turns()[0].files().count(), 2);
        assert_eq!(conversation.turns()[1].files().count(), 0);
        assert_eq!(conversation.turns()[2].files().count(), 0);
        assert_eq!(conversation.turns()[1].role, Role::Assistant);
    }

    #[test]
    fn role_accepts_model_alias() {
        let role: Role = serde_json::from_str("\"model\"").unwrap();
        assert_eq!(role, Role::Assistant);
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn part_wire_shape() {
        let json = serde_json::to_value(Part::file(handles()[0].clone())).unwrap();
        assert_eq!(json["kind"], "fileRef");
        assert_eq!(json["handle"]["mimeType"], "application/pdf");
        let json = serde_json::to_value(Part::text("x")).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "text", "value": "x"}));
    }
}
