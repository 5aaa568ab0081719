use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Option<Vec<Message>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    #[serde(untagged)]
    Other(String),
}

/// Message content as the editor sends it: plain text, or the annotation
/// payload of an earlier assistant turn echoed back verbatim. Structured
/// content is kept as received so it can be rendered without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Structured(Value),
}

impl MessageContent {
    /// Comments of a structured payload. Entries that are not well-formed
    /// comments are skipped individually.
    pub fn comments(&self) -> impl Iterator<Item = Comment> + '_ {
        let entries: &[Value] = match self {
            MessageContent::Structured(value) => value
                .get("comments")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default(),
            MessageContent::Text(_) => &[],
        };
        entries
            .iter()
            .filter_map(|entry| Comment::deserialize(entry).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(content.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommentType {
    Replace,
    AddBefore,
    AddAfter,
    Remove,
    Question,
    #[serde(rename = "THREAD-STARTER")]
    #[schemars(skip)]
    ThreadStarter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Comment {
    #[schemars(description = "Must be verbatim and unique from the entire text")]
    pub anchor: String,
    #[serde(rename = "type")]
    #[schemars(
        description = "Must be one of: 'REPLACE', 'ADD_BEFORE', 'ADD_AFTER', 'REMOVE', 'QUESTION'"
    )]
    pub kind: CommentType,
    #[serde(default)]
    pub text: String,
}

/// Structured output with a conversational reply alongside the comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChatAnnotations {
    #[schemars(
        description = "Conversational reply to the user's message, ex. 'Sure, I can help with that.'"
    )]
    pub chat_text: String,
    pub comments: Vec<Comment>,
}

/// Structured output carrying comments only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Annotations {
    pub comments: Vec<Comment>,
}

/// Body of a successful `/chat` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChatResponse {
    Refusal { refusal: String },
    Chat(ChatAnnotations),
    Comments(Annotations),
}

impl From<ChatAnnotations> for ChatResponse {
    fn from(value: ChatAnnotations) -> Self {
        Self::Chat(value)
    }
}

impl From<Annotations> for ChatResponse {
    fn from(value: Annotations) -> Self {
        Self::Comments(value)
    }
}
