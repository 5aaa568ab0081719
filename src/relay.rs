//! Conversation preprocessing applied before the completion call.

use std::str::FromStr;

use crate::error::RelayError;
use crate::web::models::{CommentType, Message, MessageContent, Role};

pub const MESSAGES_REQUIRED: &str = "Messages are required";

/// Which structured output the provider is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSchema {
    /// `{ chat_text, comments }`
    WithChatText,
    /// `{ comments }`
    CommentsOnly,
}

impl FromStr for ResponseSchema {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chat" => Ok(Self::WithChatText),
            "comments" => Ok(Self::CommentsOnly),
            other => Err(anyhow::anyhow!(
                "unknown response schema '{}', expected 'chat' or 'comments'",
                other
            )),
        }
    }
}

pub fn validate(messages: Option<Vec<Message>>) -> Result<Vec<Message>, RelayError> {
    match messages {
        Some(messages) if !messages.is_empty() => Ok(messages),
        _ => Err(RelayError::Validation(MESSAGES_REQUIRED.to_string())),
    }
}

/// Replaces the first assistant turn holding a `THREAD-STARTER` comment with
/// a system instruction pointing at that comment's anchor. Returns whether a
/// replacement happened.
pub fn promote_thread_focus(messages: &mut [Message]) -> bool {
    let found = messages.iter().enumerate().find_map(|(index, message)| {
        if message.role != Role::Assistant {
            return None;
        }
        message
            .content
            .comments()
            .find(|comment| comment.kind == CommentType::ThreadStarter)
            .map(|comment| (index, comment.anchor))
    });

    match found {
        Some((index, anchor)) => {
            messages[index] = Message::system(format!(
                "Focus your response on this part of the text: {}",
                anchor
            ));
            true
        }
        None => false,
    }
}

/// Renders structured assistant content as text. Every other message is
/// passed through untouched.
pub fn normalize(messages: Vec<Message>) -> Vec<Message> {
    messages
        .into_iter()
        .map(|message| match message {
            Message {
                role: Role::Assistant,
                content: MessageContent::Structured(value),
            } => Message {
                role: Role::Assistant,
                content: MessageContent::Text(value.to_string()),
            },
            other => other,
        })
        .collect()
}
