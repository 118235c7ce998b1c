//! Conversation record access
//!
//! The conversation file is owned by the external assistant and its schema
//! is treated as fixed, so records are kept as raw `serde_json::Value`s and
//! only the fields we understand are interpreted. Unknown fields survive a
//! rewrite untouched.

use crate::error::StoreError;
use serde_json::Value;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// A parsed conversation file: an ordered JSON array of messages
#[derive(Debug, Clone)]
pub struct ConversationRecord {
    pub path: PathBuf,
    pub messages: Vec<Value>,
}

impl ConversationRecord {
    /// Load and parse a conversation file
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        let value: Value = serde_json::from_str(&raw).map_err(|e| StoreError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        let messages = match value {
            Value::Array(messages) => messages,
            _ => {
                return Err(StoreError::NotAnArray {
                    path: path.to_path_buf(),
                })
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            messages,
        })
    }

    /// Serialize the full record for writing back
    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec_pretty(&Value::Array(self.messages.clone())).map_err(|e| {
            StoreError::Parse {
                path: self.path.clone(),
                source: e,
            }
        })
    }
}

/// Stable identity of a message captured at read time.
///
/// Position alone is fragile under concurrent external writers; the content
/// hash lets a later re-read detect that the target moved or changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageKey {
    pub index: usize,
    pub content_hash: u64,
}

impl MessageKey {
    pub fn of(index: usize, message: &Value) -> Self {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        message_text(message).hash(&mut hasher);
        Self {
            index,
            content_hash: hasher.finish(),
        }
    }

    /// Check that the message at `index` in a freshly parsed record still
    /// carries the content this key was captured from.
    pub fn matches(&self, messages: &[Value]) -> bool {
        messages
            .get(self.index)
            .map(|m| MessageKey::of(self.index, m) == *self)
            .unwrap_or(false)
    }
}

/// A located message plus its identity key
#[derive(Debug, Clone)]
pub struct MessageRef {
    pub key: MessageKey,
    pub text: String,
}

/// Extract the role of a message, if present
pub fn message_role(message: &Value) -> Option<&str> {
    message.get("role").and_then(|r| r.as_str())
}

/// Extract the text payload of a message.
///
/// String content is returned as-is; multipart content joins `text` parts
/// with newlines. Non-text parts (images, tool results) contribute nothing.
pub fn message_text(message: &Value) -> String {
    let content = match message.get("content") {
        Some(c) => c,
        None => return String::new(),
    };

    if let Some(s) = content.as_str() {
        return s.to_string();
    }

    if let Some(parts) = content.as_array() {
        let texts: Vec<&str> = parts
            .iter()
            .filter(|p| p.get("type").and_then(|t| t.as_str()) == Some("text"))
            .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
            .collect();
        return texts.join("\n");
    }

    String::new()
}

/// Apply `f` to every mutable text payload of a message.
///
/// Multipart structure is preserved: only `text` parts are visited, and a
/// plain-string `content` is visited as a single payload.
pub fn for_each_text_payload(message: &mut Value, mut f: impl FnMut(&mut String)) {
    let Some(content) = message.get_mut("content") else {
        return;
    };

    if content.is_string() {
        let mut text = content.as_str().unwrap_or_default().to_string();
        f(&mut text);
        *content = Value::String(text);
        return;
    }

    if let Some(parts) = content.as_array_mut() {
        for part in parts {
            if part.get("type").and_then(|t| t.as_str()) != Some("text") {
                continue;
            }
            let Some(text_value) = part.get_mut("text") else {
                continue;
            };
            if let Some(s) = text_value.as_str() {
                let mut text = s.to_string();
                f(&mut text);
                *text_value = Value::String(text);
            }
        }
    }
}

/// Concatenated text of all user-role messages
pub fn collect_user_text(messages: &[Value]) -> String {
    let texts: Vec<String> = messages
        .iter()
        .filter(|m| message_role(m) == Some("user"))
        .map(message_text)
        .filter(|t| !t.is_empty())
        .collect();
    texts.join("\n")
}

/// Locate the most recent user message, scanning backward
pub fn latest_user_message(messages: &[Value]) -> Option<MessageRef> {
    for (index, message) in messages.iter().enumerate().rev() {
        if message_role(message) == Some("user") {
            return Some(MessageRef {
                key: MessageKey::of(index, message),
                text: message_text(message),
            });
        }
    }
    None
}
