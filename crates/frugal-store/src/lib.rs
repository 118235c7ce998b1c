//! Conversation store I/O: task discovery, record parsing, atomic writes

mod conversation;
mod error;
mod io;
mod paths;
mod tokens;

pub use conversation::{
    collect_user_text, for_each_text_payload, latest_user_message, message_role, message_text,
    ConversationRecord, MessageKey, MessageRef,
};
pub use error::StoreError;
pub use io::{atomic_write, backup_file};
pub use paths::{Paths, TaskDir, CONVERSATION_FILENAME};
pub use tokens::{estimate_tokens, estimate_tokens_calibrated, DEFAULT_CHARS_PER_TOKEN};
