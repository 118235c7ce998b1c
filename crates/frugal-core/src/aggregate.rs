//! Context aggregation over a task directory
//!
//! Sums the estimated token footprint of the conversation's user messages
//! plus any auxiliary cache/state files sitting next to it. Parse failures
//! skip the offending file and aggregation continues; totals are transient
//! and recomputed every cycle.

use crate::extract::extract_file_blocks;
use crate::settings::OptimizationSettings;
use frugal_store::{
    collect_user_text, estimate_tokens, estimate_tokens_calibrated, latest_user_message,
    ConversationRecord, MessageRef, TaskDir,
};
use std::collections::HashMap;
use std::path::PathBuf;

/// Auxiliary files always checked in a task directory
pub const AUX_FILENAMES: &[&str] = &[
    "ui_messages.json",
    "task_metadata.json",
    "workspace_snapshot.json",
    "context_history.json",
    "memory.json",
];

/// Sibling files below this size are ignored (bytes)
const AUX_SIZE_FLOOR: u64 = 1_000;

/// Transient aggregate over auxiliary files
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    pub estimated_tokens: usize,
    pub per_file_tokens: HashMap<String, usize>,
    pub found_paths: Vec<PathBuf>,
    pub total_bytes: u64,
}

/// Full analysis of one task's context footprint
#[derive(Debug, Clone)]
pub struct TaskAnalysis {
    pub task_id: String,
    pub conversation_tokens: usize,
    pub cache: CacheSnapshot,
    /// Distinct file blocks referenced in the latest user message
    pub file_block_count: usize,
    pub latest_user: Option<MessageRef>,
}

impl TaskAnalysis {
    pub fn total_tokens(&self) -> usize {
        self.conversation_tokens + self.cache.estimated_tokens
    }
}

/// Analyze one task: conversation tokens + cache tokens + block count
pub fn analyze_task(task: &TaskDir, settings: &OptimizationSettings) -> TaskAnalysis {
    let conversation_path = task.conversation_path();

    let (conversation_tokens, latest_user) = match ConversationRecord::load(&conversation_path) {
        Ok(record) => {
            let user_text = collect_user_text(&record.messages);
            let tokens = estimate(&user_text, settings);
            (tokens, latest_user_message(&record.messages))
        }
        Err(e) => {
            tracing::warn!(task = %task.task_id, error = %e, "skipping unreadable conversation");
            (0, None)
        }
    };

    let file_block_count = latest_user
        .as_ref()
        .map(|m| extract_file_blocks(&m.text).len())
        .unwrap_or(0);

    let cache = scan_cache_files(task, settings);

    TaskAnalysis {
        task_id: task.task_id.clone(),
        conversation_tokens,
        cache,
        file_block_count,
        latest_user,
    }
}

/// Settings pick between the fixed divisor and the content-aware one
fn estimate(text: &str, settings: &OptimizationSettings) -> usize {
    if settings.calibrated_estimation {
        estimate_tokens_calibrated(text)
    } else {
        estimate_tokens(text, settings.chars_per_token)
    }
}

fn scan_cache_files(task: &TaskDir, settings: &OptimizationSettings) -> CacheSnapshot {
    let mut snapshot = CacheSnapshot::default();

    let entries = match std::fs::read_dir(&task.dir) {
        Ok(e) => e,
        Err(_) => return snapshot,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n.to_string(),
            None => continue,
        };

        if name == frugal_store::CONVERSATION_FILENAME || !path.is_file() {
            continue;
        }

        let fixed = AUX_FILENAMES.contains(&name.as_str());
        if !fixed {
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            if size <= AUX_SIZE_FLOOR {
                continue;
            }
            let lower = name.to_lowercase();
            let interesting =
                lower.contains("cache") || lower.ends_with(".txt") || lower.ends_with(".md");
            if !interesting {
                continue;
            }
        }

        let Ok(text) = std::fs::read_to_string(&path) else {
            tracing::warn!(file = %path.display(), "skipping unreadable cache file");
            continue;
        };

        let tokens = estimate(&text, settings);
        snapshot.estimated_tokens += tokens;
        snapshot.total_bytes += text.len() as u64;
        snapshot.per_file_tokens.insert(name, tokens);
        snapshot.found_paths.push(path);
    }

    snapshot
}
