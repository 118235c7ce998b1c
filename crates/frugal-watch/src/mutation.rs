//! In-place conversation rewriting
//!
//! Mutation order is fixed: re-read the file fresh, verify the target
//! message still carries the content captured at analysis time, splice
//! condensed blocks into its text payloads in memory, back up the still
//! untouched file, then write the whole record back through a temp-file
//! rename. The backup is taken only once something actually changed, so
//! runs that condense nothing leave no files behind. Any failure before
//! the rename leaves the original file byte-identical.

use crate::error::MutationError;
use frugal_condense::CondenseEngine;
use frugal_core::{extract_file_blocks, CondenseMethod, CondensedFile, OptimizationSettings};
use frugal_store::{atomic_write, backup_file, for_each_text_payload, ConversationRecord, MessageKey};
use std::io;
use std::path::{Path, PathBuf};

/// Result of one applied mutation
#[derive(Debug)]
pub struct MutationOutcome {
    /// Set only when the file was rewritten
    pub backup_path: Option<PathBuf>,
    /// Blocks whose content actually changed
    pub condensed: Vec<CondensedFile>,
    /// Target message text length before and after, in characters
    pub original_chars: usize,
    pub optimized_chars: usize,
}

impl MutationOutcome {
    /// True when at least one block was replaced and the file was rewritten
    pub fn applied(&self) -> bool {
        !self.condensed.is_empty()
    }
}

/// Condense and splice the file blocks of the target message in place.
pub fn apply_block_condensation(
    conversation_path: &Path,
    target: &MessageKey,
    engine: &CondenseEngine,
    settings: &OptimizationSettings,
) -> Result<MutationOutcome, MutationError> {
    apply_with_writer(conversation_path, target, engine, settings, atomic_write)
}

/// Same as [`apply_block_condensation`] with an injectable writer, so write
/// failures can be simulated without touching the filesystem layer.
pub fn apply_with_writer(
    conversation_path: &Path,
    target: &MessageKey,
    engine: &CondenseEngine,
    settings: &OptimizationSettings,
    writer: impl Fn(&Path, &[u8]) -> io::Result<()>,
) -> Result<MutationOutcome, MutationError> {
    // Fresh read: the external writer may have appended or rewritten since
    // analysis time.
    let mut record = ConversationRecord::load(conversation_path)?;

    if !target.matches(&record.messages) {
        tracing::warn!(
            path = %conversation_path.display(),
            index = target.index,
            "target message moved or changed since analysis"
        );
        return Err(MutationError::StaleTarget {
            path: conversation_path.to_path_buf(),
        });
    }

    let mut condensed: Vec<CondensedFile> = Vec::new();
    let mut original_chars = 0;
    let mut optimized_chars = 0;

    for_each_text_payload(&mut record.messages[target.index], |text| {
        original_chars += text.chars().count();
        condensed.extend(condense_payload(text, engine, settings));
        optimized_chars += text.chars().count();
    });

    if condensed.is_empty() {
        tracing::debug!(
            path = %conversation_path.display(),
            "no block shrank, leaving conversation untouched"
        );
        return Ok(MutationOutcome {
            backup_path: None,
            condensed,
            original_chars,
            optimized_chars,
        });
    }

    // The splice above only touched the in-memory record, so the on-disk
    // file is still the original when the backup is taken.
    let backup_path = backup_file(conversation_path).map_err(|e| MutationError::Backup {
        path: conversation_path.to_path_buf(),
        source: e,
    })?;

    let bytes = record.to_bytes()?;
    writer(conversation_path, &bytes).map_err(|e| MutationError::Write {
        path: conversation_path.to_path_buf(),
        source: e,
    })?;

    Ok(MutationOutcome {
        backup_path: Some(backup_path),
        condensed,
        original_chars,
        optimized_chars,
    })
}

/// Replace the target message's whole text payload with remote-optimized
/// content. Only used for single-payload messages.
pub fn apply_replacement(
    conversation_path: &Path,
    target: &MessageKey,
    optimized: &str,
) -> Result<MutationOutcome, MutationError> {
    let mut record = ConversationRecord::load(conversation_path)?;
    if !target.matches(&record.messages) {
        return Err(MutationError::StaleTarget {
            path: conversation_path.to_path_buf(),
        });
    }

    // The optimized content covers the joined text, so it lands in the
    // first text payload and any further text payloads are cleared.
    let mut original_chars = 0;
    let mut visited = 0usize;
    for_each_text_payload(&mut record.messages[target.index], |text| {
        original_chars += text.chars().count();
        *text = if visited == 0 {
            optimized.to_string()
        } else {
            String::new()
        };
        visited += 1;
    });

    if visited == 0 {
        tracing::debug!(
            path = %conversation_path.display(),
            index = target.index,
            "target message has no text payload, leaving conversation untouched"
        );
        return Ok(MutationOutcome {
            backup_path: None,
            condensed: Vec::new(),
            original_chars: 0,
            optimized_chars: 0,
        });
    }

    let backup_path = backup_file(conversation_path).map_err(|e| MutationError::Backup {
        path: conversation_path.to_path_buf(),
        source: e,
    })?;

    let bytes = record.to_bytes()?;
    atomic_write(conversation_path, &bytes).map_err(|e| MutationError::Write {
        path: conversation_path.to_path_buf(),
        source: e,
    })?;

    let ratio = if original_chars == 0 {
        1.0
    } else {
        optimized.len() as f64 / original_chars as f64
    };
    Ok(MutationOutcome {
        backup_path: Some(backup_path),
        condensed: vec![CondensedFile {
            path: "<message>".to_string(),
            original_size: original_chars,
            condensed_size: optimized.len(),
            content: optimized.to_string(),
            compression_ratio: ratio,
            method: CondenseMethod::RemoteOptimization,
        }],
        original_chars,
        optimized_chars: optimized.chars().count(),
    })
}

/// Condense every extracted block of one text payload, splicing changed
/// blocks back over their spans. Returns the changed blocks.
fn condense_payload(
    text: &mut String,
    engine: &CondenseEngine,
    settings: &OptimizationSettings,
) -> Vec<CondensedFile> {
    let blocks = extract_file_blocks(text);
    let mut changed: Vec<(std::ops::Range<usize>, CondensedFile)> = Vec::new();

    for block in blocks {
        let result = engine.condense_block(&block.path, &block.raw_content, settings);
        if result.method != CondenseMethod::NoCompression {
            changed.push((block.span.clone(), result));
        }
    }

    // Splice back to front so earlier spans stay valid
    changed.sort_by_key(|(span, _)| span.start);
    for (span, result) in changed.iter().rev() {
        text.replace_range(span.clone(), &result.content);
    }

    changed.into_iter().map(|(_, result)| result).collect()
}
