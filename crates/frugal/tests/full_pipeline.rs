mod common;

use common::{seed_task, test_paths, typescript_source, wrap_block};
use frugal_condense::CondenseEngine;
use frugal_core::{OptimizationSettings, TriggerEngine, TriggerReason};
use frugal_store::{latest_user_message, message_text, ConversationRecord};
use frugal_watch::{
    apply_with_writer, optimize_task, JobDb, MutationError, OptimizationHistory, PipelineOutcome,
};
use std::fs;

#[tokio::test]
async fn test_large_conversation_optimized_in_place() {
    let temp = tempfile::TempDir::new().unwrap();
    let storage = temp.path().join("tasks");

    // Well above the 50k token threshold
    let message = format!(
        "please refactor this\n{}\nthanks",
        wrap_block("src/stages.ts", &typescript_source(2_000))
    );
    let task = seed_task(&storage, "big-task", &message);
    let original_bytes = fs::read(task.conversation_path()).unwrap();

    let settings = OptimizationSettings::new();
    let engine = CondenseEngine::new();
    let mut trigger = TriggerEngine::new();
    let history = OptimizationHistory::new();
    let ledger = JobDb::new(&temp.path().join("jobs.db")).unwrap();

    let outcome = optimize_task(
        &task,
        &settings,
        &engine,
        &mut trigger,
        &history,
        Some(&ledger),
        false,
    )
    .await
    .unwrap();

    let PipelineOutcome::Applied {
        decision,
        job,
        backup_path,
    } = outcome
    else {
        panic!("expected optimization to apply");
    };
    assert!(decision.triggered);
    assert_eq!(decision.reason, TriggerReason::TokenThreshold);
    assert!(job.tokens_saved > 0);
    assert!(job.reduction_pct > 20.0);

    // Conversation shrank but kept its structure and surrounding prose
    let record = ConversationRecord::load(&task.conversation_path()).unwrap();
    assert_eq!(record.messages.len(), 3);
    let rewritten = latest_user_message(&record.messages).unwrap();
    assert!(rewritten.text.starts_with("please refactor this"));
    assert!(rewritten.text.ends_with("thanks"));
    assert!(rewritten.text.contains("<file_content path=\"src/stages.ts\">"));
    assert!(rewritten.text.len() < message.len() / 2);

    // Earlier messages untouched
    assert_eq!(message_text(&record.messages[0]), "earlier question");
    assert_eq!(message_text(&record.messages[1]), "earlier answer");

    // Backup restores the original bytes exactly
    assert_eq!(fs::read(&backup_path).unwrap(), original_bytes);

    // Job persisted to both history and ledger
    assert_eq!(history.stats().job_count, 1);
    assert_eq!(ledger.recent(10).unwrap().len(), 1);
}

#[tokio::test]
async fn test_small_conversation_left_alone() {
    let temp = tempfile::TempDir::new().unwrap();
    let storage = temp.path().join("tasks");
    let task = seed_task(&storage, "small-task", "can you explain this function?");
    let before = fs::read(task.conversation_path()).unwrap();

    let settings = OptimizationSettings::new();
    let engine = CondenseEngine::new();
    let mut trigger = TriggerEngine::new();
    let history = OptimizationHistory::new();

    let outcome = optimize_task(
        &task, &settings, &engine, &mut trigger, &history, None, false,
    )
    .await
    .unwrap();

    let PipelineOutcome::Skipped(decision) = outcome else {
        panic!("expected skip");
    };
    assert_eq!(decision.reason, TriggerReason::WithinLimits);
    assert_eq!(fs::read(task.conversation_path()).unwrap(), before);
}

#[tokio::test]
async fn test_disabled_settings_block_optimization() {
    let temp = tempfile::TempDir::new().unwrap();
    let storage = temp.path().join("tasks");
    let message = wrap_block("src/stages.ts", &typescript_source(2_000));
    let task = seed_task(&storage, "disabled-task", &message);
    let before = fs::read(task.conversation_path()).unwrap();

    let mut settings = OptimizationSettings::new();
    settings.enabled = false;

    let engine = CondenseEngine::new();
    let mut trigger = TriggerEngine::new();
    let history = OptimizationHistory::new();

    let outcome = optimize_task(
        &task, &settings, &engine, &mut trigger, &history, None, false,
    )
    .await
    .unwrap();

    let PipelineOutcome::Skipped(decision) = outcome else {
        panic!("expected skip");
    };
    assert_eq!(decision.reason, TriggerReason::Disabled);
    assert_eq!(fs::read(task.conversation_path()).unwrap(), before);
}

#[test]
fn test_write_failure_leaves_conversation_byte_identical() {
    let temp = tempfile::TempDir::new().unwrap();
    let storage = temp.path().join("tasks");
    let message = wrap_block("src/stages.ts", &typescript_source(500));
    let task = seed_task(&storage, "fail-task", &message);
    let before = fs::read(task.conversation_path()).unwrap();

    let record = ConversationRecord::load(&task.conversation_path()).unwrap();
    let target = latest_user_message(&record.messages).unwrap().key;
    let engine = CondenseEngine::new();
    let settings = OptimizationSettings::new();

    let err = apply_with_writer(
        &task.conversation_path(),
        &target,
        &engine,
        &settings,
        |_, _| Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full")),
    )
    .unwrap_err();
    assert!(matches!(err, MutationError::Write { .. }));

    assert_eq!(fs::read(task.conversation_path()).unwrap(), before);
}

#[tokio::test]
async fn test_concurrent_append_aborts_mutation() {
    let temp = tempfile::TempDir::new().unwrap();
    let storage = temp.path().join("tasks");
    let message = wrap_block("src/stages.ts", &typescript_source(500));
    let task = seed_task(&storage, "race-task", &message);

    let record = ConversationRecord::load(&task.conversation_path()).unwrap();
    let target = latest_user_message(&record.messages).unwrap().key;

    // External assistant appends a new message before our mutation lands;
    // the target index now holds different content
    let mut messages = record.messages.clone();
    messages.insert(2, serde_json::json!({"role": "assistant", "content": "working on it"}));
    fs::write(
        task.conversation_path(),
        serde_json::to_vec_pretty(&serde_json::Value::Array(messages)).unwrap(),
    )
    .unwrap();
    let appended = fs::read(task.conversation_path()).unwrap();

    let engine = CondenseEngine::new();
    let settings = OptimizationSettings::new();
    let err = frugal_watch::apply_block_condensation(
        &task.conversation_path(),
        &target,
        &engine,
        &settings,
    )
    .unwrap_err();
    assert!(matches!(err, MutationError::StaleTarget { .. }));
    assert_eq!(fs::read(task.conversation_path()).unwrap(), appended);
}

#[test]
fn test_discovery_finds_seeded_tasks() {
    let temp = tempfile::TempDir::new().unwrap();
    let storage = temp.path().join("tasks");
    seed_task(&storage, "task-one", "hello");
    seed_task(&storage, "task-two", "world");

    let paths = test_paths(temp.path(), &storage);
    let tasks = paths.discover_tasks();
    assert_eq!(tasks.len(), 2);
    assert!(paths.find_task("task-one").is_some());
    assert!(paths.find_task("missing").is_none());
}
