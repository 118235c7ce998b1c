//! Trigger decision state machine
//!
//! `IDLE -> ANALYZING -> {TRIGGER, NO_TRIGGER} -> IDLE` per change event.
//! Conditions are evaluated in priority order with short-circuiting, and
//! the task that was most recently optimized is suppressed until a
//! different task shows up (the engine's own rewrite notifies the watcher
//! too, and must not re-fire).

use crate::aggregate::TaskAnalysis;
use crate::settings::OptimizationSettings;
use serde::{Deserialize, Serialize};

/// Token floor used by aggressive mode regardless of configured thresholds
pub const AGGRESSIVE_TOKEN_FLOOR: usize = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Idle,
    Analyzing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerReason {
    #[serde(rename = "token threshold exceeded")]
    TokenThreshold,
    #[serde(rename = "file count exceeded")]
    FileCount,
    #[serde(rename = "aggressive mode")]
    AggressiveMode,
    #[serde(rename = "within limits")]
    WithinLimits,
    #[serde(rename = "recently optimized")]
    RecentlyOptimized,
    #[serde(rename = "optimization disabled")]
    Disabled,
}

impl TriggerReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TokenThreshold => "token threshold exceeded",
            Self::FileCount => "file count exceeded",
            Self::AggressiveMode => "aggressive mode",
            Self::WithinLimits => "within limits",
            Self::RecentlyOptimized => "recently optimized",
            Self::Disabled => "optimization disabled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerDecision {
    pub triggered: bool,
    pub reason: TriggerReason,
    pub total_tokens: usize,
    pub file_block_count: usize,
}

/// Owned by the watcher loop; no global state
#[derive(Debug, Default)]
pub struct TriggerEngine {
    state: TriggerState,
    last_applied_task: Option<String>,
}

impl Default for TriggerState {
    fn default() -> Self {
        Self::Idle
    }
}

impl TriggerEngine {
    pub fn new() -> Self {
        Self {
            state: TriggerState::Idle,
            last_applied_task: None,
        }
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// Record that an optimization was applied; this task is suppressed
    /// until a different task is observed.
    pub fn mark_applied(&mut self, task_id: &str) {
        self.last_applied_task = Some(task_id.to_string());
    }

    /// Evaluate trigger conditions for one analysis pass
    pub fn evaluate(
        &mut self,
        analysis: &TaskAnalysis,
        settings: &OptimizationSettings,
    ) -> TriggerDecision {
        self.state = TriggerState::Analyzing;
        let decision = self.decide(analysis, settings);
        self.state = TriggerState::Idle;
        decision
    }

    fn decide(
        &mut self,
        analysis: &TaskAnalysis,
        settings: &OptimizationSettings,
    ) -> TriggerDecision {
        let total_tokens = analysis.total_tokens();
        let file_block_count = analysis.file_block_count;

        let no_trigger = |reason| TriggerDecision {
            triggered: false,
            reason,
            total_tokens,
            file_block_count,
        };
        let trigger = |reason| TriggerDecision {
            triggered: true,
            reason,
            total_tokens,
            file_block_count,
        };

        if !settings.enabled {
            return no_trigger(TriggerReason::Disabled);
        }

        // A different task clears suppression
        match &self.last_applied_task {
            Some(last) if *last == analysis.task_id => {
                return no_trigger(TriggerReason::RecentlyOptimized);
            }
            Some(_) => self.last_applied_task = None,
            None => {}
        }

        if total_tokens > settings.token_threshold {
            return trigger(TriggerReason::TokenThreshold);
        }
        if file_block_count > settings.file_count_threshold {
            return trigger(TriggerReason::FileCount);
        }
        if settings.aggressive_mode && total_tokens > AGGRESSIVE_TOKEN_FLOOR {
            return trigger(TriggerReason::AggressiveMode);
        }

        no_trigger(TriggerReason::WithinLimits)
    }
}
