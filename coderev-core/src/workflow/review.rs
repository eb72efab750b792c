//! User satisfaction signal consulted by the `user_review` node

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::WorkflowConfig;
use crate::state::ReviewState;

/// Source of the "is the user satisfied?" answer
#[async_trait]
pub trait UserReview: Send + Sync {
    /// Decide satisfaction given the current state and the number of
    /// detailed explanations produced so far in this run
    async fn is_satisfied(&self, state: &ReviewState, explanations: u32) -> bool;
}

/// The user is never satisfied.
///
/// With this signal the explanation loop cannot reach the end node; runs
/// stop only at the workflow's step limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverSatisfied;

#[async_trait]
impl UserReview for NeverSatisfied {
    async fn is_satisfied(&self, _state: &ReviewState, _explanations: u32) -> bool {
        false
    }
}

/// Satisfied once a fixed number of explanations have been given
#[derive(Debug, Clone, Copy)]
pub struct SatisfiedAfter {
    pub rounds: u32,
}

#[async_trait]
impl UserReview for SatisfiedAfter {
    async fn is_satisfied(&self, _state: &ReviewState, explanations: u32) -> bool {
        explanations >= self.rounds
    }
}

/// Build the review signal selected by configuration
pub fn from_config(config: &WorkflowConfig) -> Arc<dyn UserReview> {
    match config.explanation_rounds {
        Some(rounds) => Arc::new(SatisfiedAfter { rounds }),
        None => Arc::new(NeverSatisfied),
    }
}
