//! Review workflow driver
//!
//! Runs nodes one at a time against a single [`ReviewState`]: execute the
//! current node's action, ask the node for its successor, repeat until the
//! end step. Any gateway failure aborts the run and the partially filled
//! state is dropped.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::node::{Node, Step};
use super::review::{self, UserReview};
use crate::config::WorkflowConfig;
use crate::gateway::ModelGateway;
use crate::prompts::PromptKind;
use crate::state::{Language, ReviewState};
use crate::{Error, Result};

/// One executed node and the step it chose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeVisit {
    pub node: Node,
    pub next: Step,
}

/// Final state of a completed run plus the path it took
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub state: ReviewState,
    pub trace: Vec<NodeVisit>,
}

impl ReviewOutcome {
    /// Number of times a node was executed
    pub fn visits(&self, node: Node) -> usize {
        self.trace.iter().filter(|v| v.node == node).count()
    }

    /// Executed nodes in order
    pub fn path(&self) -> Vec<Node> {
        self.trace.iter().map(|v| v.node).collect()
    }
}

/// Drives the fixed review graph
#[derive(Clone)]
pub struct ReviewWorkflow {
    gateway: Arc<dyn ModelGateway>,
    user_review: Arc<dyn UserReview>,
    step_limit: u32,
}

impl ReviewWorkflow {
    /// Create a workflow with the default step limit and a user who is
    /// never satisfied
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self::with_config(gateway, &WorkflowConfig::default())
    }

    /// Create a workflow from configuration
    pub fn with_config(gateway: Arc<dyn ModelGateway>, config: &WorkflowConfig) -> Self {
        Self {
            gateway,
            user_review: review::from_config(config),
            step_limit: config.step_limit,
        }
    }

    /// Replace the user satisfaction signal
    pub fn with_user_review(mut self, user_review: Arc<dyn UserReview>) -> Self {
        self.user_review = user_review;
        self
    }

    /// Set the maximum number of node executions per run
    pub fn with_step_limit(mut self, step_limit: u32) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Get the step limit
    pub fn step_limit(&self) -> u32 {
        self.step_limit
    }

    /// Run a fresh review for a question and solution
    pub async fn review(
        &self,
        question: impl Into<String>,
        user_solution: impl Into<String>,
    ) -> Result<ReviewOutcome> {
        self.run(ReviewState::new(question, user_solution)).await
    }

    /// Run the workflow from the start node until it ends
    pub async fn run(&self, mut state: ReviewState) -> Result<ReviewOutcome> {
        let mut trace = Vec::new();
        let mut node = Node::START;
        let mut explanations = 0u32;

        loop {
            if trace.len() >= self.step_limit as usize {
                warn!(
                    limit = self.step_limit,
                    explanations, "Workflow hit step limit without ending"
                );
                return Err(Error::StepLimitExceeded {
                    limit: self.step_limit,
                });
            }

            self.execute(node, &mut state, explanations).await?;
            if node == Node::Explanation {
                explanations += 1;
            }

            let next = node.next(&state)?;
            debug_assert!(node.successors().contains(&next));

            info!(from = %node, to = %next, "Workflow node transition");
            trace.push(NodeVisit { node, next });

            match next {
                Step::Goto(successor) => node = successor,
                Step::End => break,
            }
        }

        info!(
            steps = trace.len(),
            explanations,
            language = state.language.as_deref().unwrap_or(""),
            "Review workflow finished"
        );

        Ok(ReviewOutcome { state, trace })
    }

    /// Run a single node's action against the state
    pub async fn execute(
        &self,
        node: Node,
        state: &mut ReviewState,
        explanations: u32,
    ) -> Result<()> {
        let Some(kind) = node.prompt() else {
            state.user_satisfied = self.user_review.is_satisfied(state, explanations).await;
            debug!(satisfied = state.user_satisfied, "User review");
            return Ok(());
        };

        let prompt = kind.render_for(state)?;
        debug!(node = %node, prompt_len = prompt.len(), "Calling model");
        let completion = self.gateway.complete(&prompt).await?;
        let text = completion.trim();

        match kind {
            PromptKind::LanguageClassifier => {
                let language = text.to_lowercase();
                if !Language::is_recognised(&language) {
                    warn!(
                        classification = %language,
                        "Unrecognised language classification, routing to C++"
                    );
                }
                state.language = Some(language);
            }
            PromptKind::PythonOptimizer | PromptKind::CppOptimizer => {
                state.optimized_solution = Some(text.to_string());
            }
            PromptKind::Feedback => {
                state.feedback = Some(text.to_string());
            }
            PromptKind::Explainer => {
                state.detailed_explanation = Some(text.to_string());
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for ReviewWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewWorkflow")
            .field("step_limit", &self.step_limit)
            .finish_non_exhaustive()
    }
}
