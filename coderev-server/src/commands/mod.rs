//! CLI command implementations

pub mod review;
pub mod serve;

pub use review::ReviewArgs;
pub use serve::ServeArgs;

use std::sync::Arc;

use coderev_core::{Config, GatewayConfig, GeminiGateway, ReviewWorkflow, Secrets};

/// Build the review workflow backed by the configured Gemini model
pub fn build_workflow(config: &Config) -> anyhow::Result<ReviewWorkflow> {
    let secrets = Secrets::load()?;
    let gateway_config = GatewayConfig::new(&config.provider, secrets.api_key())?;
    let gateway = GeminiGateway::new(gateway_config)?;

    tracing::debug!(
        model = gateway.model(),
        step_limit = config.workflow.step_limit,
        explanation_rounds = ?config.workflow.explanation_rounds,
        "Review workflow configured"
    );

    Ok(ReviewWorkflow::with_config(
        Arc::new(gateway),
        &config.workflow,
    ))
}
