//! Serve command - run the web front end

use clap::Args;
use coderev_core::Config;
use tokio::net::TcpListener;
use tracing::info;

use super::build_workflow;
use crate::app::{router, AppState};

/// Arguments for the serve command
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind (overrides config and env)
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to listen on (overrides config and env)
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let workflow = build_workflow(config)?;
        let app = router(AppState { workflow });

        let addr = format!("{}:{}", config.server.bind, config.server.port);
        let listener = TcpListener::bind(&addr).await?;
        info!(addr = %addr, model = %config.provider.model, "Review server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Review server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
