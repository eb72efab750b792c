//! Review command - run a single review from the terminal

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use coderev_core::{Config, ReviewOutcome};
use tokio::io::AsyncReadExt;

use super::build_workflow;

/// Arguments for the review command
#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// The coding question
    #[arg(short, long)]
    pub question: String,

    /// File containing the solution, or "-" for stdin
    #[arg(short, long)]
    pub solution: PathBuf,

    /// Print the final review state as JSON
    #[arg(long)]
    pub json: bool,
}

impl ReviewArgs {
    /// Execute the review command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let solution = self.read_solution().await?;
        let workflow = build_workflow(config)?;

        let outcome = workflow.review(self.question.clone(), solution).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else {
            print!("{}", format_outcome(&outcome));
        }

        Ok(())
    }

    async fn read_solution(&self) -> anyhow::Result<String> {
        if self.solution.as_os_str() == "-" {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read solution from stdin")?;
            return Ok(buf);
        }

        tokio::fs::read_to_string(&self.solution)
            .await
            .with_context(|| format!("Failed to read {}", self.solution.display()))
    }
}

/// Plain-text rendering of a finished review
pub fn format_outcome(outcome: &ReviewOutcome) -> String {
    let state = &outcome.state;
    let mut out = String::new();

    let mut section = |title: &str, text: &str| {
        out.push_str(title);
        out.push('\n');
        out.push_str(&"=".repeat(title.len()));
        out.push_str("\n\n");
        out.push_str(text);
        out.push_str("\n\n");
    };

    section("Language", state.language.as_deref().unwrap_or("(unknown)"));
    section(
        "Optimized Solution",
        state.optimized_solution.as_deref().unwrap_or(""),
    );
    section("Feedback", state.feedback.as_deref().unwrap_or(""));
    if let Some(ref explanation) = state.detailed_explanation {
        section("Detailed Explanation", explanation);
    }

    let path: Vec<&str> = outcome.trace.iter().map(|v| v.node.name()).collect();
    out.push_str(&format!("Path: {}\n", path.join(" -> ")));
    out
}
