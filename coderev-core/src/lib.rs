//! Coderev Core - solution review workflow
//!
//! This crate takes a coding question and a user's solution, classifies the
//! solution's language, asks a generative model for an optimized reference
//! solution, compares the two and can loop to give a deeper explanation.

pub mod config;
pub mod error;
pub mod gateway;
pub mod prompts;
pub mod secrets;
pub mod state;
pub mod workflow;

pub use config::{CliOverrides, Config};
pub use error::{Error, Result};
pub use gateway::{GatewayConfig, GeminiGateway, ModelGateway, ProviderError};
pub use secrets::Secrets;
pub use state::{Language, ReviewState};
pub use workflow::{Node, ReviewOutcome, ReviewWorkflow, Step, UserReview};
