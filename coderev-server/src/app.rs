//! HTTP front end: submission form, review endpoint and health check

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use coderev_core::{Error as CoreError, ReviewState, ReviewWorkflow};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::render;

/// Maximum accepted request body size
pub const MAX_BODY_SIZE: usize = 65_536;

/// Shared state for request handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub workflow: ReviewWorkflow,
}

/// Form fields posted by the submission page
#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    pub question: Option<String>,
    pub user_solution: Option<String>,
}

impl ReviewForm {
    /// Build the initial review state, rejecting absent or blank fields
    pub fn into_state(self) -> Result<ReviewState, SubmitError> {
        let question = required(self.question, "question")?;
        let user_solution = required(self.user_solution, "user_solution")?;
        Ok(ReviewState::new(question, user_solution))
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, SubmitError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(SubmitError::MissingFormField(field))
}

/// Reasons a submission fails
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Missing form field: {0}")]
    MissingFormField(&'static str),

    #[error(transparent)]
    Workflow(#[from] CoreError),
}

impl SubmitError {
    fn status(&self) -> StatusCode {
        match self {
            SubmitError::MissingFormField(_) => StatusCode::BAD_REQUEST,
            SubmitError::Workflow(CoreError::Provider(_)) => StatusCode::BAD_GATEWAY,
            SubmitError::Workflow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the user; internal details stay in the log
    fn public_message(&self) -> String {
        match self {
            SubmitError::MissingFormField(field) => {
                format!("The form field '{}' is required.", field)
            }
            SubmitError::Workflow(CoreError::Provider(_)) => {
                "The review could not be completed because the model provider failed.".to_string()
            }
            SubmitError::Workflow(CoreError::StepLimitExceeded { limit }) => {
                format!("The review did not finish within {} steps.", limit)
            }
            SubmitError::Workflow(_) => "The review could not be completed.".to_string(),
        }
    }
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "Review request failed");
        } else {
            info!(error = %self, status = status.as_u16(), "Rejected review request");
        }
        (
            status,
            Html(render::error_page(status, &self.public_message())),
        )
            .into_response()
    }
}

async fn index() -> Html<String> {
    Html(render::form_page())
}

async fn submit(
    State(state): State<AppState>,
    Form(form): Form<ReviewForm>,
) -> Result<Html<String>, SubmitError> {
    let initial = form.into_state()?;
    info!(
        question_len = initial.question.len(),
        solution_len = initial.user_solution.len(),
        "Received review request"
    );

    let outcome = state.workflow.run(initial).await?;
    Ok(Html(render::result_page(&outcome.state)))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "coderev"
    }))
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/health", get(health_check))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
