//! Prompt templates for each model-backed workflow node
//!
//! Templates are embedded at compile time and use `{{VARIABLE}}`
//! placeholders. Rendering is a single pass over the template, so text
//! substituted from the review state (which may itself contain braces) is
//! never expanded again.

use std::collections::HashMap;

use crate::state::ReviewState;
use crate::Result;

const LANGUAGE_PROMPT: &str = include_str!("prompts/language.md");
const PYTHON_PROMPT: &str = include_str!("prompts/python.md");
const CPP_PROMPT: &str = include_str!("prompts/cpp.md");
const FEEDBACK_PROMPT: &str = include_str!("prompts/feedback.md");
const EXPLANATION_PROMPT: &str = include_str!("prompts/explanation.md");

/// The five fixed prompt templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    /// Classify a solution as Python or C++
    LanguageClassifier,
    /// Write an optimal Python solution
    PythonOptimizer,
    /// Write an optimal C++ solution
    CppOptimizer,
    /// Short comparative review
    Feedback,
    /// Longer, mistake-focused explanation
    Explainer,
}

impl PromptKind {
    /// Get the raw template text
    pub fn template(&self) -> &'static str {
        match self {
            PromptKind::LanguageClassifier => LANGUAGE_PROMPT,
            PromptKind::PythonOptimizer => PYTHON_PROMPT,
            PromptKind::CppOptimizer => CPP_PROMPT,
            PromptKind::Feedback => FEEDBACK_PROMPT,
            PromptKind::Explainer => EXPLANATION_PROMPT,
        }
    }

    /// Render this template from the fields of a review state.
    ///
    /// Fails with [`crate::Error::MissingField`] if a field the template needs has
    /// not been produced yet.
    pub fn render_for(&self, state: &ReviewState) -> Result<String> {
        let prompt = match self {
            PromptKind::LanguageClassifier => language_classifier(&state.user_solution),
            PromptKind::PythonOptimizer => python_optimizer(&state.question),
            PromptKind::CppOptimizer => cpp_optimizer(&state.question),
            PromptKind::Feedback => {
                feedback_writer(&state.user_solution, state.require_optimized_solution()?)
            }
            PromptKind::Explainer => explainer(
                &state.question,
                &state.user_solution,
                state.require_optimized_solution()?,
            ),
        };
        Ok(prompt)
    }
}

/// Context for rendering a prompt template
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    variables: HashMap<String, String>,
}

impl PromptContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Set a variable value (builder pattern)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set the coding question
    pub fn with_question(self, question: impl Into<String>) -> Self {
        self.with("QUESTION", question)
    }

    /// Set the user's solution
    pub fn with_user_solution(self, solution: impl Into<String>) -> Self {
        self.with("USER_SOLUTION", solution)
    }

    /// Set the optimized reference solution
    pub fn with_optimized_solution(self, solution: impl Into<String>) -> Self {
        self.with("OPTIMIZED_SOLUTION", solution)
    }
}

/// Render a prompt template with the given context
pub fn render(kind: PromptKind, context: &PromptContext) -> String {
    render_template(kind.template(), context)
}

/// Render a template string with variable substitution.
///
/// Unknown `{{UPPERCASE_NAME}}` placeholders become "(not specified)";
/// anything else between braces is copied through untouched.
fn render_template(template: &str, context: &PromptContext) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        match after.find("}}") {
            Some(end) if is_placeholder_name(&after[..end]) => {
                let name = &after[..end];
                match context.variables.get(name) {
                    Some(value) => result.push_str(value),
                    None => result.push_str("(not specified)"),
                }
                rest = &after[end + 2..];
            }
            _ => {
                result.push_str("{{");
                rest = after;
            }
        }
    }

    result.push_str(rest);
    result
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_uppercase() || c == '_')
}

/// Prompt asking which language a solution is written in
pub fn language_classifier(user_solution: &str) -> String {
    render(
        PromptKind::LanguageClassifier,
        &PromptContext::new().with_user_solution(user_solution),
    )
}

/// Prompt asking for an optimal Python solution, code only
pub fn python_optimizer(question: &str) -> String {
    render(
        PromptKind::PythonOptimizer,
        &PromptContext::new().with_question(question),
    )
}

/// Prompt asking for an optimal C++ solution, code only
pub fn cpp_optimizer(question: &str) -> String {
    render(
        PromptKind::CppOptimizer,
        &PromptContext::new().with_question(question),
    )
}

/// Prompt asking for a short comparison of the two solutions
pub fn feedback_writer(user_solution: &str, optimized_solution: &str) -> String {
    render(
        PromptKind::Feedback,
        &PromptContext::new()
            .with_user_solution(user_solution)
            .with_optimized_solution(optimized_solution),
    )
}

/// Prompt asking for a detailed explanation of the user's mistakes
pub fn explainer(question: &str, user_solution: &str, optimized_solution: &str) -> String {
    render(
        PromptKind::Explainer,
        &PromptContext::new()
            .with_question(question)
            .with_user_solution(user_solution)
            .with_optimized_solution(optimized_solution),
    )
}
