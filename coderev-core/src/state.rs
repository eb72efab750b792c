//! The review state threaded through every workflow node
//!
//! A `ReviewState` is created fresh for each submission with only the
//! question and the user's solution set. Nodes fill in the remaining
//! fields as the workflow advances; nothing is ever rolled back.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Language of a submitted solution, as used for routing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// Python solutions
    Python,
    /// C++ solutions
    Cpp,
}

impl Language {
    /// Route a classifier answer to a language branch.
    ///
    /// Only an exact `"python"` selects Python. Every other answer,
    /// including empty or unexpected classifier output, selects C++.
    pub fn route(classification: &str) -> Language {
        if classification == "python" {
            Language::Python
        } else {
            Language::Cpp
        }
    }

    /// Whether a classifier answer is one of the two recognised values
    pub fn is_recognised(classification: &str) -> bool {
        matches!(classification, "python" | "cpp")
    }
}

/// Flat record accumulating the results of a review run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewState {
    /// The coding problem
    pub question: String,
    /// The user's submitted code
    pub user_solution: String,
    /// Classifier answer, trimmed and lowercased but otherwise unvalidated
    pub language: Option<String>,
    /// Model-generated reference solution
    pub optimized_solution: Option<String>,
    /// Short comparison of the two solutions
    pub feedback: Option<String>,
    /// Longer, mistake-focused explanation; overwritten on each pass
    pub detailed_explanation: Option<String>,
    /// Whether the user accepted the review
    pub user_satisfied: bool,
}

impl ReviewState {
    /// Create a new review state for a question and solution
    pub fn new(question: impl Into<String>, user_solution: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            user_solution: user_solution.into(),
            ..Self::default()
        }
    }

    /// The routing decision for the current classification
    pub fn route(&self) -> Result<Language> {
        self.language
            .as_deref()
            .map(Language::route)
            .ok_or(Error::MissingField("language"))
    }

    /// Get the optimized solution, failing if it has not been produced yet
    pub fn require_optimized_solution(&self) -> Result<&str> {
        self.optimized_solution
            .as_deref()
            .ok_or(Error::MissingField("optimized_solution"))
    }
}
