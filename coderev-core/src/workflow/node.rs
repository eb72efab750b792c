//! Workflow nodes and their successor rules
//!
//! The review graph is fixed:
//!
//! ```text
//! language_detection --python--> python_agent --+
//!                    \--else---> cpp_agent -----+--> feedback --> user_review
//!                                                                  |    ^
//!                                                   satisfied: end |    |
//!                                                  otherwise: explanation
//! ```

use serde::{Deserialize, Serialize};

use crate::prompts::PromptKind;
use crate::state::{Language, ReviewState};
use crate::Result;

/// A named step in the review graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    /// Classify the user's solution as Python or C++
    LanguageDetection,
    /// Produce an optimal Python solution
    PythonAgent,
    /// Produce an optimal C++ solution
    CppAgent,
    /// Write a short comparison
    Feedback,
    /// Ask whether the user is satisfied
    UserReview,
    /// Write a detailed explanation
    Explanation,
}

/// What happens after a node has run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Continue with another node
    Goto(Node),
    /// The workflow is finished
    End,
}

impl Node {
    /// Where every run begins
    pub const START: Node = Node::LanguageDetection;

    /// Stable snake_case name
    pub fn name(&self) -> &'static str {
        match self {
            Node::LanguageDetection => "language_detection",
            Node::PythonAgent => "python_agent",
            Node::CppAgent => "cpp_agent",
            Node::Feedback => "feedback",
            Node::UserReview => "user_review",
            Node::Explanation => "explanation",
        }
    }

    /// The prompt template this node renders, if it calls the model
    pub fn prompt(&self) -> Option<PromptKind> {
        match self {
            Node::LanguageDetection => Some(PromptKind::LanguageClassifier),
            Node::PythonAgent => Some(PromptKind::PythonOptimizer),
            Node::CppAgent => Some(PromptKind::CppOptimizer),
            Node::Feedback => Some(PromptKind::Feedback),
            Node::Explanation => Some(PromptKind::Explainer),
            Node::UserReview => None,
        }
    }

    /// Every step this node may take
    pub fn successors(&self) -> &'static [Step] {
        match self {
            Node::LanguageDetection => &[Step::Goto(Node::PythonAgent), Step::Goto(Node::CppAgent)],
            Node::PythonAgent | Node::CppAgent => &[Step::Goto(Node::Feedback)],
            Node::Feedback => &[Step::Goto(Node::UserReview)],
            Node::UserReview => &[Step::End, Step::Goto(Node::Explanation)],
            Node::Explanation => &[Step::Goto(Node::UserReview)],
        }
    }

    /// Select the next step from the state this node just produced
    pub fn next(&self, state: &ReviewState) -> Result<Step> {
        let step = match self {
            Node::LanguageDetection => match state.route()? {
                Language::Python => Step::Goto(Node::PythonAgent),
                Language::Cpp => Step::Goto(Node::CppAgent),
            },
            Node::PythonAgent | Node::CppAgent => Step::Goto(Node::Feedback),
            Node::Feedback => Step::Goto(Node::UserReview),
            Node::UserReview => {
                if state.user_satisfied {
                    Step::End
                } else {
                    Step::Goto(Node::Explanation)
                }
            }
            Node::Explanation => Step::Goto(Node::UserReview),
        };
        Ok(step)
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Goto(node) => write!(f, "{}", node),
            Step::End => write!(f, "end"),
        }
    }
}
