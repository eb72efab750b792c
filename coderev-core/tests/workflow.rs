//! End-to-end runs of the review workflow against scripted gateways

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use coderev_core::config::WorkflowConfig;
use coderev_core::prompts::PromptKind;
use coderev_core::workflow::{NeverSatisfied, SatisfiedAfter};
use coderev_core::{
    Error, ModelGateway, Node, ProviderError, ReviewState, ReviewWorkflow, Step, UserReview,
};

/// Deterministic gateway that recognises which template it was given
#[derive(Default)]
struct ScriptedGateway {
    /// Fixed classifier answer; when unset, `#include` means cpp
    classification: Option<&'static str>,
    prompts: Mutex<Vec<PromptKind>>,
}

impl ScriptedGateway {
    fn classifying_as(answer: &'static str) -> Self {
        Self {
            classification: Some(answer),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<PromptKind> {
        self.prompts.lock().unwrap().clone()
    }
}

fn kind_of(prompt: &str) -> PromptKind {
    if prompt.starts_with("You are a code language classifier") {
        PromptKind::LanguageClassifier
    } else if prompt.starts_with("You are a Python expert") {
        PromptKind::PythonOptimizer
    } else if prompt.starts_with("You are a C++ expert") {
        PromptKind::CppOptimizer
    } else if prompt.starts_with("You are a code reviewer") {
        PromptKind::Feedback
    } else if prompt.starts_with("You are a helpful tutor") {
        PromptKind::Explainer
    } else {
        panic!("unexpected prompt: {}", prompt)
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let kind = kind_of(prompt);
        self.prompts.lock().unwrap().push(kind);

        let answer = match kind {
            PromptKind::LanguageClassifier => match self.classification {
                Some(answer) => answer.to_string(),
                None if prompt.contains("#include") => "  CPP\n".to_string(),
                None => "Python\n".to_string(),
            },
            PromptKind::PythonOptimizer => "\ndef reverse(head):\n    return head\n".to_string(),
            PromptKind::CppOptimizer => "ListNode* reverse(ListNode* h) { return h; }\n".to_string(),
            PromptKind::Feedback => "  Correct, but O(n) extra space.  ".to_string(),
            PromptKind::Explainer => "You copy the list before reversing it.".to_string(),
        };
        Ok(answer)
    }
}

/// Gateway that always fails
struct DownGateway {
    calls: Mutex<u32>,
}

#[async_trait]
impl ModelGateway for DownGateway {
    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        *self.calls.lock().unwrap() += 1;
        Err(ProviderError::Status {
            status: 429,
            body: "quota exhausted".to_string(),
        })
    }
}

fn satisfied_after(gateway: Arc<ScriptedGateway>, rounds: u32) -> ReviewWorkflow {
    ReviewWorkflow::new(gateway).with_user_review(Arc::new(SatisfiedAfter { rounds }))
}

#[tokio::test]
async fn test_python_solution_end_to_end() {
    let gateway = Arc::new(ScriptedGateway::default());
    let workflow = satisfied_after(gateway.clone(), 0);

    let outcome = workflow
        .review("Reverse a linked list", "def reverse(x): ...")
        .await
        .unwrap();

    let state = &outcome.state;
    assert_eq!(state.language.as_deref(), Some("python"));
    assert!(!state.optimized_solution.as_deref().unwrap().is_empty());
    assert_eq!(
        state.feedback.as_deref(),
        Some("Correct, but O(n) extra space.")
    );
    assert!(state.detailed_explanation.is_none());
    assert!(state.user_satisfied);

    assert_eq!(
        outcome.path(),
        vec![
            Node::LanguageDetection,
            Node::PythonAgent,
            Node::Feedback,
            Node::UserReview
        ]
    );
    assert!(!gateway.calls().contains(&PromptKind::CppOptimizer));
}

#[tokio::test]
async fn test_cpp_solution_end_to_end() {
    let gateway = Arc::new(ScriptedGateway::default());
    let workflow = satisfied_after(gateway.clone(), 0);

    let outcome = workflow
        .review(
            "Reverse a linked list",
            "#include <list>\nvoid reverse(std::list<int>& l) { l.reverse(); }",
        )
        .await
        .unwrap();

    assert_eq!(outcome.state.language.as_deref(), Some("cpp"));
    assert_eq!(outcome.visits(Node::CppAgent), 1);
    assert_eq!(outcome.visits(Node::PythonAgent), 0);
    assert!(gateway.calls().contains(&PromptKind::CppOptimizer));
    assert!(!gateway.calls().contains(&PromptKind::PythonOptimizer));
}

#[tokio::test]
async fn test_unrecognised_classification_takes_cpp_branch() {
    for answer in ["java", "I think this is Python", "", "c++"] {
        let gateway = Arc::new(ScriptedGateway::classifying_as(answer));
        let workflow = satisfied_after(gateway.clone(), 0);

        let outcome = workflow.review("q", "print('hi')").await.unwrap();

        // classifier output is stored as-is after trim + lowercase
        assert_eq!(
            outcome.state.language.as_deref(),
            Some(answer.trim().to_lowercase().as_str())
        );
        assert_eq!(outcome.visits(Node::CppAgent), 1, "answer {:?}", answer);
        assert_eq!(gateway.calls()[1], PromptKind::CppOptimizer);
    }
}

/// Satisfied after `rounds` explanations; records whether feedback was
/// present each time it was asked
struct FeedbackRecorder {
    rounds: u32,
    seen: Mutex<Vec<bool>>,
}

#[async_trait]
impl UserReview for FeedbackRecorder {
    async fn is_satisfied(&self, state: &ReviewState, explanations: u32) -> bool {
        self.seen.lock().unwrap().push(state.feedback.is_some());
        explanations >= self.rounds
    }
}

#[tokio::test]
async fn test_feedback_precedes_every_user_review() {
    let gateway = Arc::new(ScriptedGateway::default());
    let recorder = Arc::new(FeedbackRecorder {
        rounds: 3,
        seen: Mutex::new(Vec::new()),
    });
    let workflow = ReviewWorkflow::new(gateway.clone()).with_user_review(recorder.clone());

    let outcome = workflow.review("q", "def f(): pass").await.unwrap();

    let seen = recorder.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 4);
    assert!(seen.iter().all(|present| *present));

    let path = outcome.path();
    let first_review = path.iter().position(|n| *n == Node::UserReview).unwrap();
    let feedback = path.iter().position(|n| *n == Node::Feedback).unwrap();
    assert!(feedback < first_review);
    assert_eq!(outcome.visits(Node::Feedback), 1);
}

#[tokio::test]
async fn test_explanation_loop_returns_to_user_review() {
    let gateway = Arc::new(ScriptedGateway::default());
    let workflow = satisfied_after(gateway.clone(), 2);

    let outcome = workflow.review("q", "def f(): pass").await.unwrap();

    assert_eq!(
        outcome.path(),
        vec![
            Node::LanguageDetection,
            Node::PythonAgent,
            Node::Feedback,
            Node::UserReview,
            Node::Explanation,
            Node::UserReview,
            Node::Explanation,
            Node::UserReview,
        ]
    );
    let (last, rest) = outcome.trace.split_last().unwrap();
    for visit in rest {
        match visit.node {
            Node::Explanation => assert_eq!(visit.next, Step::Goto(Node::UserReview)),
            Node::UserReview => assert_eq!(visit.next, Step::Goto(Node::Explanation)),
            _ => {}
        }
    }
    assert_eq!(last.node, Node::UserReview);
    assert_eq!(last.next, Step::End);
    assert_eq!(
        outcome.state.detailed_explanation.as_deref(),
        Some("You copy the list before reversing it.")
    );
}

#[tokio::test]
async fn test_never_satisfied_user_hits_step_limit() {
    let gateway = Arc::new(ScriptedGateway::default());
    let workflow = ReviewWorkflow::new(gateway.clone()).with_user_review(Arc::new(NeverSatisfied));
    assert_eq!(workflow.step_limit(), 25);

    let result = workflow.review("q", "def f(): pass").await;

    assert!(matches!(result, Err(Error::StepLimitExceeded { limit: 25 })));
    // 4 nodes to the first review, then explanation/review pairs
    let calls = gateway.calls();
    assert_eq!(calls.len(), 3 + 11);
    assert!(calls[3..].iter().all(|k| *k == PromptKind::Explainer));
}

#[tokio::test]
async fn test_default_config_never_ends() {
    let gateway = Arc::new(ScriptedGateway::default());
    let config = WorkflowConfig {
        step_limit: 9,
        ..WorkflowConfig::default()
    };
    let workflow = ReviewWorkflow::with_config(gateway, &config);

    let result = workflow.review("q", "def f(): pass").await;
    assert!(matches!(result, Err(Error::StepLimitExceeded { limit: 9 })));
}

#[tokio::test]
async fn test_provider_failure_aborts_run() {
    let gateway = Arc::new(DownGateway {
        calls: Mutex::new(0),
    });
    let workflow = ReviewWorkflow::new(gateway.clone());

    let result = workflow
        .review("Reverse a linked list", "def reverse(x): ...")
        .await;

    match result {
        Err(Error::Provider(ProviderError::Status { status, .. })) => assert_eq!(status, 429),
        other => panic!("expected provider error, got {:?}", other),
    }
    // no retries
    assert_eq!(*gateway.calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_identical_inputs_give_identical_state() {
    let gateway = Arc::new(ScriptedGateway::default());
    let workflow = satisfied_after(gateway, 1);

    let first = workflow.review("Two sum", "def two_sum(a, t): ...").await.unwrap();
    let second = workflow.review("Two sum", "def two_sum(a, t): ...").await.unwrap();

    assert_eq!(first.state, second.state);
    assert_eq!(first.trace, second.trace);
}

#[tokio::test]
async fn test_run_accepts_prepared_state() {
    let gateway = Arc::new(ScriptedGateway::default());
    let workflow = satisfied_after(gateway, 0);

    let outcome = workflow
        .run(ReviewState::new("q", "#include <vector>"))
        .await
        .unwrap();
    assert_eq!(outcome.state.question, "q");
    assert_eq!(outcome.state.user_solution, "#include <vector>");
}
