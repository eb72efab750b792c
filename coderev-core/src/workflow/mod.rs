//! Workflow module for the solution review graph
//!
//! This module defines the review nodes, the user satisfaction signal and
//! the driver that sequences them.

pub mod engine;
pub mod node;
pub mod review;

pub use engine::{NodeVisit, ReviewOutcome, ReviewWorkflow};
pub use node::{Node, Step};
pub use review::{NeverSatisfied, SatisfiedAfter, UserReview};
