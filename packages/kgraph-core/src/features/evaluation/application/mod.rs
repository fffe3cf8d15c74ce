//! Evaluation application layer (use case)

mod evaluator;

pub use evaluator::{EvaluationReport, EvaluationSummary, GraphEvaluator, MatchBuckets};
