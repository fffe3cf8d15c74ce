//! Application layer - use cases over a `GraphStore`

mod merge_service;

pub use merge_service::{MergeOutcome, MergeService};
