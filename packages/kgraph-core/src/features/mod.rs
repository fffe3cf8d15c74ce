//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Larger features contain:
//! - domain/      - Pure graph logic
//! - application/ - Config driven use cases
//!
//! `similarity`, `matching` and `listing` are leaf utilities without layers.

pub mod similarity;
pub mod matching;

// Fuzzy merge of extracted subgraphs
pub mod reconcile;

// Extraction quality against hand-labelled graphs
pub mod evaluation;

pub mod listing;
