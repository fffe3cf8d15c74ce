//! Reconciliation application layer (use case)

mod reconciler;

pub use reconciler::{ReconcileOutput, ReconcileStats, Reconciler};
