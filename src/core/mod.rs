// Engine exports
pub mod formation;
pub mod reconciler;

pub use formation::mutual_interest;
pub use reconciler::{ReconcileError, Reconciler};
