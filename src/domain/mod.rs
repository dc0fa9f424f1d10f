//! Domain types and rules independent of storage.

pub mod money;
pub mod reconcile;

pub use money::{Fee, FeeInput, FeeParseError};
pub use reconcile::{reconcile, Reconciliation};
