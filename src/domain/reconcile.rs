//! Subscription set reconciliation.

use serde::Serialize;
use std::collections::BTreeSet;

/// Writes needed to move a fan from its current club set to a desired one.
///
/// `to_add` and `to_remove` are always disjoint; clubs present on both sides
/// appear in neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub to_add: BTreeSet<String>,
    pub to_remove: BTreeSet<String>,
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Apply the delta to `current`, yielding the resulting membership set.
    pub fn apply(&self, current: &BTreeSet<String>) -> BTreeSet<String> {
        current
            .union(&self.to_add)
            .filter(|id| !self.to_remove.contains(*id))
            .cloned()
            .collect()
    }
}

/// Compute `desired − current` and `current − desired`.
///
/// `desired` may repeat ids; membership is a set, so repeats collapse.
pub fn reconcile<I, S>(current: &BTreeSet<String>, desired: I) -> Reconciliation
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let desired: BTreeSet<String> = desired.into_iter().map(Into::into).collect();
    Reconciliation {
        to_add: desired.difference(current).cloned().collect(),
        to_remove: current.difference(&desired).cloned().collect(),
    }
}
