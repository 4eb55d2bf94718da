//! Apply-then-settle bookkeeping for optimistic updates.
//!
//! [`Optimistic::apply`] swaps the new value into place and keeps the value it
//! replaced. The pending update must then be settled exactly once: either
//! [`commit`](Optimistic::commit) after the remote write succeeds or
//! [`rollback`](Optimistic::rollback) after it fails.

/// A locally applied update awaiting remote confirmation.
#[derive(Debug)]
#[must_use = "an optimistic update must be committed or rolled back"]
pub struct Optimistic<T> {
    snapshot: T,
    applied: T,
}

impl<T: Clone> Optimistic<T> {
    /// Replace `*current` with `next`, capturing the previous value.
    pub fn apply(current: &mut T, next: T) -> Self {
        let snapshot = std::mem::replace(current, next.clone());
        Self {
            snapshot,
            applied: next,
        }
    }

    /// The value written into local state.
    pub fn applied(&self) -> &T {
        &self.applied
    }

    /// The value that was in local state before the update.
    pub fn snapshot(&self) -> &T {
        &self.snapshot
    }

    /// Remote write confirmed: keep the applied value.
    pub fn commit(self) -> T {
        self.applied
    }

    /// Remote write failed: restore the snapshot into `*current` and return
    /// the discarded value.
    pub fn rollback(self, current: &mut T) -> T {
        *current = self.snapshot;
        self.applied
    }
}
