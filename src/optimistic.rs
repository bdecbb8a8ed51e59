//! Two-phase local mutation: write the new value immediately, then keep or
//! restore it once the remote call that mirrors it has settled.

/// How the remote side reported on the mirrored mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Failed,
}

/// What to do with the local value when the remote call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    Keep,
    Revert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Kept,
    Reverted,
    /// The slot was overwritten while the call was in flight; left alone.
    Superseded,
}

/// A local write that has been applied but not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pending<T> {
    previous: T,
    applied: T,
}

impl<T: Clone + PartialEq> Pending<T> {
    /// Writes `value` into `slot`. Returns `None` when the slot already held
    /// it, in which case nothing needs mirroring.
    pub fn apply(slot: &mut T, value: T) -> Option<Self> {
        if *slot == value {
            return None;
        }
        let previous = std::mem::replace(slot, value.clone());
        Some(Self {
            previous,
            applied: value,
        })
    }

    pub fn previous(&self) -> &T {
        &self.previous
    }

    pub fn applied(&self) -> &T {
        &self.applied
    }

    pub fn confirm(self, slot: &mut T, outcome: Confirmation, policy: OnFailure) -> Resolution {
        if *slot != self.applied {
            return Resolution::Superseded;
        }
        match (outcome, policy) {
            (Confirmation::Confirmed, _) | (Confirmation::Failed, OnFailure::Keep) => {
                Resolution::Kept
            }
            (Confirmation::Failed, OnFailure::Revert) => {
                *slot = self.previous;
                Resolution::Reverted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_skips_identical_value() {
        let mut slot = 3;
        assert!(Pending::apply(&mut slot, 3).is_none());
    }

    #[test]
    fn revert_restores_previous() {
        let mut slot = false;
        let pending = Pending::apply(&mut slot, true).unwrap();
        assert!(slot);
        let resolution = pending.confirm(&mut slot, Confirmation::Failed, OnFailure::Revert);
        assert_eq!(resolution, Resolution::Reverted);
        assert!(!slot);
    }

    #[test]
    fn keep_policy_leaves_value_on_failure() {
        let mut slot = "empty";
        let pending = Pending::apply(&mut slot, "h2").unwrap();
        let resolution = pending.confirm(&mut slot, Confirmation::Failed, OnFailure::Keep);
        assert_eq!(resolution, Resolution::Kept);
        assert_eq!(slot, "h2");
    }

    #[test]
    fn later_write_supersedes_revert() {
        let mut slot = 1;
        let pending = Pending::apply(&mut slot, 2).unwrap();
        slot = 7;
        let resolution = pending.confirm(&mut slot, Confirmation::Failed, OnFailure::Revert);
        assert_eq!(resolution, Resolution::Superseded);
        assert_eq!(slot, 7);
    }
}
