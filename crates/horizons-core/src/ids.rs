//! Item id generation.
//!
//! The planner never invents ids itself; it asks an [`IdGenerator`] and
//! retries while the answer collides with an id already in use.

use rand::{Rng, distributions::Alphanumeric, thread_rng};

use crate::model::ItemId;

/// Length of ids produced by [`RandomIds`].
pub const RANDOM_ID_LEN: usize = 10;

/// Source of fresh item ids.
pub trait IdGenerator: std::fmt::Debug + Send {
    fn next_id(&mut self) -> ItemId;
}

/// Random alphanumeric ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> ItemId {
        let raw: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(RANDOM_ID_LEN)
            .map(char::from)
            .collect();
        ItemId::new(raw)
    }
}

/// Deterministic `<prefix><n>` ids, counting up from 1.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("i")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> ItemId {
        let id = ItemId::new(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn random_ids_are_alphanumeric_and_sized() {
        let mut ids = RandomIds;
        let id = ids.next_id();
        assert_eq!(id.as_str().len(), RANDOM_ID_LEN);
        assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn random_ids_do_not_repeat_in_practice() {
        let mut ids = RandomIds;
        let seen: HashSet<ItemId> = (0..500).map(|_| ids.next_id()).collect();
        assert_eq!(seen.len(), 500);
    }

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::new("t");
        assert_eq!(ids.next_id().as_str(), "t1");
        assert_eq!(ids.next_id().as_str(), "t2");
        assert_eq!(SequentialIds::default().next_id().as_str(), "i1");
    }
}
