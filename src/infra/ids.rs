use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::HandId;

/// Монотонный счётчик ID раздач. Первый выданный ID — 1.
#[derive(Debug)]
pub struct IdGenerator {
    hand_counter: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::starting_from(1)
    }

    pub fn starting_from(first: HandId) -> Self {
        Self {
            hand_counter: AtomicU64::new(first),
        }
    }

    #[inline]
    pub fn next_hand_id(&self) -> HandId {
        self.hand_counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
