//! Unique code sequences for new records.
//!
//! Every created event and guest gets a numeric code pulled from a
//! process-local sequence. The sequence is an explicit handle owned by
//! the environment and passed into submission flows; there is no global
//! state. Codes never repeat within a process lifetime.
//!
//! Codes are not persisted across restarts: a new process reseeds and may
//! eventually collide with codes stored by an earlier one. That weakness
//! is inherited and documented rather than silently fixed.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::state::RecordCode;

/// A pull-based sequence of record codes.
///
/// # Contract
///
/// Each `next_code` call yields a code distinct from every other code the
/// same instance has produced. Implementations must be `Send + Sync`: the
/// sequence is shared by cloned environments across effect tasks.
pub trait CodeSequence: Send + Sync {
    /// Pull the next code, advancing the sequence.
    fn next_code(&self) -> RecordCode;
}

/// Process-local monotonic code sequence.
///
/// Seeded at a random point of the configured range, then strictly
/// incrementing. The random seed mimics how codes were historically
/// drawn; monotonicity is what guarantees no repeats in-process.
///
/// # Examples
///
/// ```
/// use vowsuite_planner::codes::{CodeSequence, SessionCodes};
///
/// let codes = SessionCodes::starting_at(1000);
/// assert_eq!(codes.next_code().value(), 1000);
/// assert_eq!(codes.next_code().value(), 1001);
/// ```
#[derive(Debug)]
pub struct SessionCodes {
    next: AtomicU32,
}

impl SessionCodes {
    /// Seed the sequence at a random point of `[floor, floor + span)`.
    #[must_use]
    pub fn new(floor: u32, span: u32) -> Self {
        use rand::Rng;

        let offset = if span == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..span)
        };
        Self::starting_at(floor.saturating_add(offset))
    }

    /// Seed the sequence at an exact starting code.
    #[must_use]
    pub const fn starting_at(start: u32) -> Self {
        Self {
            next: AtomicU32::new(start),
        }
    }
}

impl CodeSequence for SessionCodes {
    fn next_code(&self) -> RecordCode {
        RecordCode::new(self.next.fetch_add(1, Ordering::SeqCst))
    }
}

/// Scripted code sequence for deterministic tests.
///
/// Yields the scripted codes in order; once exhausted it keeps counting
/// from just past the largest scripted code so the no-repeat contract
/// still holds.
#[derive(Debug)]
pub struct FixedCodes {
    codes: Vec<u32>,
    index: AtomicU32,
    overflow_base: u32,
}

impl FixedCodes {
    /// Script the sequence.
    #[must_use]
    pub fn new(codes: Vec<u32>) -> Self {
        let overflow_base = codes.iter().max().map_or(0, |max| max.saturating_add(1));
        Self {
            codes,
            index: AtomicU32::new(0),
            overflow_base,
        }
    }
}

impl CodeSequence for FixedCodes {
    fn next_code(&self) -> RecordCode {
        let index = self.index.fetch_add(1, Ordering::SeqCst) as usize;
        let code = self
            .codes
            .get(index)
            .copied()
            .unwrap_or_else(|| self.overflow_base + (index - self.codes.len()) as u32);
        RecordCode::new(code)
    }
}
