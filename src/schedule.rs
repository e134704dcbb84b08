//! Identity for cancellable scheduled events.
//!
//! The engine is synchronous; timers live in the driver. Every
//! scheduled event (a countdown tick stream, a delayed computer reply)
//! carries the token issued when it was scheduled, and delivery
//! compares it against the token the match state currently stores.
//! Superseding a schedule stores a new token or none at all, so late
//! events from the old schedule no longer match and are dropped.

use serde::{Deserialize, Serialize};

/// Identifies one scheduled task. Stale tokens are ignored on delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskToken(u64);

/// Monotonic issuer of task tokens.
#[derive(Debug, Clone, Default)]
pub struct TokenSource {
    next: u64,
}

impl TokenSource {
    /// Creates a fresh source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a token this source has never issued before.
    pub fn issue(&mut self) -> TaskToken {
        let token = TaskToken(self.next);
        self.next += 1;
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_unique() {
        let mut source = TokenSource::new();
        let first = source.issue();
        let second = source.issue();
        assert_ne!(first, second);
    }

    #[test]
    fn test_tokens_compare_by_identity() {
        let mut source = TokenSource::new();
        let token = source.issue();
        assert_eq!(token, token);
    }
}
