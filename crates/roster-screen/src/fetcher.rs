//! Request tokens for collection fetches.

use std::fmt;

/// Generation number attached to a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues tokens and decides which response may be applied.
///
/// Only the most recently issued token is current. A response carrying an
/// older token is stale and must be dropped, whatever order responses
/// arrive in.
#[derive(Debug, Default)]
pub struct Fetcher {
    latest: u64,
    applied: Option<u64>,
}

impl Fetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// Accept the response for `token` if it is current and not yet applied.
    pub fn accept(&mut self, token: RequestToken) -> bool {
        if !self.is_current(token) || self.applied == Some(token.0) {
            return false;
        }
        self.applied = Some(token.0);
        true
    }

    /// Whether a fetch is outstanding.
    pub fn in_flight(&self) -> bool {
        self.latest > 0 && self.applied != Some(self.latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_token_is_accepted() {
        let mut fetcher = Fetcher::new();
        let first = fetcher.issue();
        let second = fetcher.issue();
        assert!(fetcher.in_flight());
        assert!(!fetcher.accept(first));
        assert!(fetcher.accept(second));
        assert!(!fetcher.accept(second));
        assert!(!fetcher.in_flight());
    }

    #[test]
    fn tokens_increase() {
        let mut fetcher = Fetcher::new();
        let a = fetcher.issue();
        let b = fetcher.issue();
        assert!(b > a);
        assert_eq!(b.to_string(), "#2");
    }
}
