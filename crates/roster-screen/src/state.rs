//! Lifecycle of one list screen.

use std::fmt;

/// Phase of a list screen.
///
/// `Loading` is entered on first mount and after every mutation. Row
/// actions are disabled while `Loading` or `Mutating`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScreenState {
    #[default]
    Loading,
    /// The paginated view is rendered.
    Ready,
    /// A filter change is being applied.
    Filtering,
    /// A create, update or delete call is in flight.
    Mutating,
    /// The last fetch failed. The screen offers a manual retry.
    Failed {
        message: String,
        retryable: bool,
    },
}

impl ScreenState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Filtering => "filtering",
            Self::Mutating => "mutating",
            Self::Failed { .. } => "failed",
        }
    }

    /// Whether row actions must be rejected.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Loading | Self::Mutating)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn can_transition_to(&self, next: &ScreenState) -> bool {
        use ScreenState::{Failed, Filtering, Loading, Mutating, Ready};
        matches!(
            (self, next),
            (Loading, Ready)
                | (Loading, Failed { .. })
                | (Ready, Filtering)
                | (Filtering, Ready)
                | (Ready, Mutating)
                | (Ready, Loading)
                | (Mutating, Loading)
                | (Mutating, Ready)
                | (Failed { .. }, Loading)
        )
    }
}

impl fmt::Display for ScreenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed() -> ScreenState {
        ScreenState::Failed {
            message: "offline".to_string(),
            retryable: true,
        }
    }

    #[test]
    fn allowed_edges() {
        assert!(ScreenState::Loading.can_transition_to(&ScreenState::Ready));
        assert!(ScreenState::Loading.can_transition_to(&failed()));
        assert!(ScreenState::Ready.can_transition_to(&ScreenState::Filtering));
        assert!(ScreenState::Filtering.can_transition_to(&ScreenState::Ready));
        assert!(ScreenState::Mutating.can_transition_to(&ScreenState::Loading));
        assert!(failed().can_transition_to(&ScreenState::Loading));
    }

    #[test]
    fn rejected_edges() {
        assert!(!ScreenState::Loading.can_transition_to(&ScreenState::Mutating));
        assert!(!ScreenState::Mutating.can_transition_to(&ScreenState::Mutating));
        assert!(!failed().can_transition_to(&ScreenState::Ready));
        assert!(!ScreenState::Filtering.can_transition_to(&ScreenState::Mutating));
    }

    #[test]
    fn busy_states() {
        assert!(ScreenState::Loading.is_busy());
        assert!(ScreenState::Mutating.is_busy());
        assert!(!ScreenState::Ready.is_busy());
        assert!(!failed().is_busy());
    }
}
