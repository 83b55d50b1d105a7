//! Status state machines shared by jobs and applications.
//!
//! Every status enum declares its legal successors through [`Lifecycle`]; this
//! is the single place where the transition graph lives. Storage backends only
//! persist whatever a successful transition produced.

use std::fmt;

use thiserror::Error;

/// Rejected status change.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{entity_type} cannot move from '{from}' to '{to}'")]
pub struct TransitionError {
    pub entity_type: &'static str,
    pub from: String,
    pub to: String,
}

/// A status with an explicit transition graph.
pub trait Lifecycle: Copy + Eq + fmt::Display + Sized + 'static {
    /// Entity name used in error messages.
    const ENTITY: &'static str;

    /// Statuses reachable from `self` in one step (excluding `self`).
    fn successors(self) -> &'static [Self];

    /// Terminal statuses have no successors.
    fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }

    /// Returns true if moving to `next` is allowed. Staying put always is.
    fn can_transition_to(self, next: Self) -> bool {
        self == next || self.successors().contains(&next)
    }

    /// Validates a move to `next`, returning the new status.
    fn transition_to(self, next: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError {
                entity_type: Self::ENTITY,
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Red,
        Green,
        Off,
    }

    impl fmt::Display for Light {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{self:?}")
        }
    }

    impl Lifecycle for Light {
        const ENTITY: &'static str = "Light";

        fn successors(self) -> &'static [Self] {
            match self {
                Light::Red => &[Light::Green, Light::Off],
                Light::Green => &[Light::Red],
                Light::Off => &[],
            }
        }
    }

    #[test]
    fn test_allowed_transition() {
        assert_eq!(Light::Red.transition_to(Light::Green), Ok(Light::Green));
    }

    #[test]
    fn test_same_state_is_noop() {
        assert_eq!(Light::Off.transition_to(Light::Off), Ok(Light::Off));
    }

    #[test]
    fn test_rejected_transition() {
        let err = Light::Off.transition_to(Light::Red).unwrap_err();
        assert_eq!(err.to_string(), "Light cannot move from 'Off' to 'Red'");
    }

    #[test]
    fn test_terminal() {
        assert!(Light::Off.is_terminal());
        assert!(!Light::Green.is_terminal());
    }
}
