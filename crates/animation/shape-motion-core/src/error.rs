//! Error types for descriptor admission.

use serde::{Deserialize, Serialize};

/// Why a descriptor was not admitted. None of these are fatal to the
/// scheduler; `animate` logs them and returns the empty id.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AnimationError {
    /// Property map has no entries
    #[error("Animation has no properties")]
    EmptyProperties,

    /// A recognized numeric property holds something else
    #[error("Property '{key}' must be a number")]
    NonNumericProperty { key: String },

    /// A pair-shaped property is not an {x, y} pair of numbers
    #[error("Property '{key}' must be an {{x, y}} pair of numbers")]
    InvalidPair { key: String },

    /// Target list is empty
    #[error("Animation '{id}' has no targets")]
    NoTargets { id: String },

    /// Duration is not finite and positive
    #[error("Invalid duration: {duration} (must be > 0)")]
    InvalidDuration { duration: f64 },

    /// Delay is not finite and non-negative
    #[error("Invalid delay: {delay} (must be >= 0)")]
    InvalidDelay { delay: f64 },

    /// Another active descriptor already uses this id
    #[error("Animation id already active: {id}")]
    DuplicateId { id: String },

    /// The scheduler was destroyed
    #[error("Scheduler has been destroyed")]
    Destroyed,
}

impl AnimationError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::EmptyProperties
            | Self::NonNumericProperty { .. }
            | Self::InvalidPair { .. }
            | Self::NoTargets { .. }
            | Self::InvalidDuration { .. }
            | Self::InvalidDelay { .. } => "validation",
            Self::DuplicateId { .. } => "registry",
            Self::Destroyed => "lifecycle",
        }
    }

    /// True for errors caused by the descriptor itself.
    #[inline]
    pub fn is_validation(&self) -> bool {
        self.category() == "validation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(AnimationError::EmptyProperties.category(), "validation");
        assert_eq!(
            AnimationError::DuplicateId { id: "a".into() }.category(),
            "registry"
        );
        assert_eq!(AnimationError::Destroyed.category(), "lifecycle");
        assert!(AnimationError::InvalidDelay { delay: -1.0 }.is_validation());
    }

    #[test]
    fn test_display() {
        let e = AnimationError::InvalidPair { key: "scale".into() };
        assert_eq!(
            e.to_string(),
            "Property 'scale' must be an {x, y} pair of numbers"
        );
    }

    #[test]
    fn test_serialization() {
        let error = AnimationError::NonNumericProperty { key: "x".into() };
        let serialized = serde_json::to_string(&error).unwrap();
        let deserialized: AnimationError = serde_json::from_str(&serialized).unwrap();
        assert_eq!(error, deserialized);
    }
}
