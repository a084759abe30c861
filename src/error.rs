//! Error taxonomy.
//!
//! Only caller-supplied instances and parameters can be rejected. Search
//! outcomes such as "no coloring with k colors" or "budget exhausted before
//! deviation 0" are reported through snapshots, never as errors.

/// A problem instance or engine parameter failed validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InstanceError {
    #[error("too few vertices: need at least {min}, got {got}")]
    TooFewVertices { min: usize, got: usize },

    #[error("too few points: need at least {min}, got {got}")]
    TooFewPoints { min: usize, got: usize },

    #[error("item list is empty")]
    EmptyItems,

    #[error("item {index} has non-positive value")]
    NonPositiveItem { index: usize },

    #[error("items {first} and {second} share the value {value}")]
    DuplicateItem {
        first: usize,
        second: usize,
        value: u64,
    },

    #[error("points {first} and {second} share the same coordinates")]
    DuplicatePoint { first: usize, second: usize },

    #[error("cannot place {requested} unique edges on {vertices} vertices (max {max})")]
    InfeasibleEdgeCount {
        vertices: usize,
        requested: usize,
        max: usize,
    },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl InstanceError {
    pub(crate) fn param(name: &'static str, reason: impl Into<String>) -> Self {
        InstanceError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = InstanceError::TooFewVertices { min: 50, got: 12 };
        assert_eq!(e.to_string(), "too few vertices: need at least 50, got 12");

        let e = InstanceError::param("cooling_rate", "must be in (0, 1), got 1.5");
        assert_eq!(
            e.to_string(),
            "invalid parameter `cooling_rate`: must be in (0, 1), got 1.5"
        );
    }
}
