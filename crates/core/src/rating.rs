//! Post-service rating types

use serde::{Deserialize, Serialize};

/// A submitted service rating
///
/// Created transiently at submission time, converted into a conversation
/// message, then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSubmission {
    /// Star rating, 1..=5
    pub stars: u8,
    /// Optional free-text comment
    pub comment: String,
}

impl RatingSubmission {
    /// Create a submission; stars are clamped into 1..=5
    pub fn new(stars: u8, comment: impl Into<String>) -> Self {
        Self {
            stars: stars.clamp(1, 5),
            comment: comment.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars_clamped() {
        assert_eq!(RatingSubmission::new(0, "").stars, 1);
        assert_eq!(RatingSubmission::new(3, "good").stars, 3);
        assert_eq!(RatingSubmission::new(9, "").stars, 5);
    }
}
