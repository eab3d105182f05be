//! Post-service rating widget
//!
//! Single step: pick 1-5 stars, optionally leave a comment. Submission is
//! gated until at least one star is selected.

use clean_hurghada_core::RatingSubmission;

/// Rating widget state
#[derive(Debug, Clone, Default)]
pub struct RatingFlow {
    /// Selected stars; 0 means unset
    stars: u8,
    comment: String,
}

impl RatingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a star count (1..=5); 0 clears the selection
    pub fn set_stars(&mut self, stars: u8) {
        self.stars = stars.min(5);
    }

    /// Update the free-text comment
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    pub fn stars(&self) -> u8 {
        self.stars
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Submission is enabled once a star is selected
    pub fn can_submit(&self) -> bool {
        self.stars >= 1
    }

    /// Yield the submission, or `None` while no star is selected
    pub fn submit(&self) -> Option<RatingSubmission> {
        if self.can_submit() {
            Some(RatingSubmission::new(self.stars, self.comment.clone()))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_gated_until_stars_selected() {
        let mut flow = RatingFlow::new();
        assert!(!flow.can_submit());
        assert!(flow.submit().is_none());

        flow.set_comment("Spotless, thank you!");
        assert!(flow.submit().is_none());

        flow.set_stars(3);
        assert!(flow.can_submit());
        let submission = flow.submit().unwrap();
        assert_eq!(submission.stars, 3);
        assert_eq!(submission.comment, "Spotless, thank you!");
    }

    #[test]
    fn test_stars_capped_at_five() {
        let mut flow = RatingFlow::new();
        flow.set_stars(9);
        assert_eq!(flow.stars(), 5);

        flow.set_stars(0);
        assert!(!flow.can_submit());
    }
}
