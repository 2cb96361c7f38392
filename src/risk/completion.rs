use crate::config::RiskConfig;
use crate::models::{Ballot, RiskTag};
use crate::risk::RiskAssessment;

/// Penalizes a missing rating and missing feedback separately.
#[derive(Debug, Clone)]
pub struct Completion {
    pub rating_weight: u32,
    pub feedback_weight: u32,
}

impl Completion {
    pub fn from_config(config: &RiskConfig) -> Self {
        Self {
            rating_weight: config.incomplete_rating_weight,
            feedback_weight: config.incomplete_feedback_weight,
        }
    }
}

impl RiskAssessment for Completion {
    fn name(&self) -> &'static str {
        "completion"
    }

    fn assess(&self, ballots: &mut [Ballot]) {
        for ballot in ballots.iter_mut() {
            // Rating first so the tags always read rating+feedback
            if ballot.rating.is_none() {
                ballot.add_risk(self.rating_weight, RiskTag::IncompleteRating);
            }
            if !ballot.has_feedback() {
                ballot.add_risk(self.feedback_weight, RiskTag::IncompleteFeedback);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::fixtures::*;

    fn check() -> Completion {
        Completion::from_config(&RiskConfig::default())
    }

    #[test]
    fn missing_rating_only() {
        let mut ballots = vec![ballot(0, None, "Planning and policy initiatives", "Johnson")];
        check().assess(&mut ballots);
        assert_eq!(ballots[0].score(), 50);
        assert_eq!(ballots[0].explanation(), "incomplete-rating");
    }

    #[test]
    fn missing_feedback_only() {
        let mut ballots = vec![ballot(0, Some(3), "", "Obama")];
        check().assess(&mut ballots);
        assert_eq!(ballots[0].score(), 50);
        assert_eq!(ballots[0].explanation(), "incomplete-feedback");
    }

    #[test]
    fn missing_both_stacks_in_field_order() {
        let mut ballots = vec![ballot(0, None, "", "Obama")];
        check().assess(&mut ballots);
        assert_eq!(ballots[0].score(), 100);
        assert_eq!(ballots[0].explanation(), "incomplete-rating+incomplete-feedback");
    }

    #[test]
    fn complete_ballot_is_untouched() {
        let mut ballots = vec![ballot(0, Some(10), "Housing, transportation, cops, taxes", "Washington")];
        check().assess(&mut ballots);
        assert_eq!(ballots[0].score(), 0);
        assert!(ballots[0].tags().is_empty());
    }

    #[test]
    fn running_twice_doubles_the_penalty() {
        let mut ballots = vec![ballot(0, None, "Some words here now", "Obama")];
        check().assess(&mut ballots);
        let once = ballots[0].score();
        check().assess(&mut ballots);
        assert!(ballots[0].score() > once);
        assert_eq!(ballots[0].explanation(), "incomplete-rating+incomplete-rating");
    }
}
