use crate::config::RiskConfig;
use crate::models::{Ballot, RiskTag};
use crate::risk::RiskAssessment;

/// Penalizes feedback that is missing or only a few words long.
#[derive(Debug, Clone)]
pub struct Verbosity {
    // Feedback with this many words or fewer counts as short
    pub max_words: usize,
    pub weight: u32,
}

impl Verbosity {
    pub fn from_config(config: &RiskConfig) -> Self {
        Self {
            max_words: config.short_feedback_max_words,
            weight: config.short_feedback_weight,
        }
    }

    pub fn is_short(&self, ballot: &Ballot) -> bool {
        !ballot.has_feedback() || ballot.word_count() <= self.max_words
    }
}

impl RiskAssessment for Verbosity {
    fn name(&self) -> &'static str {
        "verbosity"
    }

    fn assess(&self, ballots: &mut [Ballot]) {
        for ballot in ballots.iter_mut() {
            if self.is_short(ballot) {
                ballot.add_risk(self.weight, RiskTag::ShortFeedback);
            }
        }
    }
}
