use crate::config::RiskConfig;
use crate::models::{Ballot, RiskTag};
use crate::risk::{near_ballot_indices, RiskAssessment};

/// Flags bursts of content-free ballots for the same choice submitted close together.
#[derive(Debug, Clone)]
pub struct ChainStuffing {
    pub window_secs: i64,
    pub qualifying_length: usize,
    pub empty_weight: u32,
    pub with_feedback_weight: u32,
}

impl ChainStuffing {
    pub fn from_config(config: &RiskConfig) -> Self {
        Self {
            window_secs: config.time_window_secs,
            qualifying_length: config.qualifying_length,
            empty_weight: config.chain_empty_weight,
            with_feedback_weight: config.chain_with_feedback_weight,
        }
    }
}

/// True when at least `qualifying_length` of the `candidates` share the
/// ballot's choice and carry no feedback.
pub fn has_empty_sibling_batch(
    ballot: &Ballot,
    candidates: &[&Ballot],
    qualifying_length: usize,
) -> bool {
    if ballot.selected_choice.is_empty() {
        return false;
    }
    let siblings = candidates
        .iter()
        .filter(|other| other.selected_choice == ballot.selected_choice && !other.has_feedback())
        .count();
    siblings >= qualifying_length
}

impl RiskAssessment for ChainStuffing {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn assess(&self, ballots: &mut [Ballot]) {
        // Decide for the whole batch first, then apply
        let increments: Vec<Option<u32>> = (0..ballots.len())
            .map(|index| {
                let near: Vec<&Ballot> = near_ballot_indices(ballots, index, self.window_secs)
                    .into_iter()
                    .map(|other| &ballots[other])
                    .collect();
                let ballot = &ballots[index];
                if !has_empty_sibling_batch(ballot, &near, self.qualifying_length) {
                    return None;
                }
                if ballot.has_feedback() {
                    Some(self.with_feedback_weight)
                } else {
                    Some(self.empty_weight)
                }
            })
            .collect();

        for (ballot, increment) in ballots.iter_mut().zip(increments) {
            if let Some(amount) = increment {
                ballot.add_risk(amount, RiskTag::Chain);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::fixtures::*;

    fn check() -> ChainStuffing {
        ChainStuffing::from_config(&RiskConfig::default())
    }

    #[test]
    fn burst_of_empty_ballots_is_flagged() {
        let mut ballots = vec![
            ballot(0, Some(5), "", "Obama"),
            ballot(60, Some(5), "", "Obama"),
            ballot(120, Some(5), "", "Obama"),
        ];
        check().assess(&mut ballots);
        assert_eq!(scores(&ballots), vec![100, 100, 100]);
        assert!(ballots.iter().all(|b| b.explanation() == "chain"));
    }

    #[test]
    fn ballot_with_feedback_gets_the_smaller_penalty() {
        let mut ballots = vec![
            ballot(0, Some(5), "", "Obama"),
            ballot(60, Some(5), "Fix the roads downtown please", "Obama"),
            ballot(120, Some(5), "", "Obama"),
        ];
        check().assess(&mut ballots);
        // The empty ones only have a single empty sibling each
        assert_eq!(scores(&ballots), vec![0, 20, 0]);
        assert_eq!(ballots[1].explanation(), "chain");
    }

    #[test]
    fn siblings_outside_the_window_do_not_count() {
        let mut ballots = vec![
            ballot(0, Some(5), "", "Obama"),
            ballot(420, Some(5), "", "Obama"),
            ballot(841, Some(5), "", "Obama"),
        ];
        check().assess(&mut ballots);
        assert_eq!(scores(&ballots), vec![0, 0, 0]);

        let mut ballots = vec![
            ballot(0, Some(5), "", "Obama"),
            ballot(420, Some(5), "", "Obama"),
            ballot(840, Some(5), "", "Obama"),
        ];
        check().assess(&mut ballots);
        // Only the middle ballot reaches both neighbours
        assert_eq!(scores(&ballots), vec![0, 100, 0]);
    }

    #[test]
    fn different_choices_are_not_siblings() {
        let mut ballots = vec![
            ballot(0, Some(5), "", "Obama"),
            ballot(10, Some(5), "", "Polk"),
            ballot(20, Some(5), "", "Lincoln"),
        ];
        check().assess(&mut ballots);
        assert_eq!(scores(&ballots), vec![0, 0, 0]);
    }

    #[test]
    fn threshold_is_configurable() {
        let mut config = RiskConfig::default();
        config.qualifying_length = 1;
        let mut ballots = vec![ballot(0, Some(5), "", "Polk"), ballot(30, Some(5), "", "Polk")];
        ChainStuffing::from_config(&config).assess(&mut ballots);
        assert_eq!(scores(&ballots), vec![100, 100]);
    }

    #[test]
    fn rerunning_adds_risk_again() {
        let mut ballots = vec![
            ballot(0, Some(5), "", "Obama"),
            ballot(60, Some(5), "", "Obama"),
            ballot(120, Some(5), "", "Obama"),
        ];
        check().assess(&mut ballots);
        check().assess(&mut ballots);
        assert_eq!(scores(&ballots), vec![200, 200, 200]);
        assert_eq!(ballots[0].explanation(), "chain+chain");
    }
}
