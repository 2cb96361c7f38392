use crate::config::RiskConfig;
use crate::models::{Ballot, RiskTag};
use crate::risk::RiskAssessment;

/// Penalizes the later copy of identical feedback for the same choice.
///
/// Only the apparent copy is charged; the earliest ballot with a given text
/// stays clean. When two timestamps are equal the ballot that sits earlier in
/// the batch (lower insertion id) counts as the original.
#[derive(Debug, Clone)]
pub struct DuplicateContent {
    pub weight: u32,
}

impl DuplicateContent {
    pub fn from_config(config: &RiskConfig) -> Self {
        Self {
            weight: config.duplicate_weight,
        }
    }
}

// Timestamp ties fall back to insertion id, then to batch position for unstored ballots
fn submitted_before(ballots: &[Ballot], a: usize, b: usize) -> bool {
    (ballots[a].timestamp(), ballots[a].id(), a) < (ballots[b].timestamp(), ballots[b].id(), b)
}

impl RiskAssessment for DuplicateContent {
    fn name(&self) -> &'static str {
        "duplicate"
    }

    fn assess(&self, ballots: &mut [Ballot]) {
        // Normalize once per ballot rather than once per pair
        let texts: Vec<String> = ballots.iter().map(Ballot::normalized_text).collect();

        let flagged: Vec<bool> = (0..ballots.len())
            .map(|index| {
                if texts[index].is_empty() {
                    return false;
                }
                // First earlier match is enough
                (0..ballots.len()).any(|other| {
                    other != index
                        && texts[other] == texts[index]
                        && ballots[other].selected_choice == ballots[index].selected_choice
                        && submitted_before(ballots, other, index)
                })
            })
            .collect();

        for (ballot, is_copy) in ballots.iter_mut().zip(flagged) {
            if is_copy {
                ballot.add_risk(self.weight, RiskTag::Duplicate);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::fixtures::*;

    fn check() -> DuplicateContent {
        DuplicateContent::from_config(&RiskConfig::default())
    }

    #[test]
    fn only_the_later_copy_is_charged() {
        let mut ballots = vec![
            ballot(30, Some(8), "Trees, water, sidewalks", "Polk"),
            ballot(10, Some(8), "trees,water,  SIDEWALKS", "Polk"),
        ];
        check().assess(&mut ballots);
        assert_eq!(scores(&ballots), vec![75, 0]);
        assert_eq!(ballots[0].explanation(), "duplicate");
    }

    #[test]
    fn several_earlier_copies_charge_once() {
        let mut ballots = vec![
            ballot(0, Some(6), "Affordability", "Roosevelt"),
            ballot(1, Some(6), "Affordability", "Roosevelt"),
            ballot(2, Some(6), "Affordability", "Roosevelt"),
        ];
        check().assess(&mut ballots);
        assert_eq!(scores(&ballots), vec![0, 75, 75]);
        assert_eq!(ballots[2].explanation(), "duplicate");
    }

    #[test]
    fn different_choice_is_not_a_duplicate() {
        let mut ballots = vec![
            ballot(0, Some(6), "Affordability", "Roosevelt"),
            ballot(5, Some(6), "Affordability", "Lincoln"),
        ];
        check().assess(&mut ballots);
        assert_eq!(scores(&ballots), vec![0, 0]);
    }

    #[test]
    fn empty_feedback_is_never_a_duplicate() {
        let mut ballots = vec![
            ballot(0, Some(3), "", "Obama"),
            ballot(5, Some(3), " - ", "Obama"),
        ];
        check().assess(&mut ballots);
        assert_eq!(scores(&ballots), vec![0, 0]);
    }

    #[test]
    fn equal_timestamps_charge_the_later_insertion() {
        let mut ballots = vec![
            ballot(0, Some(6), "Affordability", "Roosevelt"),
            ballot(0, Some(6), "Affordability", "Roosevelt"),
        ];
        check().assess(&mut ballots);
        assert_eq!(scores(&ballots), vec![0, 75]);
    }
}
