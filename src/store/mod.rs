use crate::config::RiskConfig;
use crate::models::Ballot;
use crate::risk::{default_pipeline, RiskAssessment};
use log::{debug, info, warn};

/// In-memory home for one run's ballots.
///
/// Ids are handed out in insertion order starting at 1 and never reused.
pub struct BallotStore {
    ballots: Vec<Ballot>,
    counter: u64,
    assessments: Vec<Box<dyn RiskAssessment>>,
    scoring_runs: u32,
}

impl BallotStore {
    pub fn new(assessments: Vec<Box<dyn RiskAssessment>>) -> Self {
        Self {
            ballots: Vec::new(),
            counter: 0,
            assessments,
            scoring_runs: 0,
        }
    }

    pub fn with_default_pipeline(config: &RiskConfig) -> Self {
        Self::new(default_pipeline(config))
    }

    fn increment_counter(&mut self) -> u64 {
        self.counter += 1;
        self.counter
    }

    // Store a ballot and return the id it was given
    pub fn add(&mut self, mut ballot: Ballot) -> u64 {
        let id = self.increment_counter();
        ballot.assign_id(id);
        self.ballots.push(ballot);
        id
    }

    pub fn all(&self) -> &[Ballot] {
        &self.ballots
    }

    pub fn get(&self, id: u64) -> Option<&Ballot> {
        self.ballots.iter().find(|ballot| ballot.id() == Some(id))
    }

    pub fn len(&self) -> usize {
        self.ballots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ballots.is_empty()
    }

    pub fn assessment_names(&self) -> Vec<&'static str> {
        self.assessments.iter().map(|check| check.name()).collect()
    }

    /// Runs every registered check over the full batch, in registration order.
    ///
    /// Scoring is not idempotent: a second call adds the same risk again.
    pub fn score_all(&mut self) {
        self.scoring_runs += 1;
        if self.scoring_runs > 1 {
            warn!(
                "Scoring the same {} ballots again (run {}); risk will be added twice",
                self.ballots.len(),
                self.scoring_runs
            );
        }

        for assessment in &self.assessments {
            debug!("Running {} check over {} ballots", assessment.name(), self.ballots.len());
            assessment.assess(&mut self.ballots);
        }

        let flagged = self.ballots.iter().filter(|ballot| ballot.score() > 0).count();
        info!("Scored {} ballots, {} carry some risk", self.ballots.len(), flagged);
    }

    /// Ballots scoring below `cutoff`, or every ballot when there is no cutoff.
    pub fn filter(&self, cutoff: Option<u32>) -> Vec<&Ballot> {
        match cutoff {
            Some(limit) => self.ballots.iter().filter(|ballot| ballot.score() < limit).collect(),
            None => self.ballots.iter().collect(),
        }
    }

    // One line per ballot, for quick inspection
    pub fn describe(&self) -> Vec<String> {
        self.ballots.iter().map(|ballot| ballot.to_string()).collect()
    }
}

impl Default for BallotStore {
    fn default() -> Self {
        Self::with_default_pipeline(&RiskConfig::default())
    }
}
