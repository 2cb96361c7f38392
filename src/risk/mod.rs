pub mod chain;
pub mod completion;
pub mod duplicate;
pub mod verbosity;

use crate::config::RiskConfig;
use crate::models::Ballot;
use chrono::{DateTime, FixedOffset, TimeDelta, Utc};

pub use chain::ChainStuffing;
pub use completion::Completion;
pub use duplicate::DuplicateContent;
pub use verbosity::Verbosity;

/// A heuristic that looks at the whole batch and adds risk to ballots in place.
///
/// Checks never fail: missing ratings or feedback are treated as signals,
/// and an empty batch is a no-op.
pub trait RiskAssessment {
    fn name(&self) -> &'static str;
    fn assess(&self, ballots: &mut [Ballot]);
}

/// The standard checks, in the order they should run.
pub fn default_pipeline(config: &RiskConfig) -> Vec<Box<dyn RiskAssessment>> {
    vec![
        Box::new(ChainStuffing::from_config(config)),
        Box::new(Verbosity::from_config(config)),
        Box::new(Completion::from_config(config)),
        Box::new(DuplicateContent::from_config(config)),
    ]
}

// Start and stop of the window centered on `base`, clamped to the representable range
pub fn near_cutoffs(
    base: DateTime<FixedOffset>,
    window_secs: i64,
) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
    let delta = TimeDelta::try_seconds(window_secs).unwrap_or(TimeDelta::MAX);
    let start = base
        .checked_sub_signed(delta)
        .unwrap_or_else(|| DateTime::<Utc>::MIN_UTC.with_timezone(base.offset()));
    let stop = base
        .checked_add_signed(delta)
        .unwrap_or_else(|| DateTime::<Utc>::MAX_UTC.with_timezone(base.offset()));
    (start, stop)
}

/// Indices of every other ballot submitted within `window_secs` of `ballots[index]`.
/// Both window edges are inclusive.
pub fn near_ballot_indices(ballots: &[Ballot], index: usize, window_secs: i64) -> Vec<usize> {
    let (start, stop) = near_cutoffs(ballots[index].timestamp(), window_secs);
    ballots
        .iter()
        .enumerate()
        .filter(|(other, ballot)| {
            *other != index && start <= ballot.timestamp() && ballot.timestamp() <= stop
        })
        .map(|(other, _)| other)
        .collect()
}
