//! Risk scoring for survey ballots.
//!
//! Ballots go into a [`store::BallotStore`], a pipeline of batch-wide
//! [`risk::RiskAssessment`] checks adds risk to each one, and the
//! reporting and chart adapters read back the low-risk population.

pub mod analysis;
pub mod commands;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod report;
pub mod risk;
pub mod store;

pub use error::{BleachError, Result};
pub use models::{Ballot, RawBallot, RiskTag};
pub use store::BallotStore;
