use chrono::{DateTime, FixedOffset};
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// Choice recorded when a submission didn't pick one
pub const DEFAULT_CHOICE: &str = "None";

// Separator used when rendering the explanation
pub const TAG_SEPARATOR: &str = "+";

lazy_static! {
    static ref NORMALIZE_RE: Regex = Regex::new(r"[\s\-]+").unwrap();
    static ref WORD_RE: Regex = Regex::new(r"\w+").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskTag {
    Chain,
    ShortFeedback,
    IncompleteRating,
    IncompleteFeedback,
    Duplicate,
}

impl RiskTag {
    pub const ALL: [RiskTag; 5] = [
        RiskTag::Chain,
        RiskTag::ShortFeedback,
        RiskTag::IncompleteRating,
        RiskTag::IncompleteFeedback,
        RiskTag::Duplicate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTag::Chain => "chain",
            RiskTag::ShortFeedback => "short-feedback",
            RiskTag::IncompleteRating => "incomplete-rating",
            RiskTag::IncompleteFeedback => "incomplete-feedback",
            RiskTag::Duplicate => "duplicate",
        }
    }
}

impl fmt::Display for RiskTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One survey submission plus the risk accumulated against it.
#[derive(Debug, Clone)]
pub struct Ballot {
    id: Option<u64>,
    timestamp: DateTime<FixedOffset>,
    pub rating: Option<u8>,
    pub freeform_text: String,
    pub selected_choice: String,
    score: u32,
    explanation: Vec<RiskTag>,
}

impl Ballot {
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        rating: Option<u8>,
        freeform_text: impl Into<String>,
        selected_choice: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            timestamp,
            rating,
            freeform_text: freeform_text.into(),
            selected_choice: selected_choice.into(),
            score: 0,
            explanation: Vec::new(),
        }
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    // Fixed at submission time
    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    // Only the store hands out ids
    pub(crate) fn assign_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tags(&self) -> &[RiskTag] {
        &self.explanation
    }

    /// Tags joined with `+`, in the order they were added.
    pub fn explanation(&self) -> String {
        self.explanation
            .iter()
            .map(RiskTag::as_str)
            .collect::<Vec<_>>()
            .join(TAG_SEPARATOR)
    }

    /// Lower-cased feedback with whitespace and hyphens removed.
    /// Recomputed on every call so it always tracks `freeform_text`.
    pub fn normalized_text(&self) -> String {
        NORMALIZE_RE
            .replace_all(&self.freeform_text, "")
            .to_lowercase()
    }

    pub fn has_feedback(&self) -> bool {
        !self.normalized_text().is_empty()
    }

    pub fn word_count(&self) -> usize {
        WORD_RE.find_iter(&self.freeform_text).count()
    }

    /// Raises the score and records why, in one step.
    pub fn add_risk(&mut self, amount: u32, tag: RiskTag) {
        debug_assert!(amount > 0, "risk increments must be positive");
        self.score = self.score.saturating_add(amount);
        self.explanation.push(tag);
    }
}

// Ballots are only equal once both have been stored under the same id
impl PartialEq for Ballot {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Ballot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.id.map_or("-".to_string(), |id| id.to_string());
        let rating = self.rating.map_or("None".to_string(), |r| r.to_string());
        write!(
            f,
            "Ballot {} - Timestamp {} - Rating {} - Choice: {}",
            id,
            self.timestamp.to_rfc3339(),
            rating,
            self.selected_choice
        )
    }
}

/// A submission as handed over by an ingestion source, before it gets an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBallot {
    pub timestamp: DateTime<FixedOffset>,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<u8>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub selected_choice: Option<String>,
}

// Spreadsheet exports often write whole numbers as "8.0"
pub fn parse_rating(raw: &str) -> Option<u8> {
    if let Ok(rating) = raw.parse::<u8>() {
        return Some(rating);
    }
    raw.parse::<f64>().ok().and_then(whole_rating)
}

fn whole_rating(value: f64) -> Option<u8> {
    Some(value)
        .filter(|value| value.fract() == 0.0 && *value >= 0.0 && *value <= u8::MAX as f64)
        .map(|value| value as u8)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RatingField {
    Number(f64),
    Text(String),
}

// Numbers and strings go through the same rules as CSV cells; anything
// unusable becomes a missing rating instead of failing the whole load
fn lenient_rating<'de, D>(deserializer: D) -> std::result::Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let rating = match Option::<RatingField>::deserialize(deserializer)? {
        None => None,
        Some(RatingField::Number(value)) => {
            let rating = whole_rating(value);
            if rating.is_none() {
                warn!("Ignoring unusable rating {}", value);
            }
            rating
        }
        Some(RatingField::Text(raw)) if raw.trim().is_empty() => None,
        Some(RatingField::Text(raw)) => {
            let rating = parse_rating(raw.trim());
            if rating.is_none() {
                warn!("Ignoring unparsable rating {:?}", raw);
            }
            rating
        }
    };
    Ok(rating)
}

impl RawBallot {
    pub fn into_ballot(self) -> Ballot {
        let choice = self
            .selected_choice
            .filter(|choice| !choice.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CHOICE.to_string());
        Ballot::new(
            self.timestamp,
            self.rating,
            self.feedback.unwrap_or_default(),
            choice,
        )
    }
}
