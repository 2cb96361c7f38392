use crate::error::{BleachError, Result};
use crate::models::{parse_rating, RawBallot};
use crate::store::BallotStore;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

// Naive formats tried after RFC 3339
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M:%S"];

/// Anything that can hand the core a list of raw submissions.
#[async_trait]
pub trait BallotSource: Send + Sync {
    async fn load(&self) -> Result<Vec<RawBallot>>;
}

/// Reads `timestamp, rating, feedback, selected_choice` rows from a CSV export.
pub struct CsvFileSource {
    pub path: PathBuf,
    pub default_offset: FixedOffset,
    pub skip_first_row: bool,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>, default_offset: FixedOffset, skip_first_row: bool) -> Self {
        Self {
            path: path.into(),
            default_offset,
            skip_first_row,
        }
    }

    pub fn parse(&self, contents: &str) -> Result<Vec<RawBallot>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.skip_first_row)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(contents.as_bytes());

        let first_row = if self.skip_first_row { 2 } else { 1 };
        let mut ballots = Vec::new();
        for (offset, record) in reader.records().enumerate() {
            let record = record?;
            let row = record
                .position()
                .map(|position| record_line(contents, position))
                .unwrap_or(first_row + offset);
            if record.iter().all(|field| field.is_empty()) {
                debug!("Skipping blank row {}", row);
                continue;
            }
            ballots.push(self.row_to_raw_ballot(&record, row)?);
        }
        Ok(ballots)
    }

    fn row_to_raw_ballot(&self, record: &csv::StringRecord, row: usize) -> Result<RawBallot> {
        let field = |i: usize| record.get(i).filter(|value| !value.is_empty());

        let timestamp_str = field(0).ok_or_else(|| BleachError::Ingest {
            row,
            message: "missing timestamp".to_string(),
        })?;
        let timestamp = parse_timestamp(timestamp_str, self.default_offset).ok_or_else(|| {
            BleachError::Ingest {
                row,
                message: format!("unparsable timestamp {:?}", timestamp_str),
            }
        })?;

        let rating = field(1).and_then(|raw| {
            let parsed = parse_rating(raw);
            if parsed.is_none() {
                warn!("Row {}: ignoring unparsable rating {:?}", row, raw);
            }
            parsed
        });

        Ok(RawBallot {
            timestamp,
            rating,
            feedback: field(2).map(str::to_string),
            selected_choice: field(3).map(str::to_string),
        })
    }
}

#[async_trait]
impl BallotSource for CsvFileSource {
    async fn load(&self) -> Result<Vec<RawBallot>> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        self.parse(&contents)
    }
}

/// Reads a JSON array of raw submissions.
pub struct JsonFileSource {
    pub path: PathBuf,
}

#[async_trait]
impl BallotSource for JsonFileSource {
    async fn load(&self) -> Result<Vec<RawBallot>> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&contents)?)
    }
}

// Pick a reader by file extension, CSV unless it says json
pub fn source_for_path(
    path: &Path,
    default_offset: FixedOffset,
    skip_first_row: bool,
) -> Box<dyn BallotSource> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        Box::new(JsonFileSource {
            path: path.to_path_buf(),
        })
    } else {
        Box::new(CsvFileSource::new(path, default_offset, skip_first_row))
    }
}

// Line a record starts on, stepping over blank lines the reader skipped
fn record_line(contents: &str, position: &csv::Position) -> usize {
    let skipped = contents
        .as_bytes()
        .get(position.byte() as usize..)
        .map(|rest| {
            rest.iter()
                .take_while(|byte| matches!(byte, b'\n' | b'\r'))
                .filter(|byte| **byte == b'\n')
                .count()
        })
        .unwrap_or(0);
    position.line() as usize + skipped
}

pub fn parse_timestamp(raw: &str, default_offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp);
    }
    NAIVE_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(raw, format)
            .ok()
            .and_then(|naive| default_offset.from_local_datetime(&naive).single())
    })
}

/// Loads every row from `source` into `store`, returning how many were added.
pub async fn load_store(source: &dyn BallotSource, store: &mut BallotStore) -> Result<usize> {
    let rows = source.load().await?;
    let count = rows.len();
    for raw in rows {
        store.add(raw.into_ballot());
    }
    info!("Loaded {} ballots ({} total in store)", count, store.len());
    Ok(count)
}
