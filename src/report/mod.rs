use crate::error::{BleachError, Result};
use crate::models::{Ballot, RiskTag};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const CSV_HEADER: [&str; 7] = [
    "id",
    "timestamp",
    "rating",
    "selected_choice",
    "normalized_text",
    "score",
    "explanation",
];

/// Totals for one scoring run, written next to the CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub cutoff: Option<u32>,
    pub retained: usize,
    pub tag_counts: BTreeMap<RiskTag, usize>,
}

impl RunSummary {
    pub fn new(all: &[Ballot], cutoff: Option<u32>, retained: usize) -> Self {
        let mut tag_counts: BTreeMap<RiskTag, usize> = BTreeMap::new();
        for ballot in all {
            for tag in ballot.tags() {
                *tag_counts.entry(*tag).or_insert(0) += 1;
            }
        }

        Self {
            run_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            total: all.len(),
            cutoff,
            retained,
            tag_counts,
        }
    }
}

// Renders ballots as CSV rows in the reporting column order
pub fn render_csv<'a, I>(ballots: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Ballot>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for ballot in ballots {
        writer.write_record([
            ballot.id().map(|id| id.to_string()).unwrap_or_default(),
            ballot.timestamp().to_rfc3339(),
            ballot.rating.map(|r| r.to_string()).unwrap_or_default(),
            ballot.selected_choice.clone(),
            ballot.normalized_text(),
            ballot.score().to_string(),
            ballot.explanation(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| BleachError::Io(std::io::Error::other(e.to_string())))?;
    String::from_utf8(bytes)
        .map_err(|e| BleachError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

pub async fn write_csv<'a, I>(out_dir: &Path, file_name: &str, ballots: I) -> Result<PathBuf>
where
    I: IntoIterator<Item = &'a Ballot>,
{
    let contents = render_csv(ballots)?;
    tokio::fs::create_dir_all(out_dir).await?;
    let path = out_dir.join(file_name);
    tokio::fs::write(&path, contents).await?;
    info!("...wrote report at {}", path.display());
    Ok(path)
}

pub async fn write_json<T: Serialize>(out_dir: &Path, file_name: &str, value: &T) -> Result<PathBuf> {
    let contents = serde_json::to_string_pretty(value)?;
    tokio::fs::create_dir_all(out_dir).await?;
    let path = out_dir.join(file_name);
    tokio::fs::write(&path, contents).await?;
    info!("...wrote {}", path.display());
    Ok(path)
}
