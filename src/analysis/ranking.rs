use crate::analysis::histogram::percentage;
use crate::analysis::{summary_text, wrap_title, BarChart, SummaryData, TITLE_WIDTH};
use crate::models::Ballot;
use log::warn;
use std::collections::BTreeMap;

/// Share of ballots that picked each choice, listed alphabetically.
pub fn actor_ranking(
    ballots: &[&Ballot],
    title: &str,
    tick_format: &str,
    image_name: &str,
) -> Option<BarChart> {
    if ballots.is_empty() {
        warn!("No ballots for ranking chart {}", image_name);
        return None;
    }

    let mut ranking: BTreeMap<&str, usize> = BTreeMap::new();
    for ballot in ballots {
        *ranking.entry(ballot.selected_choice.as_str()).or_insert(0) += 1;
    }

    let total = ballots.len();
    let categories = ranking.keys().map(|choice| choice.to_string()).collect();
    let values = ranking.values().map(|count| percentage(*count, total)).collect();
    let summary = SummaryData {
        n: total,
        average: None,
        median: None,
    };

    Some(BarChart {
        image_name: image_name.to_string(),
        title: Some(wrap_title(title, TITLE_WIDTH)),
        categories,
        values,
        tick_format: tick_format.to_string(),
        summary_text: summary_text(&summary),
        summary,
    })
}
