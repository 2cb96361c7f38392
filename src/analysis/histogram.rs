use crate::analysis::{summary_text, wrap_title, BarChart, SummaryData, TITLE_WIDTH};
use crate::models::Ballot;
use log::warn;

// Label for ballots without a usable rating
pub const NO_RATING_LABEL: &str = "None";
pub const PERCENT_TICK_FORMAT: &str = "%d%%";

/// Share of ballots per rating value, with unrated ballots bucketed as "None".
pub fn rating_histogram(
    ballots: &[&Ballot],
    rating_range: &[u8],
    title: &str,
    image_name: &str,
) -> Option<BarChart> {
    if ballots.is_empty() {
        warn!("No ballots for rating histogram {}", image_name);
        return None;
    }

    let mut range: Vec<u8> = rating_range.iter().copied().filter(|r| *r > 0).collect();
    range.sort_unstable();
    range.dedup();

    // Bucket 0 holds unrated and out-of-range ballots
    let mut counts = vec![0usize; range.len() + 1];
    let mut all_values: Vec<u8> = Vec::with_capacity(ballots.len());
    for ballot in ballots {
        match ballot.rating.and_then(|r| range.iter().position(|v| *v == r).map(|i| (i, r))) {
            Some((index, rating)) => {
                counts[index + 1] += 1;
                all_values.push(rating);
            }
            None => {
                counts[0] += 1;
                all_values.push(0);
            }
        }
    }

    let total = ballots.len();
    let categories: Vec<String> = std::iter::once(NO_RATING_LABEL.to_string())
        .chain(range.iter().map(|r| r.to_string()))
        .collect();
    let values: Vec<u32> = counts.iter().map(|count| percentage(*count, total)).collect();

    let summary = SummaryData {
        n: total,
        average: Some(mean_one_decimal(&all_values)),
        median: median_low(&mut all_values),
    };

    Some(BarChart {
        image_name: image_name.to_string(),
        title: Some(wrap_title(title, TITLE_WIDTH)),
        categories,
        values,
        tick_format: PERCENT_TICK_FORMAT.to_string(),
        summary_text: summary_text(&summary),
        summary,
    })
}

pub(crate) fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 * 100.0 / total as f64).round() as u32
}

fn mean_one_decimal(values: &[u8]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u64 = values.iter().map(|v| *v as u64).sum();
    let mean = sum as f64 / values.len() as f64;
    (mean * 10.0).round() / 10.0
}

// Lower of the two middle values for even-sized inputs
fn median_low(values: &mut [u8]) -> Option<u8> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    Some(values[(values.len() - 1) / 2])
}
