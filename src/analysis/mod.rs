pub mod histogram;
pub mod ranking;
pub mod wordcloud;

use crate::models::Ballot;
use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub use histogram::rating_histogram;
pub use ranking::actor_ranking;
pub use wordcloud::{word_cloud, WordCloud};

// Chart titles wrap at this many columns
pub const TITLE_WIDTH: usize = 35;

lazy_static! {
    static ref NON_ALNUM_RE: Regex = Regex::new(r"[^a-zA-Z0-9]+").unwrap();
}

/// Named options the chart layer needs besides the ballots themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub actor_ranking_title: String,
    pub actor_ranking_tick_format: String,
    pub actor_ranking_image_name: String,
    pub subject_rating_title: String,
    pub subject_rating_image_name: String,
    pub subject_rating_range: Vec<u8>,
    pub stop_words: Vec<String>,
    pub mask_file: Option<PathBuf>,
    pub word_counts: Vec<usize>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            actor_ranking_title: "Most effective council member".to_string(),
            actor_ranking_tick_format: "%d%%".to_string(),
            actor_ranking_image_name: "actor-ranking".to_string(),
            subject_rating_title: "Council rating".to_string(),
            subject_rating_image_name: "subject-rating".to_string(),
            subject_rating_range: (1..=5).collect(),
            stop_words: Vec::new(),
            mask_file: None,
            word_counts: vec![25, 50, 100, 1000],
        }
    }
}

/// Figures printed under a bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryData {
    pub n: usize,
    pub average: Option<f64>,
    pub median: Option<u8>,
}

/// Everything needed to draw one horizontal bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub image_name: String,
    pub title: Option<String>,
    pub categories: Vec<String>,
    // Rounded percentages, one per category
    pub values: Vec<u32>,
    pub tick_format: String,
    pub summary: SummaryData,
    pub summary_text: String,
}

/// The full set of chart inputs for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSet {
    pub bar_charts: Vec<BarChart>,
    pub word_clouds: Vec<WordCloud>,
}

/// "Votes: n  Average: a  Median: m", leaving out whatever is missing.
pub fn summary_text(summary: &SummaryData) -> String {
    let mut text = format!("Votes: {}  ", summary.n);
    if let Some(average) = summary.average {
        text.push_str(&format!("Average: {:.1}  ", average));
    }
    if let Some(median) = summary.median {
        text.push_str(&format!("Median: {}", median));
    }
    text.trim_end().to_string()
}

// Lower-cased alphanumerics only, safe for file names
pub fn simplified_name(name: &str) -> String {
    NON_ALNUM_RE.replace_all(name, "").to_lowercase()
}

/// Greedy word wrap at spaces. A word longer than `width` gets a line to itself.
pub fn wrap_title(title: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in title.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

// Keeps first-seen order of choices
pub(crate) fn group_by_choice<'a>(ballots: &[&'a Ballot]) -> Vec<(String, Vec<&'a Ballot>)> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: BTreeMap<String, Vec<&'a Ballot>> = BTreeMap::new();
    for ballot in ballots {
        if !groups.contains_key(&ballot.selected_choice) {
            order.push(ballot.selected_choice.clone());
        }
        groups.entry(ballot.selected_choice.clone()).or_default().push(*ballot);
    }
    order
        .into_iter()
        .map(|choice| {
            let members = groups.remove(&choice).unwrap_or_default();
            (choice, members)
        })
        .collect()
}

/// Builds every chart input from the clean ballot list.
pub fn build_charts(ballots: &[&Ballot], options: &ChartOptions) -> ChartSet {
    info!("Building charts...");
    let mut bar_charts = Vec::new();
    let mut word_clouds = Vec::new();

    if ballots.is_empty() {
        warn!("No ballots left after filtering; skipping charts");
        return ChartSet {
            bar_charts,
            word_clouds,
        };
    }

    bar_charts.extend(actor_ranking(
        ballots,
        &options.actor_ranking_title,
        &options.actor_ranking_tick_format,
        &options.actor_ranking_image_name,
    ));
    bar_charts.extend(rating_histogram(
        ballots,
        &options.subject_rating_range,
        &options.subject_rating_title,
        &options.subject_rating_image_name,
    ));

    // Rating histogram for each choice's voters
    for (choice, members) in group_by_choice(ballots) {
        let title = format!("{} by {} votes", options.subject_rating_title, choice);
        let image_name = format!("{}-ratings", simplified_name(&choice));
        bar_charts.extend(rating_histogram(
            &members,
            &options.subject_rating_range,
            &title,
            &image_name,
        ));
    }

    for word_count in &options.word_counts {
        word_clouds.push(word_cloud(
            ballots,
            "feedback-wordcloud",
            *word_count,
            options.mask_file.clone(),
            &options.stop_words,
        ));
    }

    // One small cloud per choice
    for (choice, members) in group_by_choice(ballots) {
        let image_name = format!("{}-wordcloud", simplified_name(&choice));
        word_clouds.push(word_cloud(
            &members,
            &image_name,
            wordcloud::PER_CHOICE_WORD_COUNT,
            options.mask_file.clone(),
            &options.stop_words,
        ));
    }

    info!(
        "...prepared {} bar charts and {} word clouds",
        bar_charts.len(),
        word_clouds.len()
    );
    ChartSet {
        bar_charts,
        word_clouds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::fixtures::*;

    #[test]
    fn summary_text_skips_missing_parts() {
        let full = SummaryData {
            n: 11,
            average: Some(5.4),
            median: Some(5),
        };
        assert_eq!(summary_text(&full), "Votes: 11  Average: 5.4  Median: 5");

        let count_only = SummaryData {
            n: 3,
            average: None,
            median: None,
        };
        assert_eq!(summary_text(&count_only), "Votes: 3");
    }

    #[test]
    fn simplified_name_strips_punctuation() {
        assert_eq!(simplified_name("O'Rourke-Smith, Jr."), "orourkesmithjr");
        assert_eq!(simplified_name("None of the above"), "noneoftheabove");
    }

    #[test]
    fn titles_wrap_at_word_boundaries() {
        let wrapped = wrap_title("How would you rate the overall performance of the council", 35);
        for line in wrapped.lines() {
            assert!(line.chars().count() <= 35);
        }
        assert_eq!(wrapped.replace('\n', " "), "How would you rate the overall performance of the council");
        assert_eq!(wrap_title("Short", 35), "Short");
    }

    #[test]
    fn chart_options_fill_in_defaults() {
        let options: ChartOptions =
            serde_json::from_str(r#"{"actor_ranking_title": "Best", "stop_words": ["city"]}"#).unwrap();
        assert_eq!(options.actor_ranking_title, "Best");
        assert_eq!(options.actor_ranking_tick_format, "%d%%");
        assert_eq!(options.subject_rating_range, vec![1, 2, 3, 4, 5]);
        assert_eq!(options.word_counts, vec![25, 50, 100, 1000]);
    }

    #[test]
    fn build_charts_covers_every_choice() {
        let ballots = vec![
            ballot(0, Some(4), "Parks and libraries for everyone", "Polk"),
            ballot(1, Some(2), "Fix potholes on every street", "Lincoln"),
            ballot(2, Some(5), "More parks please and thanks", "Polk"),
        ];
        let refs: Vec<&Ballot> = ballots.iter().collect();
        let charts = build_charts(&refs, &ChartOptions::default());

        let names: Vec<&str> = charts.bar_charts.iter().map(|c| c.image_name.as_str()).collect();
        assert_eq!(names, vec!["actor-ranking", "subject-rating", "polk-ratings", "lincoln-ratings"]);

        let clouds: Vec<&str> = charts.word_clouds.iter().map(|c| c.image_name.as_str()).collect();
        assert_eq!(
            clouds,
            vec![
                "feedback-wordcloud-25",
                "feedback-wordcloud-50",
                "feedback-wordcloud-100",
                "feedback-wordcloud-1000",
                "polk-wordcloud-25",
                "lincoln-wordcloud-25",
            ]
        );
        assert_eq!(
            charts.bar_charts[2].title.as_deref(),
            Some("Council rating by Polk votes")
        );
    }

    #[test]
    fn build_charts_with_no_ballots_is_empty() {
        let charts = build_charts(&[], &ChartOptions::default());
        assert!(charts.bar_charts.is_empty());
        assert!(charts.word_clouds.is_empty());
    }
}
