use crate::models::Ballot;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

// Word count used for the per-choice clouds
pub const PER_CHOICE_WORD_COUNT: usize = 25;

// Common English filler words, extended by ChartOptions::stop_words
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "before", "being", "but", "by", "can", "could", "did", "do", "does", "for",
    "from", "get", "had", "has", "have", "he", "her", "here", "him", "his", "how", "i", "if", "in",
    "into", "is", "it", "its", "just", "me", "more", "most", "my", "no", "not", "of", "on", "or",
    "other", "our", "out", "over", "she", "should", "so", "some", "such", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "this", "those", "to", "too", "up", "us",
    "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "why", "will",
    "with", "would", "you", "your",
];

lazy_static! {
    // Two or more characters, apostrophes allowed after the first
    static ref CLOUD_WORD_RE: Regex = Regex::new(r"\w[\w']+").unwrap();
}

/// Word frequencies for one word-cloud image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCloud {
    pub image_name: String,
    pub max_words: usize,
    pub mask_file: Option<PathBuf>,
    // Most frequent first, ties in alphabetical order
    pub frequencies: Vec<(String, usize)>,
}

pub fn word_frequencies(ballots: &[&Ballot], stop_words: &[String]) -> Vec<(String, usize)> {
    let mut excluded: HashSet<String> = DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect();
    excluded.extend(stop_words.iter().map(|w| w.to_lowercase()));

    let mut counts: HashMap<String, usize> = HashMap::new();
    for ballot in ballots {
        let text = ballot.freeform_text.to_lowercase();
        for word in CLOUD_WORD_RE.find_iter(&text) {
            let word = word.as_str();
            if excluded.contains(word) || word.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            *counts.entry(word.to_string()).or_insert(0) += 1;
        }
    }

    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

pub fn word_cloud(
    ballots: &[&Ballot],
    image_name: &str,
    max_words: usize,
    mask_file: Option<PathBuf>,
    stop_words: &[String],
) -> WordCloud {
    let mut frequencies = word_frequencies(ballots, stop_words);
    frequencies.truncate(max_words);
    WordCloud {
        image_name: format!("{}-{}", image_name, max_words),
        max_words,
        mask_file,
        frequencies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::fixtures::*;

    #[test]
    fn frequencies_skip_stop_words_and_numbers() {
        let ballots = vec![
            ballot(0, Some(5), "1. Parks 2. Parks and trees", "Polk"),
            ballot(1, Some(5), "Trees, the city, and PARKS", "Polk"),
        ];
        let refs: Vec<&Ballot> = ballots.iter().collect();
        let frequencies = word_frequencies(&refs, &["City".to_string()]);
        assert_eq!(
            frequencies,
            vec![("parks".to_string(), 3), ("trees".to_string(), 2)]
        );
    }

    #[test]
    fn cloud_is_truncated_to_max_words() {
        let ballots = vec![ballot(0, Some(5), "alpha beta gamma delta beta", "Polk")];
        let refs: Vec<&Ballot> = ballots.iter().collect();
        let cloud = word_cloud(&refs, "feedback-wordcloud", 2, None, &[]);
        assert_eq!(cloud.image_name, "feedback-wordcloud-2");
        assert_eq!(
            cloud.frequencies,
            vec![("beta".to_string(), 2), ("alpha".to_string(), 1)]
        );
    }
}
