use std::collections::HashMap;

use super::{
    AnalysisMode, AnalysisOptions, AnalysisResult, Analyzer, DetailedStats, LengthHistogram,
};

const VOWELS: &str = "aeiouAEIOU";

/// Word, vowel, digit and symbol counting
///
/// Basic mode counts whitespace-separated tokens as words. Detailed mode first
/// strips leading and trailing ASCII punctuation from each token, lowercases
/// it and drops tokens left empty; word count, average length, top words and
/// the length histogram are all computed over those normalized words.
/// Character counts are always taken over the raw text. Digits are every
/// character in a Unicode number category (`char::is_numeric`), so fractions
/// such as `½` and letter numerals such as `Ⅻ` count alongside `0`-`9`.
/// CJK ideographs such as `三` are letters and do not count.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextAnalyzer;

impl TextAnalyzer {
    fn basic(text: &str) -> AnalysisResult {
        let lengths: Vec<usize> = text.split_whitespace().map(|w| w.chars().count()).collect();
        let (vowels, digits, symbols) = count_characters(text);

        AnalysisResult {
            words: lengths.len() as u64,
            vowels,
            digits,
            symbols,
            avg_len: mean_length(&lengths),
            detail: None,
        }
    }

    fn detailed(text: &str, top_k: usize) -> AnalysisResult {
        let words: Vec<String> = text
            .split_whitespace()
            .map(|token| token.trim_matches(|c: char| c.is_ascii_punctuation()))
            .filter(|token| !token.is_empty())
            .map(|token| token.to_lowercase())
            .collect();
        let lengths: Vec<usize> = words.iter().map(|w| w.chars().count()).collect();
        let (vowels, digits, symbols) = count_characters(text);

        let mut len_histogram = LengthHistogram::new();
        for length in &lengths {
            len_histogram.record(*length);
        }

        AnalysisResult {
            words: words.len() as u64,
            vowels,
            digits,
            symbols,
            avg_len: mean_length(&lengths),
            detail: Some(DetailedStats {
                top_words: top_words(&words, top_k),
                len_histogram,
            }),
        }
    }
}

impl Analyzer for TextAnalyzer {
    fn analyze(&self, text: &str, options: AnalysisOptions) -> AnalysisResult {
        match options.mode {
            AnalysisMode::Basic => Self::basic(text),
            AnalysisMode::Detailed => Self::detailed(text, options.top_k),
        }
    }
}

fn count_characters(text: &str) -> (u64, u64, u64) {
    let mut vowels = 0;
    let mut digits = 0;
    let mut symbols = 0;
    for c in text.chars() {
        if VOWELS.contains(c) {
            vowels += 1;
        }
        if c.is_numeric() {
            digits += 1;
        }
        if c.is_ascii_punctuation() {
            symbols += 1;
        }
    }
    (vowels, digits, symbols)
}

fn mean_length(lengths: &[usize]) -> f64 {
    if lengths.is_empty() {
        return 0.0;
    }
    lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
}

/// Top `k` words by count; equal counts keep first-occurrence order
fn top_words(words: &[String], k: usize) -> Vec<(String, u64)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, u64)> = Vec::new();
    for word in words {
        match index.get(word.as_str()) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(word.as_str(), counts.len());
                counts.push((word.as_str(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(k)
        .map(|(word, count)| (word.to_string(), count))
        .collect()
}
