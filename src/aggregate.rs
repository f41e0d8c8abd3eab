//! Folding per-file outcomes into run totals
//!
//! Every operation here is a commutative sum keyed by file, so the totals of a
//! run do not depend on the order outcomes arrive in or on how the file set was
//! partitioned across ranks.

use std::collections::BTreeMap;

use crate::analysis::{LengthHistogram, WordCounter};
use crate::pipeline::{FailureStage, FileOutcome, FileOutcomes, FileTask};

/// One failed file in the aggregate
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FailureRecord {
    pub file: FileTask,
    pub stage: FailureStage,
    pub message: String,
}

/// Totals over all successfully analyzed files
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateStats {
    /// Files that produced a result
    pub files: usize,
    pub words: u64,
    pub vowels: u64,
    pub digits: u64,
    pub symbols: u64,
    /// Per-file average word length, keyed by path
    avg_lengths: BTreeMap<FileTask, f64>,
    pub top_words: WordCounter,
    pub len_histogram: LengthHistogram,
    pub failures: Vec<FailureRecord>,
}

impl AggregateStats {
    /// Mean of the per-file average word lengths, `0.0` with no files
    pub fn avg_len(&self) -> f64 {
        if self.avg_lengths.is_empty() {
            return 0.0;
        }
        self.avg_lengths.values().sum::<f64>() / self.avg_lengths.len() as f64
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn most_common(&self, k: usize) -> Vec<(String, u64)> {
        self.top_words.most_common(k)
    }
}

/// Accumulates outcomes; mutated only by the orchestrating thread
#[derive(Debug, Default)]
pub struct ResultAggregator {
    stats: AggregateStats,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Totals from one outcome plus its word counts and length histogram
    pub fn add(&mut self, task: &FileTask, outcome: &FileOutcome) {
        self.add_totals(task, outcome);
        if let Ok(result) = outcome
            && let Some(detail) = &result.detail
        {
            for (word, count) in &detail.top_words {
                self.stats.top_words.add(word, *count);
            }
            self.stats.len_histogram.merge(&detail.len_histogram);
        }
    }

    /// Counts, average length and failures from one outcome; frequencies are
    /// expected to arrive separately through [`Self::merge_frequencies`]
    pub fn add_totals(&mut self, task: &FileTask, outcome: &FileOutcome) {
        match outcome {
            Ok(result) => {
                self.stats.files += 1;
                self.stats.words += result.words;
                self.stats.vowels += result.vowels;
                self.stats.digits += result.digits;
                self.stats.symbols += result.symbols;
                self.stats.avg_lengths.insert(task.clone(), result.avg_len);
            }
            Err(failure) => self.stats.failures.push(FailureRecord {
                file: task.clone(),
                stage: failure.stage,
                message: failure.message.clone(),
            }),
        }
    }

    pub fn merge_frequencies(&mut self, words: &WordCounter, histogram: &LengthHistogram) {
        self.stats.top_words.merge(words);
        self.stats.len_histogram.merge(histogram);
    }

    pub fn finish(mut self) -> AggregateStats {
        self.stats.failures.sort();
        self.stats
    }

    /// Aggregate a complete outcome map in one pass
    pub fn fold(outcomes: &FileOutcomes) -> AggregateStats {
        let mut aggregator = Self::new();
        for (task, outcome) in outcomes.iter() {
            aggregator.add(task, outcome);
        }
        aggregator.finish()
    }
}

/// Summed top-word lists and length histograms of the successful outcomes
pub fn frequencies(outcomes: &FileOutcomes) -> (WordCounter, LengthHistogram) {
    let mut words = WordCounter::new();
    let mut histogram = LengthHistogram::new();
    for (_, result) in outcomes.successes() {
        if let Some(detail) = &result.detail {
            for (word, count) in &detail.top_words {
                words.add(word, *count);
            }
            histogram.merge(&detail.len_histogram);
        }
    }
    (words, histogram)
}
