//! Messages exchanged between ranks.
//!
//! Both message types are plain serde structures so a process or network
//! transport can carry them unchanged.

use serde::{Deserialize, Serialize};

use super::Rank;
use crate::analysis::{LengthHistogram, WordCounter};
use crate::pipeline::{FileOutcomes, FileTask};

/// Scatter message: the tasks assigned to one rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Rank the tasks are assigned to.
    pub rank: Rank,
    /// Tasks in discovery order.
    pub tasks: Vec<FileTask>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Gather message: one rank's results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankReport {
    /// Reporting rank.
    pub rank: Rank,
    /// Outcome for every task of the rank's partition.
    pub outcomes: FileOutcomes,
    /// Local word counter, the sum of per-file top-word lists.
    pub words: WordCounter,
    /// Local word-length histogram.
    pub histogram: LengthHistogram,
    /// Wall-clock time of the rank's pipeline run.
    pub elapsed_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisOptions, Analyzer, TextAnalyzer};
    use crate::pipeline::{FailureStage, FileFailure};

    #[test]
    fn test_report_survives_json_transport() {
        let mut outcomes = FileOutcomes::new();
        let result = TextAnalyzer.analyze("to be or no to be", AnalysisOptions::detailed(2));
        let mut histogram = LengthHistogram::new();
        histogram.merge(&result.detail.as_ref().unwrap().len_histogram);
        outcomes.insert(FileTask::new("data/a.txt"), Ok(result));
        outcomes.insert(
            FileTask::new("data/b.txt"),
            Err(FileFailure {
                stage: FailureStage::Read,
                message: "stream did not contain valid UTF-8".into(),
            }),
        );

        let report = RankReport {
            rank: 3,
            outcomes,
            words: [("to", 2), ("be", 2)].into_iter().collect(),
            histogram,
            elapsed_secs: 0.25,
        };

        let wire = serde_json::to_string(&report).unwrap();
        let decoded: RankReport = serde_json::from_str(&wire).unwrap();

        assert_eq!(decoded, report);
    }
}
