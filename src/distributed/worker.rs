//! Per-rank execution.

use super::{Partition, Rank, RankReport};
use crate::aggregate;
use crate::error::CoordinationError;
use crate::pipeline::HybridPipeline;

/// Runs one hybrid pipeline over the partition assigned to a rank.
#[derive(Debug, Clone)]
pub struct RankWorker {
    rank: Rank,
    pipeline: HybridPipeline,
}

impl RankWorker {
    pub fn new(rank: Rank, pipeline: HybridPipeline) -> Self {
        Self { rank, pipeline }
    }

    /// Process the partition and build the report sent back at gather
    pub fn run(&self, partition: Partition) -> Result<RankReport, CoordinationError> {
        if partition.rank != self.rank {
            return Err(CoordinationError::UnexpectedRank {
                rank: partition.rank,
            });
        }

        tracing::debug!("Rank {} received {} tasks", self.rank, partition.len());
        let run = self
            .pipeline
            .run(partition.tasks)
            .map_err(|source| CoordinationError::RankFailed {
                rank: self.rank,
                source,
            })?;
        let (words, histogram) = aggregate::frequencies(&run.outcomes);

        tracing::debug!(
            "Rank {} finished {} tasks in {:.3}s",
            self.rank,
            run.outcomes.len(),
            run.elapsed.as_secs_f64()
        );
        Ok(RankReport {
            rank: self.rank,
            outcomes: run.outcomes,
            words,
            histogram,
            elapsed_secs: run.elapsed.as_secs_f64(),
        })
    }
}
