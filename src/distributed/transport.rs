//! Scatter/gather message passing.

use crossbeam::channel::{Receiver, Sender, bounded};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread::JoinHandle;

use super::{COORDINATOR, Partition, Rank, RankReport, RankWorker};
use crate::error::CoordinationError;
use crate::pipeline::HybridPipeline;

/// Message-passing layer between the coordinator and the other ranks
///
/// The coordinator only ever calls `scatter` once and then `gather` once.
/// Implementations may carry the messages over threads, processes or sockets.
pub trait Transport {
    /// Number of ranks, coordinator included
    fn rank_count(&self) -> usize;

    /// Deliver each partition to its rank and hand back the coordinator's own
    fn scatter(&mut self, partitions: Vec<Partition>) -> Result<Partition, CoordinationError>;

    /// Block until every rank other than the coordinator has reported
    fn gather(&mut self) -> Result<Vec<RankReport>, CoordinationError>;
}

pub type RankHandler =
    Arc<dyn Fn(Rank, Partition) -> Result<RankReport, CoordinationError> + Send + Sync>;
type RankResult = Result<RankReport, CoordinationError>;

/// Runs ranks `1..N` on dedicated OS threads inside this process
///
/// Each rank thread owns its inbox receiver and a sender into the shared
/// outbox. It handles exactly one partition, reports and exits, so a
/// disconnected outbox with ranks still pending means those ranks died.
pub struct LocalTransport {
    ranks: usize,
    inboxes: Vec<Sender<Partition>>,
    outbox: Receiver<RankResult>,
    handles: Vec<JoinHandle<()>>,
}

impl LocalTransport {
    /// Start one thread per non-coordinator rank, each running its own pipeline
    pub fn spawn(ranks: usize, pipeline: HybridPipeline) -> Result<Self, CoordinationError> {
        Self::with_handler(
            ranks,
            Arc::new(move |rank: Rank, partition: Partition| {
                RankWorker::new(rank, pipeline.clone()).run(partition)
            }),
        )
    }

    /// Start rank threads that process their partition with `handler`
    pub fn with_handler(ranks: usize, handler: RankHandler) -> Result<Self, CoordinationError> {
        if ranks == 0 {
            return Err(CoordinationError::NoRanks);
        }

        let (outbox_tx, outbox) = bounded::<RankResult>(ranks);
        let mut inboxes = Vec::with_capacity(ranks - 1);
        let mut handles = Vec::with_capacity(ranks - 1);

        for rank in (COORDINATOR + 1)..ranks {
            let (inbox_tx, inbox_rx) = bounded::<Partition>(1);
            let outbox_tx = outbox_tx.clone();
            let handler = handler.clone();

            let handle = std::thread::Builder::new()
                .name(format!("rank-{rank}"))
                .spawn(move || {
                    if let Ok(partition) = inbox_rx.recv() {
                        // coordinator may already have given up
                        outbox_tx.send(handler(rank, partition)).ok();
                    }
                })
                .map_err(|err| {
                    tracing::error!("Failed to start rank {}: {}", rank, err);
                    CoordinationError::ScatterFailed { rank }
                })?;

            inboxes.push(inbox_tx);
            handles.push(handle);
        }

        tracing::debug!("Started {} local rank threads", handles.len());
        Ok(Self {
            ranks,
            inboxes,
            outbox,
            handles,
        })
    }
}

impl Transport for LocalTransport {
    fn rank_count(&self) -> usize {
        self.ranks
    }

    fn scatter(&mut self, partitions: Vec<Partition>) -> Result<Partition, CoordinationError> {
        let mut local = None;
        for partition in partitions {
            let rank = partition.rank;
            if rank == COORDINATOR {
                local = Some(partition);
                continue;
            }

            let inbox = self
                .inboxes
                .get(rank - 1)
                .ok_or(CoordinationError::UnexpectedRank { rank })?;
            tracing::debug!("Scattering {} tasks to rank {}", partition.len(), rank);
            inbox
                .send(partition)
                .map_err(|_| CoordinationError::ScatterFailed { rank })?;
        }

        Ok(local.unwrap_or(Partition {
            rank: COORDINATOR,
            tasks: Vec::new(),
        }))
    }

    fn gather(&mut self) -> Result<Vec<RankReport>, CoordinationError> {
        let mut pending: BTreeSet<Rank> = ((COORDINATOR + 1)..self.ranks).collect();
        let mut reports = Vec::with_capacity(pending.len());

        while let Some(&next) = pending.first() {
            match self.outbox.recv() {
                Ok(Ok(report)) => {
                    if !pending.remove(&report.rank) {
                        return Err(CoordinationError::UnexpectedRank { rank: report.rank });
                    }
                    tracing::debug!("Gathered report from rank {}", report.rank);
                    reports.push(report);
                }
                Ok(Err(err)) => return Err(err),
                // every rank thread has exited and `next` never reported
                Err(_) => return Err(CoordinationError::RankLost { rank: next }),
            }
        }

        Ok(reports)
    }
}

impl Drop for LocalTransport {
    fn drop(&mut self) {
        // closing the inboxes releases ranks that never received a partition
        self.inboxes.clear();
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                tracing::debug!("A rank thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{LengthHistogram, WordCounter};
    use crate::pipeline::{FileOutcomes, FileTask};

    fn empty_report(rank: Rank) -> RankReport {
        RankReport {
            rank,
            outcomes: FileOutcomes::new(),
            words: WordCounter::new(),
            histogram: LengthHistogram::new(),
            elapsed_secs: 0.0,
        }
    }

    fn handler<F>(f: F) -> RankHandler
    where
        F: Fn(Rank, Partition) -> Result<RankReport, CoordinationError> + Send + Sync + 'static,
    {
        Arc::new(f)
    }

    fn partitions(ranks: usize) -> Vec<Partition> {
        (0..ranks)
            .map(|rank| Partition {
                rank,
                tasks: vec![FileTask::new(format!("r{rank}.txt"))],
            })
            .collect()
    }

    #[test]
    fn test_scatter_returns_local_partition_and_gathers_all() {
        let mut transport =
            LocalTransport::with_handler(4, handler(|rank, _| Ok(empty_report(rank)))).unwrap();

        let local = transport.scatter(partitions(4)).unwrap();
        assert_eq!(local.rank, COORDINATOR);
        assert_eq!(local.tasks, vec![FileTask::new("r0.txt")]);

        let mut ranks: Vec<Rank> = transport.gather().unwrap().iter().map(|r| r.rank).collect();
        ranks.sort();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_single_rank_gathers_nothing() {
        let mut transport =
            LocalTransport::with_handler(1, handler(|rank, _| Ok(empty_report(rank)))).unwrap();

        transport.scatter(partitions(1)).unwrap();
        assert!(transport.gather().unwrap().is_empty());
    }

    #[test]
    fn test_panicking_rank_is_lost() {
        let mut transport = LocalTransport::with_handler(
            3,
            handler(|rank, _| {
                if rank == 2 {
                    panic!("rank 2 crashed");
                }
                Ok(empty_report(rank))
            }),
        )
        .unwrap();

        transport.scatter(partitions(3)).unwrap();
        let err = transport.gather().unwrap_err();
        assert!(matches!(err, CoordinationError::RankLost { rank: 2 }));
    }

    #[test]
    fn test_report_from_wrong_rank() {
        let mut transport =
            LocalTransport::with_handler(2, handler(|_, _| Ok(empty_report(7)))).unwrap();

        transport.scatter(partitions(2)).unwrap();
        let err = transport.gather().unwrap_err();
        assert!(matches!(err, CoordinationError::UnexpectedRank { rank: 7 }));
    }

    #[test]
    fn test_partition_for_unknown_rank() {
        let mut transport =
            LocalTransport::with_handler(2, handler(|rank, _| Ok(empty_report(rank)))).unwrap();

        let err = transport.scatter(partitions(3)).unwrap_err();
        assert!(matches!(err, CoordinationError::UnexpectedRank { rank: 2 }));
    }
}
