use crossbeam::channel::{Receiver, Sender, bounded};
use std::time::Instant;

use super::{AnalysisContext, FileOutcome, FileOutcomes, FileTask, PipelineRun};
use crate::error::PipelineError;

pub const DEFAULT_IO_WORKERS: usize = 16;
pub const DEFAULT_BUFFER_MULTIPLIER: usize = 2;

/// Bounded I/O pool streaming into a bounded CPU pool
///
/// ```text
/// feeder ──tasks──▶ I/O workers ──(task, content)──▶ CPU workers
///                        │                               │
///                        └──read failures──▶ collector ◀─┘
/// ```
///
/// Each read is handed to the CPU stage the moment it completes. The calling
/// thread is the single collector and the only writer of the outcome map.
#[derive(Debug, Clone)]
pub struct HybridPipeline {
    ctx: AnalysisContext,
    io_workers: usize,
    cpu_workers: usize,
    buffer_multiplier: usize,
}

/// Context for I/O worker threads
struct IoWorker {
    worker_id: usize,
    task_rx: Receiver<FileTask>,
    content_tx: Sender<(FileTask, String)>,
    result_tx: Sender<(FileTask, FileOutcome)>,
}

/// Context for CPU worker threads
struct CpuWorker {
    worker_id: usize,
    content_rx: Receiver<(FileTask, String)>,
    result_tx: Sender<(FileTask, FileOutcome)>,
}

impl HybridPipeline {
    pub fn new(ctx: AnalysisContext, io_workers: usize, cpu_workers: usize) -> Self {
        Self {
            ctx,
            io_workers,
            cpu_workers,
            buffer_multiplier: DEFAULT_BUFFER_MULTIPLIER,
        }
    }

    /// Channel capacity per stage is `workers * multiplier`
    pub fn with_buffer_multiplier(mut self, multiplier: usize) -> Self {
        self.buffer_multiplier = multiplier.max(1);
        self
    }

    /// Process every task and return once all outcomes are collected
    pub fn run(&self, tasks: Vec<FileTask>) -> Result<PipelineRun, PipelineError> {
        if tasks.is_empty() {
            return Ok(PipelineRun::empty());
        }

        let total = tasks.len();
        let io_workers = self.io_workers.clamp(1, total);
        let cpu_workers = self.cpu_workers.clamp(1, total);
        tracing::info!(
            "Hybrid pipeline over {} files ({} I/O workers, {} CPU workers)",
            total,
            io_workers,
            cpu_workers
        );

        let (task_tx, task_rx) = bounded::<FileTask>(io_workers * self.buffer_multiplier);
        let (content_tx, content_rx) =
            bounded::<(FileTask, String)>(cpu_workers * self.buffer_multiplier);
        let (result_tx, result_rx) =
            bounded::<(FileTask, FileOutcome)>((io_workers + cpu_workers) * self.buffer_multiplier);

        let start = Instant::now();
        let outcomes = crossbeam::thread::scope(|s| {
            for worker_id in 0..io_workers {
                let worker = IoWorker {
                    worker_id,
                    task_rx: task_rx.clone(),
                    content_tx: content_tx.clone(),
                    result_tx: result_tx.clone(),
                };
                s.spawn(move |_| self.io_worker(worker));
            }

            for worker_id in 0..cpu_workers {
                let worker = CpuWorker {
                    worker_id,
                    content_rx: content_rx.clone(),
                    result_tx: result_tx.clone(),
                };
                s.spawn(move |_| self.cpu_worker(worker));
            }

            // Feeder thread: push every task into the I/O queue
            s.spawn(move |_| {
                for task in tasks {
                    if task_tx.send(task).is_err() {
                        break; // I/O workers gone
                    }
                }
            });

            // Drop the originals so receivers see disconnection once workers finish
            drop(task_rx);
            drop(content_tx);
            drop(content_rx);
            drop(result_tx);

            Self::collect(result_rx, total)
        })
        .map_err(|_| PipelineError::WorkerPanicked)?;
        let elapsed = start.elapsed();

        tracing::info!(
            "Hybrid pipeline finished in {:.3}s ({} failed)",
            elapsed.as_secs_f64(),
            outcomes.failure_count()
        );
        Ok(PipelineRun { outcomes, elapsed })
    }

    fn io_worker(&self, worker: IoWorker) {
        tracing::debug!("I/O worker {} started", worker.worker_id);
        while let Ok(task) = worker.task_rx.recv() {
            tracing::trace!("I/O worker {} reading {}", worker.worker_id, task);
            let sent = match self.ctx.read(&task) {
                Ok(content) => worker.content_tx.send((task, content)).is_ok(),
                // failed reads bypass the CPU stage
                Err(failure) => worker.result_tx.send((task, Err(failure))).is_ok(),
            };
            if !sent {
                break;
            }
        }
        tracing::debug!("I/O worker {} stopped", worker.worker_id);
    }

    fn cpu_worker(&self, worker: CpuWorker) {
        tracing::debug!("CPU worker {} started", worker.worker_id);
        while let Ok((task, content)) = worker.content_rx.recv() {
            tracing::trace!("CPU worker {} analyzing {}", worker.worker_id, task);
            let outcome = self.ctx.analyze(&task, &content);
            drop(content);
            if worker.result_tx.send((task, outcome)).is_err() {
                break; // collector gone
            }
        }
        tracing::debug!("CPU worker {} stopped", worker.worker_id);
    }

    fn collect(result_rx: Receiver<(FileTask, FileOutcome)>, total: usize) -> FileOutcomes {
        let mut outcomes = FileOutcomes::new();
        while let Ok((task, outcome)) = result_rx.recv() {
            outcomes.insert(task, outcome);
            if outcomes.len() >= total {
                break;
            }
        }
        outcomes
    }
}
