use std::time::Instant;

use super::{AnalysisContext, FileOutcomes, FileTask, PipelineRun};

/// Single-threaded reference run, the denominator of every speedup figure
#[derive(Debug, Clone)]
pub struct SequentialBaseline {
    ctx: AnalysisContext,
}

impl SequentialBaseline {
    pub fn new(ctx: AnalysisContext) -> Self {
        Self { ctx }
    }

    /// Read and analyze every task in order on the calling thread
    pub fn run(&self, tasks: &[FileTask]) -> PipelineRun {
        tracing::info!("Sequential baseline over {} files", tasks.len());

        let start = Instant::now();
        let mut outcomes = FileOutcomes::new();
        for task in tasks {
            tracing::trace!("Baseline processing {}", task);
            outcomes.insert(task.clone(), self.ctx.process(task));
        }
        let elapsed = start.elapsed();

        tracing::info!(
            "Sequential baseline finished in {:.3}s ({} failed)",
            elapsed.as_secs_f64(),
            outcomes.failure_count()
        );
        PipelineRun { outcomes, elapsed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisOptions, TextAnalyzer};
    use crate::pipeline::test_support::*;
    use std::sync::Arc;

    #[test]
    fn test_continues_after_failures() {
        let reader = MapReader::with_files(&[("a.txt", "one two"), ("c.txt", "three")]);
        let ctx = AnalysisContext::new(
            Arc::new(reader),
            Arc::new(TextAnalyzer),
            AnalysisOptions::basic(),
        );

        let run = SequentialBaseline::new(ctx).run(&tasks(&["a.txt", "b.txt", "c.txt"]));

        assert_eq!(run.outcomes.len(), 3);
        assert_eq!(run.outcomes.success_count(), 2);
        assert!(run.outcomes.get(&FileTask::new("b.txt")).unwrap().is_err());
        assert_eq!(
            run.outcomes.get(&FileTask::new("c.txt")).unwrap().as_ref().unwrap().words,
            1
        );
    }

    #[test]
    fn test_empty_task_list() {
        let ctx = AnalysisContext::standard(AnalysisOptions::basic());
        let run = SequentialBaseline::new(ctx).run(&[]);
        assert!(run.outcomes.is_empty());
    }
}
