//! Single-node execution engines
//!
//! Both engines consume the same ordered [`FileTask`] list and produce a
//! [`PipelineRun`]: one [`FileOutcome`] per task plus the wall-clock time of
//! the processing loop. Per-file failures are recorded in the outcome map and
//! never stop a run.

mod hybrid;
mod sequential;

pub use hybrid::{DEFAULT_BUFFER_MULTIPLIER, DEFAULT_IO_WORKERS, HybridPipeline};
pub use sequential::SequentialBaseline;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::analysis::{AnalysisOptions, AnalysisResult, Analyzer, FsReader, Reader, TextAnalyzer};
use crate::error::{AnalysisError, ReadError};

/// One input file, identified by its path
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileTask {
    path: PathBuf,
}

impl FileTask {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name of the file, used in artifacts
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

impl fmt::Display for FileTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Stage at which a file failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    Read,
    Analysis,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Read => write!(f, "read"),
            FailureStage::Analysis => write!(f, "analysis"),
        }
    }
}

/// Failure marker recorded in place of a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub stage: FailureStage,
    pub message: String,
}

impl FileFailure {
    pub fn read(err: &ReadError) -> Self {
        Self {
            stage: FailureStage::Read,
            message: err.source.to_string(),
        }
    }

    pub fn analysis(err: &AnalysisError) -> Self {
        Self {
            stage: FailureStage::Analysis,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.message)
    }
}

/// Either a result or a failure marker, never both
pub type FileOutcome = std::result::Result<AnalysisResult, FileFailure>;

/// Outcomes keyed by task, iterated in identifier order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileOutcomes(BTreeMap<FileTask, FileOutcome>);

impl FileOutcomes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome; returns the previous one if the task was already present
    pub fn insert(&mut self, task: FileTask, outcome: FileOutcome) -> Option<FileOutcome> {
        self.0.insert(task, outcome)
    }

    pub fn get(&self, task: &FileTask) -> Option<&FileOutcome> {
        self.0.get(task)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FileTask, &FileOutcome)> {
        self.0.iter()
    }

    pub fn successes(&self) -> impl Iterator<Item = (&FileTask, &AnalysisResult)> {
        self.0
            .iter()
            .filter_map(|(task, outcome)| outcome.as_ref().ok().map(|result| (task, result)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&FileTask, &FileFailure)> {
        self.0
            .iter()
            .filter_map(|(task, outcome)| outcome.as_ref().err().map(|failure| (task, failure)))
    }

    pub fn success_count(&self) -> usize {
        self.successes().count()
    }

    pub fn failure_count(&self) -> usize {
        self.len() - self.success_count()
    }
}

impl IntoIterator for FileOutcomes {
    type Item = (FileTask, FileOutcome);
    type IntoIter = std::collections::btree_map::IntoIter<FileTask, FileOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(FileTask, FileOutcome)> for FileOutcomes {
    fn from_iter<I: IntoIterator<Item = (FileTask, FileOutcome)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Outcomes of one engine run and the duration of its processing loop
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub outcomes: FileOutcomes,
    pub elapsed: Duration,
}

impl PipelineRun {
    pub fn empty() -> Self {
        Self {
            outcomes: FileOutcomes::new(),
            elapsed: Duration::ZERO,
        }
    }
}

/// Collaborators shared by every worker of an engine
#[derive(Clone)]
pub struct AnalysisContext {
    pub reader: Arc<dyn Reader>,
    pub analyzer: Arc<dyn Analyzer>,
    pub options: AnalysisOptions,
}

impl AnalysisContext {
    pub fn new(
        reader: Arc<dyn Reader>,
        analyzer: Arc<dyn Analyzer>,
        options: AnalysisOptions,
    ) -> Self {
        Self {
            reader,
            analyzer,
            options,
        }
    }

    /// Filesystem reader with the reference analyzer
    pub fn standard(options: AnalysisOptions) -> Self {
        Self::new(Arc::new(FsReader), Arc::new(TextAnalyzer), options)
    }

    /// Read stage for one task
    pub(crate) fn read(&self, task: &FileTask) -> Result<String, FileFailure> {
        self.reader.read(task.path()).map_err(|err| {
            tracing::warn!("{}", err);
            FileFailure::read(&err)
        })
    }

    /// Analysis stage for one task; a panicking analyzer becomes a failure marker
    pub(crate) fn analyze(&self, task: &FileTask, content: &str) -> FileOutcome {
        panic::catch_unwind(AssertUnwindSafe(|| self.analyzer.analyze(content, self.options)))
            .map_err(|payload| {
                let err = AnalysisError::Panicked(panic_message(payload.as_ref()));
                tracing::warn!("Analysis of {} failed: {}", task, err);
                FileFailure::analysis(&err)
            })
    }

    /// Both stages back to back
    pub(crate) fn process(&self, task: &FileTask) -> FileOutcome {
        let content = self.read(task)?;
        self.analyze(task, &content)
    }
}

impl fmt::Debug for AnalysisContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisContext")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Collaborators shared by engine tests

    use super::*;
    use std::collections::HashMap;
    use std::io;

    /// In-memory reader; paths not in the map fail with `NotFound`
    #[derive(Debug, Default)]
    pub struct MapReader(pub HashMap<PathBuf, String>);

    impl MapReader {
        pub fn with_files(files: &[(&str, &str)]) -> Self {
            Self(
                files
                    .iter()
                    .map(|(name, text)| (PathBuf::from(name), text.to_string()))
                    .collect(),
            )
        }
    }

    impl Reader for MapReader {
        fn read(&self, path: &Path) -> Result<String, ReadError> {
            self.0.get(path).cloned().ok_or_else(|| ReadError {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
            })
        }
    }

    /// Analyzer that panics on content containing "boom"
    #[derive(Debug, Default)]
    pub struct PanickyAnalyzer;

    impl Analyzer for PanickyAnalyzer {
        fn analyze(&self, text: &str, options: AnalysisOptions) -> AnalysisResult {
            if text.contains("boom") {
                panic!("exploded on {text}");
            }
            TextAnalyzer.analyze(text, options)
        }
    }

    pub fn tasks(names: &[&str]) -> Vec<FileTask> {
        names.iter().map(|name| FileTask::new(*name)).collect()
    }

    /// `count` files named `f000.txt`, `f001.txt`, ... with varied content
    pub fn corpus(count: usize) -> (MapReader, Vec<FileTask>) {
        let words = ["alpha", "Beta,", "gamma!", "42", "delta", "the", "THE", "e-mail"];
        let mut files = HashMap::new();
        let mut tasks = Vec::new();
        for i in 0..count {
            let name = format!("f{i:03}.txt");
            let text: Vec<&str> = (0..(i % 7 + 1)).map(|j| words[(i + j) % words.len()]).collect();
            files.insert(PathBuf::from(&name), text.join(" "));
            tasks.push(FileTask::new(name));
        }
        (MapReader(files), tasks)
    }
}
