//! Source directory listing
//!
//! Discovery produces the one ordered task list every engine consumes. The
//! order is lexicographic by path, so round-robin partitioning and the
//! baseline/parallel comparison always see the same workload in the same
//! order.

use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::error::DiscoveryError;
use crate::pipeline::FileTask;

/// Lists files with one extension directly inside a directory
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    extension: String,
    matcher: GlobMatcher,
    limit: Option<usize>,
}

impl FileDiscovery {
    /// Create a discovery for `extension` (without the leading dot), matched case-insensitively
    pub fn new(extension: &str) -> Result<Self, DiscoveryError> {
        let extension = extension.trim_start_matches('.').to_string();
        let matcher = GlobBuilder::new(&format!("*.{}", extension))
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .map_err(|source| DiscoveryError::InvalidFilter {
                extension: extension.clone(),
                source,
            })?
            .compile_matcher();

        Ok(Self {
            extension,
            matcher,
            limit: None,
        })
    }

    /// Keep only the first `limit` files after sorting
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// List eligible files in `source`, sorted and truncated to the limit
    pub fn discover(&self, source: &Path) -> Result<Vec<FileTask>, DiscoveryError> {
        if !source.exists() {
            return Err(DiscoveryError::NotFound(source.to_path_buf()));
        }
        if !source.is_dir() {
            return Err(DiscoveryError::NotADirectory(source.to_path_buf()));
        }

        let mut builder = WalkBuilder::new(source);
        builder
            .standard_filters(false) // every file counts, hidden or ignored
            .follow_links(true)
            .max_depth(Some(1));

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in builder.build() {
            let entry = entry.map_err(|source_err| DiscoveryError::Unreadable {
                path: source.to_path_buf(),
                source: source_err,
            })?;

            // depth 0 is the source directory itself
            if entry.depth() == 0 {
                continue;
            }
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                tracing::trace!("Skipping non-file entry {}", entry.path().display());
                continue;
            }
            if !self.matcher.is_match(entry.file_name()) {
                tracing::trace!("Skipping {} (extension filter)", entry.path().display());
                continue;
            }
            paths.push(entry.into_path());
        }

        paths.sort();
        if let Some(limit) = self.limit {
            paths.truncate(limit);
        }

        tracing::info!(
            "Discovered {} .{} files in {}",
            paths.len(),
            self.extension,
            source.display()
        );
        Ok(paths.into_iter().map(FileTask::new).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(tasks: &[FileTask]) -> Vec<String> {
        tasks.iter().map(|t| t.file_name()).collect()
    }

    #[test]
    fn test_filters_extension_case_insensitively_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["b.txt", "A.TXT", "c.Txt", "notes.md", "archive.txt.gz", ".hidden.txt"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.txt")).unwrap();
        fs::write(dir.path().join("nested.txt").join("inner.txt"), "x").unwrap();

        let tasks = FileDiscovery::new("txt").unwrap().discover(dir.path()).unwrap();

        assert_eq!(names(&tasks), vec![".hidden.txt", "A.TXT", "b.txt", "c.Txt"]);
    }

    #[test]
    fn test_limit_truncates_after_sorting() {
        let dir = TempDir::new().unwrap();
        for name in ["d.txt", "a.txt", "c.txt", "b.txt"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }

        let tasks = FileDiscovery::new("txt")
            .unwrap()
            .with_limit(Some(2))
            .discover(dir.path())
            .unwrap();

        assert_eq!(names(&tasks), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_empty_directory_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let tasks = FileDiscovery::new("txt").unwrap().discover(dir.path()).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let err = FileDiscovery::new("txt").unwrap().discover(&missing).unwrap_err();
        assert!(matches!(err, DiscoveryError::NotFound(path) if path == missing));
    }

    #[test]
    fn test_file_as_source_is_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "x").unwrap();

        let err = FileDiscovery::new("txt").unwrap().discover(&file).unwrap_err();
        assert!(matches!(err, DiscoveryError::NotADirectory(_)));
    }

    #[test]
    fn test_leading_dot_in_extension_is_accepted() {
        let discovery = FileDiscovery::new(".log").unwrap();
        assert_eq!(discovery.extension(), "log");
    }
}
