use std::path::Path;

use crate::error::ReadError;

/// Blocking source of file content
pub trait Reader: Send + Sync {
    fn read(&self, path: &Path) -> Result<String, ReadError>;
}

/// Reads UTF-8 text from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl Reader for FsReader {
    fn read(&self, path: &Path) -> Result<String, ReadError> {
        std::fs::read_to_string(path).map_err(|source| ReadError {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_utf8_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "hello world").unwrap();

        assert_eq!(FsReader.read(&path).unwrap(), "hello world");
    }

    #[test]
    fn test_invalid_utf8_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        let err = FsReader.read(&path).unwrap_err();
        assert_eq!(err.path, path);
        assert_eq!(err.source.kind(), std::io::ErrorKind::InvalidData);
    }
}
