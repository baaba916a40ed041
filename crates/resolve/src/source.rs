//! Document source abstraction for filesystem-independent parsing.
//!
//! [`DocumentSource`] abstracts document I/O so the engine can run against
//! real files or an in-memory map -- imports and local-unit paths resolve
//! the same way either way.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Trait that abstracts document I/O for the resolution engine.
pub trait DocumentSource: Send + Sync {
    /// Read the document text at the given path.
    fn read_source(&self, path: &Path) -> Result<String, std::io::Error>;

    /// Resolve an import path against the importing document's directory.
    /// Absolute import paths pass through unchanged.
    fn resolve_import(&self, base: &Path, import: &str) -> PathBuf;

    /// Canonicalize a path for import-cycle detection.
    fn canonicalize(&self, path: &Path) -> PathBuf;
}

/// Default filesystem-backed document source.
pub struct FileSystemSource;

impl DocumentSource for FileSystemSource {
    fn read_source(&self, path: &Path) -> Result<String, std::io::Error> {
        std::fs::read_to_string(path)
    }

    fn resolve_import(&self, base: &Path, import: &str) -> PathBuf {
        base.join(import)
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| path.to_owned())
    }
}

/// In-memory document source for tests and embedding.
///
/// Maps paths to document text. Canonicalization normalizes `.` and `..`
/// components without touching the filesystem.
#[derive(Default)]
pub struct InMemorySource {
    files: HashMap<PathBuf, String>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.files.insert(Self::normalize(&path.into()), text.into());
        self
    }

    fn normalize(path: &Path) -> PathBuf {
        let mut components = Vec::new();
        for component in path.components() {
            match component {
                std::path::Component::CurDir => {}
                std::path::Component::ParentDir => {
                    if !components.is_empty() {
                        components.pop();
                    }
                }
                other => components.push(other),
            }
        }
        components.iter().collect()
    }
}

impl DocumentSource for InMemorySource {
    fn read_source(&self, path: &Path) -> Result<String, std::io::Error> {
        let normalized = Self::normalize(path);
        self.files.get(&normalized).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("document not found in memory: {}", normalized.display()),
            )
        })
    }

    fn resolve_import(&self, base: &Path, import: &str) -> PathBuf {
        Self::normalize(&base.join(import))
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        Self::normalize(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_resolves_dot_and_dotdot() {
        assert_eq!(
            InMemorySource::normalize(Path::new("/a/b/../c/./d")),
            PathBuf::from("/a/c/d")
        );
    }

    #[test]
    fn in_memory_read_and_miss() {
        let source = InMemorySource::new().with_file("/docs/cfg.yml", "x: 1\n");
        assert_eq!(
            source.read_source(Path::new("/docs/./cfg.yml")).unwrap(),
            "x: 1\n"
        );
        let err = source.read_source(Path::new("/docs/other.yml")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn resolve_import_joins_relative_keeps_absolute() {
        let source = InMemorySource::new();
        assert_eq!(
            source.resolve_import(Path::new("/docs"), "module.yml"),
            PathBuf::from("/docs/module.yml")
        );
        assert_eq!(
            source.resolve_import(Path::new("/docs"), "/abs/module.yml"),
            PathBuf::from("/abs/module.yml")
        );
    }
}
