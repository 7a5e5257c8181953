// src/training.rs

use std::fs;
use std::path::Path;

use crate::error::{ClassifyError, Result};

/// URLs of known gambling sites, one per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingSet {
    urls: Vec<String>,
}

impl TrainingSet {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ClassifyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&content))
    }

    /// Lines are trimmed; blank lines are skipped.
    pub fn parse(content: &str) -> Self {
        content.lines().collect()
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for TrainingSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let urls = iter
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        Self { urls }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_trimmed_and_blanks_dropped() {
        let set = TrainingSet::parse("https://a.example\n\n  https://b.example  \r\n\n");
        assert_eq!(set.urls(), ["https://a.example", "https://b.example"]);
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gambling_sites.txt");
        std::fs::write(&path, "https://casino.example\nhttps://bets.example\n").unwrap();

        let set = TrainingSet::from_file(&path).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn unreadable_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = TrainingSet::from_file(&dir.path().join("missing.txt"));
        assert!(matches!(result, Err(ClassifyError::Io { .. })));
    }
}
