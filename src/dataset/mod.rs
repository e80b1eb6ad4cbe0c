//! Dataset loading for data-driven verification.
//!
//! A dataset is an ordered sequence of search phrases loaded once at setup
//! time and shared read-only across every verification iteration. Loading
//! failures are fatal to the whole run: no phrases means nothing to
//! parametrize.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Error types for dataset loading
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file could not be read
    #[error("failed to read dataset file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dataset file is not a flat JSON list of strings
    #[error("dataset file {} is not a flat JSON list of strings: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// An ordered, immutable sequence of search phrases.
///
/// Order determines iteration order and nothing else; iterations are
/// independent. An empty dataset means zero iterations, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    phrases: Vec<String>,
}

impl Dataset {
    #[must_use]
    pub fn new(phrases: Vec<String>) -> Self {
        Self { phrases }
    }

    /// Load a dataset, dispatching on the file extension: `.json` is parsed
    /// as a JSON list of strings, anything else as line-delimited text.
    pub fn load(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref();
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::load_from_json(path)
        } else {
            Self::load_from_lines(path)
        }
    }

    /// Load a dataset from a flat JSON list of strings.
    pub fn load_from_json(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref();
        let content = read_file(path)?;
        let phrases: Vec<String> =
            serde_json::from_str(&content).map_err(|source| DatasetError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), phrases = phrases.len(), "loaded JSON dataset");
        Ok(Self::new(phrases))
    }

    /// Load a dataset from a line-delimited text file.
    ///
    /// Trailing whitespace is trimmed from each line; internal whitespace is
    /// untouched. No lines are dropped, blank ones included. Callers own
    /// data hygiene.
    pub fn load_from_lines(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref();
        let content = read_file(path)?;
        let phrases: Vec<String> = content
            .lines()
            .map(|line| line.trim_end().to_string())
            .collect();
        info!(path = %path.display(), phrases = phrases.len(), "loaded line-delimited dataset");
        Ok(Self::new(phrases))
    }

    #[must_use]
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.phrases.iter()
    }
}

fn read_file(path: &Path) -> DatasetResult<String> {
    std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}
