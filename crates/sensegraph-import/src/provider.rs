//! Locating produced output documents.
//!
//! The producer writes one JSON document per image sequence, named after
//! the sorted image ids: `output_100_101_102.json`. [`OutputProvider`]
//! abstracts where those documents live; [`DirectoryProvider`] is the
//! plain filesystem layout the producer writes.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no output document {name} under {}", root.display())]
    NotFound { name: String, root: PathBuf },

    #[error("failed to read output document {name}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Source of raw output documents, keyed by the image ids of the sequence.
pub trait OutputProvider {
    fn fetch(&self, image_ids: &[i64]) -> Result<String, ProviderError>;
}

/// Reads output documents from a directory the producer populated.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryProvider { root: root.into() }
    }

    /// The producer's file name for a sequence: sorted image ids joined
    /// with underscores. Callers may pass the ids in any order.
    pub fn file_name(image_ids: &[i64]) -> String {
        let mut ids = image_ids.to_vec();
        ids.sort_unstable();
        let joined: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        format!("output_{}.json", joined.join("_"))
    }
}

impl OutputProvider for DirectoryProvider {
    fn fetch(&self, image_ids: &[i64]) -> Result<String, ProviderError> {
        let name = DirectoryProvider::file_name(image_ids);
        let path = self.root.join(&name);
        if !path.is_file() {
            return Err(ProviderError::NotFound {
                name,
                root: self.root.clone(),
            });
        }
        tracing::debug!(document = %path.display(), "reading sensemaker output");
        fs::read_to_string(&path).map_err(|source| ProviderError::Io { name, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_sorts_image_ids() {
        assert_eq!(DirectoryProvider::file_name(&[102, 100, 101]), "output_100_101_102.json");
        assert_eq!(DirectoryProvider::file_name(&[7]), "output_7.json");
    }

    #[test]
    fn fetch_finds_documents_regardless_of_id_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("output_100_101.json"), "{}").unwrap();

        let provider = DirectoryProvider::new(dir.path());
        assert_eq!(provider.fetch(&[101, 100]).unwrap(), "{}");
    }

    #[test]
    fn missing_document_reports_name_and_root() {
        let dir = tempfile::tempdir().unwrap();
        let provider = DirectoryProvider::new(dir.path());
        match provider.fetch(&[1, 2]) {
            Err(ProviderError::NotFound { name, root }) => {
                assert_eq!(name, "output_1_2.json");
                assert_eq!(root, dir.path());
            }
            other => panic!("expected not-found error, got {other:?}"),
        }
    }
}
