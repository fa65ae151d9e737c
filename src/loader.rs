//! Document loading from the filesystem.
//!
//! [`DocumentLoader`] walks a directory and turns supported files into
//! [`Document`]s with their path as the source identifier. Only formats
//! readable as plain UTF-8 are handled here (`.txt`, `.md`); PDF, DOCX,
//! and web extraction are adapter concerns outside this crate — an
//! adapter hands the extracted text to [`Document::new`] directly.

use std::path::Path;

use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::document::{Document, DocumentType};

/// Loads plain-text documentation files from a directory tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentLoader;

impl DocumentLoader {
    /// Create a new loader.
    pub fn new() -> Self {
        Self
    }

    /// Recursively load all supported files under `directory`.
    ///
    /// Unsupported extensions are skipped silently; unreadable files are
    /// logged and skipped so a single bad file never aborts a directory
    /// load. A missing directory logs an error and yields an empty list.
    pub fn load_from_directory(&self, directory: impl AsRef<Path>) -> Vec<Document> {
        let directory = directory.as_ref();
        if !directory.is_dir() {
            error!(directory = %directory.display(), "directory does not exist");
            return Vec::new();
        }

        let mut documents = Vec::new();
        for entry in WalkDir::new(directory).into_iter().filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                None
            }
        }) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(doc_type) = type_for_path(path) else {
                continue;
            };
            match std::fs::read_to_string(path) {
                Ok(content) if !content.is_empty() => {
                    info!(path = %path.display(), "loaded document");
                    documents.push(Document::new(
                        content,
                        path.to_string_lossy().into_owned(),
                        doc_type,
                    ));
                }
                Ok(_) => {
                    warn!(path = %path.display(), "skipping empty file");
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable file");
                }
            }
        }
        documents
    }
}

fn type_for_path(path: &Path) -> Option<DocumentType> {
    match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
        "txt" => Some(DocumentType::Txt),
        "md" => Some(DocumentType::Md),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_yields_empty() {
        let loader = DocumentLoader::new();
        assert!(loader.load_from_directory("/definitely/not/a/real/path").is_empty());
    }

    #[test]
    fn loads_supported_files_and_skips_others() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "plain text").unwrap();
        std::fs::write(dir.path().join("b.md"), "# heading").unwrap();
        std::fs::write(dir.path().join("c.bin"), [0u8, 159, 146]).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/d.txt"), "nested text").unwrap();

        let loader = DocumentLoader::new();
        let mut documents = loader.load_from_directory(dir.path());
        documents.sort_by(|a, b| a.source.cmp(&b.source));

        assert_eq!(documents.len(), 3);
        assert!(documents.iter().any(|d| d.content == "nested text"));
        assert!(documents.iter().all(|d| !d.source.ends_with(".bin")));
        assert_eq!(
            documents.iter().filter(|d| d.doc_type == DocumentType::Md).count(),
            1
        );
    }

    #[test]
    fn empty_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("empty.txt"), "").unwrap();
        let loader = DocumentLoader::new();
        assert!(loader.load_from_directory(dir.path()).is_empty());
    }
}
