//! Document store: the in-memory corpus searched by legal research.
//!
//! Loaded once from a directory of `*.txt` files. Unreadable files are
//! skipped with a warning. If nothing usable is found the built-in corpus
//! is used instead, so the store is never empty.

use std::path::Path;

use lexgate_core::Document;
use lexgate_core::error::RetrievalError;
use tracing::{debug, info, warn};

/// An immutable, never-empty set of documents.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    documents: Vec<Document>,
    from_fallback: bool,
}

impl DocumentStore {
    /// Load every `*.txt` file in `dir`, falling back to the built-in corpus.
    pub fn load(dir: &Path) -> Self {
        let (documents, errors) = read_text_files(dir);

        for error in &errors {
            warn!(error = %error, "Skipping unreadable document");
        }

        if documents.is_empty() {
            info!(
                dir = %dir.display(),
                "No documents loaded, using built-in fallback corpus"
            );
            return Self::fallback();
        }

        info!(dir = %dir.display(), count = documents.len(), "Documents loaded");
        Self {
            documents,
            from_fallback: false,
        }
    }

    /// The built-in corpus.
    pub fn fallback() -> Self {
        Self {
            documents: fallback_documents(),
            from_fallback: true,
        }
    }

    /// Build a store from explicit documents; an empty list yields the fallback.
    pub fn from_documents(documents: Vec<Document>) -> Self {
        if documents.is_empty() {
            return Self::fallback();
        }
        Self {
            documents,
            from_fallback: false,
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Whether the built-in corpus is in use.
    pub fn is_fallback(&self) -> bool {
        self.from_fallback
    }
}

/// Read all `*.txt` files in `dir`, sorted by file name.
///
/// Returns the documents that could be read and one error per file that
/// could not. A missing or unreadable directory yields no documents and a
/// single error.
fn read_text_files(dir: &Path) -> (Vec<Document>, Vec<RetrievalError>) {
    let mut documents = Vec::new();
    let mut errors = Vec::new();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            errors.push(RetrievalError::DocumentLoad {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            });
            return (documents, errors);
        }
    };

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    paths.sort();

    for path in paths {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                debug!(file = %filename, bytes = content.len(), "Loaded document");
                documents.push(Document::new(filename, content));
            }
            Err(e) => errors.push(RetrievalError::DocumentLoad {
                path: path.clone(),
                reason: e.to_string(),
            }),
        }
    }

    (documents, errors)
}

/// Representative snippets used when no document directory is available.
pub fn fallback_documents() -> Vec<Document> {
    vec![
        Document::new(
            "employment_law.txt",
            "Employment contracts must comply with the provisions of the Labor Code. \
             The probation period cannot exceed 2 months for employees and 4 months for executives.",
        ),
        Document::new(
            "civil_law.txt",
            "In civil law, contractual liability involves the obligation to repair the damage \
             caused by the non-performance of a contractual obligation.",
        ),
        Document::new(
            "criminal_law.txt",
            "Criminal law punishes the offences defined by statute. Sanctions may be fines, \
             prison sentences, or alternative penalties.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_uses_fallback() {
        let store = DocumentStore::load(Path::new("/nonexistent/lexgate-data"));
        assert!(store.is_fallback());
        assert!(store.len() >= 3);
    }

    #[test]
    fn empty_directory_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::load(dir.path());
        assert!(store.is_fallback());
        assert_eq!(store.documents(), fallback_documents().as_slice());
    }

    #[test]
    fn loads_txt_files_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b_tax.txt"), "Tax law.").unwrap();
        std::fs::write(dir.path().join("a_labor.txt"), "Labor law.").unwrap();
        std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let store = DocumentStore::load(dir.path());
        assert!(!store.is_fallback());
        assert_eq!(store.len(), 2);
        assert_eq!(store.documents()[0].filename, "a_labor.txt");
        assert_eq!(store.documents()[0].content, "Labor law.");
        assert_eq!(store.documents()[1].filename, "b_tax.txt");
    }

    #[test]
    fn unreadable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.txt"), "Readable.").unwrap();
        std::fs::write(dir.path().join("bad.txt"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        let (docs, errors) = read_text_files(dir.path());
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].filename, "good.txt");
        assert_eq!(errors.len(), 1);

        let store = DocumentStore::load(dir.path());
        assert_eq!(store.len(), 1);
        assert!(!store.is_fallback());
    }

    #[test]
    fn only_unreadable_files_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.txt"), [0xff, 0xff]).unwrap();
        let store = DocumentStore::load(dir.path());
        assert!(store.is_fallback());
        assert!(store.len() >= 3);
    }

    #[test]
    fn from_empty_documents_falls_back() {
        assert!(DocumentStore::from_documents(vec![]).is_fallback());
    }

    #[test]
    fn fallback_mentions_probation() {
        assert!(
            fallback_documents()
                .iter()
                .any(|d| d.content.contains("probation period"))
        );
    }
}
