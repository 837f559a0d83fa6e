//! Document store backed by a single flat directory.
//!
//! Every document is a regular file directly inside the store directory. The
//! store never creates subdirectories and only ever joins a validated
//! [`DocumentName`] onto its root, so a name can never address a path outside
//! the directory.
//!
//! Writes are destructive and unsynchronised: two concurrent writes to the
//! same name resolve as last-writer-wins.

use std::io;
use std::path::{Path, PathBuf};

use flatfile_cms_core::{ContentKind, DocumentName, DocumentNameError};
use thiserror::Error;

/// Errors returned by [`DocumentStore`] operations.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The proposed name failed validation (create path only).
    #[error("invalid document name: {0}")]
    Validation(#[from] DocumentNameError),

    /// No regular file with this name exists in the store directory.
    #[error("document not found: {0}")]
    NotFound(DocumentName),

    /// The document exists but its extension has no content handling.
    #[error("unsupported document kind: {0}")]
    UnsupportedKind(DocumentName),

    /// Underlying filesystem failure.
    #[error("document store I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A document read from the store.
#[derive(Debug, Clone)]
pub struct Document {
    /// File name inside the store directory.
    pub name: DocumentName,
    /// Kind derived from the file extension.
    pub kind: ContentKind,
    /// Raw file bytes.
    pub content: Vec<u8>,
}

impl Document {
    /// Content decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

/// Flat-directory document store.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    /// Create a store rooted at `root`. The directory is not touched until
    /// [`ensure_root`](Self::ensure_root) or the first operation.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the store directory if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn ensure_root(&self) -> Result<(), DocumentError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    fn path_for(&self, name: &DocumentName) -> PathBuf {
        self.root.join(name.as_str())
    }

    /// List the names of all documents, sorted.
    ///
    /// Each call re-reads the directory, so the listing is a fresh snapshot.
    /// Entries that are not regular files, or whose names are not valid
    /// UTF-8 document names, are skipped.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Io` if the directory cannot be read.
    pub async fn list(&self) -> Result<Vec<DocumentName>, DocumentError> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }

            let Ok(raw) = entry.file_name().into_string() else {
                tracing::warn!(path = ?entry.path(), "Skipping document with non UTF-8 name");
                continue;
            };

            match DocumentName::from_request(&raw) {
                Ok(name) => names.push(name),
                Err(e) => tracing::warn!(name = %raw, error = %e, "Skipping unlisted document"),
            }
        }

        names.sort();
        Ok(names)
    }

    /// Whether a regular file with exactly this name exists in the store.
    pub async fn exists(&self, name: &DocumentName) -> bool {
        tokio::fs::symlink_metadata(self.path_for(name))
            .await
            .is_ok_and(|meta| meta.is_file())
    }

    /// Read a document for display.
    ///
    /// # Errors
    ///
    /// - `DocumentError::NotFound` if the document does not exist
    /// - `DocumentError::UnsupportedKind` if the extension is neither `.txt` nor `.md`
    /// - `DocumentError::Io` for other filesystem failures
    pub async fn read(&self, name: &DocumentName) -> Result<Document, DocumentError> {
        let content = self.read_raw(name).await?;

        let kind = name.kind();
        if kind == ContentKind::Unsupported {
            return Err(DocumentError::UnsupportedKind(name.clone()));
        }

        Ok(Document {
            name: name.clone(),
            kind,
            content,
        })
    }

    /// Read a document's bytes regardless of its kind.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NotFound` if the document does not exist, or
    /// `DocumentError::Io` for other filesystem failures.
    pub async fn read_raw(&self, name: &DocumentName) -> Result<Vec<u8>, DocumentError> {
        if !self.exists(name).await {
            return Err(DocumentError::NotFound(name.clone()));
        }

        tokio::fs::read(self.path_for(name))
            .await
            .map_err(|e| not_found_or_io(e, name))
    }

    /// Create an empty document, truncating any existing document of that name.
    ///
    /// Returns the validated (trimmed) name.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Validation` if the name is empty, longer than
    /// 100 characters, or contains path components. No file is created in
    /// that case.
    pub async fn create(&self, input: &str) -> Result<DocumentName, DocumentError> {
        let name = DocumentName::parse(input)?;
        tokio::fs::write(self.path_for(&name), b"").await?;
        tracing::debug!(document = %name, "Created document");
        Ok(name)
    }

    /// Overwrite (or create) a document with `content`.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Io` if the file cannot be written.
    pub async fn write(&self, name: &DocumentName, content: &[u8]) -> Result<(), DocumentError> {
        tokio::fs::write(self.path_for(name), content).await?;
        tracing::debug!(document = %name, bytes = content.len(), "Wrote document");
        Ok(())
    }

    /// Remove a document.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NotFound` if the document does not exist, or
    /// `DocumentError::Io` if removal fails.
    pub async fn delete(&self, name: &DocumentName) -> Result<(), DocumentError> {
        if !self.exists(name).await {
            return Err(DocumentError::NotFound(name.clone()));
        }

        tokio::fs::remove_file(self.path_for(name))
            .await
            .map_err(|e| not_found_or_io(e, name))?;
        tracing::debug!(document = %name, "Deleted document");
        Ok(())
    }
}

/// A file that vanished between the existence check and the operation is
/// reported as missing rather than as an I/O failure.
fn not_found_or_io(err: io::Error, name: &DocumentName) -> DocumentError {
    if err.kind() == io::ErrorKind::NotFound {
        DocumentError::NotFound(name.clone())
    } else {
        DocumentError::Io(err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn store() -> (TempDir, DocumentStore) {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path());
        (dir, store)
    }

    fn name(s: &str) -> DocumentName {
        DocumentName::from_request(s).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_exists() {
        let (_dir, store) = store();

        let created = store.create("  notes.txt ").await.unwrap();
        assert_eq!(created.as_str(), "notes.txt");
        assert!(store.exists(&created).await);
        assert!(store.read_raw(&created).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name_without_creating() {
        let (dir, store) = store();

        let err = store.create("   ").await.unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Validation(DocumentNameError::Required)
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("inner");
        std::fs::create_dir(&nested).unwrap();
        let store = DocumentStore::new(&nested);

        let err = store.create("../escape.txt").await.unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Validation(DocumentNameError::InvalidCharacters(_))
        ));
        assert!(!dir.path().join("escape.txt").exists());
    }

    #[tokio::test]
    async fn test_names_with_inner_dots_are_usable() {
        let (dir, store) = store();
        std::fs::write(dir.path().join("notes..md"), "# Notes").unwrap();

        let created = store.create("v1..2.txt").await.unwrap();
        assert_eq!(created.as_str(), "v1..2.txt");

        let listed: Vec<String> = store
            .list()
            .await
            .unwrap()
            .iter()
            .map(|n| n.as_str().to_owned())
            .collect();
        assert_eq!(listed, ["notes..md", "v1..2.txt"]);
        assert_eq!(store.read_raw(&name("notes..md")).await.unwrap(), b"# Notes");
    }

    #[tokio::test]
    async fn test_create_truncates_existing() {
        let (_dir, store) = store();
        let doc = name("log.txt");
        store.write(&doc, b"old content").await.unwrap();

        store.create("log.txt").await.unwrap();

        assert!(store.read_raw(&doc).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_read_round_trip_plain_text() {
        let (_dir, store) = store();
        let doc = name("history.txt");
        let content = "1993 - Yukihiro Matsumoto dreams up Ruby.\r\n\ttabs & <tags>\n".as_bytes();

        store.write(&doc, content).await.unwrap();
        let read = store.read(&doc).await.unwrap();

        assert_eq!(read.kind, ContentKind::PlainText);
        assert_eq!(read.content, content);
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let (_dir, store) = store();
        let err = store.read(&name("nope.txt")).await.unwrap_err();
        assert!(matches!(err, DocumentError::NotFound(n) if n.as_str() == "nope.txt"));
    }

    #[tokio::test]
    async fn test_read_unsupported_kind() {
        let (_dir, store) = store();
        let doc = name("script.rb");
        store.write(&doc, b"puts 1").await.unwrap();

        assert!(matches!(
            store.read(&doc).await.unwrap_err(),
            DocumentError::UnsupportedKind(_)
        ));
        // Raw reads still work so the document can be edited.
        assert_eq!(store.read_raw(&doc).await.unwrap(), b"puts 1");
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let (_dir, store) = store();
        let doc = name("test.txt");
        store.create("test.txt").await.unwrap();

        assert!(store.delete(&doc).await.is_ok());
        assert!(matches!(
            store.delete(&doc).await.unwrap_err(),
            DocumentError::NotFound(_)
        ));
        assert!(!store.exists(&doc).await);
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_skips_directories() {
        let (dir, store) = store();
        store.create("changes.txt").await.unwrap();
        store.create("about.md").await.unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(DocumentName::into_inner)
            .collect();

        assert_eq!(names, vec!["about.md", "changes.txt"]);
    }

    #[tokio::test]
    async fn test_list_is_restartable() {
        let (_dir, store) = store();
        store.create("a.txt").await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 1);
        store.create("b.txt").await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_exists_false_for_directory() {
        let (dir, store) = store();
        std::fs::create_dir(dir.path().join("folder.txt")).unwrap();
        assert!(!store.exists(&name("folder.txt")).await);
    }

    #[tokio::test]
    async fn test_ensure_root_creates_directory() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path().join("data"));

        store.ensure_root().await.unwrap();

        assert!(store.root().is_dir());
        assert!(store.list().await.unwrap().is_empty());
    }
}
