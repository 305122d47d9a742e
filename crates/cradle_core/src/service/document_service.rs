//! Document import use-case service.
//!
//! # Responsibility
//! - Copy picked files into the app-managed document directory.
//! - Keep the file copy and the metadata row consistent.
//!
//! # Invariants
//! - I/O failures surface as typed errors; nothing is swallowed.
//! - A copy whose row insert fails is removed again.
//! - Deleting a document removes the row first; file removal is
//!   best-effort and logged.

use crate::model::document::{Document, DocumentCategory};
use crate::repo::document_repo::DocumentRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type DocumentServiceResult<T> = Result<T, DocumentServiceError>;

/// Service error for document import/removal.
#[derive(Debug)]
pub enum DocumentServiceError {
    /// File-system failure, carrying the path that failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Source path has no usable file name.
    InvalidSource(PathBuf),
    Repo(RepoError),
}

impl Display for DocumentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "file operation failed for `{}`: {source}", path.display())
            }
            Self::InvalidSource(path) => {
                write!(f, "source path has no file name: `{}`", path.display())
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DocumentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidSource(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for DocumentServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Document import service over a repository implementation.
pub struct DocumentService<R: DocumentRepository> {
    repo: R,
    storage_dir: PathBuf,
}

impl<R: DocumentRepository> DocumentService<R> {
    /// Creates a service storing copies under `storage_dir`.
    pub fn new(repo: R, storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo,
            storage_dir: storage_dir.into(),
        }
    }

    /// Copies `source` into the managed directory and inserts its row.
    ///
    /// The copy is removed again when the insert fails, so a failed import
    /// leaves no stray file behind.
    pub fn import_file(
        &self,
        source: &Path,
        title: &str,
        category: DocumentCategory,
    ) -> DocumentServiceResult<Document> {
        let file_name = source
            .file_name()
            .ok_or_else(|| DocumentServiceError::InvalidSource(source.to_path_buf()))?;

        std::fs::create_dir_all(&self.storage_dir).map_err(|source_err| {
            DocumentServiceError::Io {
                path: self.storage_dir.clone(),
                source: source_err,
            }
        })?;

        let target = self.storage_dir.join(file_name);
        std::fs::copy(source, &target).map_err(|source_err| DocumentServiceError::Io {
            path: source.to_path_buf(),
            source: source_err,
        })?;

        let mut document = Document::new(title, category, target.to_string_lossy());
        match self.repo.insert(&document) {
            Ok(id) => {
                document.id = id;
                info!(
                    "event=document_import module=documents status=ok id={id} file={}",
                    target.display()
                );
                Ok(document)
            }
            Err(err) => {
                if let Err(cleanup_err) = std::fs::remove_file(&target) {
                    warn!(
                        "event=document_import module=documents status=error cleanup_failed file={} error={cleanup_err}",
                        target.display()
                    );
                }
                Err(err.into())
            }
        }
    }

    /// Deletes the row, then best-effort removes the stored copy.
    pub fn remove(&self, document: &Document) -> DocumentServiceResult<()> {
        self.repo.delete(document.id)?;
        if let Err(err) = std::fs::remove_file(&document.file_path) {
            warn!(
                "event=document_remove module=documents status=ok file_cleanup_failed file={} error={err}",
                document.file_path
            );
        }
        Ok(())
    }
}
