use std::sync::Arc;

use async_trait::async_trait;

use super::storage_models::{StorageError, StoredFile};

/// Separator written between the old content and an appended chunk.
pub const APPEND_SEPARATOR: &str = "\n\n";

/// Blob store keyed by `(project, title)`, where a project is a folder under
/// a single root.
///
/// The core only needs these calls; how folders and ids map onto the
/// backing service is up to the implementation.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Returns the folder id for `project`, creating the folder if needed.
    async fn ensure_project(&self, project: &str) -> Result<String, StorageError>;

    async fn list_projects(&self) -> Result<Vec<String>, StorageError>;

    /// `Ok(None)` when the project or the file does not exist.
    async fn find_file(&self, project: &str, title: &str)
        -> Result<Option<StoredFile>, StorageError>;

    /// Creates a new file. Fails with `AlreadyExists` if the title is taken.
    async fn create_file(
        &self,
        project: &str,
        title: &str,
        content: &str,
    ) -> Result<StoredFile, StorageError>;

    /// Creates the file or replaces its content.
    async fn save_file(
        &self,
        project: &str,
        title: &str,
        content: &str,
    ) -> Result<StoredFile, StorageError>;

    async fn read_file(&self, project: &str, title: &str) -> Result<String, StorageError>;

    async fn delete_file(&self, project: &str, title: &str) -> Result<(), StorageError>;

    async fn move_file(
        &self,
        project: &str,
        title: &str,
        to_project: &str,
    ) -> Result<StoredFile, StorageError>;

    async fn copy_file(
        &self,
        project: &str,
        title: &str,
        to_project: &str,
        new_title: Option<&str>,
    ) -> Result<StoredFile, StorageError>;

    async fn list_files(&self, project: &str) -> Result<Vec<StoredFile>, StorageError>;

    /// Read-modify-write append: the whole file is rewritten. Creates the
    /// file when it does not exist yet.
    async fn append_file(
        &self,
        project: &str,
        title: &str,
        content: &str,
    ) -> Result<StoredFile, StorageError> {
        let combined = match self.find_file(project, title).await? {
            Some(_) => {
                let existing = self.read_file(project, title).await?;
                if existing.is_empty() {
                    content.to_string()
                } else {
                    format!("{}{}{}", existing, APPEND_SEPARATOR, content)
                }
            }
            None => content.to_string(),
        };

        self.save_file(project, title, &combined).await
    }
}

/// Outcome of wiring up the file store at startup.
///
/// A missing or broken credential leaves the process running with storage
/// marked unavailable instead of aborting.
#[derive(Clone)]
pub enum FileStoreHandle {
    Available(Arc<dyn FileStore>),
    Unavailable { reason: String },
}

impl FileStoreHandle {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        FileStoreHandle::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, FileStoreHandle::Available(_))
    }

    pub fn store(&self) -> Result<&Arc<dyn FileStore>, StorageError> {
        match self {
            FileStoreHandle::Available(store) => Ok(store),
            FileStoreHandle::Unavailable { reason } => {
                Err(StorageError::Unavailable(reason.clone()))
            }
        }
    }
}
