// Project file operations exposed over HTTP.
// This layer validates names and resolves the store handle; the actual I/O
// is delegated to whatever FileStore was injected at startup.

use super::file_store::{FileStore, FileStoreHandle};
use super::storage_models::{StorageError, StoredFile};
use std::sync::Arc;

const TEXT_EXTENSION: &str = ".txt";

pub struct ProjectFileService {
    handle: FileStoreHandle,
}

impl ProjectFileService {
    pub fn new(handle: FileStoreHandle) -> Self {
        Self { handle }
    }

    pub fn is_available(&self) -> bool {
        self.handle.is_available()
    }

    /// Fails with `Unavailable` when storage never came up.
    pub fn ensure_available(&self) -> Result<(), StorageError> {
        self.store().map(|_| ())
    }

    fn store(&self) -> Result<&Arc<dyn FileStore>, StorageError> {
        self.handle.store()
    }

    pub async fn list_projects(&self) -> Result<Vec<String>, StorageError> {
        self.store()?.list_projects().await
    }

    pub async fn list(&self, project: &str) -> Result<Vec<StoredFile>, StorageError> {
        let project = validate_project(project)?;
        self.store()?.list_files(project).await
    }

    pub async fn create(
        &self,
        project: &str,
        title: &str,
        content: &str,
    ) -> Result<StoredFile, StorageError> {
        let project = validate_project(project)?;
        let title = normalize_title(title)?;
        let file = self.store()?.create_file(project, &title, content).await?;
        tracing::info!(project, title = %file.name, "Created file");
        Ok(file)
    }

    /// Creates or overwrites.
    pub async fn save(
        &self,
        project: &str,
        title: &str,
        content: &str,
    ) -> Result<StoredFile, StorageError> {
        let project = validate_project(project)?;
        let title = normalize_title(title)?;
        let file = self.store()?.save_file(project, &title, content).await?;
        tracing::info!(project, title = %file.name, "Saved file");
        Ok(file)
    }

    pub async fn read(&self, project: &str, title: &str) -> Result<String, StorageError> {
        let project = validate_project(project)?;
        let title = normalize_title(title)?;
        self.store()?.read_file(project, &title).await
    }

    pub async fn append(
        &self,
        project: &str,
        title: &str,
        content: &str,
    ) -> Result<StoredFile, StorageError> {
        let project = validate_project(project)?;
        let title = normalize_title(title)?;
        self.store()?.append_file(project, &title, content).await
    }

    pub async fn delete(&self, project: &str, title: &str) -> Result<(), StorageError> {
        let project = validate_project(project)?;
        let title = normalize_title(title)?;
        self.store()?.delete_file(project, &title).await?;
        tracing::info!(project, title = %title, "Deleted file");
        Ok(())
    }

    pub async fn move_to(
        &self,
        project: &str,
        title: &str,
        to_project: &str,
    ) -> Result<StoredFile, StorageError> {
        let project = validate_project(project)?;
        let to_project = validate_project(to_project)?;
        let title = normalize_title(title)?;
        self.store()?.move_file(project, &title, to_project).await
    }

    pub async fn copy_to(
        &self,
        project: &str,
        title: &str,
        to_project: &str,
        new_title: Option<&str>,
    ) -> Result<StoredFile, StorageError> {
        let project = validate_project(project)?;
        let to_project = validate_project(to_project)?;
        let title = normalize_title(title)?;
        let new_title = new_title.map(normalize_title).transpose()?;
        self.store()?
            .copy_file(project, &title, to_project, new_title.as_deref())
            .await
    }
}

fn validate_project(project: &str) -> Result<&str, StorageError> {
    let project = project.trim();
    if project.is_empty() {
        return Err(StorageError::InvalidName(
            "project name must not be empty".to_string(),
        ));
    }
    Ok(project)
}

/// Trims the title and makes sure it carries a `.txt` extension.
pub fn normalize_title(title: &str) -> Result<String, StorageError> {
    let title = title.trim();
    if title.is_empty() || title == TEXT_EXTENSION {
        return Err(StorageError::InvalidName(
            "file title must not be empty".to_string(),
        ));
    }
    if title.contains('/') {
        return Err(StorageError::InvalidName(format!(
            "file title '{}' must not contain '/'",
            title
        )));
    }

    if title.ends_with(TEXT_EXTENSION) {
        Ok(title.to_string())
    } else {
        Ok(format!("{}{}", title, TEXT_EXTENSION))
    }
}
