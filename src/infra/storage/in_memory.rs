// In-memory implementation of FileStore.
//
// Used by the test suite and by `STORAGE_BACKEND=memory` for local runs
// without Google credentials. Content is lost when the process exits.

use crate::core::storage::{FileStore, StorageError, StoredFile, TEXT_MIME_TYPE};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// A composite key for looking up a file.
/// Titles are only unique within a project.
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
struct FileKey {
    project: String,
    title: String,
}

impl FileKey {
    fn new(project: &str, title: &str) -> Self {
        Self {
            project: project.to_string(),
            title: title.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
struct StoredEntry {
    file: StoredFile,
    content: String,
}

/// **DashMap:**
/// Concurrent handlers may touch the store at the same time, and DashMap
/// shards its locking so no outer Mutex is needed.
pub struct InMemoryFileStore {
    /// Maps project name -> folder id
    folders: DashMap<String, String>,
    /// Maps (project, title) -> file metadata and content
    files: DashMap<FileKey, StoredEntry>,
    next_id: AtomicU64,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self {
            folders: DashMap::new(),
            files: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    fn allocate_id(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn entry(&self, project: &str, title: &str) -> Result<StoredEntry, StorageError> {
        self.files
            .get(&FileKey::new(project, title))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StorageError::not_found(project, title))
    }

    fn new_file(&self, project: &str, title: &str, content: &str) -> StoredFile {
        StoredFile {
            id: self.allocate_id("file"),
            name: title.to_string(),
            project: project.to_string(),
            mime_type: TEXT_MIME_TYPE.to_string(),
            web_view_link: None,
            modified_time: Some(Utc::now()),
            size: Some(content.len() as u64),
        }
    }

    /// Inserts into `project`, failing if the title is already taken there.
    async fn insert_new(
        &self,
        project: &str,
        title: &str,
        file: StoredFile,
        content: String,
    ) -> Result<StoredFile, StorageError> {
        self.ensure_project(project).await?;

        match self.files.entry(FileKey::new(project, title)) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(StorageError::already_exists(project, title))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(StoredEntry {
                    file: file.clone(),
                    content,
                });
                Ok(file)
            }
        }
    }
}

impl Default for InMemoryFileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn ensure_project(&self, project: &str) -> Result<String, StorageError> {
        if let Some(id) = self.folders.get(project) {
            return Ok(id.value().clone());
        }

        let id = self.allocate_id("folder");
        Ok(self
            .folders
            .entry(project.to_string())
            .or_insert(id)
            .value()
            .clone())
    }

    async fn list_projects(&self) -> Result<Vec<String>, StorageError> {
        let mut projects: Vec<String> = self.folders.iter().map(|e| e.key().clone()).collect();
        projects.sort();
        Ok(projects)
    }

    async fn find_file(
        &self,
        project: &str,
        title: &str,
    ) -> Result<Option<StoredFile>, StorageError> {
        Ok(self
            .files
            .get(&FileKey::new(project, title))
            .map(|entry| entry.file.clone()))
    }

    async fn create_file(
        &self,
        project: &str,
        title: &str,
        content: &str,
    ) -> Result<StoredFile, StorageError> {
        let file = self.new_file(project, title, content);
        self.insert_new(project, title, file, content.to_string())
            .await
    }

    async fn save_file(
        &self,
        project: &str,
        title: &str,
        content: &str,
    ) -> Result<StoredFile, StorageError> {
        self.ensure_project(project).await?;

        let mut entry = self
            .files
            .entry(FileKey::new(project, title))
            .or_insert_with(|| StoredEntry {
                file: self.new_file(project, title, content),
                content: String::new(),
            });

        entry.content = content.to_string();
        entry.file.size = Some(content.len() as u64);
        entry.file.modified_time = Some(Utc::now());
        Ok(entry.file.clone())
    }

    async fn read_file(&self, project: &str, title: &str) -> Result<String, StorageError> {
        Ok(self.entry(project, title)?.content)
    }

    async fn delete_file(&self, project: &str, title: &str) -> Result<(), StorageError> {
        self.files
            .remove(&FileKey::new(project, title))
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found(project, title))
    }

    async fn move_file(
        &self,
        project: &str,
        title: &str,
        to_project: &str,
    ) -> Result<StoredFile, StorageError> {
        let entry = self.entry(project, title)?;
        if project == to_project {
            return Ok(entry.file);
        }

        let mut file = entry.file;
        file.project = to_project.to_string();
        let moved = self
            .insert_new(to_project, title, file, entry.content)
            .await?;

        self.files.remove(&FileKey::new(project, title));
        Ok(moved)
    }

    async fn copy_file(
        &self,
        project: &str,
        title: &str,
        to_project: &str,
        new_title: Option<&str>,
    ) -> Result<StoredFile, StorageError> {
        let entry = self.entry(project, title)?;
        let name = new_title.unwrap_or(title);

        let file = self.new_file(to_project, name, &entry.content);
        self.insert_new(to_project, name, file, entry.content).await
    }

    async fn list_files(&self, project: &str) -> Result<Vec<StoredFile>, StorageError> {
        let mut files: Vec<StoredFile> = self
            .files
            .iter()
            .filter(|entry| entry.key().project == project)
            .map(|entry| entry.file.clone())
            .collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }
}
