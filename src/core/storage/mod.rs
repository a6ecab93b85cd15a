pub mod file_store;
pub mod project_service;
pub mod storage_models;

pub use file_store::{FileStore, FileStoreHandle, APPEND_SEPARATOR};
pub use project_service::ProjectFileService;
pub use storage_models::{StorageError, StoredFile, FOLDER_MIME_TYPE, TEXT_MIME_TYPE};
