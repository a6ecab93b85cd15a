use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;

use super::auth::TokenSource;
use crate::core::storage::{
    FileStore, StorageError, StoredFile, FOLDER_MIME_TYPE, TEXT_MIME_TYPE,
};

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

/// Fields requested for every file resource.
const FILE_FIELDS: &str = "id,name,mimeType,webViewLink,modifiedTime,size,parents";

const PAGE_SIZE: &str = "1000";

/// Drive v3 REST client scoped to one root folder. Each direct child folder
/// of the root is a project.
pub struct GoogleDriveClient {
    client: Client,
    auth: Box<dyn TokenSource>,
    base_url: String,
    root_folder_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    web_view_link: Option<String>,
    #[serde(default)]
    modified_time: Option<String>,
    /// Drive reports sizes as decimal strings.
    #[serde(default)]
    size: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    #[serde(default)]
    next_page_token: Option<String>,
}

fn http_error(e: reqwest::Error) -> StorageError {
    StorageError::Http(e.to_string())
}

fn invalid_response(e: reqwest::Error) -> StorageError {
    StorageError::InvalidResponse(e.to_string())
}

/// Escapes a value for use inside a single-quoted Drive query string.
pub fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

pub fn folder_query(parent_id: &str, name: &str) -> String {
    format!(
        "name='{}' and mimeType='{}' and '{}' in parents and trashed=false",
        escape_query_value(name),
        FOLDER_MIME_TYPE,
        parent_id
    )
}

/// Folders directly under the root.
pub fn projects_query(root_id: &str) -> String {
    format!(
        "mimeType='{}' and '{}' in parents and trashed=false",
        FOLDER_MIME_TYPE, root_id
    )
}

/// Every non-folder file inside a project folder.
pub fn folder_files_query(folder_id: &str) -> String {
    format!(
        "'{}' in parents and mimeType!='{}' and trashed=false",
        folder_id, FOLDER_MIME_TYPE
    )
}

pub fn file_query(folder_id: &str, name: &str) -> String {
    format!(
        "name='{}' and '{}' in parents and mimeType!='{}' and trashed=false",
        escape_query_value(name),
        folder_id,
        FOLDER_MIME_TYPE
    )
}

impl GoogleDriveClient {
    pub fn new(auth: Box<dyn TokenSource>, root_folder_id: impl Into<String>) -> Self {
        Self::with_base_url(auth, root_folder_id, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        auth: Box<dyn TokenSource>,
        root_folder_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            auth,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            root_folder_id: root_folder_id.into(),
        }
    }

    fn files_url(&self) -> String {
        format!("{}/drive/v3/files", self.base_url)
    }

    fn file_url(&self, id: &str) -> String {
        format!("{}/drive/v3/files/{}", self.base_url, id)
    }

    fn parse_datetime(value: Option<String>) -> Option<DateTime<Utc>> {
        value
            .as_deref()
            .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn map_file(api: DriveFile, project: &str) -> StoredFile {
        StoredFile {
            id: api.id,
            name: api.name,
            project: project.to_string(),
            mime_type: api
                .mime_type
                .unwrap_or_else(|| TEXT_MIME_TYPE.to_string()),
            web_view_link: api.web_view_link,
            modified_time: Self::parse_datetime(api.modified_time),
            size: api.size.and_then(|s| s.parse().ok()),
        }
    }

    /// Attaches a bearer token, sends, and turns non-2xx into `Api` errors.
    async fn send(&self, request: RequestBuilder) -> Result<Response, StorageError> {
        let token = self.auth.access_token().await?;
        let response = request.bearer_auth(token).send().await.map_err(http_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status, "Drive API call failed");
            return Err(StorageError::Api { status, body });
        }
        Ok(response)
    }

    /// Runs a files query, following `nextPageToken` until every page is read.
    async fn search(&self, q: &str) -> Result<Vec<DriveFile>, StorageError> {
        let fields = format!("nextPageToken,files({})", FILE_FIELDS);
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.client.get(self.files_url()).query(&[
                ("q", q),
                ("fields", fields.as_str()),
                ("spaces", "drive"),
                ("pageSize", PAGE_SIZE),
            ]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let page: FileList = self.send(request).await?.json().await.map_err(invalid_response)?;
            files.extend(page.files);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => return Ok(files),
            }
        }
    }

    async fn find_folder(&self, project: &str) -> Result<Option<String>, StorageError> {
        let folders = self
            .search(&folder_query(&self.root_folder_id, project))
            .await?;
        Ok(folders.into_iter().next().map(|f| f.id))
    }

    async fn find_in_folder(
        &self,
        folder_id: &str,
        title: &str,
    ) -> Result<Option<DriveFile>, StorageError> {
        let files = self.search(&file_query(folder_id, title)).await?;
        Ok(files.into_iter().next())
    }

    /// Folder id and file resource for `(project, title)`, if both exist.
    async fn locate(
        &self,
        project: &str,
        title: &str,
    ) -> Result<Option<(String, DriveFile)>, StorageError> {
        let Some(folder_id) = self.find_folder(project).await? else {
            return Ok(None);
        };
        Ok(self
            .find_in_folder(&folder_id, title)
            .await?
            .map(|file| (folder_id, file)))
    }

    async fn locate_or_not_found(
        &self,
        project: &str,
        title: &str,
    ) -> Result<(String, DriveFile), StorageError> {
        self.locate(project, title)
            .await?
            .ok_or_else(|| StorageError::not_found(project, title))
    }

    async fn ensure_vacant(
        &self,
        folder_id: &str,
        project: &str,
        title: &str,
    ) -> Result<(), StorageError> {
        if self.find_in_folder(folder_id, title).await?.is_some() {
            return Err(StorageError::already_exists(project, title));
        }
        Ok(())
    }

    async fn create_metadata(&self, folder_id: &str, title: &str) -> Result<DriveFile, StorageError> {
        let request = self
            .client
            .post(self.files_url())
            .query(&[("fields", FILE_FIELDS)])
            .json(&json!({
                "name": title,
                "mimeType": TEXT_MIME_TYPE,
                "parents": [folder_id],
            }));

        self.send(request).await?.json().await.map_err(invalid_response)
    }

    /// Creates a file and uploads its content. If the upload fails the fresh
    /// metadata is deleted again so no empty file is left behind.
    async fn create_with_content(
        &self,
        folder_id: &str,
        title: &str,
        content: &str,
    ) -> Result<DriveFile, StorageError> {
        let created = self.create_metadata(folder_id, title).await?;

        match self.upload_content(&created.id, content).await {
            Ok(uploaded) => Ok(uploaded),
            Err(upload_err) => {
                if let Err(e) = self.send(self.client.delete(self.file_url(&created.id))).await {
                    tracing::warn!(
                        file_id = %created.id,
                        error = %e,
                        "Failed to remove empty file after upload error"
                    );
                }
                Err(upload_err)
            }
        }
    }

    async fn upload_content(&self, file_id: &str, content: &str) -> Result<DriveFile, StorageError> {
        let request = self
            .client
            .patch(format!("{}/upload/drive/v3/files/{}", self.base_url, file_id))
            .query(&[("uploadType", "media"), ("fields", FILE_FIELDS)])
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(content.to_string());

        self.send(request).await?.json().await.map_err(invalid_response)
    }
}

#[async_trait]
impl FileStore for GoogleDriveClient {
    async fn ensure_project(&self, project: &str) -> Result<String, StorageError> {
        if let Some(id) = self.find_folder(project).await? {
            return Ok(id);
        }

        let request = self
            .client
            .post(self.files_url())
            .query(&[("fields", "id,name")])
            .json(&json!({
                "name": project,
                "mimeType": FOLDER_MIME_TYPE,
                "parents": [self.root_folder_id],
            }));

        let folder: DriveFile = self.send(request).await?.json().await.map_err(invalid_response)?;
        tracing::info!(project, folder_id = %folder.id, "Created project folder");
        Ok(folder.id)
    }

    async fn list_projects(&self) -> Result<Vec<String>, StorageError> {
        let q = projects_query(&self.root_folder_id);
        let mut names: Vec<String> = self.search(&q).await?.into_iter().map(|f| f.name).collect();
        names.sort();
        Ok(names)
    }

    async fn find_file(
        &self,
        project: &str,
        title: &str,
    ) -> Result<Option<StoredFile>, StorageError> {
        Ok(self
            .locate(project, title)
            .await?
            .map(|(_, file)| Self::map_file(file, project)))
    }

    async fn create_file(
        &self,
        project: &str,
        title: &str,
        content: &str,
    ) -> Result<StoredFile, StorageError> {
        let folder_id = self.ensure_project(project).await?;
        self.ensure_vacant(&folder_id, project, title).await?;

        let uploaded = self.create_with_content(&folder_id, title, content).await?;
        Ok(Self::map_file(uploaded, project))
    }

    async fn save_file(
        &self,
        project: &str,
        title: &str,
        content: &str,
    ) -> Result<StoredFile, StorageError> {
        let folder_id = self.ensure_project(project).await?;

        let uploaded = match self.find_in_folder(&folder_id, title).await? {
            Some(existing) => self.upload_content(&existing.id, content).await?,
            None => self.create_with_content(&folder_id, title, content).await?,
        };
        Ok(Self::map_file(uploaded, project))
    }

    async fn read_file(&self, project: &str, title: &str) -> Result<String, StorageError> {
        let (_, file) = self.locate_or_not_found(project, title).await?;

        let request = self
            .client
            .get(self.file_url(&file.id))
            .query(&[("alt", "media")]);
        self.send(request).await?.text().await.map_err(invalid_response)
    }

    async fn delete_file(&self, project: &str, title: &str) -> Result<(), StorageError> {
        let (_, file) = self.locate_or_not_found(project, title).await?;

        self.send(self.client.delete(self.file_url(&file.id))).await?;
        tracing::debug!(project, title, file_id = %file.id, "Deleted Drive file");
        Ok(())
    }

    async fn move_file(
        &self,
        project: &str,
        title: &str,
        to_project: &str,
    ) -> Result<StoredFile, StorageError> {
        let (source_folder, file) = self.locate_or_not_found(project, title).await?;
        if project == to_project {
            return Ok(Self::map_file(file, project));
        }

        let target_folder = self.ensure_project(to_project).await?;
        self.ensure_vacant(&target_folder, to_project, title).await?;

        let request = self
            .client
            .patch(self.file_url(&file.id))
            .query(&[
                ("addParents", target_folder.as_str()),
                ("removeParents", source_folder.as_str()),
                ("fields", FILE_FIELDS),
            ])
            .json(&json!({}));

        let moved: DriveFile = self.send(request).await?.json().await.map_err(invalid_response)?;
        Ok(Self::map_file(moved, to_project))
    }

    async fn copy_file(
        &self,
        project: &str,
        title: &str,
        to_project: &str,
        new_title: Option<&str>,
    ) -> Result<StoredFile, StorageError> {
        let (_, file) = self.locate_or_not_found(project, title).await?;
        let name = new_title.unwrap_or(title);

        let target_folder = self.ensure_project(to_project).await?;
        self.ensure_vacant(&target_folder, to_project, name).await?;

        let request = self
            .client
            .post(format!("{}/copy", self.file_url(&file.id)))
            .query(&[("fields", FILE_FIELDS)])
            .json(&json!({
                "name": name,
                "parents": [target_folder],
            }));

        let copied: DriveFile = self.send(request).await?.json().await.map_err(invalid_response)?;
        Ok(Self::map_file(copied, to_project))
    }

    async fn list_files(&self, project: &str) -> Result<Vec<StoredFile>, StorageError> {
        let Some(folder_id) = self.find_folder(project).await? else {
            return Ok(Vec::new());
        };

        Ok(self
            .search(&folder_files_query(&folder_id))
            .await?
            .into_iter()
            .map(|file| Self::map_file(file, project))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ROOT: &str = "root-folder";

    struct StaticToken;

    #[async_trait]
    impl TokenSource for StaticToken {
        async fn access_token(&self) -> Result<String, StorageError> {
            Ok("test-token".to_string())
        }
    }

    fn client(server: &MockServer) -> GoogleDriveClient {
        GoogleDriveClient::with_base_url(Box::new(StaticToken), ROOT, server.uri())
    }

    async fn mount_search(server: &MockServer, q: String, files: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .and(query_param("q", q))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "files": files })))
            .mount(server)
            .await;
    }

    #[test]
    fn test_query_values_are_escaped() {
        assert_eq!(escape_query_value("Bob's \\ notes"), "Bob\\'s \\\\ notes");
        assert!(folder_query(ROOT, "it's").starts_with("name='it\\'s'"));
    }

    #[tokio::test]
    async fn test_ensure_project_reuses_existing_folder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .and(query_param("q", folder_query(ROOT, "Novel")))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "files": [{"id": "folder-1", "name": "Novel"}]
            })))
            .mount(&server)
            .await;

        let id = client(&server).ensure_project("Novel").await.unwrap();
        assert_eq!(id, "folder-1");
    }

    #[tokio::test]
    async fn test_ensure_project_creates_missing_folder() {
        let server = MockServer::start().await;
        mount_search(&server, folder_query(ROOT, "Novel"), json!([])).await;
        Mock::given(method("POST"))
            .and(path("/drive/v3/files"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "folder-new", "name": "Novel"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let id = client(&server).ensure_project("Novel").await.unwrap();
        assert_eq!(id, "folder-new");
    }

    #[tokio::test]
    async fn test_read_file_downloads_media() {
        let server = MockServer::start().await;
        mount_search(&server, folder_query(ROOT, "Novel"), json!([{"id": "folder-1", "name": "Novel"}])).await;
        mount_search(&server, file_query("folder-1", "ch1.txt"), json!([{"id": "file-1", "name": "ch1.txt"}])).await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files/file-1"))
            .and(query_param("alt", "media"))
            .respond_with(ResponseTemplate::new(200).set_body_string("It was a dark night."))
            .mount(&server)
            .await;

        let content = client(&server).read_file("Novel", "ch1.txt").await.unwrap();
        assert_eq!(content, "It was a dark night.");
    }

    #[tokio::test]
    async fn test_read_missing_file_is_not_found() {
        let server = MockServer::start().await;
        mount_search(&server, folder_query(ROOT, "Novel"), json!([{"id": "folder-1", "name": "Novel"}])).await;
        mount_search(&server, file_query("folder-1", "ghost.txt"), json!([])).await;

        let err = client(&server).read_file("Novel", "ghost.txt").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_create_file_uploads_content() {
        let server = MockServer::start().await;
        mount_search(&server, folder_query(ROOT, "Novel"), json!([{"id": "folder-1", "name": "Novel"}])).await;
        mount_search(&server, file_query("folder-1", "ch1.txt"), json!([])).await;
        Mock::given(method("POST"))
            .and(path("/drive/v3/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "file-9", "name": "ch1.txt"})))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/upload/drive/v3/files/file-9"))
            .and(query_param("uploadType", "media"))
            .and(body_string("Chapter one."))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "file-9",
                "name": "ch1.txt",
                "mimeType": "text/plain",
                "webViewLink": "https://drive.google.com/file/d/file-9/view",
                "modifiedTime": "2024-05-01T10:00:00.000Z",
                "size": "12"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let file = client(&server)
            .create_file("Novel", "ch1.txt", "Chapter one.")
            .await
            .unwrap();

        assert_eq!(file.id, "file-9");
        assert_eq!(file.project, "Novel");
        assert_eq!(file.size, Some(12));
        assert!(file.modified_time.is_some());
        assert_eq!(
            file.web_view_link.as_deref(),
            Some("https://drive.google.com/file/d/file-9/view")
        );
    }

    #[tokio::test]
    async fn test_create_existing_title_conflicts() {
        let server = MockServer::start().await;
        mount_search(&server, folder_query(ROOT, "Novel"), json!([{"id": "folder-1", "name": "Novel"}])).await;
        mount_search(&server, file_query("folder-1", "ch1.txt"), json!([{"id": "file-1", "name": "ch1.txt"}])).await;

        let err = client(&server)
            .create_file("Novel", "ch1.txt", "again")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_list_files_of_unknown_project_is_empty() {
        let server = MockServer::start().await;
        mount_search(&server, folder_query(ROOT, "Nothing"), json!([])).await;

        let files = client(&server).list_files("Nothing").await.unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_api_error_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .respond_with(ResponseTemplate::new(403).set_body_string("insufficientPermissions"))
            .mount(&server)
            .await;

        let err = client(&server).list_projects().await.unwrap_err();
        assert!(matches!(err, StorageError::Api { status: 403, .. }));
    }

    async fn mount_novel_chapter(server: &MockServer) {
        mount_search(server, folder_query(ROOT, "Novel"), json!([{"id": "folder-1", "name": "Novel"}])).await;
        mount_search(server, file_query("folder-1", "ch1.txt"), json!([{"id": "file-1", "name": "ch1.txt"}])).await;
    }

    #[tokio::test]
    async fn test_failed_upload_removes_fresh_metadata() {
        let server = MockServer::start().await;
        mount_search(&server, folder_query(ROOT, "Novel"), json!([{"id": "folder-1", "name": "Novel"}])).await;
        mount_search(&server, file_query("folder-1", "ch1.txt"), json!([])).await;
        Mock::given(method("POST"))
            .and(path("/drive/v3/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "file-9", "name": "ch1.txt"})))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/upload/drive/v3/files/file-9"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upload broke"))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/drive/v3/files/file-9"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server)
            .create_file("Novel", "ch1.txt", "Chapter one.")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_save_reuses_existing_file() {
        let server = MockServer::start().await;
        mount_novel_chapter(&server).await;
        Mock::given(method("POST"))
            .and(path("/drive/v3/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "other"})))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/upload/drive/v3/files/file-1"))
            .and(body_string("Rewritten."))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "file-1", "name": "ch1.txt"})))
            .expect(1)
            .mount(&server)
            .await;

        let file = client(&server)
            .save_file("Novel", "ch1.txt", "Rewritten.")
            .await
            .unwrap();
        assert_eq!(file.id, "file-1");
    }

    #[tokio::test]
    async fn test_append_rewrites_with_separator() {
        let server = MockServer::start().await;
        mount_novel_chapter(&server).await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files/file-1"))
            .and(query_param("alt", "media"))
            .respond_with(ResponseTemplate::new(200).set_body_string("old"))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/upload/drive/v3/files/file-1"))
            .and(body_string("old\n\nnew"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "file-1", "name": "ch1.txt"})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .append_file("Novel", "ch1.txt", "new")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_file_by_id() {
        let server = MockServer::start().await;
        mount_novel_chapter(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/drive/v3/files/file-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).delete_file("Novel", "ch1.txt").await.unwrap();
    }

    #[tokio::test]
    async fn test_move_reparents_file() {
        let server = MockServer::start().await;
        mount_novel_chapter(&server).await;
        mount_search(&server, folder_query(ROOT, "Archive"), json!([{"id": "folder-2", "name": "Archive"}])).await;
        mount_search(&server, file_query("folder-2", "ch1.txt"), json!([])).await;
        Mock::given(method("PATCH"))
            .and(path("/drive/v3/files/file-1"))
            .and(query_param("addParents", "folder-2"))
            .and(query_param("removeParents", "folder-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "file-1", "name": "ch1.txt"})))
            .expect(1)
            .mount(&server)
            .await;

        let moved = client(&server)
            .move_file("Novel", "ch1.txt", "Archive")
            .await
            .unwrap();
        assert_eq!(moved.project, "Archive");
        assert_eq!(moved.id, "file-1");
    }

    #[tokio::test]
    async fn test_move_onto_taken_title_conflicts() {
        let server = MockServer::start().await;
        mount_novel_chapter(&server).await;
        mount_search(&server, folder_query(ROOT, "Archive"), json!([{"id": "folder-2", "name": "Archive"}])).await;
        mount_search(&server, file_query("folder-2", "ch1.txt"), json!([{"id": "file-7", "name": "ch1.txt"}])).await;
        Mock::given(method("PATCH"))
            .and(path("/drive/v3/files/file-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "file-1"})))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server)
            .move_file("Novel", "ch1.txt", "Archive")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_copy_posts_name_and_parent() {
        let server = MockServer::start().await;
        mount_novel_chapter(&server).await;
        mount_search(&server, folder_query(ROOT, "Archive"), json!([{"id": "folder-2", "name": "Archive"}])).await;
        mount_search(&server, file_query("folder-2", "draft.txt"), json!([])).await;
        Mock::given(method("POST"))
            .and(path("/drive/v3/files/file-1/copy"))
            .and(body_partial_json(json!({"name": "draft.txt", "parents": ["folder-2"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "file-3", "name": "draft.txt"})))
            .expect(1)
            .mount(&server)
            .await;

        let copy = client(&server)
            .copy_file("Novel", "ch1.txt", "Archive", Some("draft.txt"))
            .await
            .unwrap();
        assert_eq!(copy.id, "file-3");
        assert_eq!(copy.project, "Archive");
    }

    #[tokio::test]
    async fn test_copy_onto_taken_title_conflicts() {
        let server = MockServer::start().await;
        mount_novel_chapter(&server).await;

        // Copying within the same folder under the same name.
        let err = client(&server)
            .copy_file("Novel", "ch1.txt", "Novel", None)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_list_projects_follows_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .and(query_param("q", projects_query(ROOT)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "files": [{"id": "f-b", "name": "Thriller"}],
                "nextPageToken": "page-2"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .and(query_param("q", projects_query(ROOT)))
            .and(query_param("pageToken", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "files": [{"id": "f-a", "name": "Memoir"}]
            })))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;

        let projects = client(&server).list_projects().await.unwrap();
        assert_eq!(projects, vec!["Memoir", "Thriller"]);
    }

    #[tokio::test]
    async fn test_list_files_maps_project() {
        let server = MockServer::start().await;
        mount_search(&server, folder_query(ROOT, "Novel"), json!([{"id": "folder-1", "name": "Novel"}])).await;
        mount_search(
            &server,
            folder_files_query("folder-1"),
            json!([{"id": "file-1", "name": "ch1.txt"}, {"id": "file-2", "name": "ch2.txt"}]),
        )
        .await;

        let files = client(&server).list_files("Novel").await.unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.project == "Novel"));
    }
}
