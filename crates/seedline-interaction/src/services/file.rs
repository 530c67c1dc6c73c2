use crate::gateway::{ApiGateway, api_path};
use seedline_core::catalog::{ActionReply, DownloadRequest, FileListing};
use seedline_core::{ApiOutcome, MultipartPayload, Result, SeedlineError};
use std::path::Path;
use std::sync::Arc;

/// Multipart field the backend reads uploads from.
const UPLOAD_FIELD: &str = "file";

/// Shared file catalog: listing, upload and download.
#[derive(Clone)]
pub struct FileRequestService {
    gateway: Arc<ApiGateway>,
}

impl FileRequestService {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// GET `api/v1/torrent/list`. A body without `items` is `Malformed`.
    pub async fn list(&self) -> ApiOutcome<FileListing> {
        let result = self.gateway.get(&api_path("/torrent/list")).await;
        ApiOutcome::from_response(result, |r| r.decode())
    }

    /// POST a multipart payload to `api/v1/torrent/send`.
    pub async fn upload(&self, payload: MultipartPayload) -> ApiOutcome<ActionReply> {
        let result = self
            .gateway
            .upload_file(&api_path("/torrent/send"), payload)
            .await;
        ApiOutcome::from_response(result, |r| Ok(ActionReply::from_value(&r.body)))
    }

    /// Uploads in-memory bytes under `file_name`.
    pub async fn upload_bytes(&self, file_name: &str, bytes: Vec<u8>) -> ApiOutcome<ActionReply> {
        self.upload(upload_payload(file_name, bytes)).await
    }

    /// Reads a file from disk and uploads it.
    ///
    /// Local read failures are returned as `Err` without contacting the backend.
    pub async fn upload_path(&self, path: &Path) -> Result<ApiOutcome<ActionReply>> {
        let payload = read_upload(path).await?;
        Ok(self.upload(payload).await)
    }

    /// POST `{filename}` to `api/v1/torrent/download`.
    pub async fn download(&self, filename: &str) -> ApiOutcome<ActionReply> {
        let body = match serde_json::to_value(DownloadRequest {
            filename: filename.to_string(),
        }) {
            Ok(body) => body,
            Err(e) => return SeedlineError::from(e).into(),
        };
        let result = self
            .gateway
            .post_option(&api_path("/torrent/download"), &body, "")
            .await;
        ApiOutcome::from_response(result, |r| Ok(ActionReply::from_value(&r.body)))
    }
}

fn upload_payload(file_name: &str, bytes: Vec<u8>) -> MultipartPayload {
    let mime = mime_guess::from_path(file_name)
        .first()
        .map(|m| m.essence_str().to_string());
    MultipartPayload::new().file(UPLOAD_FIELD, file_name, bytes, mime)
}

async fn read_upload(path: &Path) -> Result<MultipartPayload> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            SeedlineError::invalid_request(format!("{} is not a file", path.display()))
        })?;
    let bytes = tokio::fs::read(path).await?;
    tracing::debug!("[FileRequest] Read {} bytes from {}", bytes.len(), path.display());
    Ok(upload_payload(&file_name, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingHandler;
    use reqwest::StatusCode;
    use seedline_core::request::MultipartPart;
    use seedline_core::{ApiResponse, RequestBody};
    use serde_json::json;

    fn service(handler: Arc<RecordingHandler>) -> FileRequestService {
        FileRequestService::new(Arc::new(ApiGateway::new(handler, "http://127.0.0.1:5001/")))
    }

    #[tokio::test]
    async fn test_list_decodes_items() {
        let handler = Arc::new(RecordingHandler::ok(json!({"items": [{"filename": "a.txt"}]})));
        let listing = service(handler.clone()).list().await.ok().unwrap();

        assert_eq!(listing.items.len(), 1);
        assert_eq!(listing.items[0].filename, "a.txt");
        assert_eq!(
            handler.last().unwrap().url(),
            "http://127.0.0.1:5001/api/v1/torrent/list"
        );
    }

    #[tokio::test]
    async fn test_list_outcomes() {
        let missing_items = Arc::new(RecordingHandler::ok(json!({"files": []})));
        assert!(matches!(
            service(missing_items).list().await,
            ApiOutcome::Malformed(_)
        ));

        let accepted = Arc::new(RecordingHandler::with(|_| {
            Ok(ApiResponse::new(StatusCode::ACCEPTED, json!({"items": []})))
        }));
        assert!(matches!(
            service(accepted).list().await,
            ApiOutcome::HttpError { status: 202, .. }
        ));

        let down = Arc::new(RecordingHandler::failing(SeedlineError::transport("refused")));
        assert!(matches!(
            service(down).list().await,
            ApiOutcome::TransportError(_)
        ));
    }

    #[tokio::test]
    async fn test_download_posts_filename() {
        let handler = Arc::new(RecordingHandler::ok(json!("started")));
        let reply = service(handler.clone())
            .download("a.txt")
            .await
            .ok()
            .unwrap();

        assert_eq!(reply.message.as_deref(), Some("started"));
        let sent = handler.last().unwrap();
        assert!(sent.url().ends_with("/api/v1/torrent/download"));
        assert_eq!(sent.body(), &RequestBody::Json(json!({"filename": "a.txt"})));
    }

    #[tokio::test]
    async fn test_upload_path_reads_file_and_guesses_mime() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let handler = Arc::new(RecordingHandler::ok(json!({"message": "uploaded"})));
        let outcome = service(handler.clone()).upload_path(&path).await.unwrap();
        assert!(outcome.is_ok());

        let sent = handler.last().unwrap();
        assert!(sent.url().ends_with("/api/v1/torrent/send"));
        let RequestBody::Multipart(payload) = sent.body() else {
            panic!("expected multipart body");
        };
        assert_eq!(
            payload.parts(),
            &[MultipartPart::File {
                name: "file".to_string(),
                file_name: "notes.txt".to_string(),
                bytes: b"hello".to_vec(),
                mime: Some("text/plain".to_string()),
            }]
        );
    }

    #[tokio::test]
    async fn test_upload_missing_file_never_sends() {
        let handler = Arc::new(RecordingHandler::ok(json!({})));
        let result = service(handler.clone())
            .upload_path(Path::new("/definitely/not/here.bin"))
            .await;
        assert!(matches!(result, Err(SeedlineError::Io { .. })));
        assert_eq!(handler.count(), 0);
    }
}
