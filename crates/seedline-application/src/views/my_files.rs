use super::list::{ListSource, ListView};
use crate::notifications::NotificationQueue;
use crate::polling::{ActivityToken, RefreshSchedule};
use async_trait::async_trait;
use seedline_core::catalog::{ActionReply, SharedFile};
use seedline_core::{ApiOutcome, Result};
use seedline_interaction::FileRequestService;
use std::path::Path;

const UPLOAD_FAILED: &str = "Upload file failed";

/// Files published from this device.
pub struct MyFilesSource {
    files: FileRequestService,
}

#[async_trait]
impl ListSource for MyFilesSource {
    type Item = SharedFile;

    fn name(&self) -> &'static str {
        "my-files"
    }

    async fn fetch(&self) -> ApiOutcome<Vec<SharedFile>> {
        self.files.list().await.map(|listing| listing.items)
    }
}

/// Upload screen: fetched on entry and after every successful upload.
pub struct MyFilesView {
    list: ListView<MyFilesSource>,
    files: FileRequestService,
    notifications: NotificationQueue,
}

impl MyFilesView {
    pub fn new(
        files: FileRequestService,
        notifications: NotificationQueue,
        schedule: RefreshSchedule,
    ) -> Self {
        Self {
            list: ListView::new(
                MyFilesSource {
                    files: files.clone(),
                },
                schedule,
            ),
            files,
            notifications,
        }
    }

    pub fn list(&self) -> &ListView<MyFilesSource> {
        &self.list
    }

    /// Uploads a file from disk.
    pub async fn upload_path(&self, path: &Path) -> Result<ApiOutcome<ActionReply>> {
        let activity = self.list.activity();
        match self.files.upload_path(path).await {
            Ok(outcome) => Ok(self.after_upload(outcome, &activity).await),
            Err(e) => {
                tracing::warn!("[MyFilesView] Cannot read {}: {}", path.display(), e);
                self.notifications.error(UPLOAD_FAILED);
                Err(e)
            }
        }
    }

    /// Uploads in-memory content under `file_name`.
    pub async fn upload_bytes(&self, file_name: &str, bytes: Vec<u8>) -> ApiOutcome<ActionReply> {
        let activity = self.list.activity();
        let outcome = self.files.upload_bytes(file_name, bytes).await;
        self.after_upload(outcome, &activity).await
    }

    /// The refetch is applied only if the view shown when the upload started
    /// is still shown.
    async fn after_upload(
        &self,
        outcome: ApiOutcome<ActionReply>,
        activity: &ActivityToken,
    ) -> ApiOutcome<ActionReply> {
        match &outcome {
            ApiOutcome::Ok(reply) => {
                self.notifications.success(
                    reply
                        .message
                        .clone()
                        .unwrap_or_else(|| "Upload file successfully".to_string()),
                );
                self.list.refresh_with(activity).await;
            }
            failed => {
                tracing::debug!("[MyFilesView] Upload failed: {:?}", failed);
                self.notifications.error(UPLOAD_FAILED);
            }
        }
        outcome
    }
}
