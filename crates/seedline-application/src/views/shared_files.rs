use super::list::{ListSource, ListView};
use crate::notifications::NotificationQueue;
use crate::polling::RefreshSchedule;
use async_trait::async_trait;
use seedline_core::ApiOutcome;
use seedline_core::catalog::{ActionReply, SharedFile};
use seedline_interaction::FileRequestService;

/// Catalog of every file shared across the swarm.
pub struct CatalogSource {
    files: FileRequestService,
}

#[async_trait]
impl ListSource for CatalogSource {
    type Item = SharedFile;

    fn name(&self) -> &'static str {
        "shared-files"
    }

    async fn fetch(&self) -> ApiOutcome<Vec<SharedFile>> {
        self.files.list().await.map(|listing| listing.items)
    }
}

/// Shared file catalog, polled while shown.
pub struct SharedFilesView {
    list: ListView<CatalogSource>,
    files: FileRequestService,
    notifications: NotificationQueue,
}

impl SharedFilesView {
    pub fn new(
        files: FileRequestService,
        notifications: NotificationQueue,
        schedule: RefreshSchedule,
    ) -> Self {
        Self {
            list: ListView::new(
                CatalogSource {
                    files: files.clone(),
                },
                schedule,
            ),
            files,
            notifications,
        }
    }

    pub fn list(&self) -> &ListView<CatalogSource> {
        &self.list
    }

    /// Asks the backend to fetch `filename` onto this node.
    pub async fn download(&self, filename: &str) -> ApiOutcome<ActionReply> {
        let outcome = self.files.download(filename).await;
        match &outcome {
            ApiOutcome::Ok(reply) => {
                self.notifications.success(
                    reply
                        .message
                        .clone()
                        .unwrap_or_else(|| "Download initiated successfully".to_string()),
                );
            }
            failed => {
                tracing::debug!("[SharedFilesView] Download of {} failed: {:?}", filename, failed);
                self.notifications.error(format!("Download failed: {}", filename));
            }
        }
        outcome
    }
}
