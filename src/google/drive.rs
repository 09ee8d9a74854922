//! Google Drive adapter for the stored predictor.

use super::sheets::{DriveFile, FileList};
use super::{DRIVE_API, DRIVE_UPLOAD_API, GoogleContext, api_url, query_literal};
use crate::ai::MoveNetwork;
use crate::error::BoundaryError;
use crate::ports::{PredictorHandle, PredictorStore};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument};

const MODEL_MIME: &str = "application/octet-stream";

/// Finds, downloads and uploads the predictor file on Drive.
#[derive(Debug, Clone)]
pub struct DriveClient {
    context: Arc<GoogleContext>,
}

impl DriveClient {
    /// Wraps a shared context.
    pub fn new(context: Arc<GoogleContext>) -> Self {
        Self { context }
    }

    async fn upload_new(&self, bytes: Vec<u8>) -> Result<String, BoundaryError> {
        let mut url = api_url(DRIVE_UPLOAD_API, &[])?;
        url.query_pairs_mut().append_pair("uploadType", "media");
        let request = self
            .context
            .post(url)
            .header(CONTENT_TYPE, MODEL_MIME)
            .body(bytes);
        let file: DriveFile = self.context.send_json(request).await?;
        debug!(file_id = %file.id, "Created model file");

        let config = self.context.config();
        let mut url = api_url(DRIVE_API, &[file.id.as_str()])?;
        if let Some(folder) = config.model_folder_id() {
            url.query_pairs_mut().append_pair("addParents", folder);
        }
        let body = json!({ "name": config.model_name() });
        self.context
            .send(self.context.patch(url).json(&body))
            .await?;
        Ok(file.id)
    }

    async fn upload_existing(&self, id: &str, bytes: Vec<u8>) -> Result<(), BoundaryError> {
        let mut url = api_url(DRIVE_UPLOAD_API, &[id])?;
        url.query_pairs_mut().append_pair("uploadType", "media");
        let request = self
            .context
            .patch(url)
            .header(CONTENT_TYPE, MODEL_MIME)
            .body(bytes);
        self.context.send(request).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn share(&self, id: &str, email: &str) -> Result<(), BoundaryError> {
        let url = api_url(DRIVE_API, &[id, "permissions"])?;
        let body = json!({ "type": "user", "role": "writer", "emailAddress": email });
        self.context
            .send(self.context.post(url).json(&body))
            .await?;
        info!("Model file shared");
        Ok(())
    }
}

#[async_trait]
impl PredictorStore for DriveClient {
    #[instrument(skip(self))]
    async fn find_predictor(&self) -> Result<Option<PredictorHandle>, BoundaryError> {
        let name = self.context.config().model_name();
        let mut url = api_url(DRIVE_API, &[])?;
        url.query_pairs_mut()
            .append_pair(
                "q",
                &format!("name = {} and trashed = false", query_literal(name)),
            )
            .append_pair("pageSize", "10")
            .append_pair("fields", "files(id)");
        let list: FileList = self.context.send_json(self.context.get(url)).await?;
        let handle = list.files.into_iter().next().map(|f| PredictorHandle(f.id));
        debug!(found = handle.is_some(), "Model file lookup");
        Ok(handle)
    }

    #[instrument(skip(self))]
    async fn download_predictor(
        &self,
        handle: &PredictorHandle,
    ) -> Result<MoveNetwork, BoundaryError> {
        let mut url = api_url(DRIVE_API, &[handle.0.as_str()])?;
        url.query_pairs_mut().append_pair("alt", "media");
        let response = self.context.send(self.context.get(url)).await?;
        let bytes = response.bytes().await?;
        let network = MoveNetwork::from_bytes(&bytes)?;
        info!(bytes = bytes.len(), "Model downloaded");
        Ok(network)
    }

    #[instrument(skip(self, predictor))]
    async fn persist_predictor(&self, predictor: &MoveNetwork) -> Result<(), BoundaryError> {
        let bytes = predictor.to_bytes()?;
        match self.find_predictor().await? {
            Some(handle) => {
                self.upload_existing(&handle.0, bytes).await?;
                info!(file_id = %handle, "Model updated in place");
            }
            None => {
                let id = self.upload_new(bytes).await?;
                info!(file_id = %id, "Model uploaded");
                if let Some(email) = self.context.config().share_with() {
                    self.share(&id, email).await?;
                }
            }
        }
        Ok(())
    }
}
