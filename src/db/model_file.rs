//! Predictor stored as a burn record file on the local disk.

use crate::ai::MoveNetwork;
use crate::error::BoundaryError;
use crate::ports::{PredictorHandle, PredictorStore};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// Keeps the predictor at a fixed path.
#[derive(Debug, Clone)]
pub struct FsModelStore {
    path: PathBuf,
}

impl FsModelStore {
    /// Stores the predictor at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PredictorStore for FsModelStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn find_predictor(&self) -> Result<Option<PredictorHandle>, BoundaryError> {
        let exists = tokio::fs::try_exists(&self.path).await?;
        debug!(exists, "Model file lookup");
        Ok(exists.then(|| PredictorHandle(self.path.display().to_string())))
    }

    #[instrument(skip(self))]
    async fn download_predictor(
        &self,
        handle: &PredictorHandle,
    ) -> Result<MoveNetwork, BoundaryError> {
        let bytes = tokio::fs::read(&handle.0).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BoundaryError::not_found(format!("Model file {} is missing", handle))
            } else {
                e.into()
            }
        })?;
        Ok(MoveNetwork::from_bytes(&bytes)?)
    }

    #[instrument(skip(self, predictor), fields(path = %self.path.display()))]
    async fn persist_predictor(&self, predictor: &MoveNetwork) -> Result<(), BoundaryError> {
        let bytes = predictor.to_bytes()?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, &bytes).await?;
        info!(bytes = bytes.len(), "Model written");
        Ok(())
    }
}
