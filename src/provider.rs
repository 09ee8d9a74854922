//! Obtains the predictor for a session: stored copy first, training as fallback.

use crate::ai::{MoveNetwork, TrainingConfig};
use crate::error::BoundaryError;
use crate::ports::PredictorStore;
use crate::records::TrainingRecord;
use tracing::{debug, info, instrument, warn};

/// Loads, trains and persists the session's predictor.
pub struct PredictorProvider {
    store: Box<dyn PredictorStore>,
    training: TrainingConfig,
}

impl PredictorProvider {
    /// Creates a provider over `store`, training with `training` when needed.
    #[instrument(skip(store))]
    pub fn new(store: Box<dyn PredictorStore>, training: TrainingConfig) -> Self {
        info!("Creating PredictorProvider");
        Self { store, training }
    }

    /// Returns the stored predictor, or one trained on `history` if the
    /// stored copy is missing or unusable. `None` when `history` is empty too.
    #[instrument(skip(self, history), fields(records = history.len()))]
    pub async fn obtain(&self, history: &[TrainingRecord]) -> Option<MoveNetwork> {
        match self.fetch().await {
            Ok(network) => {
                info!(hidden = network.hidden_units(), "Loaded stored predictor");
                return Some(network);
            }
            Err(e) if e.is_not_found() => info!("No stored predictor, training from history"),
            Err(e) => warn!(error = %e, "Stored predictor unusable, training from history"),
        }
        self.train(history).await
    }

    async fn fetch(&self) -> Result<MoveNetwork, BoundaryError> {
        let handle = self
            .store
            .find_predictor()
            .await?
            .ok_or_else(|| BoundaryError::not_found("no stored predictor"))?;
        debug!(handle = %handle, "Downloading predictor");
        self.store.download_predictor(&handle).await
    }

    /// Trains a new predictor on `history` off the async executor.
    #[instrument(skip(self, history), fields(records = history.len()))]
    pub async fn train(&self, history: &[TrainingRecord]) -> Option<MoveNetwork> {
        if history.is_empty() {
            info!("No training data available");
            return None;
        }
        let records = history.to_vec();
        let config = self.training.clone();
        match tokio::task::spawn_blocking(move || MoveNetwork::train(&records, &config)).await {
            Ok(network) => network,
            Err(e) => {
                warn!(error = %e, "Training task failed");
                None
            }
        }
    }

    /// Stores the predictor. Failures are logged and reported as `false`.
    #[instrument(skip(self, predictor))]
    pub async fn persist(&self, predictor: &MoveNetwork) -> bool {
        match self.store.persist_predictor(predictor).await {
            Ok(()) => {
                info!("Predictor persisted");
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to persist predictor");
                false
            }
        }
    }
}

impl std::fmt::Debug for PredictorProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictorProvider")
            .field("training", &self.training)
            .finish_non_exhaustive()
    }
}
