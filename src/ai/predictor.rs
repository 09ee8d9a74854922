//! Move predictors: score every board index from a flattened state.

use crate::error::{BoundaryError, BoundaryErrorKind};
use crate::records::TrainingRecord;
use burn::backend::ndarray::NdArrayDevice;
use burn::backend::{Autodiff, NdArray};
use burn::module::{AutodiffModule, Param};
use burn::nn::loss::CrossEntropyLossConfig;
use burn::nn::{Initializer, Linear, LinearConfig, Relu};
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::prelude::*;
use burn::record::{BinBytesRecorder, FullPrecisionSettings, Recorder};
use burn::tensor::activation::softmax;
use derive_getters::Getters;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

type InferBackend = NdArray<f32>;
type TrainBackend = Autodiff<InferBackend>;

/// Anything that can rank moves for a board state.
///
/// Scores are only comparable with each other; no range is guaranteed.
pub trait Predictor: Send + Sync {
    /// One score per board index (0-8) for the given flattened state.
    fn score(&self, state: &[i8; 9]) -> [f32; 9];
}

/// Hyperparameters for [`MoveNetwork::train`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct TrainingConfig {
    /// Width of the hidden layer.
    hidden_units: usize,
    /// Full passes over the history.
    epochs: usize,
    /// Records per optimizer step.
    batch_size: usize,
    /// Adam step size.
    learning_rate: f32,
    /// Seed for weight initialisation and shuffling.
    seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            hidden_units: 128,
            epochs: 50,
            batch_size: 32,
            learning_rate: 0.001,
            seed: 42,
        }
    }
}

const INPUTS: usize = 9;
const OUTPUTS: usize = 9;

/// Network layout:
///
/// ```text
/// Input:  [batch, 9]     flattened board, Human = 1, AI = -1
/// FC1:    9 -> hidden, ReLU
/// FC2:    hidden -> 9    logits, one per square
/// ```
#[derive(Module, Debug)]
struct MoveModel<B: Backend> {
    input: Linear<B>,
    output: Linear<B>,
    activation: Relu,
}

impl<B: Backend> MoveModel<B> {
    fn zeroed(hidden: usize, device: &B::Device) -> Self {
        Self {
            input: LinearConfig::new(INPUTS, hidden)
                .with_initializer(Initializer::Zeros)
                .init(device),
            output: LinearConfig::new(hidden, OUTPUTS)
                .with_initializer(Initializer::Zeros)
                .init(device),
            activation: Relu::new(),
        }
    }

    /// Glorot-uniform weights drawn from `rng`, zero biases.
    ///
    /// burn's initializers read the backend's global RNG, which is shared
    /// between threads, so the draws happen here instead.
    fn seeded(hidden: usize, rng: &mut ChaCha8Rng, device: &B::Device) -> Self {
        let mut model = Self::zeroed(hidden, device);
        model.input.weight = glorot(INPUTS, hidden, rng, device);
        model.output.weight = glorot(hidden, OUTPUTS, rng, device);
        model
    }

    /// Input `[batch, 9]` -> logits `[batch, 9]`.
    fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.activation.forward(self.input.forward(input));
        self.output.forward(x)
    }
}

fn glorot<B: Backend>(
    fan_in: usize,
    fan_out: usize,
    rng: &mut ChaCha8Rng,
    device: &B::Device,
) -> Param<Tensor<B, 2>> {
    let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
    let weights: Vec<f32> = (0..fan_in * fan_out)
        .map(|_| rng.gen_range(-limit..limit))
        .collect();
    Param::from_tensor(Tensor::from_data(
        TensorData::new(weights, [fan_in, fan_out]),
        device,
    ))
}

/// Inputs `[n, 9]` and target moves `[n]` for a batch of records.
fn batch<B: Backend>(
    records: &[&TrainingRecord],
    device: &B::Device,
) -> (Tensor<B, 2>, Tensor<B, 1, Int>) {
    let inputs: Vec<f32> = records
        .iter()
        .flat_map(|r| r.state().map(f32::from))
        .collect();
    let targets: Vec<i64> = records.iter().map(|r| r.position() as i64).collect();
    (
        Tensor::from_data(TensorData::new(inputs, [records.len(), INPUTS]), device),
        Tensor::from_data(TensorData::new(targets, [records.len()]), device),
    )
}

/// Feed-forward move predictor trained on recorded (state, move) pairs.
///
/// Trained with Adam on cross-entropy, mapping each recorded state to the
/// move that was played from it. Scores are the softmax over the 9 squares.
#[derive(Debug)]
pub struct MoveNetwork {
    // burn modules are `Send` but not `Sync`.
    model: Mutex<MoveModel<InferBackend>>,
}

impl MoveNetwork {
    fn from_model(model: MoveModel<InferBackend>) -> Self {
        Self {
            model: Mutex::new(model),
        }
    }

    fn model(&self) -> MutexGuard<'_, MoveModel<InferBackend>> {
        self.model
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Creates an untrained network with Glorot-uniform weights and zero biases.
    #[instrument]
    pub fn initialise(hidden: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::from_model(MoveModel::seeded(hidden, &mut rng, &NdArrayDevice::default()))
    }

    /// A network that ignores the board and ranks squares by `preferences`.
    pub fn with_preferences(preferences: [f32; 9]) -> Self {
        let device = NdArrayDevice::default();
        let mut model = MoveModel::<InferBackend>::zeroed(1, &device);
        model.output.bias = Some(Param::from_tensor(Tensor::from_data(
            TensorData::new(preferences.to_vec(), [OUTPUTS]),
            &device,
        )));
        Self::from_model(model)
    }

    /// Trains a fresh network on `history`.
    ///
    /// Records whose move is outside 0-8 are skipped. Returns `None` when
    /// nothing usable is left to learn from.
    #[instrument(skip(history, config), fields(records = history.len()))]
    pub fn train(history: &[TrainingRecord], config: &TrainingConfig) -> Option<Self> {
        let usable: Vec<&TrainingRecord> = history
            .iter()
            .filter(|r| r.position() < OUTPUTS)
            .collect();
        if usable.len() < history.len() {
            warn!(
                skipped = history.len() - usable.len(),
                "Skipping records with out-of-range moves"
            );
        }
        if usable.is_empty() {
            info!("No training data available");
            return None;
        }

        let device = NdArrayDevice::default();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut model = MoveModel::<TrainBackend>::seeded(config.hidden_units, &mut rng, &device);
        let mut optimizer = AdamConfig::new().init::<TrainBackend, MoveModel<TrainBackend>>();
        let loss_fn = CrossEntropyLossConfig::new().init::<TrainBackend>(&device);
        let learning_rate = f64::from(config.learning_rate);
        let mut order: Vec<usize> = (0..usable.len()).collect();

        for epoch in 0..config.epochs {
            order.shuffle(&mut rng);
            let mut epoch_loss = 0.0;
            for chunk in order.chunks(config.batch_size.max(1)) {
                let records: Vec<&TrainingRecord> = chunk.iter().map(|&i| usable[i]).collect();
                let (inputs, targets) = batch::<TrainBackend>(&records, &device);
                let loss = loss_fn.forward(model.forward(inputs), targets);

                let batch_loss = loss
                    .clone()
                    .into_data()
                    .to_vec::<f32>()
                    .ok()
                    .and_then(|v| v.first().copied())
                    .unwrap_or_default();
                epoch_loss += batch_loss * records.len() as f32;

                let grads = GradientsParams::from_grads(loss.backward(), &model);
                model = optimizer.step(learning_rate, model, grads);
            }
            debug!(epoch, loss = epoch_loss / usable.len() as f32, "Epoch finished");
        }

        info!(epochs = config.epochs, "Predictor trained");
        Some(Self::from_model(model.valid()))
    }

    /// Width of the hidden layer.
    pub fn hidden_units(&self) -> usize {
        self.model().input.weight.val().dims()[1]
    }

    /// Serialises the network with burn's binary record format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BoundaryError> {
        let record = self.model().clone().into_record();
        BinBytesRecorder::<FullPrecisionSettings>::default()
            .record(record, ())
            .map_err(|e| {
                BoundaryError::new(BoundaryErrorKind::Decode, format!("Model encode error: {}", e))
            })
    }

    /// Restores a network written by [`MoveNetwork::to_bytes`].
    ///
    /// Any malformed payload, including one whose tensor shapes disagree,
    /// is a [`BoundaryErrorKind::Decode`] error.
    #[instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BoundaryError> {
        let device = NdArrayDevice::default();
        let recorder = BinBytesRecorder::<FullPrecisionSettings>::default();
        // The ndarray backend panics on tensor data that does not fit its shape.
        let loaded = panic::catch_unwind(AssertUnwindSafe(|| {
            recorder.load::<MoveModelRecord<InferBackend>>(bytes.to_vec(), &device)
        }));
        let record = match loaded {
            Ok(Ok(record)) => record,
            Ok(Err(e)) => {
                return Err(BoundaryError::new(
                    BoundaryErrorKind::Decode,
                    format!("Model decode error: {}", e),
                ));
            }
            Err(_) => {
                return Err(BoundaryError::new(
                    BoundaryErrorKind::Decode,
                    "Model tensor data is malformed",
                ));
            }
        };

        let hidden = record_width(&record).ok_or_else(|| {
            BoundaryError::new(
                BoundaryErrorKind::Decode,
                "Model tensor shapes do not form a 9-hidden-9 network",
            )
        })?;
        debug!(hidden, "Model decoded");
        let model = MoveModel::<InferBackend>::zeroed(hidden, &device).load_record(record);
        Ok(Self::from_model(model))
    }

    /// Every weight and bias, layer by layer.
    fn parameters(&self) -> Vec<f32> {
        let model = self.model();
        [&model.input, &model.output]
            .into_iter()
            .flat_map(|layer| {
                let mut values = tensor_values(layer.weight.val());
                if let Some(bias) = &layer.bias {
                    values.extend(tensor_values(bias.val()));
                }
                values
            })
            .collect()
    }
}

/// Hidden width when the record's shapes are consistent.
fn record_width(record: &MoveModelRecord<InferBackend>) -> Option<usize> {
    let [inputs, hidden] = record.input.weight.val().dims();
    let [hidden_out, outputs] = record.output.weight.val().dims();
    let bias_ok = |bias: &Option<Param<Tensor<InferBackend, 1>>>, len: usize| {
        bias.as_ref().is_none_or(|b| b.val().dims() == [len])
    };
    (hidden > 0
        && inputs == INPUTS
        && outputs == OUTPUTS
        && hidden_out == hidden
        && bias_ok(&record.input.bias, hidden)
        && bias_ok(&record.output.bias, OUTPUTS))
    .then_some(hidden)
}

fn tensor_values<const D: usize>(tensor: Tensor<InferBackend, D>) -> Vec<f32> {
    tensor.into_data().to_vec::<f32>().unwrap_or_default()
}

impl Clone for MoveNetwork {
    fn clone(&self) -> Self {
        Self::from_model(self.model().clone())
    }
}

impl PartialEq for MoveNetwork {
    fn eq(&self, other: &Self) -> bool {
        self.hidden_units() == other.hidden_units() && self.parameters() == other.parameters()
    }
}

impl Predictor for MoveNetwork {
    fn score(&self, state: &[i8; 9]) -> [f32; 9] {
        let device = NdArrayDevice::default();
        let input = Tensor::<InferBackend, 2>::from_data(
            TensorData::new(state.map(f32::from).to_vec(), [1, INPUTS]),
            &device,
        );
        let probs = softmax(self.model().forward(input), 1);
        let mut scores = [0.0; OUTPUTS];
        for (slot, value) in scores.iter_mut().zip(tensor_values(probs)) {
            *slot = value;
        }
        scores
    }
}
