//! The automated opponent: predictors and the move policy that consults them.

mod policy;
mod predictor;

pub use policy::choose_move;
pub use predictor::{MoveNetwork, Predictor, TrainingConfig};
