mod position;
pub mod rules;
mod types;

pub use position::Position;
pub use rules::{Outcome, evaluate};
pub use types::{Board, Cell, Mark};
