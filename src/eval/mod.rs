//! Оценка силы покерных рук.
//!
//! Основное:
//!   `HoldemEvaluator` – реализация `engine::Evaluator`
//!   `best_of_any(hole, board) -> HandRank`

pub mod evaluator;
pub mod hand_rank;

pub use evaluator::{best_of_any, HoldemEvaluator};
pub use hand_rank::HandRank;
