//! Движок раздачи: банк, сайд-поты, раунды ставок, конвейер стадий, агрегат `Hand`.
//!
//! Высокоуровневый объект: `Hand`
//! Основные операции:
//!   - `Hand::from_scratch` / `Hand::from_events` – новая раздача или реплей истории
//!   - `start` – запустить раздачу
//!   - `submit_player_action` – применить решение игрока
//!   - `pull_events` – забрать новые события
//!   - `get_state` – снимок для чтения

pub mod actions;
pub mod bets;
pub mod betting;
pub mod dealer;
pub mod errors;
pub mod events;
pub mod game_loop;
pub mod pot;
pub mod side_pots;

pub use actions::{Decision, PlayerAction};
pub use bets::Bets;
pub use betting::BettingLimit;
pub use dealer::{pipeline_for, Stage};
pub use errors::{EngineError, IllegalActionReason};
pub use events::HandEvent;
pub use game_loop::{Hand, HandState, PlayerSnapshot, TableSnapshot};
pub use pot::{Pot, PotSnapshot};
pub use side_pots::{calculate_side_pots, SidePot};

use crate::domain::{CardSet, Combo, Game};

/// Источник случайности: равномерно из `[0, max_inclusive]`.
/// Реализации — в infra (обёртки над `rand`).
pub trait Randomizer {
    fn next(&mut self, max_inclusive: usize) -> usize;
}

impl<R: Randomizer + ?Sized> Randomizer for &mut R {
    fn next(&mut self, max_inclusive: usize) -> usize {
        (**self).next(max_inclusive)
    }
}

/// Оценка силы руки. Веса сравнимы только в рамках одной игры.
pub trait Evaluator {
    fn evaluate(&self, game: Game, hole_cards: &CardSet, board_cards: &CardSet) -> Combo;
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn evaluate(&self, game: Game, hole_cards: &CardSet, board_cards: &CardSet) -> Combo {
        (**self).evaluate(game, hole_cards, board_cards)
    }
}
