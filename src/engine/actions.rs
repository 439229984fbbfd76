use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Chips, Nickname};

/// Решение игрока в раунде ставок.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerAction {
    Fold,
    Check,
    /// Уравнять (если стека не хватает — олл-ин на весь стек).
    Call,
    /// Довести свою ставку в этом раунде до указанной суммы.
    RaiseTo(Chips),
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::Fold => f.write_str("fold"),
            PlayerAction::Check => f.write_str("check"),
            PlayerAction::Call => f.write_str("call"),
            PlayerAction::RaiseTo(amount) => write!(f, "raise to {amount}"),
        }
    }
}

/// Что доступно игроку, от которого ждут решения.
///
/// Суммы "до" — итоговая ставка игрока в раунде, а не добавка.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Decision {
    pub nickname: Nickname,
    pub fold_is_available: bool,
    pub check_is_available: bool,
    pub call_is_available: bool,
    pub call_to_amount: Chips,
    pub raise_is_available: bool,
    pub min_raise_to_amount: Chips,
    pub max_raise_to_amount: Chips,
}
