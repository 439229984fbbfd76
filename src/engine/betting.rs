//! Логика раунда ставок: чей ход, что доступно, сколько доставить.
//!
//! Всё считается из текущих `Table` и `Pot`, отдельного состояния раунда нет.

use serde::{Deserialize, Serialize};

use crate::domain::{Chips, Player, Table};
use crate::engine::actions::{Decision, PlayerAction};
use crate::engine::errors::{EngineError, IllegalActionReason};
use crate::engine::pot::Pot;

/// Ограничение размера рейза.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BettingLimit {
    NoLimit,
    /// Рейз не больше банка после колла.
    PotLimit,
}

/// Следующий игрок, который может действовать: после последнего поставившего,
/// а если в раунде ещё никто не ставил — после баттона.
pub fn next_player<'a>(table: &'a Table, pot: &Pot) -> Result<Option<&'a Player>, EngineError> {
    let from_seat = match pot.last_posted_nickname() {
        Some(nickname) => table.player(nickname)?.seat(),
        None => table.positions().button,
    };
    Ok(table.player_next_to_seat(from_seat, Player::is_available))
}

/// Ждём ли от игрока решения: ему есть что уравнивать или он ещё не ходил в этом раунде.
/// Если действовать может только он один, решение нужно лишь когда ему есть что уравнивать.
pub fn decision_is_expected(table: &Table, player: &Player, pot: &Pot) -> bool {
    let posted = pot.uncommitted_posted_by(player.nickname());
    let others_max = pot.uncommitted_max_posted_not_by(player.nickname());
    if posted < others_max {
        return true;
    }
    let alone = table.available_players().count() <= 1;
    !alone && !pot.has_acted(player.nickname())
}

pub fn call_to_amount(player: &Player, pot: &Pot) -> Chips {
    let others_max = pot.uncommitted_max_posted_not_by(player.nickname());
    let player_total = pot.uncommitted_posted_by(player.nickname()) + player.stack();
    others_max.min(player_total)
}

pub fn min_raise_to_amount(player: &Player, pot: &Pot) -> Chips {
    let others_max = pot.uncommitted_max_posted_not_by(player.nickname());
    let player_total = pot.uncommitted_posted_by(player.nickname()) + player.stack();
    (others_max + pot.last_raised_step()).min(player_total)
}

pub fn max_raise_to_amount(player: &Player, pot: &Pot, limit: BettingLimit) -> Chips {
    let posted = pot.uncommitted_posted_by(player.nickname());
    let player_total = posted + player.stack();
    match limit {
        BettingLimit::NoLimit => player_total,
        BettingLimit::PotLimit => {
            let others_max = pot.uncommitted_max_posted_not_by(player.nickname());
            let pot_after_call = pot.total() + others_max.saturating_sub(posted);
            (others_max + pot_after_call).min(player_total)
        }
    }
}

fn check_is_available(player: &Player, pot: &Pot) -> bool {
    pot.uncommitted_posted_by(player.nickname()) >= pot.uncommitted_max_posted_not_by(player.nickname())
}

fn call_is_available(player: &Player, pot: &Pot) -> bool {
    let others_max = pot.uncommitted_max_posted_not_by(player.nickname());
    !others_max.is_zero() && pot.uncommitted_posted_by(player.nickname()) < others_max
}

fn raise_is_available(table: &Table, player: &Player, pot: &Pot) -> bool {
    if min_raise_to_amount(player, pot) == call_to_amount(player, pot) {
        return false;
    }
    // Некому отвечать на рейз.
    if !table
        .available_players()
        .any(|p| p.nickname() != player.nickname())
    {
        return false;
    }
    // Кто уже ходил, снова получает рейз только если с тех пор ставку подняли
    // хотя бы на полный рейз. Короткий олл-ин торговлю не переоткрывает.
    match pot.level_when_acted(player.nickname()) {
        Some(level) => {
            let others_max = pot.uncommitted_max_posted_not_by(player.nickname());
            others_max.saturating_sub(level) >= pot.last_raised_step()
        }
        None => true,
    }
}

/// Что доступно игроку прямо сейчас.
pub fn decision_for(table: &Table, player: &Player, pot: &Pot, limit: BettingLimit) -> Decision {
    let call_is_available = call_is_available(player, pot);
    let raise_is_available = raise_is_available(table, player, pot);

    Decision {
        nickname: player.nickname().clone(),
        fold_is_available: true,
        check_is_available: check_is_available(player, pot),
        call_is_available,
        call_to_amount: if call_is_available {
            call_to_amount(player, pot)
        } else {
            Chips::ZERO
        },
        raise_is_available,
        min_raise_to_amount: if raise_is_available {
            min_raise_to_amount(player, pot)
        } else {
            Chips::ZERO
        },
        max_raise_to_amount: if raise_is_available {
            max_raise_to_amount(player, pot, limit)
        } else {
            Chips::ZERO
        },
    }
}

/// Сверить действие с тем, что было предложено игроку.
pub fn validate_action(decision: &Decision, action: PlayerAction) -> Result<(), EngineError> {
    let reason = match action {
        PlayerAction::Fold => None,
        PlayerAction::Check if decision.check_is_available => None,
        PlayerAction::Check => Some(IllegalActionReason::CheckNotAvailable),
        PlayerAction::Call if decision.call_is_available => None,
        PlayerAction::Call => Some(IllegalActionReason::CallNotAvailable),
        PlayerAction::RaiseTo(_) if !decision.raise_is_available => {
            Some(IllegalActionReason::RaiseNotAvailable)
        }
        PlayerAction::RaiseTo(amount) if amount < decision.min_raise_to_amount => {
            Some(IllegalActionReason::RaiseBelowMinimum)
        }
        PlayerAction::RaiseTo(amount) if amount > decision.max_raise_to_amount => {
            Some(IllegalActionReason::RaiseAboveMaximum)
        }
        PlayerAction::RaiseTo(_) => None,
    };

    match reason {
        Some(reason) => Err(EngineError::illegal(&decision.nickname, reason)),
        None => Ok(()),
    }
}

/// Сколько фишек игрок докладывает этим действием.
pub fn amount_to_add(player: &Player, pot: &Pot, action: PlayerAction) -> Result<Chips, EngineError> {
    let posted = pot.uncommitted_posted_by(player.nickname());
    match action {
        PlayerAction::Fold | PlayerAction::Check => Ok(Chips::ZERO),
        PlayerAction::Call => call_to_amount(player, pot).try_sub(posted),
        PlayerAction::RaiseTo(amount) => amount.try_sub(posted),
    }
}
