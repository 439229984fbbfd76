use serde::{Deserialize, Serialize};

use crate::domain::card_set::CardSet;
use crate::domain::chips::Chips;
use crate::domain::nickname::Nickname;
use crate::domain::seat::Seat;
use crate::engine::errors::EngineError;

/// Состояние игрока в конкретной раздаче.
///
/// Инварианты: стек не уходит в минус, со сфолдившего больше ничего не списывается,
/// `is_all_in() <=> stack == 0`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    nickname: Nickname,
    seat: Seat,
    stack: Chips,
    hole_cards: CardSet,
    is_folded: bool,
    is_connected: bool,
}

impl Player {
    pub fn new(nickname: Nickname, seat: Seat, stack: Chips) -> Self {
        Self {
            nickname,
            seat,
            stack,
            hole_cards: CardSet::empty(),
            is_folded: false,
            is_connected: true,
        }
    }

    pub fn nickname(&self) -> &Nickname {
        &self.nickname
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn stack(&self) -> Chips {
        self.stack
    }

    pub fn hole_cards(&self) -> &CardSet {
        &self.hole_cards
    }

    pub fn is_folded(&self) -> bool {
        self.is_folded
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn is_all_in(&self) -> bool {
        self.stack.is_zero()
    }

    /// Ещё борется за банк (не сфолдил).
    pub fn is_live(&self) -> bool {
        !self.is_folded
    }

    /// Может принимать решения: не сфолдил и не в олл-ине.
    pub fn is_available(&self) -> bool {
        !self.is_folded && !self.is_all_in()
    }

    pub fn take_hole_cards(&mut self, cards: &CardSet) -> Result<(), EngineError> {
        if self.is_folded {
            return Err(EngineError::PlayerAlreadyFolded(self.nickname.clone()));
        }
        self.hole_cards = self.hole_cards.concat(cards)?;
        Ok(())
    }

    pub fn fold(&mut self) -> Result<(), EngineError> {
        self.guard_decision()?;
        self.is_folded = true;
        Ok(())
    }

    pub fn check(&self) -> Result<(), EngineError> {
        self.guard_decision()
    }

    /// Добровольная ставка.
    pub fn bet(&mut self, amount: Chips) -> Result<(), EngineError> {
        self.guard_decision()?;
        self.debit(amount)
    }

    /// Принудительная ставка (блайнд, анте). Разрешена и отключившемуся игроку.
    pub fn post(&mut self, amount: Chips) -> Result<(), EngineError> {
        if self.is_folded {
            return Err(EngineError::PlayerAlreadyFolded(self.nickname.clone()));
        }
        if self.is_all_in() {
            return Err(EngineError::PlayerAlreadyAllIn(self.nickname.clone()));
        }
        self.debit(amount)
    }

    pub fn win(&mut self, amount: Chips) -> Result<(), EngineError> {
        if self.is_folded {
            return Err(EngineError::PlayerAlreadyFolded(self.nickname.clone()));
        }
        self.stack += amount;
        Ok(())
    }

    /// Возврат переставленных фишек. Сфолдившему тоже положен.
    pub fn refund(&mut self, amount: Chips) {
        self.stack += amount;
    }

    pub fn connect(&mut self) {
        self.is_connected = true;
    }

    pub fn disconnect(&mut self) {
        self.is_connected = false;
    }

    fn guard_decision(&self) -> Result<(), EngineError> {
        if !self.is_connected {
            return Err(EngineError::PlayerDisconnected(self.nickname.clone()));
        }
        if self.is_folded {
            return Err(EngineError::PlayerAlreadyFolded(self.nickname.clone()));
        }
        if self.is_all_in() {
            return Err(EngineError::PlayerAlreadyAllIn(self.nickname.clone()));
        }
        Ok(())
    }

    fn debit(&mut self, amount: Chips) -> Result<(), EngineError> {
        self.stack = self
            .stack
            .checked_sub(amount)
            .ok_or_else(|| EngineError::InsufficientStack {
                nickname: self.nickname.clone(),
                stack: self.stack,
                amount,
            })?;
        Ok(())
    }
}
