use serde::{Deserialize, Serialize};

use crate::domain::{CardSet, Chips, Combo, Nickname, Participant, Positions, Rules};
use crate::engine::actions::{Decision, PlayerAction};
use crate::engine::bets::Bets;
use crate::engine::side_pots::SidePot;

/// Событие раздачи. Упорядоченный список событий — единственное, что хранится.
///
/// Каждый вариант несёт ровно то, что нужно для повторного применения.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum HandEvent {
    HandCreated {
        rules: Rules,
        positions: Positions,
        participants: Vec<Participant>,
    },
    HandStarted,
    HandFinished,

    StageStarted,
    /// `short_circuit` — в раздаче остался один претендент, дальше сразу расчёт.
    StageFinished {
        short_circuit: bool,
    },

    PlayerConnected {
        nickname: Nickname,
    },
    PlayerDisconnected {
        nickname: Nickname,
    },

    SmallBlindPosted {
        nickname: Nickname,
        amount: Chips,
    },
    BigBlindPosted {
        nickname: Nickname,
        amount: Chips,
    },

    DecisionRequested {
        decision: Decision,
    },
    DecisionCommitted {
        nickname: Nickname,
        action: PlayerAction,
    },
    BetRefunded {
        nickname: Nickname,
        amount: Chips,
    },
    SidePotAwarded {
        side_pot: SidePot,
        /// Сколько получает каждый победитель слоя.
        awards: Bets,
    },

    HoleCardsDealt {
        nickname: Nickname,
        cards: CardSet,
    },
    BoardCardsDealt {
        cards: CardSet,
    },
    HoleCardsShown {
        nickname: Nickname,
        cards: CardSet,
        combo: Combo,
    },
    HoleCardsMucked {
        nickname: Nickname,
    },
}

impl HandEvent {
    /// Создание/старт/финиш раздачи: на стадии не передаются.
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            HandEvent::HandCreated { .. } | HandEvent::HandStarted | HandEvent::HandFinished
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            HandEvent::HandCreated { .. } => "HandCreated",
            HandEvent::HandStarted => "HandStarted",
            HandEvent::HandFinished => "HandFinished",
            HandEvent::StageStarted => "StageStarted",
            HandEvent::StageFinished { .. } => "StageFinished",
            HandEvent::PlayerConnected { .. } => "PlayerConnected",
            HandEvent::PlayerDisconnected { .. } => "PlayerDisconnected",
            HandEvent::SmallBlindPosted { .. } => "SmallBlindPosted",
            HandEvent::BigBlindPosted { .. } => "BigBlindPosted",
            HandEvent::DecisionRequested { .. } => "DecisionRequested",
            HandEvent::DecisionCommitted { .. } => "DecisionCommitted",
            HandEvent::BetRefunded { .. } => "BetRefunded",
            HandEvent::SidePotAwarded { .. } => "SidePotAwarded",
            HandEvent::HoleCardsDealt { .. } => "HoleCardsDealt",
            HandEvent::BoardCardsDealt { .. } => "BoardCardsDealt",
            HandEvent::HoleCardsShown { .. } => "HoleCardsShown",
            HandEvent::HoleCardsMucked { .. } => "HoleCardsMucked",
        }
    }
}
