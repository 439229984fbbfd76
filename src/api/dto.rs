use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::Game;
use crate::domain::HandId;
use crate::engine::{Decision, HandState, Stage};

/// DTO игрока за столом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerDto {
    pub nickname: String,
    pub seat: u8,
    pub stack: Chips,
    /// Сколько поставлено в текущем раунде.
    pub current_bet: Chips,
    pub is_folded: bool,
    pub is_all_in: bool,
    pub is_connected: bool,
    /// Карманные карты в виде "Ah", "Td".
    pub hole_cards: Vec<String>,
}

/// DTO раздачи для запроса `GetHandQuery`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandStateDto {
    pub hand_id: HandId,
    pub game: Game,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub stage: Stage,
    pub is_started: bool,
    pub is_finished: bool,
    pub board: Vec<String>,
    pub total_pot: Chips,
    pub players: Vec<PlayerDto>,
    /// Чей ход и что ему доступно.
    pub pending_decision: Option<Decision>,
}

impl HandStateDto {
    pub fn from_state(state: &HandState, pending_decision: Option<Decision>) -> Self {
        let players = state
            .table
            .players
            .iter()
            .map(|p| PlayerDto {
                nickname: p.nickname.to_string(),
                seat: p.seat.value(),
                stack: p.stack,
                current_bet: state.pot.uncommitted.amount_posted_by(&p.nickname),
                is_folded: p.is_folded,
                is_all_in: p.is_all_in,
                is_connected: p.is_connected,
                hole_cards: p.hole_cards.iter().map(ToString::to_string).collect(),
            })
            .collect();

        HandStateDto {
            hand_id: state.id,
            game: state.rules.game,
            small_blind: state.rules.small_blind,
            big_blind: state.rules.big_blind,
            stage: state.stage,
            is_started: state.is_started,
            is_finished: state.is_finished,
            board: state.table.board.iter().map(ToString::to_string).collect(),
            total_pot: state.pot.total,
            players,
            pending_decision,
        }
    }
}
