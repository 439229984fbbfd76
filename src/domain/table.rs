use serde::{Deserialize, Serialize};

use crate::domain::card_set::CardSet;
use crate::domain::hand::{Participant, Positions};
use crate::domain::nickname::Nickname;
use crate::domain::player::Player;
use crate::domain::seat::Seat;
use crate::engine::errors::EngineError;

/// Стол одной раздачи: игроки по местам, борд, позиции.
///
/// Инварианты: места уникальны, ники уникальны, игроков минимум двое,
/// место большого блайнда занято.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    positions: Positions,
    /// Отсортированы по месту.
    players: Vec<Player>,
    board: CardSet,
}

impl Table {
    pub fn new(
        participants: &[Participant],
        max_seat: Seat,
        positions: Positions,
    ) -> Result<Self, EngineError> {
        positions.validate(max_seat)?;

        let mut players: Vec<Player> = Vec::with_capacity(participants.len());
        for p in participants {
            if p.seat > max_seat {
                return Err(EngineError::SeatOutOfRange {
                    seat: p.seat,
                    max_seat,
                });
            }
            if p.stack.is_zero() {
                return Err(EngineError::EmptyStack(p.nickname.clone()));
            }
            if players.iter().any(|x| x.seat() == p.seat) {
                return Err(EngineError::DuplicateSeat(p.seat));
            }
            if players.iter().any(|x| x.nickname() == &p.nickname) {
                return Err(EngineError::DuplicateNickname(p.nickname.clone()));
            }
            players.push(Player::new(p.nickname.clone(), p.seat, p.stack));
        }

        if players.len() < 2 {
            return Err(EngineError::NotEnoughPlayers(players.len()));
        }

        players.sort_by_key(|p| p.seat());

        if !players.iter().any(|p| p.seat() == positions.big_blind) {
            return Err(EngineError::EmptyBigBlindSeat(positions.big_blind));
        }

        Ok(Self {
            positions,
            players,
            board: CardSet::empty(),
        })
    }

    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn board(&self) -> &CardSet {
        &self.board
    }

    pub fn player(&self, nickname: &Nickname) -> Result<&Player, EngineError> {
        self.players
            .iter()
            .find(|p| p.nickname() == nickname)
            .ok_or_else(|| EngineError::PlayerNotFound(nickname.clone()))
    }

    pub fn player_mut(&mut self, nickname: &Nickname) -> Result<&mut Player, EngineError> {
        self.players
            .iter_mut()
            .find(|p| p.nickname() == nickname)
            .ok_or_else(|| EngineError::PlayerNotFound(nickname.clone()))
    }

    pub fn player_at_seat(&self, seat: Seat) -> Option<&Player> {
        self.players.iter().find(|p| p.seat() == seat)
    }

    /// Игроки по кругу, начиная с места `seat` (включительно).
    pub fn players_starting_from_seat(&self, seat: Seat) -> Vec<&Player> {
        let (before, after): (Vec<&Player>, Vec<&Player>) =
            self.players.iter().partition(|p| p.seat() < seat);
        after.into_iter().chain(before).collect()
    }

    /// Первый подходящий игрок после места `seat` по кругу.
    /// Сам игрок на `seat` проверяется последним.
    pub fn player_next_to_seat<F>(&self, seat: Seat, predicate: F) -> Option<&Player>
    where
        F: Fn(&Player) -> bool,
    {
        let (upto, after): (Vec<&Player>, Vec<&Player>) =
            self.players.iter().partition(|p| p.seat() <= seat);
        after.into_iter().chain(upto).find(|p| predicate(p))
    }

    pub fn live_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_live())
    }

    pub fn available_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_available())
    }

    pub fn take_board_cards(&mut self, cards: &CardSet) -> Result<(), EngineError> {
        self.board = self.board.concat(cards)?;
        Ok(())
    }
}
