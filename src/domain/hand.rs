use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::nickname::Nickname;
use crate::domain::seat::Seat;
use crate::engine::errors::EngineError;

/// Разновидность игры. Набор стадий раздачи выбирается по ней.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Game {
    NoLimitHoldem,
    PotLimitOmaha,
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Game::NoLimitHoldem => "NoLimitHoldem",
            Game::PotLimitOmaha => "PotLimitOmaha",
        };
        f.write_str(name)
    }
}

impl FromStr for Game {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NoLimitHoldem" => Ok(Game::NoLimitHoldem),
            "PotLimitOmaha" => Ok(Game::PotLimitOmaha),
            other => Err(EngineError::UnknownGame(other.to_string())),
        }
    }
}

/// Улица раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

/// Правила раздачи. Фиксируются при создании и больше не меняются.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rules {
    pub game: Game,
    pub max_seat: Seat,
    pub small_blind: Chips,
    pub big_blind: Chips,
}

impl Rules {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.small_blind.is_zero() {
            return Err(EngineError::InvalidRules("малый блайнд должен быть больше нуля"));
        }
        if self.small_blind > self.big_blind {
            return Err(EngineError::InvalidRules(
                "малый блайнд не может быть больше большого",
            ));
        }
        Ok(())
    }
}

/// Позиции блайндов и баттона.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Positions {
    pub small_blind: Seat,
    pub big_blind: Seat,
    pub button: Seat,
}

impl Positions {
    /// Баттон может совпадать с малым блайндом (хедз-ап), но не с большим.
    pub fn validate(&self, max_seat: Seat) -> Result<(), EngineError> {
        for seat in [self.small_blind, self.big_blind, self.button] {
            if seat > max_seat {
                return Err(EngineError::SeatOutOfRange { seat, max_seat });
            }
        }
        if self.small_blind == self.big_blind {
            return Err(EngineError::InvalidPositions(
                "малый и большой блайнд на одном месте",
            ));
        }
        if self.button == self.big_blind {
            return Err(EngineError::InvalidPositions(
                "баттон и большой блайнд на одном месте",
            ));
        }
        Ok(())
    }
}

/// Участник раздачи на входе: из него получается `Player`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub nickname: Nickname,
    pub seat: Seat,
    pub stack: Chips,
}
