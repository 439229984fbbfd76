use core::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::errors::EngineError;

/// Номер места за столом. Нумерация с единицы.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct Seat(u8);

impl Seat {
    pub fn new(value: u8) -> Result<Self, EngineError> {
        if value == 0 {
            return Err(EngineError::InvalidSeat(value));
        }
        Ok(Seat(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Seat {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Seat::new(value)
    }
}

impl From<Seat> for u8 {
    fn from(seat: Seat) -> Self {
        seat.0
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
