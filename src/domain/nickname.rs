use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::errors::EngineError;

pub const NICKNAME_MIN_LEN: usize = 4;
pub const NICKNAME_MAX_LEN: usize = 32;

/// Ник игрока: 4–32 символа, `[a-zA-Z][a-zA-Z0-9_]*`. Уникален за столом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Nickname(String);

impl Nickname {
    pub fn new(value: impl Into<String>) -> Result<Self, EngineError> {
        let value = value.into();
        if is_valid(&value) {
            Ok(Nickname(value))
        } else {
            Err(EngineError::InvalidNickname(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid(value: &str) -> bool {
    let len = value.chars().count();
    if !(NICKNAME_MIN_LEN..=NICKNAME_MAX_LEN).contains(&len) {
        return false;
    }

    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl FromStr for Nickname {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Nickname::new(s)
    }
}

impl TryFrom<String> for Nickname {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Nickname::new(value)
    }
}

impl From<Nickname> for String {
    fn from(nickname: Nickname) -> Self {
        nickname.0
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_letters_digits_and_underscore() {
        assert!(Nickname::new("alice_99").is_ok());
        assert!(Nickname::new("Bob_").is_ok());
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(Nickname::new("abc").is_err());
        assert!(Nickname::new("9lives").is_err());
        assert!(Nickname::new("_under").is_err());
        assert!(Nickname::new("with space").is_err());
        assert!(Nickname::new("a".repeat(33)).is_err());
    }
}
