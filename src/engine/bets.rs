use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Chips, Nickname};
use crate::engine::errors::EngineError;

/// Ставки игроков: ник → сколько поставлено.
///
/// Значение неизменяемое: каждая операция возвращает новый `Bets`.
/// Перебор всегда идёт по (сумма, ник), в том же порядке и сериализуется.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "Vec<(Nickname, Chips)>", into = "Vec<(Nickname, Chips)>")]
pub struct Bets {
    mapping: BTreeMap<Nickname, Chips>,
}

impl Bets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    pub fn contains(&self, nickname: &Nickname) -> bool {
        self.mapping.contains_key(nickname)
    }

    pub fn total(&self) -> Chips {
        self.mapping.values().sum()
    }

    pub fn amount_posted_by(&self, nickname: &Nickname) -> Chips {
        self.mapping.get(nickname).copied().unwrap_or(Chips::ZERO)
    }

    pub fn max_amount_posted_not_by(&self, nickname: &Nickname) -> Chips {
        self.mapping
            .iter()
            .filter(|(n, _)| *n != nickname)
            .map(|(_, a)| *a)
            .max()
            .unwrap_or(Chips::ZERO)
    }

    /// Ник с наибольшей ставкой (при равенстве — последний по нику).
    pub fn nickname_posted_max(&self) -> Option<&Nickname> {
        self.iter().last().map(|(n, _)| n)
    }

    /// Пары (ник, сумма) по возрастанию суммы, затем ника.
    pub fn iter(&self) -> impl Iterator<Item = (&Nickname, Chips)> {
        let mut entries: Vec<(&Nickname, Chips)> =
            self.mapping.iter().map(|(n, a)| (n, *a)).collect();
        entries.sort_by(|(n1, a1), (n2, a2)| a1.cmp(a2).then_with(|| n1.cmp(n2)));
        entries.into_iter()
    }

    pub fn nicknames(&self) -> impl Iterator<Item = &Nickname> {
        self.mapping.keys()
    }

    pub fn post(&self, nickname: &Nickname, amount: Chips) -> Bets {
        let mut mapping = self.mapping.clone();
        *mapping.entry(nickname.clone()).or_insert(Chips::ZERO) += amount;
        Bets { mapping }
    }

    pub fn refund(&self, nickname: &Nickname, amount: Chips) -> Result<Bets, EngineError> {
        if amount.is_zero() {
            return Ok(self.clone());
        }
        let posted = self.amount_posted_by(nickname);
        let left = posted
            .checked_sub(amount)
            .ok_or_else(|| EngineError::RefundExceedsPosted {
                nickname: nickname.clone(),
                posted,
                amount,
            })?;
        let mut mapping = self.mapping.clone();
        mapping.insert(nickname.clone(), left);
        Ok(Bets { mapping })
    }

    pub fn merge(&self, other: &Bets) -> Bets {
        other
            .mapping
            .iter()
            .fold(self.clone(), |acc, (n, a)| acc.post(n, *a))
    }
}

impl From<Vec<(Nickname, Chips)>> for Bets {
    fn from(entries: Vec<(Nickname, Chips)>) -> Self {
        entries
            .iter()
            .fold(Bets::new(), |acc, (n, a)| acc.post(n, *a))
    }
}

impl From<Bets> for Vec<(Nickname, Chips)> {
    fn from(bets: Bets) -> Self {
        bets.iter().map(|(n, a)| (n.clone(), a)).collect()
    }
}
