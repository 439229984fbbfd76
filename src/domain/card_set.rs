use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::engine::errors::EngineError;

/// Упорядоченный набор карт без дубликатов.
///
/// Порядок добавления сохраняется (так карты и попадают в события),
/// но равенство — как у множеств.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq)]
#[serde(try_from = "Vec<Card>", into = "Vec<Card>")]
pub struct CardSet {
    cards: Vec<Card>,
}

impl CardSet {
    pub fn new(cards: Vec<Card>) -> Result<Self, EngineError> {
        for (i, card) in cards.iter().enumerate() {
            if cards[..i].contains(card) {
                return Err(EngineError::DuplicateCard(*card));
            }
        }
        Ok(CardSet { cards })
    }

    pub fn empty() -> Self {
        CardSet::default()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_subset_of(&self, other: &CardSet) -> bool {
        self.cards.iter().all(|c| other.contains(c))
    }

    pub fn is_superset_of(&self, other: &CardSet) -> bool {
        other.is_subset_of(self)
    }

    pub fn overlaps(&self, other: &CardSet) -> bool {
        self.cards.iter().any(|c| other.contains(c))
    }

    /// Склеить два набора. Пересечение — ошибка, а не тихое слияние.
    pub fn concat(&self, other: &CardSet) -> Result<CardSet, EngineError> {
        if let Some(card) = other.cards.iter().find(|c| self.contains(c)) {
            return Err(EngineError::DuplicateCard(*card));
        }
        let mut cards = self.cards.clone();
        cards.extend_from_slice(&other.cards);
        Ok(CardSet { cards })
    }

    /// Набор без указанных карт (порядок оставшихся не меняется).
    pub fn without(&self, other: &CardSet) -> CardSet {
        CardSet {
            cards: self.cards.iter().copied().filter(|c| !other.contains(c)).collect(),
        }
    }
}

impl PartialEq for CardSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.is_subset_of(other)
    }
}

impl TryFrom<Vec<Card>> for CardSet {
    type Error = EngineError;

    fn try_from(cards: Vec<Card>) -> Result<Self, Self::Error> {
        CardSet::new(cards)
    }
}

impl From<CardSet> for Vec<Card> {
    fn from(set: CardSet) -> Self {
        set.cards
    }
}

/// "AhKd7c" или "Ah Kd 7c".
impl FromStr for CardSet {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.len() % 2 != 0 {
            return Err(EngineError::InvalidCard(s.to_string()));
        }
        let cards = compact
            .chunks(2)
            .map(|pair| pair.iter().collect::<String>().parse::<Card>())
            .collect::<Result<Vec<_>, _>>()?;
        CardSet::new(cards)
    }
}

impl fmt::Display for CardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for card in &self.cards {
            write!(f, "{card}")?;
        }
        Ok(())
    }
}
