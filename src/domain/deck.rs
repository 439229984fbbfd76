use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Rank, Suit};
use crate::domain::card_set::CardSet;
use crate::engine::errors::EngineError;
use crate::engine::Randomizer;

/// Колода карт. В домене — просто упорядоченный список оставшихся карт.
/// Случайность приходит снаружи через `Randomizer`, здесь только "вытащить без возврата".
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Стандартная 52-карточная колода в порядке:
    /// Clubs 2..A, Diamonds 2..A, Hearts 2..A, Spades 2..A.
    pub fn standard_52() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Deck { cards }
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

    /// Вытащить `count` случайных карт. Каждый раз индекс = `randomizer.next(len - 1)`.
    pub fn extract_random_cards(
        &mut self,
        count: usize,
        randomizer: &mut dyn Randomizer,
    ) -> Result<CardSet, EngineError> {
        if count > self.cards.len() {
            return Err(EngineError::NotEnoughCards {
                requested: count,
                available: self.cards.len(),
            });
        }

        let mut taken = Vec::with_capacity(count);
        for _ in 0..count {
            let max_index = self.cards.len() - 1;
            let idx = randomizer.next(max_index).min(max_index);
            taken.push(self.cards.remove(idx));
        }
        CardSet::new(taken)
    }

    /// Вытащить конкретные карты (реплей уже известной раздачи).
    pub fn extract_certain_cards(&mut self, cards: &CardSet) -> Result<(), EngineError> {
        if !cards.iter().all(|c| self.contains(c)) {
            return Err(EngineError::CardsNotInDeck(cards.clone()));
        }
        self.cards.retain(|c| !cards.contains(c));
        Ok(())
    }
}
