use serde::{Deserialize, Serialize};

/// Категория покерной комбинации.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComboKind {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl ComboKind {
    pub fn from_id(id: u8) -> Option<ComboKind> {
        Some(match id {
            0 => ComboKind::HighCard,
            1 => ComboKind::OnePair,
            2 => ComboKind::TwoPair,
            3 => ComboKind::ThreeOfAKind,
            4 => ComboKind::Straight,
            5 => ComboKind::Flush,
            6 => ComboKind::FullHouse,
            7 => ComboKind::FourOfAKind,
            8 => ComboKind::StraightFlush,
            _ => return None,
        })
    }

    pub fn describe(self) -> &'static str {
        match self {
            ComboKind::HighCard => "High card",
            ComboKind::OnePair => "One pair",
            ComboKind::TwoPair => "Two pair",
            ComboKind::ThreeOfAKind => "Three of a kind",
            ComboKind::Straight => "Straight",
            ComboKind::Flush => "Flush",
            ComboKind::FullHouse => "Full house",
            ComboKind::FourOfAKind => "Four of a kind",
            ComboKind::StraightFlush => "Straight flush",
        }
    }
}

/// Сила руки. `weight` сравнима между игроками одной разновидности игры.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Combo {
    pub kind: ComboKind,
    pub weight: u32,
}

impl Combo {
    pub fn new(kind: ComboKind, weight: u32) -> Self {
        Self { kind, weight }
    }
}
