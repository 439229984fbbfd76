use crate::domain::card::Rank;
use crate::domain::combo::{Combo, ComboKind};

/// Битовая маска рангов: бит 0 = двойка, бит 12 = туз.
pub type RankMask = u16;

/// Упакованная сила руки.
///
/// Схема кодирования (u32):
///   [категория:4 бита][r0:4][r1:4][r2:4][r3:4][r4:4]
/// r0..r4 — ранги групп по убыванию значимости, пустые позиции = 0.
/// Чем больше число, тем сильнее рука.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct HandRank(u32);

impl HandRank {
    pub fn new(kind: ComboKind, ranks: &[Rank]) -> Self {
        let mut value = (kind as u32 & 0x0F) << 20;
        for (i, rank) in ranks.iter().take(5).enumerate() {
            value |= (*rank as u32 & 0x0F) << (16 - 4 * i as u32);
        }
        HandRank(value)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn kind(self) -> ComboKind {
        ComboKind::from_id(((self.0 >> 20) & 0x0F) as u8).unwrap_or(ComboKind::HighCard)
    }

    pub fn to_combo(self) -> Combo {
        Combo::new(self.kind(), self.0)
    }
}

pub fn rank_to_bit(rank: Rank) -> RankMask {
    1u16 << (rank as u8).saturating_sub(2)
}

/// Старшая карта стрита в маске, если стрит есть. Для A2345 — пятёрка.
pub fn detect_straight(mask: RankMask) -> Option<Rank> {
    // Пять подряд, начиная со старших.
    for high in (Rank::Six as u8..=Rank::Ace as u8).rev() {
        let window: RankMask = 0b1_1111 << (high - 6);
        if mask & window == window {
            return Rank::from_value(high);
        }
    }
    let wheel = rank_to_bit(Rank::Ace)
        | rank_to_bit(Rank::Two)
        | rank_to_bit(Rank::Three)
        | rank_to_bit(Rank::Four)
        | rank_to_bit(Rank::Five);
    if mask & wheel == wheel {
        return Some(Rank::Five);
    }
    None
}
