use crate::domain::card::{Card, Rank, Suit};
use crate::domain::card_set::CardSet;
use crate::domain::combo::{Combo, ComboKind};
use crate::domain::hand::Game;
use crate::engine::Evaluator;

use super::hand_rank::{detect_straight, rank_to_bit, HandRank, RankMask};

/// Оценщик для холдема (и омахи: ровно 2 карманные + 3 с борда).
#[derive(Clone, Copy, Debug, Default)]
pub struct HoldemEvaluator;

impl Evaluator for HoldemEvaluator {
    fn evaluate(&self, game: Game, hole_cards: &CardSet, board_cards: &CardSet) -> Combo {
        let rank = match game {
            Game::NoLimitHoldem => best_of_any(hole_cards.as_slice(), board_cards.as_slice()),
            Game::PotLimitOmaha => best_of_omaha(hole_cards.as_slice(), board_cards.as_slice()),
        };
        rank.to_combo()
    }
}

/// Лучшая 5-карточная рука из любых карт. Если карт меньше пяти — оцениваем что есть.
pub fn best_of_any(hole: &[Card], board: &[Card]) -> HandRank {
    let all: Vec<Card> = hole.iter().chain(board).copied().collect();
    if all.len() <= 5 {
        return classify(&all);
    }
    combinations(&all, 5)
        .iter()
        .map(|five| classify(five))
        .max()
        .unwrap_or_else(|| classify(&all[..5]))
}

fn best_of_omaha(hole: &[Card], board: &[Card]) -> HandRank {
    if hole.len() < 2 || board.len() < 3 {
        return best_of_any(hole, board);
    }
    let mut best: Option<HandRank> = None;
    for two in combinations(hole, 2) {
        for three in combinations(board, 3) {
            let five: Vec<Card> = two.iter().chain(&three).copied().collect();
            let r = classify(&five);
            if best.map_or(true, |b| r > b) {
                best = Some(r);
            }
        }
    }
    best.unwrap_or_else(|| best_of_any(hole, board))
}

/// Все сочетания по `k` в исходном порядке.
fn combinations(cards: &[Card], k: usize) -> Vec<Vec<Card>> {
    if k == 0 {
        return vec![Vec::new()];
    }
    if cards.len() < k {
        return Vec::new();
    }
    let (head, tail) = (cards[0], &cards[1..]);
    let mut with_head: Vec<Vec<Card>> = combinations(tail, k - 1)
        .into_iter()
        .map(|mut rest| {
            rest.insert(0, head);
            rest
        })
        .collect();
    with_head.extend(combinations(tail, k));
    with_head
}

/// Оценка не более чем 5 карт.
/// Флеш и стрит возможны только при полных пяти картах.
fn classify(cards: &[Card]) -> HandRank {
    let mut rank_counts = [0u8; 15];
    let mut suit_counts = [0u8; 4];
    let mut mask: RankMask = 0;

    for card in cards {
        rank_counts[card.rank as usize] += 1;
        let suit_idx = match card.suit {
            Suit::Clubs => 0,
            Suit::Diamonds => 1,
            Suit::Hearts => 2,
            Suit::Spades => 3,
        };
        suit_counts[suit_idx] += 1;
        mask |= rank_to_bit(card.rank);
    }

    let full = cards.len() == 5;
    let is_flush = full && suit_counts.iter().any(|&c| c == 5);
    let straight_high = if full { detect_straight(mask) } else { None };

    // (количество, ранг) по убыванию: сначала группы побольше, потом старше.
    let mut groups: Vec<(u8, Rank)> = Rank::ALL
        .iter()
        .filter(|r| rank_counts[**r as usize] > 0)
        .map(|r| (rank_counts[*r as usize], *r))
        .collect();
    groups.sort_by(|a, b| b.cmp(a));

    let pattern: Vec<u8> = groups.iter().map(|(c, _)| *c).collect();
    let ranks: Vec<Rank> = groups.iter().map(|(_, r)| *r).collect();

    // Стрит и флеш из пяти карт исключают любые пары.
    match (is_flush, straight_high) {
        (true, Some(high)) => return HandRank::new(ComboKind::StraightFlush, &[high]),
        (false, Some(high)) => return HandRank::new(ComboKind::Straight, &[high]),
        (true, None) => return HandRank::new(ComboKind::Flush, &ranks),
        (false, None) => {}
    }

    let kind = match pattern.as_slice() {
        [4, ..] => ComboKind::FourOfAKind,
        [3, 2] => ComboKind::FullHouse,
        [3, ..] => ComboKind::ThreeOfAKind,
        [2, 2, ..] => ComboKind::TwoPair,
        [2, ..] => ComboKind::OnePair,
        _ => ComboKind::HighCard,
    };
    HandRank::new(kind, &ranks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(s: &str) -> CardSet {
        s.parse().unwrap()
    }

    fn eval(hole: &str, board: &str) -> Combo {
        HoldemEvaluator.evaluate(Game::NoLimitHoldem, &cards(hole), &cards(board))
    }

    #[test]
    fn detects_every_category() {
        let board = "2c 7d 9h Js Kc";
        assert_eq!(eval("3d 4h", board).kind, ComboKind::HighCard);
        assert_eq!(eval("Kd 4h", board).kind, ComboKind::OnePair);
        assert_eq!(eval("Kd 9d", board).kind, ComboKind::TwoPair);
        assert_eq!(eval("Kd Kh", board).kind, ComboKind::ThreeOfAKind);
        assert_eq!(eval("Tc Qd", board).kind, ComboKind::Straight);
        assert_eq!(eval("Ac 5c", "2c 7c 9h Js Kc").kind, ComboKind::Flush);
        assert_eq!(eval("Kd Kh", "2c 2d 9h Js Kc").kind, ComboKind::FullHouse);
        assert_eq!(eval("Kd Kh", "Ks 2d 9h Js Kc").kind, ComboKind::FourOfAKind);
        assert_eq!(eval("Tc Qc", "9c Jc Kc 2d 3h").kind, ComboKind::StraightFlush);
    }

    #[test]
    fn kicker_decides_between_equal_pairs() {
        let board = "Ah 7d 9c 2s 3d";
        assert!(eval("As Kd", board).weight > eval("Ac Qd", board).weight);
    }

    #[test]
    fn wheel_loses_to_six_high_straight() {
        let wheel = eval("Ac 2d", "3h 4s 5c Kd Kh");
        let six_high = eval("6c 2d", "3h 4s 5c Kd Qh");
        assert_eq!(wheel.kind, ComboKind::Straight);
        assert!(six_high.weight > wheel.weight);
    }

    #[test]
    fn split_board_gives_equal_weight() {
        let board = "Ah Kh Qh Jh Th";
        assert_eq!(eval("2c 3d", board).weight, eval("4c 5d", board).weight);
    }

    #[test]
    fn omaha_uses_exactly_two_hole_cards() {
        // Четыре червы на руках и одна на борде: флеша нет.
        let combo = HoldemEvaluator.evaluate(
            Game::PotLimitOmaha,
            &cards("2h 5h 8h Jh"),
            &cards("Kh 3c 9d Qs 4c"),
        );
        assert_ne!(combo.kind, ComboKind::Flush);
    }
}
