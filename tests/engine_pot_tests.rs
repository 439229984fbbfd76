//! Банк и сайд-поты.
//!
//! Здесь мы проверяем:
//! - полный / неполный рейз и шаг рейза;
//! - возврат излишка единственному лидеру;
//! - идемпотентность commit_bets;
//! - раскладку на слои (в т.ч. сфолдившие и анте) и её полноту.

use std::collections::BTreeSet;

use proptest::prelude::*;

use hand_engine::domain::{Chips, Nickname};
use hand_engine::engine::{calculate_side_pots, Bets, Pot};

fn nick(s: &str) -> Nickname {
    Nickname::new(s).unwrap()
}

fn live(names: &[&str]) -> BTreeSet<Nickname> {
    names.iter().map(|n| nick(n)).collect()
}

fn bets(pairs: &[(&str, u64)]) -> Bets {
    pairs
        .iter()
        .fold(Bets::new(), |acc, (n, a)| acc.post(&nick(n), Chips(*a)))
}

// ===== POT: РЕЙЗЫ =====

#[test]
fn full_raise_moves_step_short_one_does_not() {
    let mut pot = Pot::new(Chips(10));
    pot.post_blind(&nick("alice"), Chips(5));
    pot.post_blind(&nick("bobby"), Chips(10));
    assert_eq!(pot.last_raised_step(), Chips(10));

    // До 30: рейз на 20.
    pot.post_bet(&nick("carol"), Chips(30));
    assert_eq!(pot.last_raised_nickname(), Some(&nick("carol")));
    assert_eq!(pot.last_raised_step(), Chips(20));

    // До 45: меньше полного рейза (нужно 50).
    pot.post_bet(&nick("alice"), Chips(40));
    assert_eq!(pot.last_posted_nickname(), Some(&nick("alice")));
    assert_eq!(pot.last_raised_nickname(), Some(&nick("carol")));
    assert_eq!(pot.last_raised_step(), Chips(20));

    assert_eq!(pot.total(), Chips(85));
    assert!(pot.has_acted(&nick("alice")));
    assert!(!pot.has_acted(&nick("bobby")));
}

#[test]
fn pot_remembers_level_closed_by_each_decision() {
    let mut pot = Pot::new(Chips(10));
    pot.post_blind(&nick("alice"), Chips(5));
    pot.post_blind(&nick("bobby"), Chips(10));
    assert_eq!(pot.level_when_acted(&nick("bobby")), None);

    pot.post_bet(&nick("carol"), Chips(30));
    pot.post_bet(&nick("dave"), Chips(30));
    // Короткий олл-ин: уровень у тех, кто уже ходил, не меняется.
    pot.post_bet(&nick("bobby"), Chips(30));
    assert_eq!(pot.level_when_acted(&nick("carol")), Some(Chips(30)));
    assert_eq!(pot.level_when_acted(&nick("dave")), Some(Chips(30)));
    assert_eq!(pot.level_when_acted(&nick("bobby")), Some(Chips(40)));

    pot.commit_bets();
    assert_eq!(pot.level_when_acted(&nick("carol")), None);
}

#[test]
fn refund_goes_to_single_leader_only() {
    let mut pot = Pot::new(Chips(10));
    pot.post_bet(&nick("alice"), Chips(100));
    pot.post_bet(&nick("bobby"), Chips(40));
    assert_eq!(pot.calculate_refund(), Some((nick("alice"), Chips(60))));

    pot.refund_bet(&nick("alice"), Chips(60)).unwrap();
    assert_eq!(pot.calculate_refund(), None);
    assert!(pot.refund_bet(&nick("bobby"), Chips(41)).is_err());
}

#[test]
fn commit_is_idempotent() {
    let mut pot = Pot::new(Chips(10));
    pot.post_blind(&nick("alice"), Chips(5));
    pot.post_blind(&nick("bobby"), Chips(10));
    pot.post_bet(&nick("alice"), Chips(5));

    pot.commit_bets();
    let once = pot.clone();
    pot.commit_bets();

    assert_eq!(pot, once);
    assert!(pot.uncommitted().is_empty());
    assert_eq!(pot.committed().total(), Chips(20));
    assert_eq!(pot.last_raised_step(), Chips(10));
    assert_eq!(pot.last_posted_nickname(), None);
}

#[test]
fn award_removes_exactly_the_layer() {
    let mut pot = Pot::new(Chips(10));
    pot.post_ante(Chips(3));
    pot.post_bet(&nick("alice"), Chips(100));
    pot.post_bet(&nick("bobby"), Chips(300));
    pot.commit_bets();
    pot.post_bet(&nick("bobby"), Chips(50));

    let layers = pot.calculate_side_pots(&live(&["alice", "bobby"]));
    let before = pot.total();
    pot.award(&layers[0]).unwrap();
    assert_eq!(pot.total(), before.saturating_sub(layers[0].amount()));

    for layer in &layers[1..] {
        pot.award(layer).unwrap();
    }
    assert_eq!(pot.total(), Chips::ZERO);
}

// ===== SIDE POTS =====

/// Два олл-ина 100 и 300: слой 200 на двоих и слой 200 только для большого стека.
#[test]
fn two_unequal_all_ins_give_two_layers() {
    let contributions = bets(&[("alice", 100), ("bobby", 300)]);
    let pots = calculate_side_pots(&contributions, Chips::ZERO, &live(&["alice", "bobby"]));

    assert_eq!(pots.len(), 2);
    assert_eq!(pots[0].amount(), Chips(200));
    assert_eq!(pots[0].eligible, live(&["alice", "bobby"]));
    assert_eq!(pots[1].amount(), Chips(200));
    assert_eq!(pots[1].eligible, live(&["bobby"]));
}

#[test]
fn equal_contributions_give_one_layer() {
    let contributions = bets(&[("alice", 50), ("bobby", 50), ("carol", 50)]);
    let pots = calculate_side_pots(&contributions, Chips::ZERO, &live(&["alice", "bobby", "carol"]));

    assert_eq!(pots.len(), 1);
    assert_eq!(pots[0].amount(), Chips(150));
}

/// Мёртвые деньги (анте и фишки сфолдившей выше живых уровней) — в первый слой.
#[test]
fn folded_chips_and_ante_stay_in_play() {
    // carol сфолдила, поставив больше всех живых.
    let contributions = bets(&[("alice", 40), ("bobby", 100), ("carol", 150)]);
    let pots = calculate_side_pots(&contributions, Chips(6), &live(&["alice", "bobby"]));

    assert_eq!(pots.len(), 2);
    assert_eq!(pots[0].ante, Chips(6));
    // 6 анте + по 40 от троих + 50 сверху от carol.
    assert_eq!(pots[0].amount(), Chips(176));
    assert_eq!(pots[0].bets.amount_posted_by(&nick("carol")), Chips(90));
    assert_eq!(pots[0].eligible, live(&["alice", "bobby"]));
    // По 60 от bobby и carol.
    assert_eq!(pots[1].amount(), Chips(120));
    assert_eq!(pots[1].ante, Chips::ZERO);
    assert_eq!(pots[1].eligible, live(&["bobby"]));

    let sum: Chips = pots.iter().map(|p| p.amount()).sum();
    assert_eq!(sum, Chips(6 + 40 + 100 + 150));
}

#[test]
fn only_ante_gives_single_layer_for_everyone_live() {
    let pots = calculate_side_pots(&Bets::new(), Chips(9), &live(&["alice", "bobby"]));
    assert_eq!(pots.len(), 1);
    assert_eq!(pots[0].amount(), Chips(9));
    assert_eq!(pots[0].eligible, live(&["alice", "bobby"]));

    assert!(calculate_side_pots(&Bets::new(), Chips::ZERO, &live(&["alice"])).is_empty());
}

const NAMES: [&str; 6] = ["alice", "bobby", "carol", "david", "emily", "frank"];

proptest! {
    /// Сумма слоёв = всё внесённое, претенденты каждого слоя — только живые.
    #[test]
    fn side_pots_are_complete(
        amounts in prop::collection::vec((0u64..500, any::<bool>()), 2..=6),
        ante in 0u64..20,
    ) {
        let mut contributions = Bets::new();
        let mut alive = BTreeSet::new();
        for (i, (amount, folded)) in amounts.iter().enumerate() {
            let n = nick(NAMES[i]);
            contributions = contributions.post(&n, Chips(*amount));
            if !folded {
                alive.insert(n);
            }
        }

        let pots = calculate_side_pots(&contributions, Chips(ante), &alive);

        let sum: Chips = pots.iter().map(|p| p.amount()).sum();
        prop_assert_eq!(sum, contributions.total() + Chips(ante));
        for pot in &pots {
            prop_assert!(pot.eligible.is_subset(&alive));
        }
    }
}
