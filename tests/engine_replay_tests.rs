//! Реплей истории событий.
//!
//! Здесь мы проверяем:
//! - некорректные истории отклоняются;
//! - `from_events(история)` даёт то же состояние, что и живая игра;
//! - фишки не появляются и не исчезают (proptest по случайным раздачам).

use proptest::prelude::*;

use hand_engine::domain::{Chips, Game, Nickname, Participant, Positions, Rules, Seat};
use hand_engine::engine::{Decision, EngineError, Hand, HandEvent, PlayerAction, Randomizer};
use hand_engine::eval::HoldemEvaluator;
use hand_engine::infra::DeterministicRng;

/// При реплее колода не тянется, карты берутся из событий.
struct NoDraws;

impl Randomizer for NoDraws {
    fn next(&mut self, _max_inclusive: usize) -> usize {
        0
    }
}

type LiveHand = Hand<DeterministicRng, HoldemEvaluator>;

const NAMES: [&str; 6] = ["alice", "bobby", "carol", "david", "emily", "frank"];

fn seat(n: u8) -> Seat {
    Seat::new(n).unwrap()
}

fn new_hand(seed: u64, stacks: &[u64]) -> LiveHand {
    new_hand_with(seed, stacks, DeterministicRng::from_seed(seed))
}

/// Игроки на местах 1..=N, SB на 1, BB на 2.
fn new_hand_with<R: Randomizer>(id: u64, stacks: &[u64], randomizer: R) -> Hand<R, HoldemEvaluator> {
    let players = stacks.len() as u8;
    let participants = stacks
        .iter()
        .enumerate()
        .map(|(i, stack)| Participant {
            nickname: Nickname::new(NAMES[i]).unwrap(),
            seat: seat(i as u8 + 1),
            stack: Chips(*stack),
        })
        .collect();
    let button = if players == 2 { 1 } else { players };

    Hand::from_scratch(
        id,
        Rules {
            game: Game::NoLimitHoldem,
            max_seat: seat(6),
            small_blind: Chips(5),
            big_blind: Chips(10),
        },
        Positions {
            small_blind: seat(1),
            big_blind: seat(2),
            button: seat(button),
        },
        participants,
        randomizer,
        HoldemEvaluator,
    )
    .unwrap()
}

fn replay(id: u64, history: &[HandEvent]) -> Hand<NoDraws, HoldemEvaluator> {
    Hand::from_events(id, history, NoDraws, HoldemEvaluator).unwrap()
}

fn chips_on_table<R: Randomizer>(hand: &Hand<R, HoldemEvaluator>) -> Chips {
    let stacks: Chips = hand.table().players().iter().map(|p| p.stack()).sum();
    stacks + hand.pot().total()
}

/// Действие по номеру стратегии; всегда допустимое для `decision`.
fn pick_action(decision: &Decision, choice: u8) -> PlayerAction {
    let passive = if decision.check_is_available {
        PlayerAction::Check
    } else {
        PlayerAction::Call
    };
    match choice {
        0 if !decision.check_is_available => PlayerAction::Fold,
        3 if decision.raise_is_available => PlayerAction::RaiseTo(decision.min_raise_to_amount),
        4 if decision.raise_is_available => PlayerAction::RaiseTo(decision.max_raise_to_amount),
        _ => passive,
    }
}

// ===== НЕКОРРЕКТНАЯ ИСТОРИЯ =====

#[test]
fn empty_history_is_rejected() {
    let res = Hand::from_events(1, &[], NoDraws, HoldemEvaluator);
    assert!(matches!(res, Err(EngineError::InvalidReplay(_))));
}

#[test]
fn history_must_start_with_creation() {
    let res = Hand::from_events(1, &[HandEvent::HandStarted], NoDraws, HoldemEvaluator);
    assert!(matches!(res, Err(EngineError::InvalidReplay(_))));
}

#[test]
fn event_of_another_stage_is_rejected() {
    let mut hand = new_hand(3, &[500, 500, 500]);
    let mut history = hand.pull_events();
    history.push(HandEvent::HandStarted);
    // Первая стадия — блайнды, карты борда здесь не ждут.
    history.push(HandEvent::BoardCardsDealt {
        cards: "AhKhQh".parse().unwrap(),
    });

    assert!(matches!(
        Hand::from_events(3, &history, NoDraws, HoldemEvaluator),
        Err(EngineError::InvalidReplay(_))
    ));
}

#[test]
fn creation_with_broken_table_is_rejected() {
    let hand = new_hand(3, &[500, 500]);
    let history = vec![HandEvent::HandCreated {
        rules: hand.rules().clone(),
        positions: *hand.table().positions(),
        participants: Vec::new(),
    }];
    assert!(matches!(
        Hand::from_events(3, &history, NoDraws, HoldemEvaluator),
        Err(EngineError::NotEnoughPlayers(0))
    ));
}

// ===== ДЕТЕРМИНИРОВАННОСТЬ =====

#[test]
fn replay_matches_live_state_at_every_step() {
    let mut hand = new_hand(11, &[1000, 1000, 1000, 1000]);
    let mut history = hand.pull_events();
    hand.start().unwrap();
    history.extend(hand.pull_events());

    let mut step = 0u8;
    while let Some(decision) = hand.pending_decision().unwrap() {
        let action = pick_action(&decision, step % 5);
        hand.submit_player_action(&decision.nickname, action).unwrap();
        history.extend(hand.pull_events());
        step = step.wrapping_add(1);

        let replayed = replay(11, &history);
        assert_eq!(replayed.get_state(), hand.get_state());
        assert_eq!(replayed.pending_decision().unwrap(), hand.pending_decision().unwrap());
    }

    assert!(hand.is_finished());
    let twice = replay(11, &history);
    assert_eq!(twice.get_state(), replay(11, &history).get_state());
    assert!(twice.is_finished());
}

/// Как в сервисе: на каждое действие раздача восстанавливается из истории,
/// а RNG живёт дольше одной команды. Итог совпадает с живой игрой.
#[test]
fn hand_rebuilt_per_command_matches_live_one() {
    let mut live = new_hand(5, &[300, 300, 300]);
    live.start().unwrap();

    let mut rng = DeterministicRng::from_seed(5);
    let mut history = {
        let mut first = new_hand_with(5, &[300, 300, 300], &mut rng);
        first.start().unwrap();
        first.pull_events()
    };

    let mut step = 0u8;
    while let Some(decision) = live.pending_decision().unwrap() {
        let action = pick_action(&decision, step % 5);
        live.submit_player_action(&decision.nickname, action).unwrap();

        let mut resumed = Hand::from_events(5, &history, &mut rng, HoldemEvaluator).unwrap();
        resumed.submit_player_action(&decision.nickname, action).unwrap();
        history.extend(resumed.pull_events());
        step = step.wrapping_add(1);
    }

    let replayed = replay(5, &history);
    assert!(replayed.is_finished());
    assert_eq!(replayed.get_state(), live.get_state());
    assert_eq!(chips_on_table(&replayed), Chips(900));
}

// ===== СОХРАНЕНИЕ ФИШЕК =====

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// После каждого действия стеки + банк = сумма стартовых стеков;
    /// раздача заканчивается, банк пуст, реплей совпадает с живой игрой.
    #[test]
    fn chips_are_conserved(
        seed in any::<u64>(),
        stacks in prop::collection::vec(50u64..400, 2..=6),
        choices in prop::collection::vec(0u8..5, 1..40),
    ) {
        let total = Chips(stacks.iter().sum());
        let mut hand = new_hand(seed, &stacks);
        let mut history = hand.pull_events();
        hand.start().unwrap();
        history.extend(hand.pull_events());
        prop_assert_eq!(chips_on_table(&hand), total);

        let mut step = 0usize;
        while let Some(decision) = hand.pending_decision().unwrap() {
            prop_assert!(step < 5000, "раздача не закончилась");
            let choice = choices.get(step).copied().unwrap_or(1);
            let action = pick_action(&decision, choice);

            hand.submit_player_action(&decision.nickname, action).unwrap();
            history.extend(hand.pull_events());
            prop_assert_eq!(chips_on_table(&hand), total);
            step += 1;
        }

        prop_assert!(hand.is_finished());
        prop_assert_eq!(hand.pot().total(), Chips::ZERO);
        prop_assert_eq!(replay(seed, &history).get_state(), hand.get_state());
    }
}
