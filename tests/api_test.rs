//! Тесты внешнего API: `HandService` поверх in-memory хранилища.
//!
//! Каждая команда: загрузить историю → реплей → одна мутация → дописать события.

use hand_engine::api::{
    ApiError, Command, ConnectPlayerCommand, CreateHandCommand, DisconnectPlayerCommand,
    GetHandQuery, HandService, ParticipantInput, StartHandCommand, SubmitPlayerActionCommand,
};
use hand_engine::domain::{Chips, HandId};
use hand_engine::engine::{HandEvent, PlayerAction, Stage};
use hand_engine::eval::HoldemEvaluator;
use hand_engine::infra::{DeterministicRng, EventStore, InMemoryEventStore};

type Service = HandService<InMemoryEventStore, DeterministicRng, HoldemEvaluator>;

fn service() -> Service {
    HandService::new(
        InMemoryEventStore::new(),
        DeterministicRng::from_seed(2024),
        HoldemEvaluator,
    )
}

/// alice (1, SB), bobby (2, BB), carol (3, баттон).
fn create_command() -> CreateHandCommand {
    let participant = |nickname: &str, seat: u8| ParticipantInput {
        nickname: nickname.to_string(),
        seat,
        stack: Chips(500),
    };
    CreateHandCommand {
        game: "NoLimitHoldem".to_string(),
        small_blind: Chips(5),
        big_blind: Chips(10),
        max_seat: 6,
        small_blind_seat: 1,
        big_blind_seat: 2,
        button_seat: 3,
        participants: vec![
            participant("alice", 1),
            participant("bobby", 2),
            participant("carol", 3),
        ],
    }
}

fn started(service: &mut Service) -> HandId {
    let hand_id = service.create_hand(create_command()).unwrap().hand_id;
    service.start_hand(StartHandCommand { hand_id }).unwrap();
    hand_id
}

fn action(hand_id: HandId, nickname: &str, action: PlayerAction) -> Command {
    Command::SubmitPlayerAction(SubmitPlayerActionCommand {
        hand_id,
        nickname: nickname.to_string(),
        action,
    })
}

// ===== СОЗДАНИЕ И СТАРТ =====

#[test]
fn create_start_and_query() {
    let mut service = service();

    let created = service.execute(Command::CreateHand(create_command())).unwrap();
    assert_eq!(created.events.len(), 1);
    assert!(matches!(created.events[0], HandEvent::HandCreated { .. }));

    let hand_id = created.hand_id;
    let state = service.get_hand(GetHandQuery { hand_id }).unwrap();
    assert!(!state.is_started);
    assert_eq!(state.pending_decision, None);
    assert_eq!(state.stage, Stage::PostBlinds);

    let response = service
        .execute(Command::StartHand(StartHandCommand { hand_id }))
        .unwrap();
    assert_eq!(response.events[0], HandEvent::HandStarted);
    assert_eq!(service.store().len(hand_id), 1 + response.events.len());

    let state = service.get_hand(GetHandQuery { hand_id }).unwrap();
    assert!(state.is_started);
    assert_eq!(state.total_pot, Chips(15));
    assert_eq!(state.players.len(), 3);
    assert!(state.players.iter().all(|p| p.hole_cards.len() == 2));

    let bobby = state.players.iter().find(|p| p.nickname == "bobby").unwrap();
    assert_eq!(bobby.current_bet, Chips(10));
    assert_eq!(bobby.stack, Chips(490));

    let decision = state.pending_decision.unwrap();
    assert_eq!(decision.nickname.as_str(), "carol");
    assert_eq!(decision.call_to_amount, Chips(10));
}

#[test]
fn whole_hand_through_commands() {
    let mut service = service();
    let hand_id = started(&mut service);

    service.execute(action(hand_id, "carol", PlayerAction::RaiseTo(Chips(30)))).unwrap();
    service.execute(action(hand_id, "alice", PlayerAction::Fold)).unwrap();
    let last = service.execute(action(hand_id, "bobby", PlayerAction::Fold)).unwrap();
    assert_eq!(last.events.last(), Some(&HandEvent::HandFinished));

    let state = service.get_hand(GetHandQuery { hand_id }).unwrap();
    assert!(state.is_finished);
    assert_eq!(state.pending_decision, None);
    assert_eq!(state.total_pot, Chips::ZERO);

    let stacks: Vec<(String, Chips)> = state
        .players
        .iter()
        .map(|p| (p.nickname.clone(), p.stack))
        .collect();
    assert_eq!(
        stacks,
        vec![
            ("alice".to_string(), Chips(495)),
            ("bobby".to_string(), Chips(490)),
            ("carol".to_string(), Chips(515)),
        ]
    );

    let err = service
        .execute(action(hand_id, "carol", PlayerAction::Check))
        .unwrap_err();
    assert!(matches!(err, ApiError::Engine(_)));
}

// ===== ОШИБКИ =====

#[test]
fn unknown_hand_is_not_found() {
    let mut service = service();
    assert_eq!(
        service.execute(Command::StartHand(StartHandCommand { hand_id: 42 })),
        Err(ApiError::NotFound(42))
    );
    assert_eq!(
        service.get_hand(GetHandQuery { hand_id: 42 }),
        Err(ApiError::NotFound(42))
    );
}

#[test]
fn bad_input_is_bad_request() {
    let mut service = service();

    let mut cmd = create_command();
    cmd.participants[0].nickname = "x!".to_string();
    assert!(matches!(service.create_hand(cmd), Err(ApiError::BadRequest(_))));

    let mut cmd = create_command();
    cmd.game = "Stud".to_string();
    assert!(matches!(service.create_hand(cmd), Err(ApiError::BadRequest(_))));

    let mut cmd = create_command();
    cmd.participants[2].seat = 7;
    assert!(matches!(service.create_hand(cmd), Err(ApiError::BadRequest(_))));

    let mut cmd = create_command();
    cmd.button_seat = cmd.big_blind_seat;
    assert!(matches!(service.create_hand(cmd), Err(ApiError::BadRequest(_))));

    let mut cmd = create_command();
    cmd.participants[1].nickname = "alice".to_string();
    assert!(matches!(service.create_hand(cmd), Err(ApiError::BadRequest(_))));

    let mut cmd = create_command();
    cmd.game = "PotLimitOmaha".to_string();
    assert!(matches!(service.create_hand(cmd), Err(ApiError::Engine(_))));

    let hand_id = started(&mut service);
    let err = service
        .execute(action(hand_id, "no", PlayerAction::Fold))
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
}

#[test]
fn illegal_action_writes_nothing() {
    let mut service = service();
    let hand_id = started(&mut service);
    let before = service.store().len(hand_id);

    let err = service
        .execute(action(hand_id, "alice", PlayerAction::Call))
        .unwrap_err();
    assert!(matches!(err, ApiError::IllegalAction(_)));

    let err = service
        .execute(action(hand_id, "carol", PlayerAction::RaiseTo(Chips(11))))
        .unwrap_err();
    assert!(matches!(err, ApiError::IllegalAction(_)));

    assert_eq!(service.store().len(hand_id), before);
}

// ===== ПОДКЛЮЧЕНИЕ =====

#[test]
fn connect_and_disconnect_are_recorded() {
    let mut service = service();
    let hand_id = started(&mut service);

    let response = service
        .execute(Command::DisconnectPlayer(DisconnectPlayerCommand {
            hand_id,
            nickname: "carol".to_string(),
        }))
        .unwrap();
    assert_eq!(response.events.len(), 1);

    let state = service.get_hand(GetHandQuery { hand_id }).unwrap();
    let carol = state.players.iter().find(|p| p.nickname == "carol").unwrap();
    assert!(!carol.is_connected);

    let err = service
        .execute(action(hand_id, "carol", PlayerAction::Call))
        .unwrap_err();
    assert!(matches!(err, ApiError::Engine(_)));

    service
        .execute(Command::ConnectPlayer(ConnectPlayerCommand {
            hand_id,
            nickname: "carol".to_string(),
        }))
        .unwrap();
    service.execute(action(hand_id, "carol", PlayerAction::Call)).unwrap();
}

// ===== ХРАНИЛИЩЕ =====

/// История переживает JSON: то, что записали, читается обратно без потерь.
#[test]
fn stored_history_survives_json() {
    let mut service = service();
    let hand_id = started(&mut service);
    service.execute(action(hand_id, "carol", PlayerAction::Call)).unwrap();

    let history = service.store().get_events(hand_id).unwrap();
    assert!(matches!(history[0], HandEvent::HandCreated { .. }));

    let json = serde_json::to_string(&history).unwrap();
    let decoded: Vec<HandEvent> = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, history);
}

#[test]
fn hands_are_independent() {
    let mut service = service();
    let first = started(&mut service);
    let second = started(&mut service);
    assert_ne!(first, second);

    service.execute(action(first, "carol", PlayerAction::Fold)).unwrap();
    let a = service.get_hand(GetHandQuery { hand_id: first }).unwrap();
    let b = service.get_hand(GetHandQuery { hand_id: second }).unwrap();
    assert_eq!(a.pending_decision.unwrap().nickname.as_str(), "alice");
    assert_eq!(b.pending_decision.unwrap().nickname.as_str(), "carol");
}
