// src/bin/hand_dev_cli.rs
//
// Одна раздача от создания до расчёта на in-memory хранилище.
//
//   cargo run --bin hand_dev_cli -- --players 4 --seed 7 --strategy aggressive
//   RUST_LOG=debug cargo run --bin hand_dev_cli

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hand_engine::api::{
    ApiError, Command, CommandResponse, CreateHandCommand, GetHandQuery, HandService,
    ParticipantInput, StartHandCommand, SubmitPlayerActionCommand,
};
use hand_engine::domain::{Chips, HandId};
use hand_engine::engine::{Decision, HandEvent, PlayerAction};
use hand_engine::eval::HoldemEvaluator;
use hand_engine::infra::{DeterministicRng, InMemoryEventStore};

/// Как играют все участники.
#[derive(Copy, Clone, Debug, ValueEnum)]
enum Strategy {
    /// Чек, если можно, иначе колл.
    Passive,
    /// Минимальный рейз, если можно, иначе колл/чек.
    Aggressive,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Сыграть одну раздачу через HandService")]
struct Args {
    /// Число игроков (2..=9).
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(2..=9))]
    players: u8,

    #[arg(long, default_value_t = 1000)]
    stack: u64,

    #[arg(long, default_value_t = 5)]
    small_blind: u64,

    #[arg(long, default_value_t = 10)]
    big_blind: u64,

    /// Seed колоды. Без него — случайный.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = Strategy::Passive)]
    strategy: Strategy,

    /// Печатать события в JSON.
    #[arg(long)]
    json: bool,
}

/// Защита от бесконечного цикла, если что-то пошло не так.
const MAX_ACTIONS: usize = 500;

fn main() -> Result<(), ApiError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, players = args.players, strategy = ?args.strategy, "hand_dev_cli: старт");

    let mut service = HandService::new(
        InMemoryEventStore::new(),
        DeterministicRng::from_seed(seed),
        HoldemEvaluator,
    );

    let created = service.execute(Command::CreateHand(create_command(&args)))?;
    let hand_id = created.hand_id;
    print_events(&created, args.json);

    let started = service.execute(Command::StartHand(StartHandCommand { hand_id }))?;
    print_events(&started, args.json);

    for _ in 0..MAX_ACTIONS {
        let state = service.get_hand(GetHandQuery { hand_id })?;
        if state.is_finished {
            break;
        }
        let Some(decision) = state.pending_decision else {
            break;
        };

        let action = choose_action(&decision, args.strategy);
        println!("[CLI] {} -> {}", decision.nickname, action);

        let response = service.execute(Command::SubmitPlayerAction(SubmitPlayerActionCommand {
            hand_id,
            nickname: decision.nickname.to_string(),
            action,
        }))?;
        print_events(&response, args.json);
    }

    print_summary(&service, hand_id)
}

fn create_command(args: &Args) -> CreateHandCommand {
    let participants = (1..=args.players)
        .map(|seat| ParticipantInput {
            nickname: format!("player{seat}"),
            seat,
            stack: Chips::new(args.stack),
        })
        .collect();

    // Хедз-ап: баттон на малом блайнде.
    let button_seat = if args.players == 2 { 1 } else { args.players };

    CreateHandCommand {
        game: "NoLimitHoldem".to_string(),
        small_blind: Chips::new(args.small_blind),
        big_blind: Chips::new(args.big_blind),
        max_seat: args.players,
        small_blind_seat: 1,
        big_blind_seat: 2,
        button_seat,
        participants,
    }
}

fn choose_action(decision: &Decision, strategy: Strategy) -> PlayerAction {
    match strategy {
        Strategy::Aggressive if decision.raise_is_available => {
            PlayerAction::RaiseTo(decision.min_raise_to_amount)
        }
        _ if decision.check_is_available => PlayerAction::Check,
        _ if decision.call_is_available => PlayerAction::Call,
        _ => PlayerAction::Fold,
    }
}

fn print_events(response: &CommandResponse, json: bool) {
    for event in &response.events {
        if json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(err) => println!("[CLI] не удалось закодировать событие: {err}"),
            }
        } else {
            println!("  {}", describe(event));
        }
    }
}

fn describe(event: &HandEvent) -> String {
    match event {
        HandEvent::SmallBlindPosted { nickname, amount }
        | HandEvent::BigBlindPosted { nickname, amount } => {
            format!("{} {nickname} {amount}", event.name())
        }
        HandEvent::DecisionCommitted { nickname, action } => {
            format!("{} {nickname}: {action}", event.name())
        }
        HandEvent::BoardCardsDealt { cards } => format!("{} {cards}", event.name()),
        HandEvent::HoleCardsShown { nickname, cards, combo } => {
            format!("{} {nickname} {cards} ({})", event.name(), combo.kind.describe())
        }
        HandEvent::BetRefunded { nickname, amount } => {
            format!("{} {nickname} {amount}", event.name())
        }
        HandEvent::SidePotAwarded { side_pot, awards } => {
            let winners: Vec<String> = awards.iter().map(|(n, a)| format!("{n}={a}")).collect();
            format!("{} {} -> {}", event.name(), side_pot.amount(), winners.join(", "))
        }
        other => other.name().to_string(),
    }
}

fn print_summary(
    service: &HandService<InMemoryEventStore, DeterministicRng, HoldemEvaluator>,
    hand_id: HandId,
) -> Result<(), ApiError> {
    let state = service.get_hand(GetHandQuery { hand_id })?;

    println!();
    println!("================ HAND {hand_id} =================");
    println!("board: {}", state.board.join(" "));
    for player in &state.players {
        println!(
            "  seat {} {:<10} stack={} {}",
            player.seat,
            player.nickname,
            player.stack,
            if player.is_folded { "(fold)" } else { "" }
        );
    }
    println!(
        "finished={} events={}",
        state.is_finished,
        service.store().len(hand_id)
    );
    Ok(())
}
