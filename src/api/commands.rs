use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::chips::Chips;
use crate::domain::hand::{Game, Participant, Positions, Rules};
use crate::domain::nickname::Nickname;
use crate::domain::seat::Seat;
use crate::domain::HandId;
use crate::engine::{EngineError, Evaluator, Hand, HandEvent, PlayerAction, Randomizer};
use crate::infra::EventStore;

use super::dto::HandStateDto;
use super::errors::ApiError;
use super::queries::{get_hand, GetHandQuery};

/// Команда верхнего уровня. Каждая меняет ровно одну раздачу.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Command {
    CreateHand(CreateHandCommand),
    StartHand(StartHandCommand),
    SubmitPlayerAction(SubmitPlayerActionCommand),
    ConnectPlayer(ConnectPlayerCommand),
    DisconnectPlayer(DisconnectPlayerCommand),
}

/// Участник в сыром виде, как его присылает клиент.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParticipantInput {
    pub nickname: String,
    pub seat: u8,
    pub stack: Chips,
}

/// Создать раздачу.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateHandCommand {
    /// "NoLimitHoldem" / "PotLimitOmaha".
    pub game: String,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub max_seat: u8,
    pub small_blind_seat: u8,
    pub big_blind_seat: u8,
    pub button_seat: u8,
    pub participants: Vec<ParticipantInput>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StartHandCommand {
    pub hand_id: HandId,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitPlayerActionCommand {
    pub hand_id: HandId,
    pub nickname: String,
    pub action: PlayerAction,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConnectPlayerCommand {
    pub hand_id: HandId,
    pub nickname: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisconnectPlayerCommand {
    pub hand_id: HandId,
    pub nickname: String,
}

/// Ответ на команду: новые события раздачи (их же получил бы подписчик шины).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandResponse {
    pub hand_id: HandId,
    pub events: Vec<HandEvent>,
}

/// Обработчик команд: загрузить историю, реплей, одна мутация, записать новые события.
///
/// Экземпляр `Hand` живёт ровно одну команду.
pub struct HandService<S, R, E> {
    store: S,
    randomizer: R,
    evaluator: E,
}

impl<S, R, E> HandService<S, R, E>
where
    S: EventStore,
    R: Randomizer,
    E: Evaluator,
{
    pub fn new(store: S, randomizer: R, evaluator: E) -> Self {
        Self {
            store,
            randomizer,
            evaluator,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn execute(&mut self, command: Command) -> Result<CommandResponse, ApiError> {
        match command {
            Command::CreateHand(cmd) => self.create_hand(cmd),
            Command::StartHand(cmd) => self.start_hand(cmd),
            Command::SubmitPlayerAction(cmd) => self.submit_player_action(cmd),
            Command::ConnectPlayer(cmd) => self.connect_player(cmd),
            Command::DisconnectPlayer(cmd) => self.disconnect_player(cmd),
        }
    }

    pub fn create_hand(&mut self, cmd: CreateHandCommand) -> Result<CommandResponse, ApiError> {
        let (rules, positions, participants) = parse_create(&cmd).map_err(|err| {
            warn!(error = %err, "создание раздачи отклонено");
            ApiError::from(err)
        })?;

        let hand_id = self.store.next_id();
        let mut hand = Hand::from_scratch(
            hand_id,
            rules,
            positions,
            participants,
            &mut self.randomizer,
            &self.evaluator,
        )
        .map_err(|err| {
            warn!(hand_id, error = %err, "создание раздачи отклонено");
            ApiError::from(err)
        })?;

        let events = hand.pull_events();
        self.store.append_events(hand_id, &events)?;
        info!(hand_id, game = %cmd.game, players = cmd.participants.len(), "раздача создана");

        Ok(CommandResponse { hand_id, events })
    }

    pub fn start_hand(&mut self, cmd: StartHandCommand) -> Result<CommandResponse, ApiError> {
        self.mutate(cmd.hand_id, "start", |hand| hand.start())
    }

    pub fn submit_player_action(
        &mut self,
        cmd: SubmitPlayerActionCommand,
    ) -> Result<CommandResponse, ApiError> {
        let nickname = Nickname::new(cmd.nickname)?;
        let action = cmd.action;
        debug!(hand_id = cmd.hand_id, nickname = %nickname, action = %action, "действие игрока");
        self.mutate(cmd.hand_id, "submit_player_action", |hand| {
            hand.submit_player_action(&nickname, action)
        })
    }

    pub fn connect_player(&mut self, cmd: ConnectPlayerCommand) -> Result<CommandResponse, ApiError> {
        let nickname = Nickname::new(cmd.nickname)?;
        self.mutate(cmd.hand_id, "connect_player", |hand| hand.connect_player(&nickname))
    }

    pub fn disconnect_player(
        &mut self,
        cmd: DisconnectPlayerCommand,
    ) -> Result<CommandResponse, ApiError> {
        let nickname = Nickname::new(cmd.nickname)?;
        self.mutate(cmd.hand_id, "disconnect_player", |hand| {
            hand.disconnect_player(&nickname)
        })
    }

    pub fn get_hand(&self, query: GetHandQuery) -> Result<HandStateDto, ApiError> {
        get_hand(&self.store, &self.evaluator, query)
    }

    fn mutate<F>(&mut self, hand_id: HandId, command: &str, op: F) -> Result<CommandResponse, ApiError>
    where
        F: FnOnce(&mut Hand<&mut R, &E>) -> Result<(), EngineError>,
    {
        let history = self.store.get_events(hand_id)?;
        debug!(hand_id, events = history.len(), "реплей раздачи");

        let mut hand = Hand::from_events(hand_id, &history, &mut self.randomizer, &self.evaluator)?;
        if let Err(err) = op(&mut hand) {
            warn!(hand_id, command, error = %err, "команда отклонена");
            return Err(err.into());
        }

        let events = hand.pull_events();
        self.store.append_events(hand_id, &events)?;
        info!(hand_id, command, events = events.len(), finished = hand.is_finished(), "команда выполнена");

        Ok(CommandResponse { hand_id, events })
    }
}

fn parse_create(cmd: &CreateHandCommand) -> Result<(Rules, Positions, Vec<Participant>), EngineError> {
    let rules = Rules {
        game: cmd.game.parse::<Game>()?,
        max_seat: Seat::new(cmd.max_seat)?,
        small_blind: cmd.small_blind,
        big_blind: cmd.big_blind,
    };
    let positions = Positions {
        small_blind: Seat::new(cmd.small_blind_seat)?,
        big_blind: Seat::new(cmd.big_blind_seat)?,
        button: Seat::new(cmd.button_seat)?,
    };
    let participants = cmd
        .participants
        .iter()
        .map(|p| {
            Ok(Participant {
                nickname: Nickname::new(p.nickname.clone())?,
                seat: Seat::new(p.seat)?,
                stack: p.stack,
            })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    Ok((rules, positions, participants))
}
