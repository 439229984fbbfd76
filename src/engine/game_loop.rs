//! Агрегат `Hand`: одна раздача от создания до расчёта.
//!
//! Состояние меняется только событиями. Живая игра и реплей проходят через один
//! и тот же `Stage::apply`, поэтому `from_events(история)` даёт ровно то же состояние.
//! Новые события копятся в буфере, пока их не заберут через `pull_events`.

use serde::{Deserialize, Serialize};

use crate::domain::{
    CardSet, Chips, Deck, HandId, Nickname, Participant, Player, Positions, Rules, Seat, Table,
};
use crate::engine::actions::{Decision, PlayerAction};
use crate::engine::dealer::{pipeline_for, DealerContext, Stage};
use crate::engine::errors::{EngineError, IllegalActionReason};
use crate::engine::events::HandEvent;
use crate::engine::pot::{Pot, PotSnapshot};
use crate::engine::{Evaluator, Randomizer};

/// Всё изменяемое в раздаче. Откатывается целиком, если операция упала.
#[derive(Clone, Debug)]
struct HandCore {
    table: Table,
    pot: Pot,
    deck: Deck,
    cursor: usize,
    is_started: bool,
    is_finished: bool,
}

pub struct Hand<R: Randomizer, E: Evaluator> {
    id: HandId,
    rules: Rules,
    positions: Positions,
    stages: Vec<Stage>,
    core: HandCore,
    randomizer: R,
    evaluator: E,
    pending: Vec<HandEvent>,
}

/// Снимок игрока для чтения.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerSnapshot {
    pub nickname: Nickname,
    pub seat: Seat,
    pub stack: Chips,
    pub hole_cards: CardSet,
    pub is_folded: bool,
    pub is_connected: bool,
    pub is_all_in: bool,
}

impl From<&Player> for PlayerSnapshot {
    fn from(p: &Player) -> Self {
        Self {
            nickname: p.nickname().clone(),
            seat: p.seat(),
            stack: p.stack(),
            hole_cards: p.hole_cards().clone(),
            is_folded: p.is_folded(),
            is_connected: p.is_connected(),
            is_all_in: p.is_all_in(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSnapshot {
    pub players: Vec<PlayerSnapshot>,
    pub board: CardSet,
}

/// Проекция раздачи для запросов.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandState {
    pub id: HandId,
    pub rules: Rules,
    pub positions: Positions,
    pub stage: Stage,
    pub is_started: bool,
    pub is_finished: bool,
    pub table: TableSnapshot,
    pub pot: PotSnapshot,
}

impl<R: Randomizer, E: Evaluator> Hand<R, E> {
    /// Новая раздача. В буфере сразу лежит `HandCreated`.
    pub fn from_scratch(
        id: HandId,
        rules: Rules,
        positions: Positions,
        participants: Vec<Participant>,
        randomizer: R,
        evaluator: E,
    ) -> Result<Self, EngineError> {
        rules.validate()?;
        let stages = pipeline_for(rules.game)?;
        let table = Table::new(&participants, rules.max_seat, positions)?;
        let pot = Pot::new(rules.big_blind);

        let created = HandEvent::HandCreated {
            rules: rules.clone(),
            positions,
            participants,
        };

        Ok(Self {
            id,
            rules,
            positions,
            stages,
            core: HandCore {
                table,
                pot,
                deck: Deck::standard_52(),
                cursor: 0,
                is_started: false,
                is_finished: false,
            },
            randomizer,
            evaluator,
            pending: vec![created],
        })
    }

    /// Восстановить раздачу из истории. Первое событие обязано быть `HandCreated`.
    pub fn from_events(
        id: HandId,
        events: &[HandEvent],
        randomizer: R,
        evaluator: E,
    ) -> Result<Self, EngineError> {
        let Some((first, rest)) = events.split_first() else {
            return Err(EngineError::InvalidReplay("пустая история"));
        };
        let HandEvent::HandCreated {
            rules,
            positions,
            participants,
        } = first
        else {
            return Err(EngineError::InvalidReplay("первое событие не HandCreated"));
        };

        let mut hand = Self::from_scratch(
            id,
            rules.clone(),
            *positions,
            participants.clone(),
            randomizer,
            evaluator,
        )?;
        hand.pending.clear();

        for event in rest {
            hand.replay(event)?;
        }
        Ok(hand)
    }

    pub fn id(&self) -> HandId {
        self.id
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn table(&self) -> &Table {
        &self.core.table
    }

    pub fn pot(&self) -> &Pot {
        &self.core.pot
    }

    pub fn is_started(&self) -> bool {
        self.core.is_started
    }

    pub fn is_finished(&self) -> bool {
        self.core.is_finished
    }

    pub fn current_stage(&self) -> Stage {
        self.stages[self.core.cursor]
    }

    pub fn start(&mut self) -> Result<(), EngineError> {
        self.transact(|hand, out| {
            if hand.core.is_started {
                return Err(EngineError::HandAlreadyStarted);
            }
            hand.record(HandEvent::HandStarted, out)?;

            let stage = hand.current_stage();
            stage.start(&mut hand.context(), out)?;
            hand.continue_pipeline(out)
        })
    }

    pub fn submit_player_action(
        &mut self,
        nickname: &Nickname,
        action: PlayerAction,
    ) -> Result<(), EngineError> {
        self.transact(|hand, out| {
            hand.ensure_in_progress()?;

            let stage = hand.current_stage();
            stage.submit_player_action(&mut hand.context(), nickname, action, out)?;
            hand.continue_pipeline(out)
        })
    }

    pub fn connect_player(&mut self, nickname: &Nickname) -> Result<(), EngineError> {
        self.transact(|hand, out| {
            if hand.core.is_finished {
                return Err(EngineError::HandAlreadyFinished);
            }
            if hand.core.table.player(nickname)?.is_connected() {
                return Err(EngineError::illegal(nickname, IllegalActionReason::AlreadyConnected));
            }
            hand.record(
                HandEvent::PlayerConnected {
                    nickname: nickname.clone(),
                },
                out,
            )
        })
    }

    pub fn disconnect_player(&mut self, nickname: &Nickname) -> Result<(), EngineError> {
        self.transact(|hand, out| {
            if hand.core.is_finished {
                return Err(EngineError::HandAlreadyFinished);
            }
            if !hand.core.table.player(nickname)?.is_connected() {
                return Err(EngineError::illegal(
                    nickname,
                    IllegalActionReason::AlreadyDisconnected,
                ));
            }
            hand.record(
                HandEvent::PlayerDisconnected {
                    nickname: nickname.clone(),
                },
                out,
            )
        })
    }

    /// Чьё решение сейчас ждём и что ему доступно.
    pub fn pending_decision(&self) -> Result<Option<Decision>, EngineError> {
        if !self.core.is_started || self.core.is_finished {
            return Ok(None);
        }
        self.current_stage()
            .pending_decision(&self.core.table, &self.core.pot)
    }

    /// Забрать накопленные события. Буфер после этого пуст.
    pub fn pull_events(&mut self) -> Vec<HandEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn get_state(&self) -> HandState {
        HandState {
            id: self.id,
            rules: self.rules.clone(),
            positions: self.positions,
            stage: self.current_stage(),
            is_started: self.core.is_started,
            is_finished: self.core.is_finished,
            table: TableSnapshot {
                players: self.core.table.players().iter().map(PlayerSnapshot::from).collect(),
                board: self.core.table.board().clone(),
            },
            pot: self.core.pot.snapshot(),
        }
    }

    fn ensure_in_progress(&self) -> Result<(), EngineError> {
        if !self.core.is_started {
            return Err(EngineError::HandNotStarted);
        }
        if self.core.is_finished {
            return Err(EngineError::HandAlreadyFinished);
        }
        Ok(())
    }

    fn context(&mut self) -> DealerContext<'_> {
        DealerContext {
            rules: &self.rules,
            table: &mut self.core.table,
            pot: &mut self.core.pot,
            deck: &mut self.core.deck,
            randomizer: &mut self.randomizer,
            evaluator: &self.evaluator,
        }
    }

    /// Применить одно событие истории.
    fn replay(&mut self, event: &HandEvent) -> Result<(), EngineError> {
        if event.is_lifecycle() {
            match event {
                HandEvent::HandStarted => self.core.is_started = true,
                HandEvent::HandFinished => self.core.is_finished = true,
                _ => {}
            }
            return Ok(());
        }

        let stage = self.current_stage();
        stage.apply(&mut self.context(), event)?;
        if let HandEvent::StageFinished { short_circuit } = event {
            self.advance(*short_circuit);
        }
        Ok(())
    }

    fn record(&mut self, event: HandEvent, out: &mut Vec<HandEvent>) -> Result<(), EngineError> {
        self.replay(&event)?;
        out.push(event);
        Ok(())
    }

    /// Курсор вперёд на одну стадию (не дальше последней),
    /// а при досрочном завершении — сразу на расчёт.
    fn advance(&mut self, short_circuit: bool) {
        let last = self.stages.len() - 1;
        self.core.cursor = if short_circuit {
            last
        } else {
            (self.core.cursor + 1).min(last)
        };
    }

    /// Пока стадии завершаются сами, запускаем следующие.
    fn continue_pipeline(&mut self, out: &mut Vec<HandEvent>) -> Result<(), EngineError> {
        while let Some(HandEvent::StageFinished { short_circuit }) = out.last() {
            let short_circuit = *short_circuit;
            if self.core.cursor + 1 >= self.stages.len() {
                return self.record(HandEvent::HandFinished, out);
            }
            self.advance(short_circuit);

            let stage = self.current_stage();
            stage.start(&mut self.context(), out)?;
        }
        Ok(())
    }

    /// Выполнить операцию целиком или никак: при ошибке ядро откатывается,
    /// события в буфер не попадают.
    fn transact<F>(&mut self, f: F) -> Result<(), EngineError>
    where
        F: FnOnce(&mut Self, &mut Vec<HandEvent>) -> Result<(), EngineError>,
    {
        let snapshot = self.core.clone();
        let mut out = Vec::new();
        match f(self, &mut out) {
            Ok(()) => {
                self.pending.extend(out);
                Ok(())
            }
            Err(err) => {
                self.core = snapshot;
                Err(err)
            }
        }
    }
}
