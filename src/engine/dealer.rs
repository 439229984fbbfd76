//! Конвейер стадий раздачи.
//!
//! Стадия — вариант `Stage`, вся логика — в одном `match` по нему.
//! Каждое событие сначала применяется через `Stage::apply` (тот же путь, что и при
//! реплее), а потом попадает в выходной буфер.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::{Chips, Combo, Deck, Game, Nickname, Player, Rules, Street, Table};
use crate::engine::actions::{Decision, PlayerAction};
use crate::engine::bets::Bets;
use crate::engine::betting::{self, BettingLimit};
use crate::engine::errors::{EngineError, IllegalActionReason};
use crate::engine::events::HandEvent;
use crate::engine::pot::Pot;
use crate::engine::{Evaluator, Randomizer};

/// Стадия раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Stage {
    PostBlinds,
    DealHoleCards { count: usize },
    Betting { street: Street, limit: BettingLimit },
    DealBoardCards { street: Street, count: usize },
    Settlement,
}

/// Набор стадий для разновидности игры.
pub fn pipeline_for(game: Game) -> Result<Vec<Stage>, EngineError> {
    match game {
        Game::NoLimitHoldem => {
            let limit = BettingLimit::NoLimit;
            Ok(vec![
                Stage::PostBlinds,
                Stage::DealHoleCards { count: 2 },
                Stage::Betting { street: Street::Preflop, limit },
                Stage::DealBoardCards { street: Street::Flop, count: 3 },
                Stage::Betting { street: Street::Flop, limit },
                Stage::DealBoardCards { street: Street::Turn, count: 1 },
                Stage::Betting { street: Street::Turn, limit },
                Stage::DealBoardCards { street: Street::River, count: 1 },
                Stage::Betting { street: Street::River, limit },
                Stage::Settlement,
            ])
        }
        // Пот-лимит и 4 карманные карты: BettingLimit::PotLimit уже считается,
        // но оценщик и правила омахи в раздаче пока не подключены.
        Game::PotLimitOmaha => Err(EngineError::UnsupportedGame(game)),
    }
}

/// Всё, с чем работает стадия.
pub struct DealerContext<'a> {
    pub rules: &'a Rules,
    pub table: &'a mut Table,
    pub pot: &'a mut Pot,
    pub deck: &'a mut Deck,
    pub randomizer: &'a mut dyn Randomizer,
    pub evaluator: &'a dyn Evaluator,
}

impl Stage {
    /// Войти в стадию. Может сразу же её и завершить.
    pub fn start(
        &self,
        ctx: &mut DealerContext<'_>,
        out: &mut Vec<HandEvent>,
    ) -> Result<(), EngineError> {
        self.emit(ctx, out, HandEvent::StageStarted)?;

        match *self {
            Stage::PostBlinds => {
                post_blinds(self, ctx, out)?;
                self.emit(ctx, out, HandEvent::StageFinished { short_circuit: false })
            }
            Stage::DealHoleCards { count } => {
                for nickname in order_after_button(ctx.table, |_| true) {
                    let cards = ctx.deck.clone().extract_random_cards(count, ctx.randomizer)?;
                    self.emit(ctx, out, HandEvent::HoleCardsDealt { nickname, cards })?;
                }
                self.emit(ctx, out, HandEvent::StageFinished { short_circuit: false })
            }
            Stage::Betting { limit, .. } => request_decision_or_finish(self, limit, ctx, out),
            Stage::DealBoardCards { count, .. } => {
                let cards = ctx.deck.clone().extract_random_cards(count, ctx.randomizer)?;
                self.emit(ctx, out, HandEvent::BoardCardsDealt { cards })?;
                self.emit(ctx, out, HandEvent::StageFinished { short_circuit: false })
            }
            Stage::Settlement => {
                settle(self, ctx, out)?;
                self.emit(ctx, out, HandEvent::StageFinished { short_circuit: false })
            }
        }
    }

    /// Решение игрока. Принимается только в раунде ставок и только от того, чей ход.
    pub fn submit_player_action(
        &self,
        ctx: &mut DealerContext<'_>,
        nickname: &Nickname,
        action: PlayerAction,
        out: &mut Vec<HandEvent>,
    ) -> Result<(), EngineError> {
        let player = ctx.table.player(nickname)?;

        let Stage::Betting { limit, .. } = *self else {
            return Err(EngineError::illegal(nickname, IllegalActionReason::NoDecisionExpected));
        };

        let decision = self
            .pending_decision(ctx.table, ctx.pot)?
            .ok_or_else(|| EngineError::illegal(nickname, IllegalActionReason::NoDecisionExpected))?;
        if &decision.nickname != nickname {
            return Err(EngineError::illegal(nickname, IllegalActionReason::NotYourTurn));
        }
        if !player.is_connected() {
            return Err(EngineError::PlayerDisconnected(nickname.clone()));
        }

        betting::validate_action(&decision, action)?;

        self.emit(
            ctx,
            out,
            HandEvent::DecisionCommitted {
                nickname: nickname.clone(),
                action,
            },
        )?;
        request_decision_or_finish(self, limit, ctx, out)
    }

    /// Кого и о чём сейчас спрашиваем. Вне раунда ставок — никого.
    pub fn pending_decision(&self, table: &Table, pot: &Pot) -> Result<Option<Decision>, EngineError> {
        let Stage::Betting { limit, .. } = *self else {
            return Ok(None);
        };
        if table.live_players().count() <= 1 {
            return Ok(None);
        }
        let Some(player) = betting::next_player(table, pot)? else {
            return Ok(None);
        };
        if !betting::decision_is_expected(table, player, pot) {
            return Ok(None);
        }
        Ok(Some(betting::decision_for(table, player, pot, limit)))
    }

    /// Применить событие к столу/банку/колоде. Одинаково для живой игры и реплея.
    pub fn apply(&self, ctx: &mut DealerContext<'_>, event: &HandEvent) -> Result<(), EngineError> {
        match (self, event) {
            (_, HandEvent::StageStarted) => Ok(()),
            (_, HandEvent::PlayerConnected { nickname }) => {
                ctx.table.player_mut(nickname)?.connect();
                Ok(())
            }
            (_, HandEvent::PlayerDisconnected { nickname }) => {
                ctx.table.player_mut(nickname)?.disconnect();
                Ok(())
            }

            (Stage::PostBlinds, HandEvent::SmallBlindPosted { nickname, amount })
            | (Stage::PostBlinds, HandEvent::BigBlindPosted { nickname, amount }) => {
                ctx.table.player_mut(nickname)?.post(*amount)?;
                ctx.pot.post_blind(nickname, *amount);
                Ok(())
            }

            (Stage::DealHoleCards { .. }, HandEvent::HoleCardsDealt { nickname, cards }) => {
                ctx.deck.extract_certain_cards(cards)?;
                ctx.table.player_mut(nickname)?.take_hole_cards(cards)
            }

            (Stage::Betting { .. }, HandEvent::DecisionRequested { .. }) => Ok(()),
            (Stage::Betting { .. }, HandEvent::DecisionCommitted { nickname, action }) => {
                apply_decision(ctx, nickname, *action)
            }
            (Stage::Betting { .. }, HandEvent::BetRefunded { nickname, amount }) => {
                ctx.pot.refund_bet(nickname, *amount)?;
                ctx.table.player_mut(nickname)?.refund(*amount);
                Ok(())
            }
            (Stage::Betting { .. }, HandEvent::StageFinished { .. }) => {
                ctx.pot.commit_bets();
                Ok(())
            }

            (Stage::DealBoardCards { .. }, HandEvent::BoardCardsDealt { cards }) => {
                ctx.deck.extract_certain_cards(cards)?;
                ctx.table.take_board_cards(cards)
            }

            (Stage::Settlement, HandEvent::HoleCardsShown { .. })
            | (Stage::Settlement, HandEvent::HoleCardsMucked { .. }) => Ok(()),
            (Stage::Settlement, HandEvent::SidePotAwarded { side_pot, awards }) => {
                ctx.pot.award(side_pot)?;
                for (nickname, amount) in awards.iter() {
                    ctx.table.player_mut(nickname)?.win(amount)?;
                }
                Ok(())
            }

            (_, HandEvent::StageFinished { .. }) => Ok(()),
            _ => Err(EngineError::InvalidReplay("событие не относится к текущей стадии")),
        }
    }

    fn emit(
        &self,
        ctx: &mut DealerContext<'_>,
        out: &mut Vec<HandEvent>,
        event: HandEvent,
    ) -> Result<(), EngineError> {
        self.apply(ctx, &event)?;
        out.push(event);
        Ok(())
    }
}

fn post_blinds(
    stage: &Stage,
    ctx: &mut DealerContext<'_>,
    out: &mut Vec<HandEvent>,
) -> Result<(), EngineError> {
    let positions = *ctx.table.positions();

    // Малого блайнда может и не быть (место пустое).
    if let Some(player) = ctx.table.player_at_seat(positions.small_blind) {
        let nickname = player.nickname().clone();
        let amount = player.stack().min(ctx.rules.small_blind);
        stage.emit(ctx, out, HandEvent::SmallBlindPosted { nickname, amount })?;
    }

    if let Some(player) = ctx.table.player_at_seat(positions.big_blind) {
        let nickname = player.nickname().clone();
        let amount = player.stack().min(ctx.rules.big_blind);
        stage.emit(ctx, out, HandEvent::BigBlindPosted { nickname, amount })?;
    }
    Ok(())
}

fn apply_decision(
    ctx: &mut DealerContext<'_>,
    nickname: &Nickname,
    action: PlayerAction,
) -> Result<(), EngineError> {
    let to_add = betting::amount_to_add(ctx.table.player(nickname)?, ctx.pot, action)?;
    let player = ctx.table.player_mut(nickname)?;

    match action {
        PlayerAction::Fold => player.fold(),
        PlayerAction::Check => {
            player.check()?;
            // Ноль фишек: отметка, что игрок в этом раунде уже ходил.
            ctx.pot.post_bet(nickname, Chips::ZERO);
            Ok(())
        }
        PlayerAction::Call | PlayerAction::RaiseTo(_) => {
            player.bet(to_add)?;
            ctx.pot.post_bet(nickname, to_add);
            Ok(())
        }
    }
}

fn request_decision_or_finish(
    stage: &Stage,
    limit: BettingLimit,
    ctx: &mut DealerContext<'_>,
    out: &mut Vec<HandEvent>,
) -> Result<(), EngineError> {
    if ctx.table.live_players().count() <= 1 {
        return finish_betting(stage, ctx, out, true);
    }

    let decision = match betting::next_player(ctx.table, ctx.pot)? {
        Some(player) if betting::decision_is_expected(ctx.table, player, ctx.pot) => {
            Some(betting::decision_for(ctx.table, player, ctx.pot, limit))
        }
        _ => None,
    };

    match decision {
        Some(decision) => stage.emit(ctx, out, HandEvent::DecisionRequested { decision }),
        None => finish_betting(stage, ctx, out, false),
    }
}

fn finish_betting(
    stage: &Stage,
    ctx: &mut DealerContext<'_>,
    out: &mut Vec<HandEvent>,
    short_circuit: bool,
) -> Result<(), EngineError> {
    if let Some((nickname, amount)) = ctx.pot.calculate_refund() {
        stage.emit(ctx, out, HandEvent::BetRefunded { nickname, amount })?;
    }
    stage.emit(ctx, out, HandEvent::StageFinished { short_circuit })
}

fn settle(
    stage: &Stage,
    ctx: &mut DealerContext<'_>,
    out: &mut Vec<HandEvent>,
) -> Result<(), EngineError> {
    let order = order_after_button(ctx.table, Player::is_live);
    let live: BTreeSet<Nickname> = order.iter().cloned().collect();

    if let [winner] = order.as_slice() {
        stage.emit(ctx, out, HandEvent::HoleCardsMucked { nickname: winner.clone() })?;
        for side_pot in ctx.pot.calculate_side_pots(&live) {
            let awards = Bets::new().post(winner, side_pot.amount());
            stage.emit(ctx, out, HandEvent::SidePotAwarded { side_pot, awards })?;
        }
        return Ok(());
    }

    let game = ctx.rules.game;
    let mut combos: BTreeMap<Nickname, Combo> = BTreeMap::new();
    for nickname in &order {
        let player = ctx.table.player(nickname)?;
        let combo = ctx
            .evaluator
            .evaluate(game, player.hole_cards(), ctx.table.board());
        combos.insert(nickname.clone(), combo);
    }

    let somebody_all_in = order
        .iter()
        .filter_map(|n| ctx.table.player(n).ok())
        .any(Player::is_all_in);

    let mut best_shown: Option<u32> = None;
    for nickname in &order {
        let player = ctx.table.player(nickname)?;
        let cards = player.hole_cards().clone();
        let Some(combo) = combos.get(nickname).copied() else {
            continue;
        };

        if somebody_all_in || best_shown.map_or(true, |best| combo.weight >= best) {
            best_shown = Some(best_shown.map_or(combo.weight, |best| best.max(combo.weight)));
            stage.emit(
                ctx,
                out,
                HandEvent::HoleCardsShown {
                    nickname: nickname.clone(),
                    cards,
                    combo,
                },
            )?;
        } else {
            stage.emit(ctx, out, HandEvent::HoleCardsMucked { nickname: nickname.clone() })?;
        }
    }

    for side_pot in ctx.pot.calculate_side_pots(&live) {
        let candidates: Vec<&Nickname> = if side_pot.eligible.is_empty() {
            order.iter().collect()
        } else {
            side_pot.eligible.iter().collect()
        };
        let best = candidates
            .iter()
            .filter_map(|n| combos.get(*n))
            .map(|c| c.weight)
            .max();
        let winners: Vec<Nickname> = candidates
            .into_iter()
            .filter(|n| combos.get(*n).map(|c| c.weight) == best)
            .cloned()
            .collect();

        let awards = split_among(ctx.table, &winners, side_pot.amount())?;
        stage.emit(ctx, out, HandEvent::SidePotAwarded { side_pot, awards })?;
    }
    Ok(())
}

/// Ники подходящих игроков по кругу, начиная со следующего за баттоном.
fn order_after_button<F>(table: &Table, predicate: F) -> Vec<Nickname>
where
    F: Fn(&Player) -> bool,
{
    let button = table.positions().button;
    match table.player_next_to_seat(button, &predicate) {
        Some(first) => table
            .players_starting_from_seat(first.seat())
            .into_iter()
            .filter(|p| predicate(p))
            .map(|p| p.nickname().clone())
            .collect(),
        None => Vec::new(),
    }
}

/// Поровну, а нечётные фишки по одной — начиная с самого короткого стека.
fn split_among(table: &Table, winners: &[Nickname], amount: Chips) -> Result<Bets, EngineError> {
    let mut ordered: Vec<(Chips, &Nickname)> = winners
        .iter()
        .map(|n| table.player(n).map(|p| (p.stack(), n)))
        .collect::<Result<_, _>>()?;
    ordered.sort();

    let (share, mut remainder) = amount.split(ordered.len() as u64);
    let mut awards = Bets::new();
    for (_, nickname) in ordered {
        let mut prize = share;
        if !remainder.is_zero() {
            prize += Chips(1);
            remainder = remainder.saturating_sub(Chips(1));
        }
        awards = awards.post(nickname, prize);
    }
    Ok(awards)
}
