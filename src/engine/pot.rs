use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::{Chips, Nickname};
use crate::engine::bets::Bets;
use crate::engine::errors::EngineError;
use crate::engine::side_pots::{calculate_side_pots, SidePot};

/// Банк раздачи.
///
/// `uncommitted` — ставки текущего раунда, `committed` — всё, что осталось от прошлых.
/// Плюс отслеживание рейзов: кто ставил последним, кто последним сделал полный рейз
/// и размер этого рейза (шаг).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pot {
    min_bet: Chips,
    ante: Chips,
    committed: Bets,
    uncommitted: Bets,
    last_posted_nickname: Option<Nickname>,
    last_raised_nickname: Option<Nickname>,
    last_raised_step: Chips,
    /// Кто уже принял решение в этом раунде (блайнды не в счёт)
    /// и до какой ставки раунда он тогда дошёл.
    acted: BTreeMap<Nickname, Chips>,
}

/// Снимок банка для чтения.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotSnapshot {
    pub ante: Chips,
    pub committed: Bets,
    pub uncommitted: Bets,
    pub total: Chips,
    pub last_posted_nickname: Option<Nickname>,
    pub last_raised_nickname: Option<Nickname>,
    pub last_raised_step: Chips,
}

impl Pot {
    /// `min_bet` — большой блайнд: с него начинается шаг рейза в каждом раунде.
    pub fn new(min_bet: Chips) -> Self {
        Self {
            min_bet,
            ante: Chips::ZERO,
            committed: Bets::new(),
            uncommitted: Bets::new(),
            last_posted_nickname: None,
            last_raised_nickname: None,
            last_raised_step: min_bet,
            acted: BTreeMap::new(),
        }
    }

    pub fn total(&self) -> Chips {
        self.ante + self.committed.total() + self.uncommitted.total()
    }

    pub fn ante(&self) -> Chips {
        self.ante
    }

    pub fn committed(&self) -> &Bets {
        &self.committed
    }

    pub fn uncommitted(&self) -> &Bets {
        &self.uncommitted
    }

    pub fn last_posted_nickname(&self) -> Option<&Nickname> {
        self.last_posted_nickname.as_ref()
    }

    pub fn last_raised_nickname(&self) -> Option<&Nickname> {
        self.last_raised_nickname.as_ref()
    }

    pub fn last_raised_step(&self) -> Chips {
        self.last_raised_step
    }

    pub fn uncommitted_posted_by(&self, nickname: &Nickname) -> Chips {
        self.uncommitted.amount_posted_by(nickname)
    }

    pub fn uncommitted_max_posted_not_by(&self, nickname: &Nickname) -> Chips {
        self.uncommitted.max_amount_posted_not_by(nickname)
    }

    /// Принимал ли игрок решение в текущем раунде.
    pub fn has_acted(&self, nickname: &Nickname) -> bool {
        self.acted.contains_key(nickname)
    }

    /// Ставка раунда, которую игрок закрыл своим последним решением.
    pub fn level_when_acted(&self, nickname: &Nickname) -> Option<Chips> {
        self.acted.get(nickname).copied()
    }

    pub fn post_ante(&mut self, amount: Chips) {
        self.ante += amount;
    }

    pub fn post_blind(&mut self, nickname: &Nickname, amount: Chips) {
        self.uncommitted = self.uncommitted.post(nickname, amount);
        self.last_posted_nickname = Some(nickname.clone());
        self.last_raised_nickname = Some(nickname.clone());

        // Малый блайнд больше шага не двигает, а вот нестандартный большой — да.
        if amount > self.last_raised_step {
            self.last_raised_step = amount;
        }
    }

    pub fn post_bet(&mut self, nickname: &Nickname, amount: Chips) {
        let player_total = amount + self.uncommitted.amount_posted_by(nickname);
        let others_max = self.uncommitted.max_amount_posted_not_by(nickname);

        self.uncommitted = self.uncommitted.post(nickname, amount);
        self.last_posted_nickname = Some(nickname.clone());
        self.acted.insert(nickname.clone(), player_total.max(others_max));

        // Только полный рейз переоткрывает торговлю.
        if player_total >= others_max + self.last_raised_step {
            self.last_raised_nickname = Some(nickname.clone());
            self.last_raised_step = player_total.saturating_sub(others_max);
        }
    }

    pub fn refund_bet(&mut self, nickname: &Nickname, amount: Chips) -> Result<(), EngineError> {
        self.uncommitted = self.uncommitted.refund(nickname, amount)?;
        Ok(())
    }

    /// Закрыть раунд: ставки раунда уходят в committed, отслеживание рейзов сбрасывается.
    /// Повторный вызов без новых ставок ничего не меняет.
    pub fn commit_bets(&mut self) {
        self.last_posted_nickname = None;
        self.last_raised_nickname = None;
        self.last_raised_step = self.min_bet;
        self.acted.clear();

        if !self.uncommitted.is_empty() {
            self.committed = self.committed.merge(&self.uncommitted);
            self.uncommitted = Bets::new();
        }
    }

    /// Если единственный лидер раунда поставил больше, чем кто-либо смог уравнять,
    /// излишек возвращается ему.
    pub fn calculate_refund(&self) -> Option<(Nickname, Chips)> {
        let nickname = self.uncommitted.nickname_posted_max()?;
        let max_amount = self.uncommitted.amount_posted_by(nickname);
        let second_amount = self.uncommitted.max_amount_posted_not_by(nickname);

        if max_amount > second_amount {
            Some((nickname.clone(), max_amount.saturating_sub(second_amount)))
        } else {
            None
        }
    }

    /// Слои банка для живых игроков `live`.
    pub fn calculate_side_pots(&self, live: &BTreeSet<Nickname>) -> Vec<SidePot> {
        let contributions = self.committed.merge(&self.uncommitted);
        calculate_side_pots(&contributions, self.ante, live)
    }

    /// Забрать из банка фишки выигранного слоя.
    pub fn award(&mut self, side_pot: &SidePot) -> Result<(), EngineError> {
        self.ante = self.ante.try_sub(side_pot.ante)?;

        for (nickname, amount) in side_pot.bets.iter() {
            let from_committed = self.committed.amount_posted_by(nickname).min(amount);
            let from_uncommitted = amount.try_sub(from_committed)?;
            self.committed = self.committed.refund(nickname, from_committed)?;
            self.uncommitted = self.uncommitted.refund(nickname, from_uncommitted)?;
        }
        Ok(())
    }

    pub fn snapshot(&self) -> PotSnapshot {
        PotSnapshot {
            ante: self.ante,
            committed: self.committed.clone(),
            uncommitted: self.uncommitted.clone(),
            total: self.total(),
            last_posted_nickname: self.last_posted_nickname.clone(),
            last_raised_nickname: self.last_raised_nickname.clone(),
            last_raised_step: self.last_raised_step,
        }
    }
}
