use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::{Chips, Nickname};
use crate::engine::bets::Bets;

/// Сайд-пот: слой банка, на который претендуют только `eligible`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidePot {
    pub eligible: BTreeSet<Nickname>,
    /// Чьи фишки лежат в этом слое.
    pub bets: Bets,
    pub ante: Chips,
}

impl SidePot {
    pub fn amount(&self) -> Chips {
        self.ante + self.bets.total()
    }
}

/// Разложить вклады игроков на слои сайд-потов.
///
/// Пока у живых игроков остаются фишки: берём минимальный ненулевой остаток живого
/// игрока (`edge`), каждый вкладчик отдаёт в слой `min(остаток, edge)`.
/// Претенденты слоя — его вкладчики из `live`. Мёртвые деньги идут в первый слой:
/// анте и фишки сфолдивших выше последнего живого уровня.
///
/// Сумма всех слоёв всегда равна `ante + contributions.total()`.
pub fn calculate_side_pots(
    contributions: &Bets,
    ante: Chips,
    live: &BTreeSet<Nickname>,
) -> Vec<SidePot> {
    let mut remaining: BTreeMap<Nickname, Chips> = contributions
        .iter()
        .filter(|(_, amount)| !amount.is_zero())
        .map(|(n, a)| (n.clone(), a))
        .collect();

    let mut pots: Vec<SidePot> = Vec::new();

    loop {
        let edge = remaining
            .iter()
            .filter(|(n, a)| live.contains(*n) && !a.is_zero())
            .map(|(_, a)| *a)
            .min();
        let Some(edge) = edge else {
            break;
        };

        let mut layer = Bets::new();
        for (nickname, amount) in remaining.iter_mut() {
            let give = (*amount).min(edge);
            if give.is_zero() {
                continue;
            }
            layer = layer.post(nickname, give);
            *amount = amount.saturating_sub(give);
        }

        let eligible = layer
            .nicknames()
            .filter(|n| live.contains(*n))
            .cloned()
            .collect();
        pots.push(SidePot {
            eligible,
            bets: layer,
            ante: Chips::ZERO,
        });
    }

    let leftover: Bets = remaining
        .into_iter()
        .filter(|(_, a)| !a.is_zero())
        .collect::<Vec<_>>()
        .into();

    if pots.is_empty() {
        if !leftover.is_empty() || !ante.is_zero() {
            pots.push(SidePot {
                eligible: live.clone(),
                bets: leftover,
                ante,
            });
        }
        return pots;
    }

    pots[0].ante = ante;
    pots[0].bets = pots[0].bets.merge(&leftover);

    pots
}
