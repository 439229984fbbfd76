use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::HandId;
use crate::engine::{Evaluator, Hand, Randomizer};
use crate::infra::EventStore;

use super::dto::HandStateDto;
use super::errors::ApiError;

/// Запрос "только чтение": состояние раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GetHandQuery {
    pub hand_id: HandId,
}

/// Реплей карты не тянет: колода восстанавливается из событий раздачи.
struct NoDraws;

impl Randomizer for NoDraws {
    fn next(&mut self, _max_inclusive: usize) -> usize {
        0
    }
}

/// Восстановить раздачу из истории и собрать DTO.
pub fn get_hand<S, E>(store: &S, evaluator: &E, query: GetHandQuery) -> Result<HandStateDto, ApiError>
where
    S: EventStore,
    E: Evaluator,
{
    let history = store.get_events(query.hand_id)?;
    debug!(hand_id = query.hand_id, events = history.len(), "запрос состояния");

    let hand = Hand::from_events(query.hand_id, &history, NoDraws, evaluator)?;
    let decision = hand.pending_decision()?;
    Ok(HandStateDto::from_state(&hand.get_state(), decision))
}
