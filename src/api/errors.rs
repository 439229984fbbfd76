use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::HandId;
use crate::engine::EngineError;
use crate::infra::StoreError;

/// Ошибки внешнего API (то, что отдаём клиенту).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Неправильные входные данные (ник, игра, места, состав стола).
    #[error("некорректный запрос: {0}")]
    BadRequest(String),

    /// Раздачи с таким ID нет (404).
    #[error("раздача {0} не найдена")]
    NotFound(HandId),

    /// Действие не соответствует предложенному игроку решению.
    #[error("недопустимое действие: {0}")]
    IllegalAction(String),

    /// Остальные ошибки движка.
    #[error("ошибка движка: {0}")]
    Engine(String),

    #[error("ошибка хранилища: {0}")]
    Storage(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::IllegalAction { .. } => ApiError::IllegalAction(err.to_string()),
            EngineError::InvalidNickname(_)
            | EngineError::InvalidSeat(_)
            | EngineError::UnknownGame(_)
            | EngineError::InvalidRules(_)
            | EngineError::InvalidPositions(_)
            | EngineError::SeatOutOfRange { .. }
            | EngineError::DuplicateSeat(_)
            | EngineError::DuplicateNickname(_)
            | EngineError::NotEnoughPlayers(_)
            | EngineError::EmptyBigBlindSeat(_)
            | EngineError::EmptyStack(_) => ApiError::BadRequest(err.to_string()),
            other => ApiError::Engine(other.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::NotFound(id),
            StoreError::Codec(e) => ApiError::Storage(e.to_string()),
        }
    }
}
