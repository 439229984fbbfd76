use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Card, CardSet, Chips, Game, Nickname, Seat};

/// Почему действие игрока отклонено.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum IllegalActionReason {
    NotYourTurn,
    NoDecisionExpected,
    CheckNotAvailable,
    CallNotAvailable,
    RaiseNotAvailable,
    RaiseBelowMinimum,
    RaiseAboveMaximum,
    AlreadyConnected,
    AlreadyDisconnected,
}

impl fmt::Display for IllegalActionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IllegalActionReason::NotYourTurn => "сейчас ход другого игрока",
            IllegalActionReason::NoDecisionExpected => "решение сейчас не ожидается",
            IllegalActionReason::CheckNotAvailable => "есть ставка, которую нужно уравнять",
            IllegalActionReason::CallNotAvailable => "нет ставки для уравнивания",
            IllegalActionReason::RaiseNotAvailable => "рейз недоступен",
            IllegalActionReason::RaiseBelowMinimum => "рейз меньше минимального",
            IllegalActionReason::RaiseAboveMaximum => "рейз больше максимального",
            IllegalActionReason::AlreadyConnected => "игрок уже подключён",
            IllegalActionReason::AlreadyDisconnected => "игрок уже отключён",
        };
        f.write_str(text)
    }
}

/// Ошибки движка раздачи.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    // ===== Конфигурация =====
    #[error("Игра {0} не поддерживается")]
    UnsupportedGame(Game),

    #[error("Неизвестная игра: {0}")]
    UnknownGame(String),

    #[error("Некорректная история событий: {0}")]
    InvalidReplay(&'static str),

    #[error("Некорректные правила: {0}")]
    InvalidRules(&'static str),

    #[error("Некорректные позиции: {0}")]
    InvalidPositions(&'static str),

    // ===== Инварианты =====
    #[error("Некорректный ник: {0:?}")]
    InvalidNickname(String),

    #[error("Некорректный номер места: {0}")]
    InvalidSeat(u8),

    #[error("Место {seat} вне стола (максимум {max_seat})")]
    SeatOutOfRange { seat: Seat, max_seat: Seat },

    #[error("Место {0} занято дважды")]
    DuplicateSeat(Seat),

    #[error("Ник {0} встречается дважды")]
    DuplicateNickname(Nickname),

    #[error("Для раздачи нужно минимум 2 игрока, есть {0}")]
    NotEnoughPlayers(usize),

    #[error("На месте большого блайнда {0} никого нет")]
    EmptyBigBlindSeat(Seat),

    #[error("У игрока {0} пустой стек")]
    EmptyStack(Nickname),

    #[error("Некорректная карта: {0:?}")]
    InvalidCard(String),

    #[error("Карта {0} повторяется")]
    DuplicateCard(Card),

    #[error("Карт {0} нет в колоде")]
    CardsNotInDeck(CardSet),

    #[error("В колоде {available} карт, запрошено {requested}")]
    NotEnoughCards { requested: usize, available: usize },

    #[error("Фишки не могут уйти в минус: {minuend} - {subtrahend}")]
    NegativeChips { minuend: Chips, subtrahend: Chips },

    #[error("Нельзя вернуть {nickname} {amount}: поставлено только {posted}")]
    RefundExceedsPosted {
        nickname: Nickname,
        posted: Chips,
        amount: Chips,
    },

    #[error("Игрок {0} не найден за столом")]
    PlayerNotFound(Nickname),

    // ===== Охрана игрока =====
    #[error("Игрок {0} отключён")]
    PlayerDisconnected(Nickname),

    #[error("Игрок {0} уже сфолдил")]
    PlayerAlreadyFolded(Nickname),

    #[error("Игрок {0} уже в олл-ине")]
    PlayerAlreadyAllIn(Nickname),

    #[error("У игрока {nickname} стек {stack}, не хватает на {amount}")]
    InsufficientStack {
        nickname: Nickname,
        stack: Chips,
        amount: Chips,
    },

    // ===== Действия =====
    #[error("Недопустимое действие игрока {nickname}: {reason}")]
    IllegalAction {
        nickname: Nickname,
        reason: IllegalActionReason,
    },

    // ===== Жизненный цикл =====
    #[error("Раздача уже началась")]
    HandAlreadyStarted,

    #[error("Раздача ещё не началась")]
    HandNotStarted,

    #[error("Раздача уже завершена")]
    HandAlreadyFinished,
}

impl EngineError {
    pub fn illegal(nickname: &Nickname, reason: IllegalActionReason) -> Self {
        EngineError::IllegalAction {
            nickname: nickname.clone(),
            reason,
        }
    }
}
