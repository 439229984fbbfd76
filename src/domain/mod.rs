//! Доменная модель раздачи: фишки, места, ники, карты, игроки, стол.

pub mod card;
pub mod card_set;
pub mod chips;
pub mod combo;
pub mod deck;
pub mod hand;
pub mod nickname;
pub mod player;
pub mod seat;
pub mod table;

/// Идентификатор раздачи.
pub type HandId = u64;

// Удобные реэкспорты, чтобы в других модулях писать crate::domain::Card и т.п.
pub use card::*;
pub use card_set::*;
pub use chips::*;
pub use combo::*;
pub use deck::*;
pub use hand::*;
pub use nickname::*;
pub use player::*;
pub use seat::*;
pub use table::*;
