//! Инфраструктурный слой вокруг движка:
//! - генерация ID;
//! - реализации `Randomizer`;
//! - хранилище событий (in-memory для тестов и dev-CLI).

pub mod ids;
pub mod persistence;
pub mod rng;

pub use ids::IdGenerator;
pub use persistence::{EventStore, InMemoryEventStore, StoreError};
pub use rng::{DeterministicRng, SystemRng};
