use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::HandId;
use crate::engine::events::HandEvent;
use crate::infra::ids::IdGenerator;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("раздача {0} не найдена")]
    NotFound(HandId),

    #[error("ошибка кодирования событий: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Хранилище истории раздач.
///
/// История раздачи — упорядоченный список событий, только дописывается.
/// Пачка событий записывается целиком или не записывается вовсе.
pub trait EventStore {
    /// Вся история раздачи. `NotFound`, если такой раздачи нет.
    fn get_events(&self, id: HandId) -> Result<Vec<HandEvent>, StoreError>;

    /// Дописать пачку событий в конец истории.
    fn append_events(&mut self, id: HandId, events: &[HandEvent]) -> Result<(), StoreError>;

    /// Новый ID раздачи.
    fn next_id(&mut self) -> HandId;
}

impl<S: EventStore + ?Sized> EventStore for &mut S {
    fn get_events(&self, id: HandId) -> Result<Vec<HandEvent>, StoreError> {
        (**self).get_events(id)
    }

    fn append_events(&mut self, id: HandId, events: &[HandEvent]) -> Result<(), StoreError> {
        (**self).append_events(id, events)
    }

    fn next_id(&mut self) -> HandId {
        (**self).next_id()
    }
}

/// In-memory реализация для тестов и dev-CLI.
///
/// События хранятся JSON-строками: запись и чтение проходят ту же сериализацию,
/// что и в настоящем хранилище.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    hands: HashMap<HandId, Vec<String>>,
    ids: IdGenerator,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: HandId) -> bool {
        self.hands.contains_key(&id)
    }

    /// Сколько событий записано по раздаче.
    pub fn len(&self, id: HandId) -> usize {
        self.hands.get(&id).map_or(0, Vec::len)
    }
}

impl EventStore for InMemoryEventStore {
    fn get_events(&self, id: HandId) -> Result<Vec<HandEvent>, StoreError> {
        let encoded = self.hands.get(&id).ok_or(StoreError::NotFound(id))?;
        let events = encoded
            .iter()
            .map(|raw| serde_json::from_str(raw))
            .collect::<Result<Vec<HandEvent>, _>>()?;
        debug!(hand_id = id, events = events.len(), "история загружена");
        Ok(events)
    }

    fn append_events(&mut self, id: HandId, events: &[HandEvent]) -> Result<(), StoreError> {
        // Сначала кодируем всю пачку, потом пишем: при ошибке ничего не меняется.
        let encoded = events
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<String>, _>>()?;

        let history = self.hands.entry(id).or_default();
        history.extend(encoded);
        info!(hand_id = id, appended = events.len(), total = history.len(), "события записаны");
        Ok(())
    }

    fn next_id(&mut self) -> HandId {
        self.ids.next_hand_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_hand_is_not_found() {
        let store = InMemoryEventStore::new();
        assert!(matches!(store.get_events(7), Err(StoreError::NotFound(7))));
    }

    #[test]
    fn ids_are_monotonic() {
        let mut store = InMemoryEventStore::new();
        let a = store.next_id();
        let b = store.next_id();
        assert!(b > a);
    }

    #[test]
    fn appends_keep_order() {
        let mut store = InMemoryEventStore::new();
        store.append_events(1, &[HandEvent::HandStarted]).unwrap();
        store
            .append_events(1, &[HandEvent::StageStarted, HandEvent::HandFinished])
            .unwrap();
        assert_eq!(
            store.get_events(1).unwrap(),
            vec![HandEvent::HandStarted, HandEvent::StageStarted, HandEvent::HandFinished]
        );
        assert_eq!(store.len(1), 3);
    }
}
