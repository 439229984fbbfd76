//! Движок одной покерной раздачи на событиях.
//!
//! Раздача хранится только как упорядоченный список событий. Любая команда
//! восстанавливает `Hand` реплеем истории, выполняет одну мутацию и отдаёт
//! новые события на запись.
//!
//! Слои:
//! - `domain` — фишки, места, ники, карты, игроки, стол;
//! - `engine` — банк, ставки, стадии, агрегат `Hand`;
//! - `eval` — оценка силы рук;
//! - `infra` — RNG, ID, хранилище событий;
//! - `api` — команды и запросы поверх хранилища.

pub mod api;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;
