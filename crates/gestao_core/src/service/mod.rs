//! Lifecycle use-cases over the record store.
//!
//! # Responsibility
//! - Turn validated drafts and confirmed deletes into store calls.
//! - Keep cache and selection consistent with each successful mutation.
//!
//! # Invariants
//! - Exactly one store attempt per user action; no retries.
//! - A failed operation leaves `ClientState` as it was.
//! - Two operations on the same identifier never overlap.

pub mod atividade_lifecycle;
pub mod confirmation;
pub mod error;
pub mod in_flight;
pub mod notice;
pub mod turma_lifecycle;
