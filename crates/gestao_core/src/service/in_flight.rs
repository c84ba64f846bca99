//! Per-entity pending-operation markers.
//!
//! # Invariants
//! - At most one mutating operation per key is pending at a time.
//! - A pending delete confirmation holds its key until resolved or cancelled.
//! - Create forms hold a per-scope key while their submission runs.
//! - A ticket only releases the reservation it was issued for; a ticket
//!   outliving `clear` is inert.

use crate::model::atividade::AtividadeId;
use crate::model::turma::TurmaId;
use crate::service::error::{LifecycleError, LifecycleResult};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InFlightKey {
    /// The turma creation form.
    NewTurma,
    /// The atividade creation form scoped to one turma.
    NewAtividade(TurmaId),
    Turma(TurmaId),
    Atividade(AtividadeId),
}

impl Display for InFlightKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NewTurma => write!(f, "new turma"),
            Self::NewAtividade(turma_id) => write!(f, "new atividade in turma {turma_id}"),
            Self::Turma(turma_id) => write!(f, "turma {turma_id}"),
            Self::Atividade(atividade_id) => write!(f, "atividade {atividade_id}"),
        }
    }
}

/// Proof of one reservation, handed back to `release`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InFlightTicket {
    key: InFlightKey,
    serial: u64,
}

impl InFlightTicket {
    pub fn key(&self) -> &InFlightKey {
        &self.key
    }
}

#[derive(Debug, Default)]
pub struct InFlightRegistry {
    pending: BTreeMap<InFlightKey, u64>,
    next_serial: u64,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` pending, rejecting a duplicate.
    pub fn try_begin(&mut self, key: InFlightKey) -> LifecycleResult<InFlightTicket> {
        if self.pending.contains_key(&key) {
            return Err(LifecycleError::AlreadyInFlight(key));
        }
        self.next_serial += 1;
        self.pending.insert(key.clone(), self.next_serial);
        Ok(InFlightTicket {
            key,
            serial: self.next_serial,
        })
    }

    /// Ends the reservation behind `ticket`.
    ///
    /// Returns `false` when the key is idle or reserved by a newer ticket.
    pub fn release(&mut self, ticket: &InFlightTicket) -> bool {
        match self.pending.get(&ticket.key) {
            Some(serial) if *serial == ticket.serial => {
                self.pending.remove(&ticket.key);
                true
            }
            _ => false,
        }
    }

    /// Drops every reservation.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, key: &InFlightKey) -> bool {
        self.pending.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
