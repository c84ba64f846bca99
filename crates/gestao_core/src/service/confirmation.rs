//! Two-step delete confirmation.
//!
//! A delete starts with a `ConfirmationRequest`, which the UI presents in
//! whatever form it likes (modal, prompt, CLI question). The request is then
//! resolved with a `Decision`. Only `Decision::Confirmed` reaches the store.
//!
//! # Invariants
//! - A request holds its target's in-flight reservation until it is
//!   resolved or cancelled.
//! - A confirmed request only reaches the store while the professor who
//!   asked for it is still signed in.

use crate::model::atividade::AtividadeId;
use crate::model::turma::{ProfessorId, TurmaId};
use crate::service::in_flight::{InFlightKey, InFlightRegistry, InFlightTicket};
use log::info;

pub const DELETE_TURMA_PROMPT: &str = "Tem certeza que deseja excluir esta turma? Todas as atividades associadas também serão excluídas.";
pub const DELETE_ATIVIDADE_PROMPT: &str = "Tem certeza que deseja excluir esta atividade?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Turma {
        turma_id: TurmaId,
    },
    Atividade {
        atividade_id: AtividadeId,
        turma_id: TurmaId,
    },
}

impl DeleteTarget {
    pub(crate) fn in_flight_key(&self) -> InFlightKey {
        match self {
            Self::Turma { turma_id } => InFlightKey::Turma(turma_id.clone()),
            Self::Atividade { atividade_id, .. } => InFlightKey::Atividade(atividade_id.clone()),
        }
    }
}

/// Pending delete awaiting a user decision.
///
/// Consumed on resolution, so one request cannot trigger two deletes.
/// A request that is neither resolved nor cancelled keeps its target
/// locked until `ClientState::reset`.
#[must_use = "resolve or cancel the request to release its reservation"]
#[derive(Debug, PartialEq, Eq)]
pub struct ConfirmationRequest {
    target: DeleteTarget,
    ticket: InFlightTicket,
    requested_by: ProfessorId,
}

impl ConfirmationRequest {
    pub(crate) fn new(
        target: DeleteTarget,
        ticket: InFlightTicket,
        requested_by: impl Into<ProfessorId>,
    ) -> Self {
        Self {
            target,
            ticket,
            requested_by: requested_by.into(),
        }
    }

    pub fn target(&self) -> &DeleteTarget {
        &self.target
    }

    /// Question to show the user.
    pub fn prompt(&self) -> &'static str {
        match self.target {
            DeleteTarget::Turma { .. } => DELETE_TURMA_PROMPT,
            DeleteTarget::Atividade { .. } => DELETE_ATIVIDADE_PROMPT,
        }
    }

    /// Professor who was signed in when the delete was requested.
    pub fn requested_by(&self) -> &str {
        &self.requested_by
    }

    /// Drops the request without asking the user, releasing its target.
    pub fn cancel(self, in_flight: &mut InFlightRegistry) -> DeleteOutcome {
        in_flight.release(&self.ticket);
        info!(
            "event=delete_cancel module=lifecycle status=aborted target={}",
            self.ticket.key()
        );
        DeleteOutcome::Aborted
    }

    pub(crate) fn into_parts(self) -> (DeleteTarget, InFlightTicket, ProfessorId) {
        (self.target, self.ticket, self.requested_by)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirmed,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// User declined; nothing was sent to the store.
    Aborted,
}

/// Synchronous decision source for callers that can block on the user.
pub trait ConfirmationGate {
    fn decide(&mut self, request: &ConfirmationRequest) -> Decision;
}

impl<F> ConfirmationGate for F
where
    F: FnMut(&ConfirmationRequest) -> Decision,
{
    fn decide(&mut self, request: &ConfirmationRequest) -> Decision {
        self(request)
    }
}
