//! Atividade create/update/delete use-cases scoped to a parent turma.
//!
//! # Responsibility
//! - Submit atividade drafts under a caller-supplied turma id.
//! - Apply full-replace updates.
//! - Run confirmed deletes.
//!
//! # Invariants
//! - The parent turma id is always supplied by the caller, never inferred
//!   from selection.
//! - Success invalidates the owning turma's `QueryKey::Atividades` key
//!   before returning.
//! - One store attempt per call; failures leave state untouched.
//! - A confirmed delete needs the requesting professor still signed in.

use crate::cache::QueryKey;
use crate::model::atividade::{Atividade, AtividadeDraft};
use crate::service::confirmation::{
    ConfirmationGate, ConfirmationRequest, Decision, DeleteOutcome, DeleteTarget,
};
use crate::service::error::{LifecycleError, LifecycleResult};
use crate::service::in_flight::InFlightKey;
use crate::session::Session;
use crate::state::ClientState;
use crate::store::RecordStore;
use log::{info, warn};
use std::time::Instant;

pub struct AtividadeLifecycle<'s, S: RecordStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: RecordStore + ?Sized> AtividadeLifecycle<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Creates an atividade inside `turma_id`.
    pub fn create(
        &self,
        state: &mut ClientState,
        session: &dyn Session,
        turma_id: &str,
        draft: &AtividadeDraft,
    ) -> LifecycleResult<Atividade> {
        draft.validate()?;
        require_session(session)?;

        let ticket = state
            .in_flight
            .try_begin(InFlightKey::NewAtividade(turma_id.to_string()))?;
        let started_at = Instant::now();
        let result = self.store.insert_atividade(turma_id, draft);
        state.in_flight.release(&ticket);

        match result {
            Ok(atividade) => {
                state
                    .cache
                    .invalidate(&QueryKey::Atividades(turma_id.to_string()));
                info!(
                    "event=atividade_create module=lifecycle status=ok turma_id={turma_id} atividade_id={} duration_ms={}",
                    atividade.id,
                    started_at.elapsed().as_millis()
                );
                Ok(atividade)
            }
            Err(err) => {
                warn!(
                    "event=atividade_create module=lifecycle status=error turma_id={turma_id} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err.into())
            }
        }
    }

    /// Replaces every editable field of `atividade_id` with `draft`.
    ///
    /// Optional fields that are `None` in the draft are cleared in the
    /// store; callers wanting merge semantics must start from the stored
    /// record.
    pub fn update(
        &self,
        state: &mut ClientState,
        session: &dyn Session,
        atividade_id: &str,
        draft: &AtividadeDraft,
    ) -> LifecycleResult<Atividade> {
        draft.validate()?;
        require_session(session)?;

        let ticket = state
            .in_flight
            .try_begin(InFlightKey::Atividade(atividade_id.to_string()))?;
        let started_at = Instant::now();
        let result = self.store.update_atividade(atividade_id, draft);
        state.in_flight.release(&ticket);

        match result {
            Ok(atividade) => {
                state
                    .cache
                    .invalidate(&QueryKey::Atividades(atividade.turma_id.clone()));
                info!(
                    "event=atividade_update module=lifecycle status=ok turma_id={} atividade_id={atividade_id} duration_ms={}",
                    atividade.turma_id,
                    started_at.elapsed().as_millis()
                );
                Ok(atividade)
            }
            Err(err) => {
                warn!(
                    "event=atividade_update module=lifecycle status=error atividade_id={atividade_id} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err.into())
            }
        }
    }

    /// First step of a delete.
    pub fn request_delete(
        &self,
        state: &mut ClientState,
        session: &dyn Session,
        atividade_id: &str,
        turma_id: &str,
    ) -> LifecycleResult<ConfirmationRequest> {
        let requested_by = session.user_id().ok_or(LifecycleError::NotAuthenticated)?;
        let target = DeleteTarget::Atividade {
            atividade_id: atividade_id.to_string(),
            turma_id: turma_id.to_string(),
        };
        let ticket = state.in_flight.try_begin(target.in_flight_key())?;
        Ok(ConfirmationRequest::new(target, ticket, requested_by))
    }

    /// Second step of a delete.
    ///
    /// Confirming after the requesting professor signed out is refused with
    /// `NotAuthenticated` and reaches no store.
    pub fn resolve_delete(
        &self,
        state: &mut ClientState,
        session: &dyn Session,
        request: ConfirmationRequest,
        decision: Decision,
    ) -> LifecycleResult<DeleteOutcome> {
        let (target, ticket, requested_by) = request.into_parts();
        let DeleteTarget::Atividade {
            atividade_id,
            turma_id,
        } = target
        else {
            state.in_flight.release(&ticket);
            return Err(LifecycleError::ConfirmationMismatch);
        };

        if decision == Decision::Declined {
            state.in_flight.release(&ticket);
            info!(
                "event=atividade_delete module=lifecycle status=aborted atividade_id={atividade_id}"
            );
            return Ok(DeleteOutcome::Aborted);
        }

        if session.user_id() != Some(requested_by.as_str()) {
            state.in_flight.release(&ticket);
            warn!("event=atividade_delete module=lifecycle status=rejected atividade_id={atividade_id} reason=session_changed");
            return Err(LifecycleError::NotAuthenticated);
        }

        let started_at = Instant::now();
        let result = self.store.delete_atividade(&atividade_id);
        state.in_flight.release(&ticket);

        match result {
            Ok(()) => {
                state.cache.invalidate(&QueryKey::Atividades(turma_id.clone()));
                info!(
                    "event=atividade_delete module=lifecycle status=ok turma_id={turma_id} atividade_id={atividade_id} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => {
                warn!(
                    "event=atividade_delete module=lifecycle status=error atividade_id={atividade_id} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err.into())
            }
        }
    }

    /// Both delete steps in one call, asking `gate` for the decision.
    pub fn delete(
        &self,
        state: &mut ClientState,
        session: &dyn Session,
        atividade_id: &str,
        turma_id: &str,
        gate: &mut dyn ConfirmationGate,
    ) -> LifecycleResult<DeleteOutcome> {
        let request = self.request_delete(state, session, atividade_id, turma_id)?;
        let decision = gate.decide(&request);
        self.resolve_delete(state, session, request, decision)
    }
}

fn require_session(session: &dyn Session) -> LifecycleResult<()> {
    if session.is_authenticated() {
        Ok(())
    } else {
        Err(LifecycleError::NotAuthenticated)
    }
}
