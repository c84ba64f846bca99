//! Turma create/delete use-cases.
//!
//! # Responsibility
//! - Submit turma drafts with the acting professor attached as owner.
//! - Run confirmed deletes and apply their cache/selection consequences.
//!
//! # Invariants
//! - Success invalidates `QueryKey::Turmas` before returning.
//! - A deleted turma's atividades key is abandoned, not re-fetched.
//! - Deleting the selected turma clears selection.
//! - A confirmed delete needs the requesting professor still signed in.
//! - Failures leave cache and selection untouched; no retry is attempted.
//! - Turmas have no update path.

use crate::cache::QueryKey;
use crate::model::turma::{Turma, TurmaDraft};
use crate::service::confirmation::{
    ConfirmationGate, ConfirmationRequest, Decision, DeleteOutcome, DeleteTarget,
};
use crate::service::error::{LifecycleError, LifecycleResult};
use crate::service::in_flight::InFlightKey;
use crate::session::Session;
use crate::state::ClientState;
use crate::store::{NewTurma, RecordStore};
use log::{info, warn};
use std::time::Instant;

pub struct TurmaLifecycle<'s, S: RecordStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: RecordStore + ?Sized> TurmaLifecycle<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Creates a turma owned by the session's professor.
    ///
    /// # Errors
    /// - `Validation` when the draft breaks turma invariants.
    /// - `NotAuthenticated` without a signed-in professor.
    /// - `AlreadyInFlight` while another turma submission is pending.
    /// - `Remote` with the store's message; the draft may be resubmitted.
    pub fn create(
        &self,
        state: &mut ClientState,
        session: &dyn Session,
        draft: &TurmaDraft,
    ) -> LifecycleResult<Turma> {
        draft.validate()?;
        let owner = session.user_id().ok_or(LifecycleError::NotAuthenticated)?;

        let ticket = state.in_flight.try_begin(InFlightKey::NewTurma)?;
        let started_at = Instant::now();
        let result = self.store.insert_turma(&NewTurma::from_draft(owner, draft));
        state.in_flight.release(&ticket);

        match result {
            Ok(turma) => {
                state.cache.invalidate(&QueryKey::Turmas);
                info!(
                    "event=turma_create module=lifecycle status=ok turma_id={} duration_ms={}",
                    turma.id,
                    started_at.elapsed().as_millis()
                );
                Ok(turma)
            }
            Err(err) => {
                warn!(
                    "event=turma_create module=lifecycle status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err.into())
            }
        }
    }

    /// First step of a delete: reserves the turma and returns the question
    /// to put to the user.
    pub fn request_delete(
        &self,
        state: &mut ClientState,
        session: &dyn Session,
        turma_id: &str,
    ) -> LifecycleResult<ConfirmationRequest> {
        let requested_by = session.user_id().ok_or(LifecycleError::NotAuthenticated)?;
        let target = DeleteTarget::Turma {
            turma_id: turma_id.to_string(),
        };
        let ticket = state.in_flight.try_begin(target.in_flight_key())?;
        Ok(ConfirmationRequest::new(target, ticket, requested_by))
    }

    /// Second step of a delete: applies the user's decision.
    ///
    /// # Errors
    /// - `ConfirmationMismatch` for an atividade request.
    /// - `NotAuthenticated` when confirmed after the requesting professor
    ///   signed out or was replaced.
    /// - `Remote` with the store's message.
    pub fn resolve_delete(
        &self,
        state: &mut ClientState,
        session: &dyn Session,
        request: ConfirmationRequest,
        decision: Decision,
    ) -> LifecycleResult<DeleteOutcome> {
        let (target, ticket, requested_by) = request.into_parts();
        let DeleteTarget::Turma { turma_id } = target else {
            state.in_flight.release(&ticket);
            return Err(LifecycleError::ConfirmationMismatch);
        };

        if decision == Decision::Declined {
            state.in_flight.release(&ticket);
            info!("event=turma_delete module=lifecycle status=aborted turma_id={turma_id}");
            return Ok(DeleteOutcome::Aborted);
        }

        if session.user_id() != Some(requested_by.as_str()) {
            state.in_flight.release(&ticket);
            warn!("event=turma_delete module=lifecycle status=rejected turma_id={turma_id} reason=session_changed");
            return Err(LifecycleError::NotAuthenticated);
        }

        let started_at = Instant::now();
        let result = self.store.delete_turma(&turma_id);
        state.in_flight.release(&ticket);

        match result {
            Ok(()) => {
                state.cache.invalidate(&QueryKey::Turmas);
                state
                    .cache
                    .abandon(&QueryKey::Atividades(turma_id.clone()));
                if state.selection.is_selected(&turma_id) {
                    state.selection.clear();
                }
                info!(
                    "event=turma_delete module=lifecycle status=ok turma_id={turma_id} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => {
                warn!(
                    "event=turma_delete module=lifecycle status=error turma_id={turma_id} duration_ms={} error={err}",
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
        turma_id: &str,
        gate: &mut dyn ConfirmationGate,
    ) -> LifecycleResult<DeleteOutcome> {
        let request = self.request_delete(state, session, turma_id)?;
        let decision = gate.decide(&request);
        self.resolve_delete(state, session, request, decision)
    }
}
