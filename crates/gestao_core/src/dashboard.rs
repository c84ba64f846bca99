//! Dashboard orchestration: the single entry point views talk to.
//!
//! # Responsibility
//! - Own the store handle, the session and the `ClientState`.
//! - Run the control flow form → validator → lifecycle → store → cache
//!   invalidation → selection reconciliation.
//! - Gate every query and mutation on an authenticated session.
//!
//! # Invariants
//! - The atividades query is only issued for a turma id present in the
//!   latest turma list.
//! - Without a signed-in professor, reads return empty lists and issue no
//!   store query.

use crate::form::{validate_atividade_form, validate_turma_form, AtividadeForm, TurmaForm};
use crate::model::atividade::{Atividade, AtividadeStatus};
use crate::model::turma::Turma;
use crate::selection::Selection;
use crate::service::atividade_lifecycle::AtividadeLifecycle;
use crate::service::confirmation::{
    ConfirmationRequest, Decision, DeleteOutcome, DeleteTarget,
};
use crate::service::error::LifecycleResult;
use crate::service::turma_lifecycle::TurmaLifecycle;
use crate::session::Session;
use crate::state::ClientState;
use crate::store::RecordStore;
use log::{debug, info};

/// Header counters shown above the turma and atividade tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    /// Greeting name: the profile name, else the session's user id.
    pub professor_nome: Option<String>,
    pub total_turmas: usize,
    /// Name of the selected turma, used as the atividades tab label.
    pub selected_turma_nome: Option<String>,
    /// Pending atividades of the selected turma.
    pub atividades_pendentes: Option<usize>,
}

pub struct Dashboard<S: RecordStore, P: Session> {
    store: S,
    session: P,
    state: ClientState,
}

impl<S: RecordStore, P: Session> Dashboard<S, P> {
    pub fn new(store: S, session: P) -> Self {
        Self {
            store,
            session,
            state: ClientState::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn session(&self) -> &P {
        &self.session
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn selection(&self) -> &Selection {
        self.state.selection.state()
    }

    /// Turma list, newest first. Reconciles selection with the result.
    pub fn turmas(&mut self) -> LifecycleResult<Vec<Turma>> {
        if !self.session.is_authenticated() {
            return Ok(Vec::new());
        }
        let turmas = self.state.cache.turmas(&self.store)?.to_vec();
        self.state.selection.reconcile(&turmas);
        Ok(turmas)
    }

    pub fn select_turma(&mut self, turma_id: &str) {
        self.state.selection.select(turma_id);
    }

    pub fn clear_selection(&mut self) {
        self.state.selection.clear();
    }

    /// Selected turma as last listed, without querying the store.
    pub fn selected_turma(&self) -> Option<&Turma> {
        let selected = self.state.selection.selected_id()?;
        self.state
            .cache
            .last_turmas()?
            .iter()
            .find(|turma| turma.id == selected)
    }

    /// Atividades of the selected turma; empty when nothing is selected.
    ///
    /// The turma list is refreshed first (read-through), so a selection
    /// whose turma vanished is cleared before any atividades query.
    pub fn atividades(&mut self) -> LifecycleResult<Vec<Atividade>> {
        let turmas = self.turmas()?;
        let Some(turma_id) = self.state.selection.active_turma_id(&turmas) else {
            return Ok(Vec::new());
        };
        Ok(self.state.cache.atividades(&self.store, &turma_id)?.to_vec())
    }

    pub fn summary(&mut self) -> LifecycleResult<DashboardSummary> {
        let turmas = self.turmas()?;
        let atividades_pendentes = match self.state.selection.selected_id() {
            Some(_) => Some(
                self.atividades()?
                    .iter()
                    .filter(|atividade| atividade.status == AtividadeStatus::Pendente)
                    .count(),
            ),
            None => None,
        };
        let professor_nome = self
            .session
            .display_name()
            .or_else(|| self.session.user_id())
            .map(str::to_string);
        Ok(DashboardSummary {
            professor_nome,
            total_turmas: turmas.len(),
            selected_turma_nome: self.selected_turma().map(|turma| turma.nome.clone()),
            atividades_pendentes,
        })
    }

    pub fn create_turma(&mut self, form: &TurmaForm) -> LifecycleResult<Turma> {
        let result: LifecycleResult<Turma> = validate_turma_form(form)
            .map_err(Into::into)
            .and_then(|draft| {
                TurmaLifecycle::new(&self.store).create(&mut self.state, &self.session, &draft)
            });
        traced("turma_create", result)
    }

    pub fn create_atividade(
        &mut self,
        turma_id: &str,
        form: &AtividadeForm,
    ) -> LifecycleResult<Atividade> {
        let result: LifecycleResult<Atividade> = validate_atividade_form(form)
            .map_err(Into::into)
            .and_then(|draft| {
                AtividadeLifecycle::new(&self.store).create(
                    &mut self.state,
                    &self.session,
                    turma_id,
                    &draft,
                )
            });
        traced("atividade_create", result)
    }

    pub fn update_atividade(
        &mut self,
        atividade_id: &str,
        form: &AtividadeForm,
    ) -> LifecycleResult<Atividade> {
        let result: LifecycleResult<Atividade> = validate_atividade_form(form)
            .map_err(Into::into)
            .and_then(|draft| {
                AtividadeLifecycle::new(&self.store).update(
                    &mut self.state,
                    &self.session,
                    atividade_id,
                    &draft,
                )
            });
        traced("atividade_update", result)
    }

    pub fn request_delete_turma(&mut self, turma_id: &str) -> LifecycleResult<ConfirmationRequest> {
        TurmaLifecycle::new(&self.store).request_delete(&mut self.state, &self.session, turma_id)
    }

    pub fn request_delete_atividade(
        &mut self,
        atividade_id: &str,
        turma_id: &str,
    ) -> LifecycleResult<ConfirmationRequest> {
        AtividadeLifecycle::new(&self.store).request_delete(
            &mut self.state,
            &self.session,
            atividade_id,
            turma_id,
        )
    }

    /// Applies the user's answer to a pending delete of either kind.
    ///
    /// A confirmation is refused with `NotAuthenticated` once the professor
    /// who requested it has signed out.
    pub fn resolve_delete(
        &mut self,
        request: ConfirmationRequest,
        decision: Decision,
    ) -> LifecycleResult<DeleteOutcome> {
        let result = match request.target() {
            DeleteTarget::Turma { .. } => TurmaLifecycle::new(&self.store).resolve_delete(
                &mut self.state,
                &self.session,
                request,
                decision,
            ),
            DeleteTarget::Atividade { .. } => AtividadeLifecycle::new(&self.store)
                .resolve_delete(&mut self.state, &self.session, request, decision),
        };
        traced("delete", result)
    }

    /// Abandons a pending delete without a decision, e.g. when its dialog is
    /// dismissed, so the target can be deleted or edited again.
    pub fn cancel_delete(&mut self, request: ConfirmationRequest) -> DeleteOutcome {
        request.cancel(&mut self.state.in_flight)
    }

    /// Drops all client state, including pending delete reservations, then
    /// signs out of the session.
    pub fn sign_out(&mut self) {
        self.state.reset();
        self.session.sign_out();
        info!("event=sign_out module=dashboard status=ok");
    }
}

fn traced<T>(event: &'static str, result: LifecycleResult<T>) -> LifecycleResult<T> {
    if let Err(err) = &result {
        debug!("event={event} module=dashboard status=rejected error_code={}", err.code());
    }
    result
}
