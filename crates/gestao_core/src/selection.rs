//! Selected-turma state machine.
//!
//! # Responsibility
//! - Track which turma the dependent atividade views are scoped to.
//! - Drop a selection whose turma is missing from the latest turma list.
//!
//! # Invariants
//! - Initial state is `NoneSelected`.
//! - `select` and `clear` are valid from any state; the latest call wins.
//! - Callers reconcile against the latest turma list before issuing any
//!   atividades query, so no query is ever scoped to a vanished turma.

use crate::model::turma::{Turma, TurmaId};
use log::info;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    NoneSelected,
    Selected(TurmaId),
}

/// Selected turma is absent from the latest turma list.
///
/// Never surfaced to users; `reconcile` resolves it by clearing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StaleSelectionError {
    pub(crate) turma_id: TurmaId,
}

impl Display for StaleSelectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "selected turma no longer exists: {}", self.turma_id)
    }
}

#[derive(Debug, Default)]
pub struct SelectionController {
    state: Selection,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Selection {
        &self.state
    }

    pub fn selected_id(&self) -> Option<&str> {
        match &self.state {
            Selection::Selected(turma_id) => Some(turma_id),
            Selection::NoneSelected => None,
        }
    }

    pub fn is_selected(&self, turma_id: &str) -> bool {
        self.selected_id() == Some(turma_id)
    }

    pub fn select(&mut self, turma_id: impl Into<TurmaId>) {
        self.state = Selection::Selected(turma_id.into());
    }

    pub fn clear(&mut self) {
        self.state = Selection::NoneSelected;
    }

    /// Returns the selected id when it is present in `latest`.
    pub(crate) fn check_live(&self, latest: &[Turma]) -> Result<Option<&str>, StaleSelectionError> {
        match self.selected_id() {
            None => Ok(None),
            Some(turma_id) if latest.iter().any(|turma| turma.id == turma_id) => Ok(Some(turma_id)),
            Some(turma_id) => Err(StaleSelectionError {
                turma_id: turma_id.to_string(),
            }),
        }
    }

    /// Clears a selection that is absent from `latest`.
    ///
    /// Returns the id that was dropped, if any.
    pub fn reconcile(&mut self, latest: &[Turma]) -> Option<TurmaId> {
        match self.check_live(latest) {
            Ok(_) => None,
            Err(stale) => {
                info!(
                    "event=selection_reconcile module=selection status=cleared turma_id={} reason=missing_from_turma_list",
                    stale.turma_id
                );
                self.clear();
                Some(stale.turma_id)
            }
        }
    }

    /// Reconciles against `latest`, then returns the live selected id.
    pub fn active_turma_id(&mut self, latest: &[Turma]) -> Option<TurmaId> {
        self.reconcile(latest);
        self.selected_id().map(str::to_string)
    }
}
