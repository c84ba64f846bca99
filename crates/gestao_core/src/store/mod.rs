//! Record store contract.
//!
//! # Responsibility
//! - Define the collection-level operations the core issues against the
//!   remote store.
//! - Carry every store failure as one opaque `RemoteError`.
//!
//! # Invariants
//! - `select_*` results are ordered newest first by `created_at`.
//! - `select_turmas` is scoped by the store's own access policy; the core
//!   never re-filters by owner.
//! - `select_atividades` always filters by exact parent turma id.
//! - Deleting a turma removes its atividades (store-side cascade).
//!
//! # See also
//! - `sqlite_store` for the reference implementation.

mod sqlite_store;

pub use sqlite_store::SqliteRecordStore;

use crate::model::atividade::{Atividade, AtividadeDraft};
use crate::model::turma::{ProfessorId, Turma, TurmaDraft};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, RemoteError>;

/// Named remote collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Turmas,
    Atividades,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Turmas => "turmas",
            Self::Atividades => "atividades",
        }
    }
}

/// Any failure reported by the record store.
///
/// Network failures, constraint violations and authorization denials are not
/// told apart; the message is surfaced to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    collection: Collection,
    message: String,
}

impl RemoteError {
    pub fn new(collection: Collection, message: impl Into<String>) -> Self {
        Self {
            collection,
            message: message.into(),
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// Human-readable store message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for RemoteError {}

/// Insert payload for the turmas collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTurma {
    pub professor_id: ProfessorId,
    pub nome: String,
    pub serie: Option<String>,
    pub ano_letivo: i32,
    pub descricao: Option<String>,
}

impl NewTurma {
    /// Attaches the acting professor as owner of a draft.
    pub fn from_draft(professor_id: impl Into<ProfessorId>, draft: &TurmaDraft) -> Self {
        Self {
            professor_id: professor_id.into(),
            nome: draft.nome.clone(),
            serie: draft.serie.clone(),
            ano_letivo: draft.ano_letivo,
            descricao: draft.descricao.clone(),
        }
    }
}

/// Collection-level operations against the remote store.
pub trait RecordStore {
    /// Lists turmas visible to the session, newest first.
    fn select_turmas(&self) -> StoreResult<Vec<Turma>>;
    fn insert_turma(&self, record: &NewTurma) -> StoreResult<Turma>;
    /// Deletes a turma and, through the store cascade, its atividades.
    fn delete_turma(&self, turma_id: &str) -> StoreResult<()>;

    /// Lists atividades whose parent is exactly `turma_id`, newest first.
    fn select_atividades(&self, turma_id: &str) -> StoreResult<Vec<Atividade>>;
    fn insert_atividade(&self, turma_id: &str, fields: &AtividadeDraft)
        -> StoreResult<Atividade>;
    /// Replaces every editable field of one atividade.
    fn update_atividade(&self, atividade_id: &str, fields: &AtividadeDraft)
        -> StoreResult<Atividade>;
    fn delete_atividade(&self, atividade_id: &str) -> StoreResult<()>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn select_turmas(&self) -> StoreResult<Vec<Turma>> {
        (**self).select_turmas()
    }

    fn insert_turma(&self, record: &NewTurma) -> StoreResult<Turma> {
        (**self).insert_turma(record)
    }

    fn delete_turma(&self, turma_id: &str) -> StoreResult<()> {
        (**self).delete_turma(turma_id)
    }

    fn select_atividades(&self, turma_id: &str) -> StoreResult<Vec<Atividade>> {
        (**self).select_atividades(turma_id)
    }

    fn insert_atividade(
        &self,
        turma_id: &str,
        fields: &AtividadeDraft,
    ) -> StoreResult<Atividade> {
        (**self).insert_atividade(turma_id, fields)
    }

    fn update_atividade(
        &self,
        atividade_id: &str,
        fields: &AtividadeDraft,
    ) -> StoreResult<Atividade> {
        (**self).update_atividade(atividade_id, fields)
    }

    fn delete_atividade(&self, atividade_id: &str) -> StoreResult<()> {
        (**self).delete_atividade(atividade_id)
    }
}
