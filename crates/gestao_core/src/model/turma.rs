//! Turma (class group) domain model.
//!
//! # Responsibility
//! - Define the stored turma record and the validated create draft.
//!
//! # Invariants
//! - `nome` is never blank.
//! - `ano_letivo` stays within `[ANO_LETIVO_MIN, ANO_LETIVO_MAX]`.
//! - Turmas are immutable after creation; there is no update draft.

use crate::model::validation::{FieldError, FieldRejection, ValidationError};
use serde::{Deserialize, Serialize};

/// Opaque identifier assigned by the record store.
pub type TurmaId = String;

/// Identifier of the authenticated professor that owns a turma.
pub type ProfessorId = String;

pub const ANO_LETIVO_MIN: i32 = 2020;
pub const ANO_LETIVO_MAX: i32 = 2030;

/// Stored turma record as returned by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turma {
    pub id: TurmaId,
    pub professor_id: ProfessorId,
    pub nome: String,
    /// Grade level, e.g. "9º ano".
    pub serie: Option<String>,
    pub ano_letivo: i32,
    pub descricao: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Validated input for creating a turma.
///
/// The owner is not part of the draft; it is attached from the session at
/// submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurmaDraft {
    pub nome: String,
    pub serie: Option<String>,
    pub ano_letivo: i32,
    pub descricao: Option<String>,
}

impl TurmaDraft {
    pub fn new(nome: impl Into<String>, ano_letivo: i32) -> Self {
        Self {
            nome: nome.into(),
            serie: None,
            ano_letivo,
            descricao: None,
        }
    }

    pub fn with_serie(mut self, serie: impl Into<String>) -> Self {
        self.serie = Some(serie.into());
        self
    }

    pub fn with_descricao(mut self, descricao: impl Into<String>) -> Self {
        self.descricao = Some(descricao.into());
        self
    }

    /// Re-checks draft invariants.
    ///
    /// Drafts built by the form validator always pass; this guards drafts
    /// assembled by hand before they reach the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut fields = Vec::new();
        if self.nome.trim().is_empty() {
            fields.push(FieldError {
                field: "nome",
                reason: FieldRejection::Required,
            });
        }
        if !ano_letivo_in_range(self.ano_letivo) {
            fields.push(FieldError {
                field: "ano_letivo",
                reason: FieldRejection::OutOfRange {
                    min: ANO_LETIVO_MIN,
                    max: ANO_LETIVO_MAX,
                },
            });
        }
        ValidationError::from_fields(fields)
    }
}

pub fn ano_letivo_in_range(value: i32) -> bool {
    (ANO_LETIVO_MIN..=ANO_LETIVO_MAX).contains(&value)
}
