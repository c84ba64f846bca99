//! Atividade (assignment) domain model.
//!
//! # Responsibility
//! - Define the stored atividade record, its enumerations and the draft used
//!   by both create and update.
//!
//! # Invariants
//! - `titulo` is never blank.
//! - `nota_maxima`, when set, is finite and within `[0, NOTA_MAXIMA_LIMIT]`.
//! - An update draft replaces every field; `None` clears the stored value.

use crate::model::turma::TurmaId;
use crate::model::validation::{FieldError, FieldRejection, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Opaque identifier assigned by the record store.
pub type AtividadeId = String;

/// Conventional upper bound for `nota_maxima`.
pub const NOTA_MAXIMA_LIMIT: f64 = 100.0;

/// Kind of assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtividadeTipo {
    #[default]
    Exercicio,
    Prova,
    Projeto,
    Trabalho,
    Apresentacao,
    Seminario,
    Pesquisa,
    Outro,
}

impl AtividadeTipo {
    pub const ALL: [AtividadeTipo; 8] = [
        Self::Exercicio,
        Self::Prova,
        Self::Projeto,
        Self::Trabalho,
        Self::Apresentacao,
        Self::Seminario,
        Self::Pesquisa,
        Self::Outro,
    ];

    /// Stable storage/form value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exercicio => "exercicio",
            Self::Prova => "prova",
            Self::Projeto => "projeto",
            Self::Trabalho => "trabalho",
            Self::Apresentacao => "apresentacao",
            Self::Seminario => "seminario",
            Self::Pesquisa => "pesquisa",
            Self::Outro => "outro",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tipo| tipo.as_str() == value)
    }

    /// User-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Exercicio => "Exercício",
            Self::Prova => "Prova",
            Self::Projeto => "Projeto",
            Self::Trabalho => "Trabalho",
            Self::Apresentacao => "Apresentação",
            Self::Seminario => "Seminário",
            Self::Pesquisa => "Pesquisa",
            Self::Outro => "Outro",
        }
    }
}

/// Progress state of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtividadeStatus {
    #[default]
    Pendente,
    Concluida,
    Cancelada,
}

impl AtividadeStatus {
    pub const ALL: [AtividadeStatus; 3] = [Self::Pendente, Self::Concluida, Self::Cancelada];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pendente => "pendente",
            Self::Concluida => "concluida",
            Self::Cancelada => "cancelada",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pendente => "Pendente",
            Self::Concluida => "Concluída",
            Self::Cancelada => "Cancelada",
        }
    }
}

/// Stored atividade record as returned by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atividade {
    pub id: AtividadeId,
    /// Parent turma; must resolve to a live turma while displayed.
    pub turma_id: TurmaId,
    pub titulo: String,
    pub descricao: Option<String>,
    pub tipo: AtividadeTipo,
    pub data_entrega: Option<NaiveDate>,
    pub status: AtividadeStatus,
    pub nota_maxima: Option<f64>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Atividade {
    /// Field-wise comparison against a draft, ignoring store-assigned fields.
    pub fn matches_draft(&self, draft: &AtividadeDraft) -> bool {
        self.titulo == draft.titulo
            && self.descricao == draft.descricao
            && self.tipo == draft.tipo
            && self.data_entrega == draft.data_entrega
            && self.status == draft.status
            && self.nota_maxima == draft.nota_maxima
    }
}

/// Validated field set for atividade create and full-replace update.
#[derive(Debug, Clone, PartialEq)]
pub struct AtividadeDraft {
    pub titulo: String,
    pub descricao: Option<String>,
    pub tipo: AtividadeTipo,
    pub data_entrega: Option<NaiveDate>,
    pub status: AtividadeStatus,
    pub nota_maxima: Option<f64>,
}

impl AtividadeDraft {
    /// Creates a draft with default `tipo` and `status` and no optional
    /// fields.
    pub fn new(titulo: impl Into<String>) -> Self {
        Self {
            titulo: titulo.into(),
            descricao: None,
            tipo: AtividadeTipo::default(),
            data_entrega: None,
            status: AtividadeStatus::default(),
            nota_maxima: None,
        }
    }

    pub fn with_tipo(mut self, tipo: AtividadeTipo) -> Self {
        self.tipo = tipo;
        self
    }

    pub fn with_status(mut self, status: AtividadeStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_descricao(mut self, descricao: impl Into<String>) -> Self {
        self.descricao = Some(descricao.into());
        self
    }

    pub fn with_data_entrega(mut self, data_entrega: NaiveDate) -> Self {
        self.data_entrega = Some(data_entrega);
        self
    }

    pub fn with_nota_maxima(mut self, nota_maxima: f64) -> Self {
        self.nota_maxima = Some(nota_maxima);
        self
    }

    /// Sets `nota_maxima` from raw numeric text.
    ///
    /// Blank or unparsable text leaves the grade absent instead of failing;
    /// strict parsing belongs to the form layer.
    pub fn with_nota_maxima_input(mut self, raw: &str) -> Self {
        self.nota_maxima = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut fields = Vec::new();
        if self.titulo.trim().is_empty() {
            fields.push(FieldError {
                field: "titulo",
                reason: FieldRejection::Required,
            });
        }
        if let Some(reason) = self.nota_maxima.and_then(nota_maxima_rejection) {
            fields.push(FieldError {
                field: "nota_maxima",
                reason,
            });
        }
        ValidationError::from_fields(fields)
    }
}

/// Returns the rule a grade value breaks, if any.
pub(crate) fn nota_maxima_rejection(value: f64) -> Option<FieldRejection> {
    if !value.is_finite() {
        Some(FieldRejection::NotANumber)
    } else if value < 0.0 {
        Some(FieldRejection::Negative)
    } else if value > NOTA_MAXIMA_LIMIT {
        Some(FieldRejection::AboveMaximum)
    } else {
        None
    }
}
