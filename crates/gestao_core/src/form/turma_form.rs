use super::{non_blank, optional_text, required_text};
use crate::model::turma::{ano_letivo_in_range, TurmaDraft, ANO_LETIVO_MAX, ANO_LETIVO_MIN};
use crate::model::validation::{FieldError, FieldRejection, ValidationError};
use serde::{Deserialize, Serialize};

/// Raw turma creation form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurmaForm {
    pub nome: Option<String>,
    pub serie: Option<String>,
    pub ano_letivo: Option<String>,
    pub descricao: Option<String>,
}

impl TurmaForm {
    pub fn new(nome: impl Into<String>, ano_letivo: impl Into<String>) -> Self {
        Self {
            nome: Some(nome.into()),
            ano_letivo: Some(ano_letivo.into()),
            ..Self::default()
        }
    }
}

/// Validates a raw turma form.
///
/// Rules:
/// - `nome`: required, trimmed.
/// - `ano_letivo`: required integer within `[2020, 2030]`.
/// - `serie`, `descricao`: optional; blank means absent.
pub fn validate_turma_form(form: &TurmaForm) -> Result<TurmaDraft, ValidationError> {
    let nome = required_text("nome", form.nome.as_deref());
    let ano_letivo = parse_ano_letivo(form.ano_letivo.as_deref()).map_err(|reason| FieldError {
        field: "ano_letivo",
        reason,
    });

    match (nome, ano_letivo) {
        (Ok(nome), Ok(ano_letivo)) => Ok(TurmaDraft {
            nome,
            serie: optional_text(form.serie.as_ref()),
            ano_letivo,
            descricao: optional_text(form.descricao.as_ref()),
        }),
        (nome, ano_letivo) => Err(ValidationError::collect([nome.err(), ano_letivo.err()])),
    }
}

fn parse_ano_letivo(raw: Option<&str>) -> Result<i32, FieldRejection> {
    let text = non_blank(raw).ok_or(FieldRejection::Required)?;
    let value = text
        .parse::<i32>()
        .map_err(|_| FieldRejection::NotAnInteger)?;
    if ano_letivo_in_range(value) {
        Ok(value)
    } else {
        Err(FieldRejection::OutOfRange {
            min: ANO_LETIVO_MIN,
            max: ANO_LETIVO_MAX,
        })
    }
}
