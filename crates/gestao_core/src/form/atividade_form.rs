use super::{non_blank, optional_text, required_text};
use crate::model::atividade::{
    nota_maxima_rejection, Atividade, AtividadeDraft, AtividadeStatus, AtividadeTipo,
};
use crate::model::validation::{FieldError, FieldRejection, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw atividade form, used for both creation and editing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtividadeForm {
    pub titulo: Option<String>,
    pub descricao: Option<String>,
    pub tipo: Option<String>,
    pub data_entrega: Option<String>,
    pub status: Option<String>,
    pub nota_maxima: Option<String>,
}

impl AtividadeForm {
    pub fn new(titulo: impl Into<String>) -> Self {
        Self {
            titulo: Some(titulo.into()),
            ..Self::default()
        }
    }

    /// Prefills an edit form from a stored record.
    pub fn from_record(atividade: &Atividade) -> Self {
        Self {
            titulo: Some(atividade.titulo.clone()),
            descricao: atividade.descricao.clone(),
            tipo: Some(atividade.tipo.as_str().to_string()),
            data_entrega: atividade
                .data_entrega
                .map(|date| date.format(DATE_FORMAT).to_string()),
            status: Some(atividade.status.as_str().to_string()),
            nota_maxima: atividade.nota_maxima.map(|value| value.to_string()),
        }
    }
}

/// Validates a raw atividade form.
///
/// Rules:
/// - `titulo`: required, trimmed.
/// - `tipo` / `status`: default to `exercicio` / `pendente` when absent;
///   rejected when present but outside the vocabulary.
/// - `data_entrega`: optional ISO date.
/// - `nota_maxima`: optional decimal within `[0, 100]`.
/// - `descricao`: optional; blank means absent.
pub fn validate_atividade_form(form: &AtividadeForm) -> Result<AtividadeDraft, ValidationError> {
    let titulo = required_text("titulo", form.titulo.as_deref());
    let tipo = parse_option(
        "tipo",
        form.tipo.as_deref(),
        AtividadeTipo::parse,
        AtividadeTipo::default(),
    );
    let status = parse_option(
        "status",
        form.status.as_deref(),
        AtividadeStatus::parse,
        AtividadeStatus::default(),
    );
    let data_entrega = parse_data_entrega(form.data_entrega.as_deref());
    let nota_maxima = parse_nota_maxima(form.nota_maxima.as_deref());

    match (titulo, tipo, status, data_entrega, nota_maxima) {
        (Ok(titulo), Ok(tipo), Ok(status), Ok(data_entrega), Ok(nota_maxima)) => {
            Ok(AtividadeDraft {
                titulo,
                descricao: optional_text(form.descricao.as_ref()),
                tipo,
                data_entrega,
                status,
                nota_maxima,
            })
        }
        (titulo, tipo, status, data_entrega, nota_maxima) => Err(ValidationError::collect([
            titulo.err(),
            tipo.err(),
            status.err(),
            data_entrega.err(),
            nota_maxima.err(),
        ])),
    }
}

fn parse_option<T>(
    field: &'static str,
    raw: Option<&str>,
    parse: fn(&str) -> Option<T>,
    default: T,
) -> Result<T, FieldError> {
    match raw {
        None => Ok(default),
        Some(value) => parse(value.trim()).ok_or_else(|| FieldError {
            field,
            reason: FieldRejection::UnknownOption(value.to_string()),
        }),
    }
}

fn parse_data_entrega(raw: Option<&str>) -> Result<Option<NaiveDate>, FieldError> {
    let Some(text) = non_blank(raw) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map(Some)
        .map_err(|_| FieldError {
            field: "data_entrega",
            reason: FieldRejection::InvalidDate,
        })
}

fn parse_nota_maxima(raw: Option<&str>) -> Result<Option<f64>, FieldError> {
    let Some(text) = non_blank(raw) else {
        return Ok(None);
    };
    let reject = |reason| FieldError {
        field: "nota_maxima",
        reason,
    };
    let value = text
        .parse::<f64>()
        .map_err(|_| reject(FieldRejection::NotANumber))?;
    match nota_maxima_rejection(value) {
        Some(reason) => Err(reject(reason)),
        None => Ok(Some(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_atividade_form, AtividadeForm};
    use crate::model::atividade::{Atividade, AtividadeStatus, AtividadeTipo};
    use crate::model::validation::FieldRejection;
    use chrono::NaiveDate;

    #[test]
    fn absent_enumerations_take_defaults() {
        let draft = validate_atividade_form(&AtividadeForm::new("Lista 1")).unwrap();
        assert_eq!(draft.tipo, AtividadeTipo::Exercicio);
        assert_eq!(draft.status, AtividadeStatus::Pendente);
        assert_eq!(draft.data_entrega, None);
        assert_eq!(draft.nota_maxima, None);
    }

    #[test]
    fn parses_every_field() {
        let form = AtividadeForm {
            descricao: Some("capítulos 1 a 3".to_string()),
            tipo: Some("prova".to_string()),
            data_entrega: Some("2024-06-01".to_string()),
            status: Some("concluida".to_string()),
            nota_maxima: Some("10.5".to_string()),
            ..AtividadeForm::new("Prova 1")
        };
        let draft = validate_atividade_form(&form).unwrap();
        assert_eq!(draft.titulo, "Prova 1");
        assert_eq!(draft.tipo, AtividadeTipo::Prova);
        assert_eq!(draft.status, AtividadeStatus::Concluida);
        assert_eq!(draft.data_entrega, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(draft.nota_maxima, Some(10.5));
        assert_eq!(draft.descricao.as_deref(), Some("capítulos 1 a 3"));
    }

    #[test]
    fn negative_grade_is_a_validation_error() {
        let form = AtividadeForm {
            nota_maxima: Some("-5".to_string()),
            ..AtividadeForm::new("Prova 1")
        };
        let err = validate_atividade_form(&form).unwrap_err();
        assert_eq!(
            err.reason_for("nota_maxima"),
            Some(&FieldRejection::Negative)
        );
    }

    #[test]
    fn non_numeric_and_oversized_grades_are_rejected() {
        for (raw, expected) in [
            ("dez", FieldRejection::NotANumber),
            ("NaN", FieldRejection::NotANumber),
            ("100.01", FieldRejection::AboveMaximum),
        ] {
            let form = AtividadeForm {
                nota_maxima: Some(raw.to_string()),
                ..AtividadeForm::new("x")
            };
            let err = validate_atividade_form(&form).unwrap_err();
            assert_eq!(err.reason_for("nota_maxima"), Some(&expected), "{raw}");
        }
    }

    #[test]
    fn grade_bounds_are_inclusive() {
        for raw in ["0", "100"] {
            let form = AtividadeForm {
                nota_maxima: Some(raw.to_string()),
                ..AtividadeForm::new("x")
            };
            assert!(validate_atividade_form(&form).is_ok(), "{raw}");
        }
    }

    #[test]
    fn unknown_enumeration_values_are_rejected_not_defaulted() {
        let form = AtividadeForm {
            tipo: Some("quiz".to_string()),
            status: Some(String::new()),
            ..AtividadeForm::new("x")
        };
        let err = validate_atividade_form(&form).unwrap_err();
        assert_eq!(
            err.reason_for("tipo"),
            Some(&FieldRejection::UnknownOption("quiz".to_string()))
        );
        assert!(err.has_field("status"));
    }

    #[test]
    fn invalid_date_and_blank_title_are_reported_together() {
        let form = AtividadeForm {
            data_entrega: Some("01/06/2024".to_string()),
            ..AtividadeForm::new("")
        };
        let err = validate_atividade_form(&form).unwrap_err();
        assert_eq!(err.fields().len(), 2);
        assert_eq!(err.reason_for("titulo"), Some(&FieldRejection::Required));
        assert_eq!(
            err.reason_for("data_entrega"),
            Some(&FieldRejection::InvalidDate)
        );
    }

    #[test]
    fn prefilled_form_validates_back_to_the_same_fields() {
        let record = Atividade {
            id: "a1".to_string(),
            turma_id: "t1".to_string(),
            titulo: "Seminário".to_string(),
            descricao: None,
            tipo: AtividadeTipo::Seminario,
            data_entrega: NaiveDate::from_ymd_opt(2025, 3, 14),
            status: AtividadeStatus::Cancelada,
            nota_maxima: Some(7.5),
            created_at: 0,
        };
        let draft = validate_atividade_form(&AtividadeForm::from_record(&record)).unwrap();
        assert!(record.matches_draft(&draft));
    }
}
