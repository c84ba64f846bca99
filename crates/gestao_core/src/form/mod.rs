//! Raw form input parsing into validated drafts.
//!
//! # Responsibility
//! - Map raw field strings to `TurmaDraft` / `AtividadeDraft`.
//! - Report every invalid field at once.
//!
//! # Invariants
//! - Pure functions: no store access, no logging of field contents.
//! - A field that is absent from the submission (`None`) takes its
//!   documented default; a present value outside the vocabulary is rejected.

mod atividade_form;
mod turma_form;

pub use atividade_form::{validate_atividade_form, AtividadeForm};
pub use turma_form::{validate_turma_form, TurmaForm};

use crate::model::validation::{FieldError, FieldRejection};

/// Returns trimmed text, or `None` when input is absent or blank.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

/// Required free-text field, trimmed.
fn required_text(field: &'static str, value: Option<&str>) -> Result<String, FieldError> {
    non_blank(value).map(str::to_string).ok_or(FieldError {
        field,
        reason: FieldRejection::Required,
    })
}

/// Optional free-text field: blank input is stored as absent.
fn optional_text(value: Option<&String>) -> Option<String> {
    non_blank(value.map(String::as_str)).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{non_blank, optional_text};

    #[test]
    fn blank_text_is_absent() {
        assert_eq!(non_blank(Some("  \t")), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(" a ")), Some("a"));
        assert_eq!(optional_text(Some(&" ".to_string())), None);
    }
}
