//! Field-level validation errors shared by drafts and form parsing.
//!
//! # Responsibility
//! - Name the offending field and the rule it broke.
//! - Aggregate every rejected field of one submission into one error.
//!
//! # Invariants
//! - A `ValidationError` always carries at least one `FieldError`.
//! - Validation errors never originate from the record store.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why a single field value was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRejection {
    /// Empty or whitespace-only input for a required field.
    Required,
    /// Input is not a base-10 integer.
    NotAnInteger,
    /// Integer outside the inclusive `[min, max]` range.
    OutOfRange { min: i32, max: i32 },
    /// Input is not a finite decimal number.
    NotANumber,
    /// Decimal value below zero.
    Negative,
    /// Decimal value above the conventional grade ceiling.
    AboveMaximum,
    /// Value outside a fixed vocabulary.
    UnknownOption(String),
    /// Input is not an ISO `YYYY-MM-DD` calendar date.
    InvalidDate,
}

impl Display for FieldRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => write!(f, "is required"),
            Self::NotAnInteger => write!(f, "must be an integer"),
            Self::OutOfRange { min, max } => write!(f, "must be between {min} and {max}"),
            Self::NotANumber => write!(f, "must be a number"),
            Self::Negative => write!(f, "must not be negative"),
            Self::AboveMaximum => write!(
                f,
                "must be at most {}",
                crate::model::atividade::NOTA_MAXIMA_LIMIT
            ),
            Self::UnknownOption(value) => write!(f, "has unsupported value `{value}`"),
            Self::InvalidDate => write!(f, "must be a date in YYYY-MM-DD format"),
        }
    }
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: FieldRejection,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

/// Rejection of a whole submission, listing every invalid field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    fields: Vec<FieldError>,
}

impl ValidationError {
    /// Returns `Ok(())` when no field was rejected.
    pub(crate) fn from_fields(fields: Vec<FieldError>) -> Result<(), Self> {
        if fields.is_empty() {
            Ok(())
        } else {
            Err(Self { fields })
        }
    }

    /// Gathers the rejected fields out of per-field parse outcomes.
    pub(crate) fn collect(outcomes: impl IntoIterator<Item = Option<FieldError>>) -> Self {
        Self {
            fields: outcomes.into_iter().flatten().collect(),
        }
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    /// Returns the rejection recorded for `field`, if any.
    pub fn reason_for(&self, field: &str) -> Option<&FieldRejection> {
        self.fields
            .iter()
            .find(|item| item.field == field)
            .map(|item| &item.reason)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.reason_for(field).is_some()
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid form input: ")?;
        for (idx, item) in self.fields.iter().enumerate() {
            if idx > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

impl Error for ValidationError {}
