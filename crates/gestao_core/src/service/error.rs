use crate::model::validation::ValidationError;
use crate::service::in_flight::InFlightKey;
use crate::store::RemoteError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Failure of one lifecycle operation.
///
/// Every variant leaves cache and selection exactly as they were before the
/// call.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleError {
    /// Draft rejected locally; nothing was sent to the store.
    Validation(ValidationError),
    /// Store rejected or failed the request.
    Remote(RemoteError),
    /// Another operation on the same identifier is still pending.
    AlreadyInFlight(InFlightKey),
    /// No signed-in professor; nothing was sent to the store.
    NotAuthenticated,
    /// A confirmation request was resolved by the wrong lifecycle.
    ConfirmationMismatch,
}

impl Display for LifecycleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Remote(err) => write!(f, "{err}"),
            Self::AlreadyInFlight(key) => write!(f, "operation already in progress for {key}"),
            Self::NotAuthenticated => write!(f, "no authenticated session"),
            Self::ConfirmationMismatch => {
                write!(f, "confirmation request does not belong to this operation")
            }
        }
    }
}

impl Error for LifecycleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Remote(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for LifecycleError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RemoteError> for LifecycleError {
    fn from(value: RemoteError) -> Self {
        Self::Remote(value)
    }
}

impl LifecycleError {
    /// Short machine code for log events.
    pub(crate) fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Remote(_) => "remote",
            Self::AlreadyInFlight(_) => "already_in_flight",
            Self::NotAuthenticated => "not_authenticated",
            Self::ConfirmationMismatch => "confirmation_mismatch",
        }
    }
}
