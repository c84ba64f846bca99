//! Session collaborator contract.
//!
//! The core never authenticates; it only asks who is signed in. A session
//! without a user id means no query and no mutation is issued.

use crate::model::turma::ProfessorId;

/// Supplies the authenticated professor and the sign-out action.
pub trait Session {
    fn user_id(&self) -> Option<&str>;
    fn sign_out(&mut self);

    /// Profile name shown in the greeting, when the provider has one.
    fn display_name(&self) -> Option<&str> {
        None
    }

    fn is_authenticated(&self) -> bool {
        self.user_id().is_some()
    }
}

/// Session with a fixed identity, for embedding callers and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticSession {
    user_id: Option<ProfessorId>,
    display_name: Option<String>,
}

impl StaticSession {
    pub fn signed_in(user_id: impl Into<ProfessorId>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, nome: impl Into<String>) -> Self {
        self.display_name = Some(nome.into());
        self
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl Session for StaticSession {
    fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    fn sign_out(&mut self) {
        self.user_id = None;
        self.display_name = None;
    }

    fn display_name(&self) -> Option<&str> {
        self.user_id.as_ref()?;
        self.display_name.as_deref()
    }
}
