//! Client-side orchestration core for the turma/atividade dashboard.
//! Owns validation, cache and selection consistency, and the create/update/
//! delete lifecycles over an abstract record store.

pub mod cache;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod selection;
pub mod service;
pub mod session;
pub mod state;
pub mod store;

pub use cache::{CachedRecords, EntityCache, QueryKey};
pub use config::{ConfigError, CoreConfig};
pub use dashboard::{Dashboard, DashboardSummary};
pub use form::{validate_atividade_form, validate_turma_form, AtividadeForm, TurmaForm};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::atividade::{Atividade, AtividadeDraft, AtividadeId, AtividadeStatus, AtividadeTipo};
pub use model::turma::{ProfessorId, Turma, TurmaDraft, TurmaId};
pub use model::validation::{FieldError, FieldRejection, ValidationError};
pub use selection::{Selection, SelectionController};
pub use service::atividade_lifecycle::AtividadeLifecycle;
pub use service::confirmation::{
    ConfirmationGate, ConfirmationRequest, Decision, DeleteOutcome, DeleteTarget,
};
pub use service::error::{LifecycleError, LifecycleResult};
pub use service::in_flight::{InFlightKey, InFlightRegistry, InFlightTicket};
pub use service::notice::{Notice, NoticeVariant, Operation};
pub use service::turma_lifecycle::TurmaLifecycle;
pub use session::{Session, StaticSession};
pub use state::ClientState;
pub use store::{Collection, NewTurma, RecordStore, RemoteError, SqliteRecordStore, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
