//! JSON configuration for hosts embedding the core.
//!
//! # Invariants
//! - Every present string field is non-blank after loading.
//! - `log_level`, when present, names a supported level.

use crate::logging::{default_log_level, LogLevel};
use crate::model::turma::ProfessorId;
use crate::session::StaticSession;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "malformed config: {err}"),
            Self::Invalid { field, message } => write!(f, "invalid config field `{field}`: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Host configuration.
///
/// Absent `db_path` means an in-memory store; absent `log_dir` leaves
/// logging off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub db_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub professor_id: Option<ProfessorId>,
    /// Greeting name; ignored without `professor_id`.
    pub professor_nome: Option<String>,
}

impl CoreConfig {
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(path) = &self.db_path {
            reject_blank("db_path", &path.to_string_lossy())?;
        }
        if let Some(path) = &self.log_dir {
            reject_blank("log_dir", &path.to_string_lossy())?;
        }
        if let Some(professor_id) = &self.professor_id {
            reject_blank("professor_id", professor_id)?;
        }
        if let Some(nome) = &self.professor_nome {
            reject_blank("professor_nome", nome)?;
        }
        if let Some(level) = &self.log_level {
            LogLevel::parse(level).map_err(|err| ConfigError::Invalid {
                field: "log_level",
                message: err.to_string(),
            })?;
        }
        Ok(())
    }

    /// Configured level, or the build-mode default.
    pub fn log_level(&self) -> LogLevel {
        self.log_level
            .as_deref()
            .and_then(|level| LogLevel::parse(level).ok())
            .unwrap_or_else(default_log_level)
    }

    pub fn session(&self) -> StaticSession {
        let Some(professor_id) = &self.professor_id else {
            return StaticSession::anonymous();
        };
        let session = StaticSession::signed_in(professor_id.trim());
        match &self.professor_nome {
            Some(nome) => session.with_display_name(nome.trim()),
            None => session,
        }
    }
}

fn reject_blank(field: &'static str, value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid {
            field,
            message: "must not be empty".to_string(),
        });
    }
    Ok(())
}
