//! User-facing outcome notices for lifecycle operations.

use crate::service::confirmation::DeleteOutcome;
use crate::service::error::LifecycleResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateTurma,
    DeleteTurma,
    CreateAtividade,
    UpdateAtividade,
    DeleteAtividade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeVariant {
    Success,
    Destructive,
}

/// Toast-style message: short title plus detail line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    pub fn success(operation: Operation) -> Self {
        let (title, description) = match operation {
            Operation::CreateTurma => ("Turma criada", "A turma foi criada com sucesso."),
            Operation::DeleteTurma => ("Turma excluída", "A turma foi excluída com sucesso."),
            Operation::CreateAtividade => {
                ("Atividade criada", "A atividade foi criada com sucesso.")
            }
            Operation::UpdateAtividade => (
                "Atividade atualizada",
                "A atividade foi atualizada com sucesso.",
            ),
            Operation::DeleteAtividade => (
                "Atividade excluída",
                "A atividade foi excluída com sucesso.",
            ),
        };
        Self {
            title,
            description: description.to_string(),
            variant: NoticeVariant::Success,
        }
    }

    /// Failure notice; `message` is the error text shown as detail.
    pub fn failure(operation: Operation, message: impl Into<String>) -> Self {
        let title = match operation {
            Operation::CreateTurma => "Erro ao criar turma",
            Operation::DeleteTurma => "Erro ao excluir turma",
            Operation::CreateAtividade => "Erro ao criar atividade",
            Operation::UpdateAtividade => "Erro ao atualizar atividade",
            Operation::DeleteAtividade => "Erro ao excluir atividade",
        };
        Self {
            title,
            description: message.into(),
            variant: NoticeVariant::Destructive,
        }
    }

    pub fn from_result<T>(operation: Operation, result: &LifecycleResult<T>) -> Self {
        match result {
            Ok(_) => Self::success(operation),
            Err(err) => Self::failure(operation, err.to_string()),
        }
    }

    /// Notice for a delete; an aborted delete shows nothing.
    pub fn for_delete(operation: Operation, result: &LifecycleResult<DeleteOutcome>) -> Option<Self> {
        match result {
            Ok(DeleteOutcome::Aborted) => None,
            other => Some(Self::from_result(operation, other)),
        }
    }
}
