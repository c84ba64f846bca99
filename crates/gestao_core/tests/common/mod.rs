#![allow(dead_code)]

use gestao_core::{
    Atividade, AtividadeDraft, Collection, NewTurma, RecordStore, RemoteError, StoreResult,
    Turma,
};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

pub const PROFESSOR: &str = "prof-1";

/// Store wrapper that counts calls and fails chosen operations on demand.
pub struct FlakyStore<S> {
    inner: S,
    failing: RefCell<BTreeSet<&'static str>>,
    calls: RefCell<BTreeMap<&'static str, usize>>,
}

impl<S: RecordStore> FlakyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            failing: RefCell::new(BTreeSet::new()),
            calls: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn fail(&self, operation: &'static str) {
        self.failing.borrow_mut().insert(operation);
    }

    pub fn heal(&self, operation: &'static str) {
        self.failing.borrow_mut().remove(operation);
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.calls.borrow().get(operation).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.borrow().values().sum()
    }

    fn enter(&self, operation: &'static str, collection: Collection) -> StoreResult<()> {
        *self.calls.borrow_mut().entry(operation).or_insert(0) += 1;
        if self.failing.borrow().contains(operation) {
            return Err(RemoteError::new(
                collection,
                format!("network error during {operation}"),
            ));
        }
        Ok(())
    }
}

impl<S: RecordStore> RecordStore for FlakyStore<S> {
    fn select_turmas(&self) -> StoreResult<Vec<Turma>> {
        self.enter("select_turmas", Collection::Turmas)?;
        self.inner.select_turmas()
    }

    fn insert_turma(&self, record: &NewTurma) -> StoreResult<Turma> {
        self.enter("insert_turma", Collection::Turmas)?;
        self.inner.insert_turma(record)
    }

    fn delete_turma(&self, turma_id: &str) -> StoreResult<()> {
        self.enter("delete_turma", Collection::Turmas)?;
        self.inner.delete_turma(turma_id)
    }

    fn select_atividades(&self, turma_id: &str) -> StoreResult<Vec<Atividade>> {
        self.enter("select_atividades", Collection::Atividades)?;
        self.inner.select_atividades(turma_id)
    }

    fn insert_atividade(&self, turma_id: &str, fields: &AtividadeDraft) -> StoreResult<Atividade> {
        self.enter("insert_atividade", Collection::Atividades)?;
        self.inner.insert_atividade(turma_id, fields)
    }

    fn update_atividade(
        &self,
        atividade_id: &str,
        fields: &AtividadeDraft,
    ) -> StoreResult<Atividade> {
        self.enter("update_atividade", Collection::Atividades)?;
        self.inner.update_atividade(atividade_id, fields)
    }

    fn delete_atividade(&self, atividade_id: &str) -> StoreResult<()> {
        self.enter("delete_atividade", Collection::Atividades)?;
        self.inner.delete_atividade(atividade_id)
    }
}
