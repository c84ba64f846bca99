//! Read-through cache of store query results.
//!
//! # Responsibility
//! - Hold one result set per `QueryKey`.
//! - Decide whether a read is served from memory or re-issued to the store.
//!
//! # Invariants
//! - A key that was invalidated is never served again until a fetch for it
//!   succeeds; a failed re-fetch leaves it stale.
//! - Invalidation is per key; nothing here fans out to other keys.
//! - Only successful store results are cached.

use crate::model::atividade::Atividade;
use crate::model::turma::{Turma, TurmaId};
use crate::store::{RecordStore, StoreResult};
use log::{debug, warn};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Identity of one cached result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryKey {
    /// Every turma visible to the session.
    Turmas,
    /// Atividades of one turma.
    Atividades(TurmaId),
}

impl Display for QueryKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Turmas => write!(f, "turmas"),
            Self::Atividades(turma_id) => write!(f, "atividades:{turma_id}"),
        }
    }
}

/// Result set held for one key.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedRecords {
    Turmas(Vec<Turma>),
    Atividades(Vec<Atividade>),
}

impl CachedRecords {
    pub fn len(&self) -> usize {
        match self {
            Self::Turmas(items) => items.len(),
            Self::Atividades(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
struct CacheEntry {
    records: CachedRecords,
    stale: bool,
}

#[derive(Debug, Default)]
pub struct EntityCache {
    entries: HashMap<QueryKey, CacheEntry>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the result set for `key`, querying the store when the entry is
    /// missing or stale.
    pub fn fetch<S: RecordStore + ?Sized>(
        &mut self,
        store: &S,
        key: &QueryKey,
    ) -> StoreResult<&CachedRecords> {
        let entry = match self.entries.entry(key.clone()) {
            Entry::Occupied(occupied) if !occupied.get().stale => {
                debug!("event=cache_fetch module=cache status=hit key={key}");
                occupied.into_mut()
            }
            slot => {
                let fresh = CacheEntry {
                    records: query_store(store, key)?,
                    stale: false,
                };
                match slot {
                    Entry::Occupied(mut occupied) => {
                        occupied.insert(fresh);
                        occupied.into_mut()
                    }
                    Entry::Vacant(vacant) => vacant.insert(fresh),
                }
            }
        };
        Ok(&entry.records)
    }

    /// Typed read of the turma list.
    pub fn turmas<S: RecordStore + ?Sized>(&mut self, store: &S) -> StoreResult<&[Turma]> {
        match self.fetch(store, &QueryKey::Turmas)? {
            CachedRecords::Turmas(items) => Ok(items),
            CachedRecords::Atividades(_) => Ok(&[]),
        }
    }

    /// Typed read of one turma's atividades.
    pub fn atividades<S: RecordStore + ?Sized>(
        &mut self,
        store: &S,
        turma_id: &str,
    ) -> StoreResult<&[Atividade]> {
        match self.fetch(store, &QueryKey::Atividades(turma_id.to_string()))? {
            CachedRecords::Atividades(items) => Ok(items),
            CachedRecords::Turmas(_) => Ok(&[]),
        }
    }

    /// Marks `key` stale so the next read re-queries the store.
    ///
    /// Returns whether an entry existed.
    pub fn invalidate(&mut self, key: &QueryKey) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.stale = true;
                debug!("event=cache_invalidate module=cache status=ok key={key}");
                true
            }
            None => false,
        }
    }

    /// Drops `key` entirely; used for scopes that will not be read again.
    pub fn abandon(&mut self, key: &QueryKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Missing entries count as stale.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries.get(key).map_or(true, |entry| entry.stale)
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Most recent turma list, fresh or stale, without touching the store.
    pub fn last_turmas(&self) -> Option<&[Turma]> {
        match self.entries.get(&QueryKey::Turmas) {
            Some(CacheEntry {
                records: CachedRecords::Turmas(items),
                ..
            }) => Some(items),
            _ => None,
        }
    }

    /// Cached atividades of one turma when the entry is fresh.
    pub fn fresh_atividades(&self, turma_id: &str) -> Option<&[Atividade]> {
        match self
            .entries
            .get(&QueryKey::Atividades(turma_id.to_string()))
        {
            Some(CacheEntry {
                records: CachedRecords::Atividades(items),
                stale: false,
            }) => Some(items),
            _ => None,
        }
    }
}

fn query_store<S: RecordStore + ?Sized>(store: &S, key: &QueryKey) -> StoreResult<CachedRecords> {
    let started_at = Instant::now();
    let fetched = match key {
        QueryKey::Turmas => store.select_turmas().map(CachedRecords::Turmas),
        QueryKey::Atividades(turma_id) => store
            .select_atividades(turma_id)
            .map(CachedRecords::Atividades),
    };

    match &fetched {
        Ok(records) => debug!(
            "event=cache_fetch module=cache status=ok key={key} count={} duration_ms={}",
            records.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => warn!(
            "event=cache_fetch module=cache status=error key={key} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    fetched
}
