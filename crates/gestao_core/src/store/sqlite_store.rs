//! SQLite-backed record store.
//!
//! # Responsibility
//! - Implement `RecordStore` over the `turmas` / `atividades` tables.
//! - Emulate the remote access policy: every call is scoped to one owner.
//!
//! # Invariants
//! - Identifiers are UUID v4 strings generated here, never by callers.
//! - Lists are ordered `created_at DESC, rowid DESC`.
//! - Rows owned by another professor behave as if they did not exist.
//! - Persisted rows that fail to parse are reported, never masked.

use super::{Collection, NewTurma, RecordStore, RemoteError, StoreResult};
use crate::db::migrations::{current_version, latest_version};
use crate::db::{DbError, DbResult};
use crate::model::atividade::{Atividade, AtividadeDraft, AtividadeStatus, AtividadeTipo};
use crate::model::turma::{ProfessorId, Turma};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

const TURMA_SELECT_SQL: &str = "SELECT
    id,
    professor_id,
    nome,
    serie,
    ano_letivo,
    descricao,
    created_at
FROM turmas";

const ATIVIDADE_SELECT_SQL: &str = "SELECT
    a.id,
    a.turma_id,
    a.titulo,
    a.descricao,
    a.tipo,
    a.data_entrega,
    a.status,
    a.nota_maxima,
    a.created_at
FROM atividades a
JOIN turmas t ON t.id = a.turma_id";

/// Record store bound to one authenticated professor.
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
    owner_id: ProfessorId,
}

impl<'conn> SqliteRecordStore<'conn> {
    /// Binds a migrated connection to `owner_id`.
    ///
    /// # Errors
    /// - `DbError::UninitializedConnection` when the connection schema is not
    ///   at the latest migration.
    pub fn try_new(conn: &'conn Connection, owner_id: impl Into<ProfessorId>) -> DbResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_version(conn)?;
        if actual_version != expected_version {
            return Err(DbError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        Ok(Self {
            conn,
            owner_id: owner_id.into(),
        })
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn load_atividade(&self, atividade_id: &str) -> StoreResult<Atividade> {
        let sql = format!("{ATIVIDADE_SELECT_SQL} WHERE a.id = ?1 AND t.professor_id = ?2;");
        self.conn
            .query_row(&sql, params![atividade_id, self.owner_id], |row| {
                Ok(parse_atividade_row(row))
            })
            .optional()
            .map_err(atividades_error)?
            .ok_or_else(|| atividade_not_found(atividade_id))?
    }

    fn owns_turma(&self, turma_id: &str) -> StoreResult<bool> {
        self.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM turmas WHERE id = ?1 AND professor_id = ?2);",
                params![turma_id, self.owner_id],
                |row| row.get::<_, bool>(0),
            )
            .map_err(turmas_error)
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn select_turmas(&self) -> StoreResult<Vec<Turma>> {
        let sql =
            format!("{TURMA_SELECT_SQL} WHERE professor_id = ?1 ORDER BY created_at DESC, rowid DESC;");
        let mut stmt = self.conn.prepare(&sql).map_err(turmas_error)?;
        let rows = stmt
            .query_map([self.owner_id.as_str()], parse_turma_row)
            .map_err(turmas_error)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(turmas_error)
    }

    fn insert_turma(&self, record: &NewTurma) -> StoreResult<Turma> {
        if record.professor_id != self.owner_id {
            return Err(RemoteError::new(
                Collection::Turmas,
                "new row violates row-level security policy for table \"turmas\"",
            ));
        }

        let turma = Turma {
            id: Uuid::new_v4().to_string(),
            professor_id: record.professor_id.clone(),
            nome: record.nome.clone(),
            serie: record.serie.clone(),
            ano_letivo: record.ano_letivo,
            descricao: record.descricao.clone(),
            created_at: Utc::now().timestamp_millis(),
        };

        self.conn
            .execute(
                "INSERT INTO turmas (
                    id,
                    professor_id,
                    nome,
                    serie,
                    ano_letivo,
                    descricao,
                    created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    turma.id,
                    turma.professor_id,
                    turma.nome,
                    turma.serie,
                    turma.ano_letivo,
                    turma.descricao,
                    turma.created_at,
                ],
            )
            .map_err(turmas_error)?;

        Ok(turma)
    }

    fn delete_turma(&self, turma_id: &str) -> StoreResult<()> {
        let changed = self
            .conn
            .execute(
                "DELETE FROM turmas WHERE id = ?1 AND professor_id = ?2;",
                params![turma_id, self.owner_id],
            )
            .map_err(turmas_error)?;

        if changed == 0 {
            return Err(RemoteError::new(
                Collection::Turmas,
                format!("turma not found: {turma_id}"),
            ));
        }
        Ok(())
    }

    fn select_atividades(&self, turma_id: &str) -> StoreResult<Vec<Atividade>> {
        let sql = format!(
            "{ATIVIDADE_SELECT_SQL}
             WHERE a.turma_id = ?1 AND t.professor_id = ?2
             ORDER BY a.created_at DESC, a.rowid DESC;"
        );
        let mut stmt = self.conn.prepare(&sql).map_err(atividades_error)?;
        let mut rows = stmt
            .query(params![turma_id, self.owner_id])
            .map_err(atividades_error)?;

        let mut atividades = Vec::new();
        while let Some(row) = rows.next().map_err(atividades_error)? {
            atividades.push(parse_atividade_row(row)?);
        }
        Ok(atividades)
    }

    fn insert_atividade(
        &self,
        turma_id: &str,
        fields: &AtividadeDraft,
    ) -> StoreResult<Atividade> {
        if !self.owns_turma(turma_id)? {
            return Err(RemoteError::new(
                Collection::Atividades,
                format!("turma not found: {turma_id}"),
            ));
        }

        let atividade = Atividade {
            id: Uuid::new_v4().to_string(),
            turma_id: turma_id.to_string(),
            titulo: fields.titulo.clone(),
            descricao: fields.descricao.clone(),
            tipo: fields.tipo,
            data_entrega: fields.data_entrega,
            status: fields.status,
            nota_maxima: fields.nota_maxima,
            created_at: Utc::now().timestamp_millis(),
        };

        self.conn
            .execute(
                "INSERT INTO atividades (
                    id,
                    turma_id,
                    titulo,
                    descricao,
                    tipo,
                    data_entrega,
                    status,
                    nota_maxima,
                    created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
                params![
                    atividade.id,
                    atividade.turma_id,
                    atividade.titulo,
                    atividade.descricao,
                    atividade.tipo.as_str(),
                    atividade.data_entrega.map(format_date),
                    atividade.status.as_str(),
                    atividade.nota_maxima,
                    atividade.created_at,
                ],
            )
            .map_err(atividades_error)?;

        Ok(atividade)
    }

    fn update_atividade(
        &self,
        atividade_id: &str,
        fields: &AtividadeDraft,
    ) -> StoreResult<Atividade> {
        let changed = self
            .conn
            .execute(
                "UPDATE atividades
                 SET
                    titulo = ?3,
                    descricao = ?4,
                    tipo = ?5,
                    data_entrega = ?6,
                    status = ?7,
                    nota_maxima = ?8
                 WHERE id = ?1
                   AND turma_id IN (SELECT id FROM turmas WHERE professor_id = ?2);",
                params![
                    atividade_id,
                    self.owner_id,
                    fields.titulo,
                    fields.descricao,
                    fields.tipo.as_str(),
                    fields.data_entrega.map(format_date),
                    fields.status.as_str(),
                    fields.nota_maxima,
                ],
            )
            .map_err(atividades_error)?;

        if changed == 0 {
            return Err(atividade_not_found(atividade_id));
        }
        self.load_atividade(atividade_id)
    }

    fn delete_atividade(&self, atividade_id: &str) -> StoreResult<()> {
        let changed = self
            .conn
            .execute(
                "DELETE FROM atividades
                 WHERE id = ?1
                   AND turma_id IN (SELECT id FROM turmas WHERE professor_id = ?2);",
                params![atividade_id, self.owner_id],
            )
            .map_err(atividades_error)?;

        if changed == 0 {
            return Err(atividade_not_found(atividade_id));
        }
        Ok(())
    }
}

fn parse_turma_row(row: &Row<'_>) -> rusqlite::Result<Turma> {
    Ok(Turma {
        id: row.get("id")?,
        professor_id: row.get("professor_id")?,
        nome: row.get("nome")?,
        serie: row.get("serie")?,
        ano_letivo: row.get("ano_letivo")?,
        descricao: row.get("descricao")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_atividade_row(row: &Row<'_>) -> StoreResult<Atividade> {
    let tipo_text: String = row.get("tipo").map_err(atividades_error)?;
    let tipo = AtividadeTipo::parse(&tipo_text).ok_or_else(|| {
        invalid_atividade_data(format!("invalid tipo `{tipo_text}` in atividades.tipo"))
    })?;

    let status_text: String = row.get("status").map_err(atividades_error)?;
    let status = AtividadeStatus::parse(&status_text).ok_or_else(|| {
        invalid_atividade_data(format!(
            "invalid status `{status_text}` in atividades.status"
        ))
    })?;

    let data_entrega = match row
        .get::<_, Option<String>>("data_entrega")
        .map_err(atividades_error)?
    {
        Some(text) => Some(NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|_| {
            invalid_atividade_data(format!(
                "invalid date `{text}` in atividades.data_entrega"
            ))
        })?),
        None => None,
    };

    let read = |row: &Row<'_>| -> rusqlite::Result<Atividade> {
        Ok(Atividade {
            id: row.get("id")?,
            turma_id: row.get("turma_id")?,
            titulo: row.get("titulo")?,
            descricao: row.get("descricao")?,
            tipo,
            data_entrega,
            status,
            nota_maxima: row.get("nota_maxima")?,
            created_at: row.get("created_at")?,
        })
    };
    read(row).map_err(atividades_error)
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn turmas_error(err: rusqlite::Error) -> RemoteError {
    RemoteError::new(Collection::Turmas, err.to_string())
}

fn atividades_error(err: rusqlite::Error) -> RemoteError {
    RemoteError::new(Collection::Atividades, err.to_string())
}

fn atividade_not_found(atividade_id: &str) -> RemoteError {
    RemoteError::new(
        Collection::Atividades,
        format!("atividade not found: {atividade_id}"),
    )
}

fn invalid_atividade_data(message: String) -> RemoteError {
    RemoteError::new(
        Collection::Atividades,
        format!("invalid persisted atividade data: {message}"),
    )
}
