//! Domain model for turmas and their atividades.
//!
//! # Responsibility
//! - Define stored records, validated drafts and field-level validation
//!   errors.
//!
//! # Invariants
//! - Every atividade belongs to exactly one turma through `turma_id`.
//! - Identifiers and `created_at` are assigned by the record store only.

pub mod atividade;
pub mod turma;
pub mod validation;
