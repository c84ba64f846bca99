//! CLI smoke entry point.
//!
//! # Responsibility
//! - Load an optional JSON config, open the store and print the dashboard
//!   state for the configured professor.
//! - Exit non-zero with a one-line message on any failure.

use gestao_core::db::{open_db, open_db_in_memory};
use gestao_core::{
    core_version, init_logging, CoreConfig, Dashboard, Session, SqliteRecordStore,
};
use log::info;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("gestao: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };

    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level().as_str(), log_dir)?;
    }

    let conn = match &config.db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };

    let session = config.session();
    let owner = session.user_id().unwrap_or_default().to_string();
    let store = SqliteRecordStore::try_new(&conn, owner)?;
    let mut dashboard = Dashboard::new(store, session);

    println!("gestao_core version={}", core_version());
    if !dashboard.session().is_authenticated() {
        println!("no professor configured; nothing to show");
        return Ok(());
    }

    let turmas = dashboard.turmas()?;
    if let Some(first) = turmas.first() {
        dashboard.select_turma(&first.id);
    }
    let summary = dashboard.summary()?;
    info!(
        "event=cli_summary module=cli status=ok turmas={} pendentes={:?}",
        summary.total_turmas, summary.atividades_pendentes
    );

    if let Some(nome) = &summary.professor_nome {
        println!("Bem-vindo, {nome}");
    }
    println!("turmas={}", summary.total_turmas);
    for turma in &turmas {
        println!("  {} | {} | {}", turma.id, turma.nome, turma.ano_letivo);
    }
    if let Some(nome) = &summary.selected_turma_nome {
        println!("selected={nome}");
        for atividade in dashboard.atividades()? {
            println!(
                "  {} | {} | {}",
                atividade.titulo,
                atividade.tipo.label(),
                atividade.status.label()
            );
        }
    }
    Ok(())
}
