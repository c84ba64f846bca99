mod common;

use common::{FlakyStore, PROFESSOR};
use gestao_core::db::open_db_in_memory;
use gestao_core::{
    AtividadeDraft, ClientState, ConfirmationRequest, Decision, DeleteOutcome, FieldRejection,
    InFlightKey, LifecycleError, QueryKey, RecordStore, Selection, SqliteRecordStore,
    Session, StaticSession, TurmaDraft, TurmaLifecycle,
};

#[test]
fn invalid_draft_never_reaches_store() {
    let conn = open_db_in_memory().unwrap();
    let store = FlakyStore::new(SqliteRecordStore::try_new(&conn, PROFESSOR).unwrap());
    let mut state = ClientState::new();
    let session = StaticSession::signed_in(PROFESSOR);

    let err = TurmaLifecycle::new(&store)
        .create(&mut state, &session, &TurmaDraft::new("9º A", 2019))
        .unwrap_err();

    match err {
        LifecycleError::Validation(validation) => assert_eq!(
            validation.reason_for("ano_letivo"),
            Some(&FieldRejection::OutOfRange {
                min: 2020,
                max: 2030
            })
        ),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.total_calls(), 0);
}

#[test]
fn anonymous_session_cannot_create() {
    let conn = open_db_in_memory().unwrap();
    let store = FlakyStore::new(SqliteRecordStore::try_new(&conn, PROFESSOR).unwrap());
    let mut state = ClientState::new();

    let err = TurmaLifecycle::new(&store)
        .create(&mut state, &StaticSession::anonymous(), &TurmaDraft::new("9º A", 2024))
        .unwrap_err();

    assert_eq!(err, LifecycleError::NotAuthenticated);
    assert_eq!(store.total_calls(), 0);
}

#[test]
fn create_attaches_owner_and_invalidates_turma_list() {
    let conn = open_db_in_memory().unwrap();
    let store = FlakyStore::new(SqliteRecordStore::try_new(&conn, PROFESSOR).unwrap());
    let mut state = ClientState::new();
    let session = StaticSession::signed_in(PROFESSOR);

    assert!(state.cache.turmas(&store).unwrap().is_empty());
    assert!(!state.cache.is_stale(&QueryKey::Turmas));

    let turma = TurmaLifecycle::new(&store)
        .create(
            &mut state,
            &session,
            &TurmaDraft::new("9º A", 2024).with_serie("9º ano"),
        )
        .unwrap();

    assert_eq!(turma.professor_id, PROFESSOR);
    assert_eq!(turma.serie.as_deref(), Some("9º ano"));
    assert!(state.cache.is_stale(&QueryKey::Turmas));
    assert!(state.in_flight.is_empty());

    let listed = state.cache.turmas(&store).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, turma.id);
    assert_eq!(store.calls("select_turmas"), 2);
}

#[test]
fn failed_create_leaves_state_untouched_and_can_be_resubmitted() {
    let conn = open_db_in_memory().unwrap();
    let store = FlakyStore::new(SqliteRecordStore::try_new(&conn, PROFESSOR).unwrap());
    let mut state = ClientState::new();
    let session = StaticSession::signed_in(PROFESSOR);
    let lifecycle = TurmaLifecycle::new(&store);
    let existing = lifecycle
        .create(&mut state, &session, &TurmaDraft::new("8º B", 2024))
        .unwrap();
    state.cache.turmas(&store).unwrap();
    state.selection.select(existing.id.clone());

    store.fail("insert_turma");
    let draft = TurmaDraft::new("9º A", 2024);
    let err = lifecycle.create(&mut state, &session, &draft).unwrap_err();

    match &err {
        LifecycleError::Remote(remote) => {
            assert_eq!(remote.message(), "network error during insert_turma")
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!state.cache.is_stale(&QueryKey::Turmas));
    assert_eq!(state.selection.state(), &Selection::Selected(existing.id.clone()));
    assert!(state.in_flight.is_empty());
    assert_eq!(store.calls("insert_turma"), 2);

    store.heal("insert_turma");
    lifecycle.create(&mut state, &session, &draft).unwrap();
    assert_eq!(state.cache.turmas(&store).unwrap().len(), 2);
}

#[test]
fn pending_submission_blocks_a_second_one() {
    let conn = open_db_in_memory().unwrap();
    let store = FlakyStore::new(SqliteRecordStore::try_new(&conn, PROFESSOR).unwrap());
    let mut state = ClientState::new();
    let session = StaticSession::signed_in(PROFESSOR);
    state.in_flight.try_begin(InFlightKey::NewTurma).unwrap();

    let err = TurmaLifecycle::new(&store)
        .create(&mut state, &session, &TurmaDraft::new("9º A", 2024))
        .unwrap_err();

    assert_eq!(err, LifecycleError::AlreadyInFlight(InFlightKey::NewTurma));
    assert_eq!(store.calls("insert_turma"), 0);
}

#[test]
fn declined_delete_sends_nothing() {
    let conn = open_db_in_memory().unwrap();
    let store = FlakyStore::new(SqliteRecordStore::try_new(&conn, PROFESSOR).unwrap());
    let mut state = ClientState::new();
    let session = StaticSession::signed_in(PROFESSOR);
    let lifecycle = TurmaLifecycle::new(&store);
    let turma = lifecycle
        .create(&mut state, &session, &TurmaDraft::new("9º A", 2024))
        .unwrap();

    let request = lifecycle.request_delete(&mut state, &session, &turma.id).unwrap();
    assert!(request.prompt().starts_with("Tem certeza que deseja excluir esta turma?"));
    assert!(state.in_flight.is_pending(&InFlightKey::Turma(turma.id.clone())));

    let outcome = lifecycle
        .resolve_delete(&mut state, &session, request, Decision::Declined)
        .unwrap();

    assert_eq!(outcome, DeleteOutcome::Aborted);
    assert_eq!(store.calls("delete_turma"), 0);
    assert!(state.in_flight.is_empty());
    assert_eq!(store.select_turmas().unwrap().len(), 1);
}

#[test]
fn second_delete_request_for_same_turma_is_refused() {
    let conn = open_db_in_memory().unwrap();
    let store = FlakyStore::new(SqliteRecordStore::try_new(&conn, PROFESSOR).unwrap());
    let mut state = ClientState::new();
    let session = StaticSession::signed_in(PROFESSOR);
    let lifecycle = TurmaLifecycle::new(&store);
    let turma = lifecycle
        .create(&mut state, &session, &TurmaDraft::new("9º A", 2024))
        .unwrap();

    let first = lifecycle.request_delete(&mut state, &session, &turma.id).unwrap();
    let err = lifecycle
        .request_delete(&mut state, &session, &turma.id)
        .unwrap_err();
    assert_eq!(
        err,
        LifecycleError::AlreadyInFlight(InFlightKey::Turma(turma.id.clone()))
    );

    lifecycle
        .resolve_delete(&mut state, &session, first, Decision::Confirmed)
        .unwrap();
    assert_eq!(store.calls("delete_turma"), 1);
}

#[test]
fn confirmed_delete_of_selected_turma_clears_selection_and_abandons_atividades() {
    let conn = open_db_in_memory().unwrap();
    let store = FlakyStore::new(SqliteRecordStore::try_new(&conn, PROFESSOR).unwrap());
    let mut state = ClientState::new();
    let session = StaticSession::signed_in(PROFESSOR);
    let lifecycle = TurmaLifecycle::new(&store);
    let turma = lifecycle
        .create(&mut state, &session, &TurmaDraft::new("9º A", 2024))
        .unwrap();
    store
        .insert_atividade(&turma.id, &AtividadeDraft::new("Prova 1"))
        .unwrap();
    state.cache.turmas(&store).unwrap();
    state.cache.atividades(&store, &turma.id).unwrap();
    state.selection.select(turma.id.clone());

    let mut gate = |_: &ConfirmationRequest| Decision::Confirmed;
    let outcome = lifecycle
        .delete(&mut state, &session, &turma.id, &mut gate)
        .unwrap();

    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert_eq!(state.selection.state(), &Selection::NoneSelected);
    assert!(state.cache.is_stale(&QueryKey::Turmas));
    assert!(!state
        .cache
        .contains(&QueryKey::Atividades(turma.id.clone())));
    assert!(state.cache.turmas(&store).unwrap().is_empty());
    assert!(store.select_atividades(&turma.id).unwrap().is_empty());
}

#[test]
fn deleting_another_turma_keeps_selection() {
    let conn = open_db_in_memory().unwrap();
    let store = FlakyStore::new(SqliteRecordStore::try_new(&conn, PROFESSOR).unwrap());
    let mut state = ClientState::new();
    let session = StaticSession::signed_in(PROFESSOR);
    let lifecycle = TurmaLifecycle::new(&store);
    let kept = lifecycle
        .create(&mut state, &session, &TurmaDraft::new("9º A", 2024))
        .unwrap();
    let removed = lifecycle
        .create(&mut state, &session, &TurmaDraft::new("9º B", 2024))
        .unwrap();
    state.selection.select(kept.id.clone());

    let mut gate = |_: &ConfirmationRequest| Decision::Confirmed;
    lifecycle
        .delete(&mut state, &session, &removed.id, &mut gate)
        .unwrap();

    assert_eq!(state.selection.state(), &Selection::Selected(kept.id));
}

#[test]
fn failed_delete_keeps_selection_and_cache() {
    let conn = open_db_in_memory().unwrap();
    let store = FlakyStore::new(SqliteRecordStore::try_new(&conn, PROFESSOR).unwrap());
    let mut state = ClientState::new();
    let session = StaticSession::signed_in(PROFESSOR);
    let lifecycle = TurmaLifecycle::new(&store);
    let turma = lifecycle
        .create(&mut state, &session, &TurmaDraft::new("9º A", 2024))
        .unwrap();
    state.cache.turmas(&store).unwrap();
    state.cache.atividades(&store, &turma.id).unwrap();
    state.selection.select(turma.id.clone());

    store.fail("delete_turma");
    let request = lifecycle.request_delete(&mut state, &session, &turma.id).unwrap();
    let err = lifecycle
        .resolve_delete(&mut state, &session, request, Decision::Confirmed)
        .unwrap_err();

    assert!(matches!(err, LifecycleError::Remote(_)));
    assert_eq!(state.selection.state(), &Selection::Selected(turma.id.clone()));
    assert!(!state.cache.is_stale(&QueryKey::Turmas));
    assert!(state.cache.contains(&QueryKey::Atividades(turma.id.clone())));
    assert!(state.in_flight.is_empty());
}

#[test]
fn deleting_missing_turma_reports_remote_error() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn, PROFESSOR).unwrap();
    let mut state = ClientState::new();
    let session = StaticSession::signed_in(PROFESSOR);

    let mut gate = |_: &ConfirmationRequest| Decision::Confirmed;
    let err = TurmaLifecycle::new(&store)
        .delete(&mut state, &session, "ausente", &mut gate)
        .unwrap_err();

    assert_eq!(err.to_string(), "turma not found: ausente");
}

#[test]
fn confirmation_after_sign_out_is_refused_without_store_call() {
    let conn = open_db_in_memory().unwrap();
    let store = FlakyStore::new(SqliteRecordStore::try_new(&conn, PROFESSOR).unwrap());
    let mut state = ClientState::new();
    let mut session = StaticSession::signed_in(PROFESSOR);
    let lifecycle = TurmaLifecycle::new(&store);
    let turma = lifecycle
        .create(&mut state, &session, &TurmaDraft::new("9º A", 2024))
        .unwrap();

    let request = lifecycle.request_delete(&mut state, &session, &turma.id).unwrap();
    session.sign_out();
    let err = lifecycle
        .resolve_delete(&mut state, &session, request, Decision::Confirmed)
        .unwrap_err();

    assert_eq!(err, LifecycleError::NotAuthenticated);
    assert_eq!(store.calls("delete_turma"), 0);
    assert!(state.in_flight.is_empty());
    assert_eq!(store.select_turmas().unwrap().len(), 1);
}

#[test]
fn confirmation_under_another_professor_is_refused() {
    let conn = open_db_in_memory().unwrap();
    let store = FlakyStore::new(SqliteRecordStore::try_new(&conn, PROFESSOR).unwrap());
    let mut state = ClientState::new();
    let session = StaticSession::signed_in(PROFESSOR);
    let lifecycle = TurmaLifecycle::new(&store);
    let turma = lifecycle
        .create(&mut state, &session, &TurmaDraft::new("9º A", 2024))
        .unwrap();

    let request = lifecycle.request_delete(&mut state, &session, &turma.id).unwrap();
    assert_eq!(request.requested_by(), PROFESSOR);
    let other = StaticSession::signed_in("prof-2");
    let err = lifecycle
        .resolve_delete(&mut state, &other, request, Decision::Confirmed)
        .unwrap_err();

    assert_eq!(err, LifecycleError::NotAuthenticated);
    assert_eq!(store.calls("delete_turma"), 0);
    assert!(!state.in_flight.is_pending(&InFlightKey::Turma(turma.id.clone())));
}

#[test]
fn declining_after_sign_out_still_releases_the_turma() {
    let conn = open_db_in_memory().unwrap();
    let store = FlakyStore::new(SqliteRecordStore::try_new(&conn, PROFESSOR).unwrap());
    let mut state = ClientState::new();
    let mut session = StaticSession::signed_in(PROFESSOR);
    let lifecycle = TurmaLifecycle::new(&store);
    let turma = lifecycle
        .create(&mut state, &session, &TurmaDraft::new("9º A", 2024))
        .unwrap();

    let request = lifecycle.request_delete(&mut state, &session, &turma.id).unwrap();
    session.sign_out();
    let outcome = lifecycle
        .resolve_delete(&mut state, &session, request, Decision::Declined)
        .unwrap();

    assert_eq!(outcome, DeleteOutcome::Aborted);
    assert!(state.in_flight.is_empty());
    assert_eq!(store.calls("delete_turma"), 0);
}

#[test]
fn request_issued_before_reset_cannot_release_a_newer_one() {
    let conn = open_db_in_memory().unwrap();
    let store = FlakyStore::new(SqliteRecordStore::try_new(&conn, PROFESSOR).unwrap());
    let mut state = ClientState::new();
    let session = StaticSession::signed_in(PROFESSOR);
    let lifecycle = TurmaLifecycle::new(&store);
    let turma = lifecycle
        .create(&mut state, &session, &TurmaDraft::new("9º A", 2024))
        .unwrap();
    let key = InFlightKey::Turma(turma.id.clone());

    let stale = lifecycle.request_delete(&mut state, &session, &turma.id).unwrap();
    state.reset();
    let fresh = lifecycle.request_delete(&mut state, &session, &turma.id).unwrap();

    assert_eq!(stale.cancel(&mut state.in_flight), DeleteOutcome::Aborted);
    assert!(state.in_flight.is_pending(&key));

    lifecycle
        .resolve_delete(&mut state, &session, fresh, Decision::Confirmed)
        .unwrap();
    assert!(state.in_flight.is_empty());
    assert_eq!(store.calls("delete_turma"), 1);
}
