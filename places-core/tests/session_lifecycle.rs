//! Session lifecycle across process restarts
//!
//! Each "launch" builds a fresh store and state machine over the same
//! directory, the way a restarted client would.

use std::sync::Arc;

use places_core::routes::Page;
use places_core::session::{AuthSource, Credentials, SessionEvent};
use places_core::store::PersistedSession;
use places_core::{
    BootstrapOutcome, Bootstrapper, Destination, FileSessionStore, Resolution, RouteGate,
    SessionMachine, SessionStatus, SessionStore,
};
use tempfile::TempDir;

async fn launch(dir: &TempDir) -> (Arc<SessionMachine>, BootstrapOutcome) {
    let store = Arc::new(FileSessionStore::new(dir.path()));
    let session = Arc::new(SessionMachine::new(store.clone()));
    let outcome = Bootstrapper::new(store).run(&session).await;
    (session, outcome)
}

#[tokio::test]
async fn fresh_install_starts_anonymous() {
    let dir = TempDir::new().unwrap();

    let (session, outcome) = launch(&dir).await;

    assert_eq!(outcome, BootstrapOutcome::Anonymous);
    assert_eq!(session.snapshot().status(), SessionStatus::Anonymous);
    let gate = RouteGate::new(session);
    assert_eq!(gate.resolve("/places/new"), Resolution::Redirect(Destination::Login));
}

#[tokio::test]
async fn login_survives_restart() {
    let dir = TempDir::new().unwrap();
    {
        let (session, _) = launch(&dir).await;
        session.login(Credentials::new("u1", "t1")).await.unwrap();
    }

    let (session, outcome) = launch(&dir).await;

    assert_eq!(
        outcome,
        BootstrapOutcome::Restored {
            user_id: "u1".into()
        }
    );
    let snapshot = session.snapshot();
    assert_eq!(snapshot.user_id(), Some("u1"));
    assert_eq!(snapshot.token(), Some("t1"));
    assert!(RouteGate::new(session).routes().permits(Page::NewPlace));
}

#[tokio::test]
async fn logout_survives_restart() {
    let dir = TempDir::new().unwrap();
    {
        let (session, _) = launch(&dir).await;
        session.login(Credentials::new("u1", "t1")).await.unwrap();
        session.logout().await.unwrap();
    }

    let (session, outcome) = launch(&dir).await;

    assert_eq!(outcome, BootstrapOutcome::Anonymous);
    assert!(!session.is_logged_in());
}

#[tokio::test]
async fn record_written_by_another_client_is_restored() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("user_data.json"),
        r#"{"userId":"u5","token":"t5"}"#,
    )
    .unwrap();

    let (session, outcome) = launch(&dir).await;

    assert_eq!(
        outcome,
        BootstrapOutcome::Restored {
            user_id: "u5".into()
        }
    );
    assert_eq!(session.snapshot().bearer().as_deref(), Some("Bearer t5"));
}

#[tokio::test]
async fn corrupt_record_starts_anonymous() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("user_data.json"), "{not json").unwrap();

    let (session, outcome) = launch(&dir).await;

    assert_eq!(outcome, BootstrapOutcome::Anonymous);
    assert!(!session.is_logged_in());
}

#[tokio::test]
async fn restore_is_announced_to_subscribers() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileSessionStore::new(dir.path()));
    store
        .save(&PersistedSession {
            user_id: "u2".into(),
            token: "t2".into(),
        })
        .await
        .unwrap();

    let session = SessionMachine::new(store.clone());
    let mut events = session.subscribe();
    Bootstrapper::new(store).run(&session).await;

    match events.recv().await.unwrap() {
        SessionEvent::Authenticated {
            user_id, source, ..
        } => {
            assert_eq!(user_id, "u2");
            assert_eq!(source, AuthSource::Restore);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn routes_follow_logout_without_restart() {
    let dir = TempDir::new().unwrap();
    let (session, _) = launch(&dir).await;
    let gate = RouteGate::new(session.clone());

    session.login(Credentials::new("u1", "t1")).await.unwrap();
    assert_eq!(
        gate.resolve("/places/p1"),
        Resolution::Render(Destination::UpdatePlace {
            place_id: "p1".into()
        })
    );
    assert_eq!(gate.resolve("/auth/login"), Resolution::Redirect(Destination::Users));

    session.logout().await.unwrap();
    assert_eq!(gate.resolve("/places/p1"), Resolution::Redirect(Destination::Login));
    assert_eq!(gate.resolve("/auth/login"), Resolution::Render(Destination::Login));
}
