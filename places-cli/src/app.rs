//! Process root: owns the session and runs the bootstrapper once

use std::future::Future;
use std::sync::Arc;

use anyhow::{Result, bail};
use places_core::request::ReqwestTransport;
use places_core::{
    BootstrapOutcome, Bootstrapper, FileSessionStore, Owner, PlacesApi, RouteGate, SessionMachine,
};
use tracing::debug;

use crate::config::{ConfigLoader, Overrides, PlacesConfig};

pub struct App {
    pub config: PlacesConfig,
    pub api: PlacesApi,
    pub session: Arc<SessionMachine>,
    pub gate: RouteGate,
    pub store: Arc<FileSessionStore>,
    pub bootstrap: BootstrapOutcome,
}

impl App {
    pub async fn start(overrides: &Overrides) -> Result<Self> {
        let config = ConfigLoader::resolve(overrides)?;
        let endpoints = config.client_config().endpoints()?;

        let store = Arc::new(FileSessionStore::in_data_dir());
        let session = Arc::new(SessionMachine::new(store.clone()));
        let bootstrap = Bootstrapper::new(store.clone()).run(&session).await;
        debug!(?bootstrap, path = %store.path().display(), "Session bootstrapped");

        let transport = Arc::new(ReqwestTransport::new()?);
        let api = PlacesApi::new(endpoints, transport, session.clone());
        let gate = RouteGate::new(session.clone());

        Ok(Self {
            config,
            api,
            session,
            gate,
            store,
            bootstrap,
        })
    }
}

/// Run `work` for `owner`, discarding the owner on Ctrl-C
///
/// Discarding cancels whatever the owner's controllers have in flight, so
/// an interrupted request never writes its result.
pub async fn scoped<T>(owner: Owner, work: impl Future<Output = Result<T>>) -> Result<T> {
    tokio::select! {
        result = work => result,
        _ = tokio::signal::ctrl_c() => {
            debug!(owner = owner.token().label(), "Interrupted");
            owner.discard();
            bail!("Interrupted")
        }
    }
}
