//! places-core - session and request lifecycle for the places client
//!
//! This crate owns who the user is and how network work is scoped:
//!
//! - [`store`]: the durable slot holding the last-known credential
//! - [`session`]: the session state machine and the startup bootstrapper
//! - [`request`]: per-call-site request controllers, owner tokens and
//!   transports
//! - [`routes`]: which destinations the current session may reach
//! - [`api`]: the places API call sites built on the pieces above
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use places_core::request::ReqwestTransport;
//! use places_core::{
//!     Bootstrapper, ClientConfig, FileSessionStore, Owner, PlacesApi, RouteGate, SessionMachine,
//! };
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(FileSessionStore::in_data_dir());
//!     let session = Arc::new(SessionMachine::new(store.clone()));
//!     Bootstrapper::new(store).run(&session).await;
//!
//!     let endpoints = ClientConfig::from_env().endpoints()?;
//!     let api = PlacesApi::new(endpoints, Arc::new(ReqwestTransport::new()?), session.clone());
//!
//!     let owner = Owner::new("users-page");
//!     let users = api.users(&owner.controller(api.transport())).await?;
//!     println!("{} users, landing at {:?}", users.len(), RouteGate::new(session).resolve("/"));
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod request;
pub mod routes;
pub mod session;
pub mod store;

pub use api::PlacesApi;
pub use config::{ClientConfig, Endpoints};
pub use error::{ConfigError, PlacesError, RequestError, SessionError, StoreError};
pub use request::{Owner, RequestController, Transport};
pub use routes::{Destination, Resolution, RouteGate, derive_routes};
pub use session::{Bootstrapper, BootstrapOutcome, SessionMachine, SessionStatus};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
