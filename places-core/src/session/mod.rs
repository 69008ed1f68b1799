//! Session management

pub mod bootstrap;
pub mod machine;
pub mod state;

// Re-export key types for convenience
pub use bootstrap::{BootstrapOutcome, Bootstrapper};
pub use machine::SessionMachine;
pub use state::{
    AuthSource, Credentials, SessionEpoch, SessionEvent, SessionSnapshot, SessionState,
    SessionStatus,
};
