mod loader;
mod types;

pub use loader::{ConfigLoader, Overrides};
pub use types::PlacesConfig;
