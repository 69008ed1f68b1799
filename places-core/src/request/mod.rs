//! Network-bound operations and their lifecycle

pub mod controller;
pub mod http;
pub mod mock;
pub mod owner;
pub mod transport;

// Re-export key types for convenience
pub use controller::{RequestController, RequestState};
pub use http::ReqwestTransport;
pub use mock::{Gate, MockTransport};
pub use owner::{Owner, OwnerToken};
pub use transport::{
    ApiRequest, FormPart, HttpMethod, MultipartForm, RawResponse, RequestBody, Transport,
};
