//! Backend access.
//!
//! - [`transport`]: the `Transport` trait every backend implements
//! - [`http`]: `reqwest`-based transport (feature `http-transport`)
//! - [`local`]: in-memory route table for tests and offline use
//! - [`admin`]: typed admin endpoints
//! - [`token`]: bearer token storage
//! - [`factory`]: transport selection from configuration

pub mod admin;
pub mod factory;
#[cfg(feature = "http-transport")]
pub mod http;
pub mod local;
pub mod sample;
pub mod token;
pub mod transport;

pub use admin::AdminApi;
pub use factory::{TransportFactory, TransportType};
#[cfg(feature = "http-transport")]
pub use http::HttpTransport;
pub use local::{LocalTransport, RecordedRequest};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use transport::{Method, Query, Transport};
