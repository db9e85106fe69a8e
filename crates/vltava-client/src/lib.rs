#![forbid(unsafe_code)]

//! The three-leg WS-Trust token exchange against the national identity
//! broker: Identity service → Federation service → Submission service.
//!
//! Each leg signs its envelope with the key material produced by the
//! previous leg and the legs are strictly sequential; a failure anywhere
//! aborts the whole exchange with the original error kind intact.

pub mod client;
pub mod envelope;
pub mod response;
pub mod settings;
pub mod transport;

pub use client::TokenExchangeClient;
pub use settings::{ServiceEndpoint, Settings};
pub use transport::{HttpTransport, Transport};
