#![forbid(unsafe_code)]

//! The transport collaborator: sends a finished envelope to an endpoint
//! and hands back the raw response bytes.

use std::time::Duration;
use vltava_core::{Error, Result};

use crate::settings::ServiceEndpoint;

/// Sends a serialized SOAP envelope and returns the raw response body.
///
/// Implementations must surface transport-layer failures distinctly from
/// anything the response body may contain; SOAP faults are classified by
/// the response parser, not here.
pub trait Transport {
    fn send(&self, endpoint: &ServiceEndpoint, operation: &str, envelope: &[u8])
        -> Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(
        &self,
        endpoint: &ServiceEndpoint,
        operation: &str,
        envelope: &[u8],
    ) -> Result<Vec<u8>> {
        (**self).send(endpoint, operation, envelope)
    }
}

/// Blocking HTTP transport.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Build a transport with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        endpoint: &ServiceEndpoint,
        operation: &str,
        envelope: &[u8],
    ) -> Result<Vec<u8>> {
        let response = self
            .client
            .post(&endpoint.address)
            .header("Content-Type", "application/soap+xml; charset=utf-8")
            .body(envelope.to_vec())
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(format!("{operation} against {}", endpoint.address))
                } else {
                    Error::Transport(format!("{operation}: {e}"))
                }
            })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(format!("{operation} against {}", endpoint.address))
                } else {
                    Error::Transport(format!("{operation}: {e}"))
                }
            })?
            .to_vec();

        // SOAP 1.2 faults arrive with HTTP 500 and a fault body; those are
        // classified by the response parser. Only a status error without a
        // body is a pure transport failure.
        if !status.is_success() && bytes.is_empty() {
            return Err(Error::Transport(format!("{operation}: HTTP {status}")));
        }
        Ok(bytes)
    }
}
