#![forbid(unsafe_code)]

//! Client settings: service endpoints and transport configuration.

use std::time::Duration;

/// A pre-resolved service endpoint: where to send the envelope and which
/// WSDL binding the request is built for.
#[derive(Debug, Clone)]
pub struct ServiceEndpoint {
    pub address: String,
    pub binding: String,
}

impl ServiceEndpoint {
    pub fn new(address: impl Into<String>, binding: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            binding: binding.into(),
        }
    }
}

/// Settings for one broker environment.
///
/// Immutable once constructed; shared read-only by every call.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Identity provider STS (first leg).
    pub identity: ServiceEndpoint,
    /// Federation provider STS (second leg).
    pub federation: ServiceEndpoint,
    /// Public submission service (third leg).
    pub public: ServiceEndpoint,
    /// Timeout handed to the transport at construction.
    pub transport_timeout: Duration,
}

impl Settings {
    /// Build settings from the three endpoint addresses, with the broker's
    /// standard binding names and a 10 second transport timeout.
    pub fn new(
        identity_address: impl Into<String>,
        federation_address: impl Into<String>,
        public_address: impl Into<String>,
    ) -> Self {
        Self {
            identity: ServiceEndpoint::new(identity_address, "WS2007HttpBinding_IWSTrust13Sync2"),
            federation: ServiceEndpoint::new(
                federation_address,
                "WS2007FederationHttpBinding_IWSTrust13Sync",
            ),
            public: ServiceEndpoint::new(public_address, "Token"),
            transport_timeout: Duration::from_secs(10),
        }
    }

    /// Override the transport timeout.
    pub fn with_transport_timeout(mut self, timeout: Duration) -> Self {
        self.transport_timeout = timeout;
        self
    }
}
