#![forbid(unsafe_code)]

//! The token exchange state machine.

use tracing::debug;
use vltava_core::{ns, Error, Result};
use vltava_keys::Credential;
use vltava_message::{NiaMessage, SchemaStore};
use vltava_wsse::{BinarySignature, SamlToken, SamlTokenSignature};

use crate::envelope;
use crate::response;
use crate::settings::Settings;
use crate::transport::Transport;

/// Runs the three-leg exchange: Identity STS → Federation STS →
/// Submission service.
///
/// The credential and settings are immutable and shared; every call
/// builds its own envelopes, so the client is safe to use from multiple
/// callers concurrently. There is no retry at this layer: the first
/// failed leg fails the whole exchange.
pub struct TokenExchangeClient<T: Transport> {
    settings: Settings,
    credential: Credential,
    transport: T,
    schemas: Option<Box<dyn SchemaStore + Send + Sync>>,
}

impl<T: Transport> TokenExchangeClient<T> {
    pub fn new(settings: Settings, credential: Credential, transport: T) -> Self {
        Self {
            settings,
            credential,
            transport,
            schemas: None,
        }
    }

    /// Attach a schema store for request validation.
    pub fn with_schema_store(mut self, schemas: Box<dyn SchemaStore + Send + Sync>) -> Self {
        self.schemas = Some(schemas);
        self
    }

    /// Run the full exchange for one business message and return its
    /// typed result.
    pub fn fetch<M: NiaMessage>(&self, message: &M) -> Result<M::Output> {
        let identity = self.call_identity()?;
        let federation = self.call_federation(&identity)?;
        let body = self.call_submission(&federation, message)?;
        message.unpack(&body)
    }

    /// Leg 1: request an assertion from the Identity STS, signed with the
    /// long-lived credential.
    fn call_identity(&self) -> Result<SamlToken> {
        debug!(leg = "identity", endpoint = %self.settings.identity.address, "requesting assertion");
        let body = envelope::rst_issue_identity(&self.settings.federation.address);
        let unsigned = envelope::soap_envelope(
            ns::TRUST_RST_ISSUE,
            &self.settings.identity.address,
            &body,
        );
        let signed = BinarySignature::new(&self.credential).apply(&unsigned)?;
        let raw = self
            .transport
            .send(&self.settings.identity, "Trust13Issue", signed.as_bytes())?;
        let assertion = response::extract_assertion(&utf8(&raw)?, "identity")?;
        SamlToken::from_assertion(&assertion)
    }

    /// Leg 2: exchange the identity assertion for a federation assertion.
    fn call_federation(&self, identity: &SamlToken) -> Result<SamlToken> {
        debug!(leg = "federation", endpoint = %self.settings.federation.address, "requesting assertion");
        let body = envelope::rst_issue_federation(&self.settings.public.address);
        let unsigned = envelope::soap_envelope(
            ns::TRUST_RST_ISSUE,
            &self.settings.federation.address,
            &body,
        );
        let signed = SamlTokenSignature::new(identity.clone()).apply(&unsigned)?;
        let raw = self
            .transport
            .send(&self.settings.federation, "Trust13Issue", signed.as_bytes())?;
        let assertion = response::extract_assertion(&utf8(&raw)?, "federation")?;
        SamlToken::from_assertion(&assertion)
    }

    /// Leg 3: submit the packed business message under the federation
    /// assertion and return the decoded response payload.
    fn call_submission<M: NiaMessage>(
        &self,
        federation: &SamlToken,
        message: &M,
    ) -> Result<Vec<u8>> {
        debug!(leg = "submission", action = message.action(), "submitting message");
        let packed = message.pack(self.schemas.as_deref().map(|s| s as &dyn SchemaStore))?;
        let body = envelope::submit(message.action(), &packed);
        let unsigned = envelope::soap_envelope(
            envelope::SUBMIT_ACTION,
            &self.settings.public.address,
            &body,
        );
        let signed = SamlTokenSignature::new(federation.clone()).apply(&unsigned)?;
        let raw = self
            .transport
            .send(&self.settings.public, "Submit", signed.as_bytes())?;
        response::extract_submit_body(&utf8(&raw)?, "submission")
    }
}

fn utf8(raw: &[u8]) -> Result<String> {
    String::from_utf8(raw.to_vec())
        .map_err(|e| Error::XmlParse(format!("response is not UTF-8: {e}")))
}
