//! Full three-leg exchange over a recording mock transport.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;
use vltava_client::{ServiceEndpoint, Settings, TokenExchangeClient, Transport};
use vltava_core::{ns, Error, Result};
use vltava_keys::Credential;
use vltava_message::{SchemaStore, SchemaValidator, ZtotozneniMessage};

const IDENTITY_URL: &str = "https://tnia.eidentita.cz/IPSTS/issue.svc/certificate";
const FEDERATION_URL: &str = "https://tnia.eidentita.cz/FPSTS/issue.svc";
const PUBLIC_URL: &str = "https://tnia.eidentita.cz/WS/submission/Public.svc/token";

struct Call {
    address: String,
    operation: String,
    envelope: String,
}

/// Replays queued responses and records every call it sees.
struct MockTransport {
    responses: Mutex<VecDeque<Result<Vec<u8>>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockTransport {
    fn new(responses: Vec<Result<Vec<u8>>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> std::sync::MutexGuard<'_, Vec<Call>> {
        self.calls.lock().unwrap()
    }
}

impl Transport for MockTransport {
    fn send(
        &self,
        endpoint: &ServiceEndpoint,
        operation: &str,
        envelope: &[u8],
    ) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(Call {
            address: endpoint.address.clone(),
            operation: operation.to_owned(),
            envelope: String::from_utf8(envelope.to_vec()).unwrap(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Transport("no response queued".into())))
    }
}

fn data(name: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name);
    std::fs::read(path).expect("fixture")
}

fn settings() -> Settings {
    Settings::new(IDENTITY_URL, FEDERATION_URL, PUBLIC_URL)
}

fn credential() -> Credential {
    Credential::from_pem(&data("cert.pem"), &data("key.pem"), None).expect("credential")
}

fn message() -> ZtotozneniMessage {
    ZtotozneniMessage::new("Eda", "Tester", NaiveDate::from_ymd_opt(2000, 5, 1).unwrap())
}

fn happy_path_transport() -> MockTransport {
    MockTransport::new(vec![
        Ok(data("ipsts_response.xml")),
        Ok(data("fpsts_response.xml")),
        Ok(data("submit_response.xml")),
    ])
}

#[test]
fn fetch_returns_pseudonym() {
    let client = TokenExchangeClient::new(settings(), credential(), happy_path_transport());
    let pseudonym = client.fetch(&message()).unwrap();
    assert_eq!(pseudonym, "1d71ff1a-d732-4485-a8dc-ad4c42a8a739");
}

#[test]
fn leg_order_and_operations() {
    let transport = happy_path_transport();
    let settings = settings();
    let credential = credential();
    {
        let client = TokenExchangeClient::new(settings, credential, &transport);
        client.fetch(&message()).unwrap();
    }
    let calls = transport.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].address, IDENTITY_URL);
    assert_eq!(calls[0].operation, "Trust13Issue");
    assert_eq!(calls[1].address, FEDERATION_URL);
    assert_eq!(calls[1].operation, "Trust13Issue");
    assert_eq!(calls[2].address, PUBLIC_URL);
    assert_eq!(calls[2].operation, "Submit");
}

#[test]
fn federation_leg_signs_with_identity_assertion() {
    let transport = happy_path_transport();
    {
        let client = TokenExchangeClient::new(settings(), credential(), &transport);
        client.fetch(&message()).unwrap();
    }
    let calls = transport.calls();

    // Leg 2 must carry the leg-1 assertion and reference it by id.
    let doc = vltava_xml::parse(&calls[1].envelope).unwrap();
    let key_id = vltava_xml::find_element(&doc, ns::WSSE, ns::node::KEY_IDENTIFIER).unwrap();
    assert_eq!(
        key_id.text().unwrap(),
        "_bd0832fa-ac6c-49ed-b50b-d1b309a1745d"
    );

    // Leg 3 carries the leg-2 assertion.
    let doc = vltava_xml::parse(&calls[2].envelope).unwrap();
    let key_id = vltava_xml::find_element(&doc, ns::WSSE, ns::node::KEY_IDENTIFIER).unwrap();
    assert_eq!(
        key_id.text().unwrap(),
        "_685a595d-fd20-426e-94dd-a9f101a37854"
    );
}

#[test]
fn submission_envelope_carries_action_and_one_body_part() {
    let transport = happy_path_transport();
    {
        let client = TokenExchangeClient::new(settings(), credential(), &transport);
        client.fetch(&message()).unwrap();
    }
    let calls = transport.calls();
    let doc = vltava_xml::parse(&calls[2].envelope).unwrap();
    let action = vltava_xml::find_element(&doc, ns::SUBMISSION, "Action").unwrap();
    assert_eq!(action.text().unwrap(), "TR_ZTOTOZNENI");
    let bodies = vltava_xml::find_element(&doc, ns::SUBMISSION, "Bodies").unwrap();
    assert_eq!(
        vltava_xml::find_children(bodies, ns::SUBMISSION, "BodyPart").len(),
        1
    );
}

#[test]
fn fault_at_identity_leg_stops_the_chain() {
    let transport = MockTransport::new(vec![Ok(data("error_response.xml"))]);
    let err = {
        let client = TokenExchangeClient::new(settings(), credential(), &transport);
        client.fetch(&message()).unwrap_err()
    };
    match err {
        Error::TrustFault(text) => {
            assert!(text.contains("The server was unable to process the request"))
        }
        other => panic!("expected TrustFault, got {other:?}"),
    }
    assert_eq!(transport.calls().len(), 1);
}

#[test]
fn fault_at_federation_leg_stops_the_chain() {
    let transport = MockTransport::new(vec![
        Ok(data("ipsts_response.xml")),
        Ok(data("error_response.xml")),
    ]);
    let err = {
        let client = TokenExchangeClient::new(settings(), credential(), &transport);
        client.fetch(&message()).unwrap_err()
    };
    assert!(matches!(err, Error::TrustFault(_)));
    assert_eq!(transport.calls().len(), 2);
}

#[test]
fn fault_at_submission_leg_surfaces() {
    let transport = MockTransport::new(vec![
        Ok(data("ipsts_response.xml")),
        Ok(data("fpsts_response.xml")),
        Ok(data("error_response.xml")),
    ]);
    let err = {
        let client = TokenExchangeClient::new(settings(), credential(), &transport);
        client.fetch(&message()).unwrap_err()
    };
    match err {
        Error::TrustFault(text) => {
            assert!(text.contains("The server was unable to process the request"))
        }
        other => panic!("expected TrustFault, got {other:?}"),
    }
    assert_eq!(transport.calls().len(), 3);
}

#[test]
fn timeout_surfaces_as_timeout() {
    let transport =
        MockTransport::new(vec![Err(Error::Timeout("Trust13Issue timed out".into()))]);
    let err = {
        let client = TokenExchangeClient::new(settings(), credential(), &transport);
        client.fetch(&message()).unwrap_err()
    };
    assert!(matches!(err, Error::Timeout(_)));
}

// ── Schema store wiring ──────────────────────────────────────────────

struct AcceptAll;

impl SchemaValidator for AcceptAll {
    fn validate(&self, _request_xml: &str) -> Result<()> {
        Ok(())
    }
}

struct RejectAll;

impl SchemaValidator for RejectAll {
    fn validate(&self, _request_xml: &str) -> Result<()> {
        Err(Error::SchemaValidation("element Jmeno not allowed".into()))
    }
}

struct FixedStore<V: SchemaValidator>(V);

impl<V: SchemaValidator> SchemaStore for FixedStore<V> {
    fn validator(&self, _schema_id: &str) -> Result<&dyn SchemaValidator> {
        Ok(&self.0)
    }
}

#[test]
fn schema_validation_runs_before_submission() {
    let transport = MockTransport::new(vec![
        Ok(data("ipsts_response.xml")),
        Ok(data("fpsts_response.xml")),
        Ok(data("submit_response.xml")),
    ]);
    {
        let client = TokenExchangeClient::new(settings(), credential(), &transport)
            .with_schema_store(Box::new(FixedStore(AcceptAll)));
        client.fetch(&message()).unwrap();
    }
    assert_eq!(transport.calls().len(), 3);
}

#[test]
fn schema_failure_aborts_before_the_submission_call() {
    let transport = MockTransport::new(vec![
        Ok(data("ipsts_response.xml")),
        Ok(data("fpsts_response.xml")),
    ]);
    let err = {
        let client = TokenExchangeClient::new(settings(), credential(), &transport)
            .with_schema_store(Box::new(FixedStore(RejectAll)));
        client.fetch(&message()).unwrap_err()
    };
    assert!(matches!(err, Error::SchemaValidation(_)));
    // The signed submission envelope never went out.
    assert_eq!(transport.calls().len(), 2);
}
