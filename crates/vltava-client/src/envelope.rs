#![forbid(unsafe_code)]

//! SOAP 1.2 envelope and WS-Trust payload construction.

use uuid::Uuid;
use vltava_core::ns;
use vltava_xml::XmlWriter;

/// wsa:Action of the submission service's Submit operation.
pub const SUBMIT_ACTION: &str =
    "http://www.government-gateway.cz/wcf/submission/Public/Submit";

/// Wrap a body payload in a SOAP 1.2 envelope with WS-Addressing headers.
pub fn soap_envelope(action: &str, to: &str, body: &str) -> String {
    let message_id = format!("urn:uuid:{}", Uuid::new_v4());
    let mut w = XmlWriter::new();
    w.start_element(
        "s:Envelope",
        &[("xmlns:s", ns::SOAP12), ("xmlns:a", ns::WSA)],
    );
    w.start_element("s:Header", &[]);
    w.text_element("a:Action", &[("s:mustUnderstand", "1")], action);
    w.text_element("a:MessageID", &[], &message_id);
    w.text_element("a:To", &[("s:mustUnderstand", "1")], to);
    w.end_element();
    w.start_element("s:Body", &[]);
    w.raw(body);
    w.end_element();
    w.end_element();
    w.into_string()
}

/// The first-leg `RequestSecurityToken`: token type, request type, key
/// type, and an `AppliesTo` naming the federation service.
pub fn rst_issue_identity(applies_to: &str) -> String {
    let mut w = XmlWriter::new();
    w.start_element("trust:RequestSecurityToken", &[("xmlns:trust", ns::WS_TRUST)]);
    w.text_element("trust:TokenType", &[], ns::SAML);
    w.text_element("trust:RequestType", &[], ns::TRUST_ISSUE);
    w.text_element("trust:KeyType", &[], ns::TRUST_SYMMETRIC_KEY);
    applies_to_element(&mut w, applies_to);
    w.end_element();
    w.into_string()
}

/// The second-leg `RequestSecurityToken`: an `AppliesTo` naming the
/// submission service plus the request type.
pub fn rst_issue_federation(applies_to: &str) -> String {
    let mut w = XmlWriter::new();
    w.start_element("trust:RequestSecurityToken", &[("xmlns:trust", ns::WS_TRUST)]);
    applies_to_element(&mut w, applies_to);
    w.text_element("trust:RequestType", &[], ns::TRUST_ISSUE);
    w.end_element();
    w.into_string()
}

/// The third-leg `Submit`: the operation's action id and a single body
/// part wrapping the packed business element.
pub fn submit(action: &str, packed_body: &str) -> String {
    let mut w = XmlWriter::new();
    w.start_element("sub:Submit", &[("xmlns:sub", ns::SUBMISSION)]);
    w.text_element("sub:Action", &[], action);
    w.start_element("sub:Bodies", &[]);
    w.start_element("sub:BodyPart", &[]);
    w.start_element("sub:Body", &[]);
    w.raw(packed_body);
    w.end_element();
    w.end_element();
    w.end_element();
    w.start_element("sub:SignAlg", &[]);
    w.end_element();
    w.end_element();
    w.into_string()
}

fn applies_to_element(w: &mut XmlWriter, address: &str) {
    w.start_element("wsp:AppliesTo", &[("xmlns:wsp", ns::WSP)]);
    w.start_element("wsa:EndpointReference", &[("xmlns:wsa", ns::WSA)]);
    w.text_element("wsa:Address", &[], address);
    w.end_element();
    w.end_element();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_has_addressing_headers() {
        let envelope = soap_envelope("urn:action", "https://example.test/sts", "<x/>");
        let doc = vltava_xml::parse(&envelope).unwrap();
        let action = vltava_xml::find_element(&doc, ns::WSA, "Action").unwrap();
        assert_eq!(action.text().unwrap(), "urn:action");
        let to = vltava_xml::find_element(&doc, ns::WSA, "To").unwrap();
        assert_eq!(to.text().unwrap(), "https://example.test/sts");
        assert!(vltava_xml::find_element(&doc, ns::WSA, "MessageID").is_some());
    }

    #[test]
    fn test_identity_rst_payload() {
        let body = rst_issue_identity("https://example.test/fpsts");
        let doc = vltava_xml::parse(&body).unwrap();
        let token_type =
            vltava_xml::find_element(&doc, ns::WS_TRUST, ns::node::TOKEN_TYPE).unwrap();
        assert_eq!(token_type.text().unwrap(), ns::SAML);
        let key_type = vltava_xml::find_element(&doc, ns::WS_TRUST, ns::node::KEY_TYPE).unwrap();
        assert_eq!(key_type.text().unwrap(), ns::TRUST_SYMMETRIC_KEY);
        let address = vltava_xml::find_element(&doc, ns::WSA, "Address").unwrap();
        assert_eq!(address.text().unwrap(), "https://example.test/fpsts");
    }

    #[test]
    fn test_federation_rst_has_no_key_type() {
        let body = rst_issue_federation("https://example.test/public");
        let doc = vltava_xml::parse(&body).unwrap();
        assert!(vltava_xml::find_element(&doc, ns::WS_TRUST, ns::node::KEY_TYPE).is_none());
        let request_type =
            vltava_xml::find_element(&doc, ns::WS_TRUST, ns::node::REQUEST_TYPE).unwrap();
        assert_eq!(request_type.text().unwrap(), ns::TRUST_ISSUE);
    }

    #[test]
    fn test_submit_wraps_one_body_part() {
        let body = submit("TR_ZTOTOZNENI", "<q:Req xmlns:q=\"urn:q\"/>");
        let doc = vltava_xml::parse(&body).unwrap();
        let action = vltava_xml::find_element(&doc, ns::SUBMISSION, "Action").unwrap();
        assert_eq!(action.text().unwrap(), "TR_ZTOTOZNENI");
        let bodies = vltava_xml::find_element(&doc, ns::SUBMISSION, "Bodies").unwrap();
        let parts = vltava_xml::find_children(bodies, ns::SUBMISSION, "BodyPart");
        assert_eq!(parts.len(), 1);
        assert!(vltava_xml::find_element(&doc, "urn:q", "Req").is_some());
    }
}
