#![forbid(unsafe_code)]

//! Response envelope handling: SOAP fault mapping, assertion extraction,
//! and submission payload decoding.

use base64::Engine;
use vltava_core::{ns, Error, Result};
use vltava_xml::splice;

/// Map a SOAP fault in the response body to a `TrustFault` carrying the
/// fault text. Handles both 1.1 (`faultstring`) and 1.2 (`Reason/Text`).
pub fn check_fault(doc: &roxmltree::Document<'_>) -> Result<()> {
    for soap_ns in [ns::SOAP12, ns::SOAP11] {
        if let Some(fault) = vltava_xml::find_element(doc, soap_ns, ns::node::FAULT) {
            let text = vltava_xml::find_child(fault, soap_ns, "Reason")
                .and_then(|reason| vltava_xml::find_child(reason, soap_ns, "Text"))
                .and_then(vltava_xml::element_text)
                .or_else(|| {
                    fault
                        .children()
                        .find(|n| n.is_element() && n.tag_name().name() == "faultstring")
                        .and_then(vltava_xml::element_text)
                })
                .unwrap_or("service reported an unspecified fault");
            return Err(Error::TrustFault(text.to_owned()));
        }
    }
    Ok(())
}

/// Pull the issued assertion out of a trust service response.
///
/// Named-path traversal: `RequestSecurityTokenResponse` (with or without
/// the surrounding collection) → `RequestedSecurityToken` → its single
/// element child. Any missing step is a protocol-shape error naming the
/// leg.
pub fn extract_assertion(response_xml: &str, leg: &str) -> Result<String> {
    let doc = vltava_xml::parse(response_xml)?;
    check_fault(&doc)?;

    let rstr = vltava_xml::find_element(&doc, ns::WS_TRUST, ns::node::RST_RESPONSE)
        .ok_or_else(|| {
            Error::ProtocolShape(format!("{leg}: no RequestSecurityTokenResponse in response"))
        })?;
    let requested = vltava_xml::find_child(rstr, ns::WS_TRUST, ns::node::REQUESTED_SECURITY_TOKEN)
        .ok_or_else(|| {
            Error::ProtocolShape(format!("{leg}: response carries no RequestedSecurityToken"))
        })?;
    let assertion = requested
        .children()
        .find(|n| n.is_element())
        .ok_or_else(|| {
            Error::ProtocolShape(format!("{leg}: RequestedSecurityToken is empty"))
        })?;

    self_contained(&response_xml[assertion.range()], assertion)
}

/// Decode the base64-wrapped business payload of a submission response.
pub fn extract_submit_body(response_xml: &str, leg: &str) -> Result<Vec<u8>> {
    let doc = vltava_xml::parse(response_xml)?;
    check_fault(&doc)?;

    let encoded = vltava_xml::find_element(&doc, ns::SUBMISSION, ns::node::BODY_BASE64_XML)
        .and_then(vltava_xml::element_text)
        .ok_or_else(|| Error::ProtocolShape(format!("{leg}: response has no BodyBase64XML")))?;
    let clean: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(clean.as_bytes())
        .map_err(|e| Error::Base64(e.to_string()))
}

/// Make an extracted fragment parse on its own by copying any namespace
/// bindings it inherited from ancestors onto its root start tag.
///
/// Real broker assertions declare their namespaces on themselves, so this
/// is normally a no-op.
fn self_contained(fragment: &str, node: roxmltree::Node<'_, '_>) -> Result<String> {
    if vltava_xml::parse(fragment).is_ok() {
        return Ok(fragment.to_owned());
    }
    let close = splice::start_tag_close(fragment, 0)
        .ok_or_else(|| Error::XmlStructure("unterminated assertion start tag".into()))?;
    let head = &fragment[..close];

    let mut attrs = String::new();
    for decl in node.namespaces() {
        let key = match decl.name() {
            Some(prefix) => format!("xmlns:{prefix}="),
            None => "xmlns=".to_owned(),
        };
        if !head.contains(&key) {
            attrs.push_str(&format!(" {}\"{}\"", key, decl.uri()));
        }
    }
    let patched = splice::insert_attributes(fragment, 0, &attrs)
        .ok_or_else(|| Error::XmlStructure("unterminated assertion start tag".into()))?;
    vltava_xml::parse(&patched)?;
    Ok(patched)
}
