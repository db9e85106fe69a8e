#![forbid(unsafe_code)]

//! The shared message capability trait and response status handling.

use vltava_core::{ns, Error, Result};

use crate::schema::SchemaStore;

/// One broker operation: request shape, response shape, action id and an
/// optional request schema.
///
/// The variants form a closed set; the trait exists so the exchange client
/// can drive any of them through one code path while each keeps its own
/// typed `Output`.
pub trait NiaMessage {
    /// The typed result extracted from a verified response.
    type Output;

    /// Namespace of the request body element.
    fn request_namespace(&self) -> &'static str;

    /// Namespace of the response root element.
    fn response_namespace(&self) -> &'static str;

    /// Local name of the response root element.
    fn response_root(&self) -> &'static str;

    /// The submission action identifier for this operation.
    fn action(&self) -> &'static str;

    /// Identifier of the request schema, when the variant declares one.
    fn schema(&self) -> Option<&'static str> {
        None
    }

    /// Build the operation-specific request body element.
    fn create_request(&self) -> Result<String>;

    /// Extract the typed result from a status-verified response element.
    fn extract(&self, response: roxmltree::Node<'_, '_>) -> Result<Self::Output>;

    /// Build and validate the request for transport.
    ///
    /// Validation runs before the element ever reaches the signing
    /// pipeline; variants without a declared schema skip it.
    fn pack(&self, schemas: Option<&dyn SchemaStore>) -> Result<String> {
        let request = self.create_request()?;
        if let (Some(id), Some(store)) = (self.schema(), schemas) {
            store.validator(id)?.validate(&request)?;
        }
        Ok(request)
    }

    /// Verify the response status and extract the typed result.
    fn unpack(&self, response: &[u8]) -> Result<Self::Output> {
        let text = std::str::from_utf8(response)
            .map_err(|e| Error::XmlParse(format!("response is not UTF-8: {e}")))?;
        let doc = vltava_xml::parse(text)?;
        let element = verify_response(&doc, self.response_namespace(), self.response_root())?;
        self.extract(element)
    }
}

/// Locate the response root under the GovTalk body and check its status.
///
/// Every response carries a `Status` element on both success and failure
/// paths; its absence is a protocol violation distinct from a reported
/// fault. A status other than the literal `OK` becomes a `TrustFault`
/// carrying the sibling `Detail` text.
pub fn verify_response<'a>(
    doc: &'a roxmltree::Document<'a>,
    response_ns: &str,
    response_root: &str,
) -> Result<roxmltree::Node<'a, 'a>> {
    let body = vltava_xml::find_element(doc, ns::GOVTALK, ns::node::BODY)
        .ok_or_else(|| Error::ProtocolShape("response has no GovTalk Body".into()))?;
    let response = vltava_xml::find_child(body, response_ns, response_root)
        .ok_or_else(|| Error::ProtocolShape(format!("response has no {response_root}")))?;

    let status = vltava_xml::find_child(response, response_ns, ns::node::STATUS)
        .ok_or_else(|| Error::ProtocolShape(format!("{response_root} has no Status")))?;
    if vltava_xml::element_text(status) != Some("OK") {
        let detail = vltava_xml::find_child(response, response_ns, ns::node::DETAIL)
            .and_then(vltava_xml::element_text)
            .unwrap_or_default();
        return Err(Error::TrustFault(detail.to_owned()));
    }
    Ok(response)
}
