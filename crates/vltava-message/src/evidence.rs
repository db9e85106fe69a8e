#![forbid(unsafe_code)]

//! Authenticator registration (`TR_EVIDENCE_VIP_ZAPIS`) and update
//! (`TR_EVIDENCE_VIP_EDIT`).
//!
//! Both operations only report success or failure; the caller cares that
//! the status was `OK`, so the extractors discard the verified element.

use vltava_core::Result;
use vltava_xml::XmlWriter;

use crate::codec::NiaMessage;

const ZAPIS_REQUEST_NS: &str = "urn:nia.EvidenceVIPZapis/request:v1";
const ZAPIS_RESPONSE_NS: &str = "urn:nia.EvidenceVIPZapis/response:v1";
const EDIT_REQUEST_NS: &str = "urn:nia.EvidenceVIPEdit/request:v1";
const EDIT_RESPONSE_NS: &str = "urn:nia.EvidenceVIPEdit/response:v1";

/// Register an authenticator for a pseudonym.
#[derive(Debug, Clone)]
pub struct EvidenceZapisMessage {
    bsi: String,
    identifier: String,
    label: String,
}

impl EvidenceZapisMessage {
    pub fn new(
        bsi: impl Into<String>,
        identifier: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            bsi: bsi.into(),
            identifier: identifier.into(),
            label: label.into(),
        }
    }
}

impl NiaMessage for EvidenceZapisMessage {
    type Output = ();

    fn request_namespace(&self) -> &'static str {
        ZAPIS_REQUEST_NS
    }

    fn response_namespace(&self) -> &'static str {
        ZAPIS_RESPONSE_NS
    }

    fn response_root(&self) -> &'static str {
        "EvidenceVIPZapisResponse"
    }

    fn action(&self) -> &'static str {
        "TR_EVIDENCE_VIP_ZAPIS"
    }

    fn create_request(&self) -> Result<String> {
        let mut w = XmlWriter::new();
        w.start_element("EvidenceVIPZapisRequest", &[("xmlns", ZAPIS_REQUEST_NS)]);
        w.text_element("Bsi", &[], &self.bsi);
        w.text_element("IdentifikatorProstredku", &[], &self.identifier);
        w.text_element("NazevProstredku", &[], &self.label);
        w.end_element();
        Ok(w.into_string())
    }

    fn extract(&self, _response: roxmltree::Node<'_, '_>) -> Result<()> {
        Ok(())
    }
}

/// Update the state of a registered authenticator.
#[derive(Debug, Clone)]
pub struct EvidenceEditMessage {
    bsi: String,
    identifier: String,
    state: String,
}

impl EvidenceEditMessage {
    pub fn new(
        bsi: impl Into<String>,
        identifier: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            bsi: bsi.into(),
            identifier: identifier.into(),
            state: state.into(),
        }
    }
}

impl NiaMessage for EvidenceEditMessage {
    type Output = ();

    fn request_namespace(&self) -> &'static str {
        EDIT_REQUEST_NS
    }

    fn response_namespace(&self) -> &'static str {
        EDIT_RESPONSE_NS
    }

    fn response_root(&self) -> &'static str {
        "EvidenceVIPEditResponse"
    }

    fn action(&self) -> &'static str {
        "TR_EVIDENCE_VIP_EDIT"
    }

    fn create_request(&self) -> Result<String> {
        let mut w = XmlWriter::new();
        w.start_element("EvidenceVIPEditRequest", &[("xmlns", EDIT_REQUEST_NS)]);
        w.text_element("Bsi", &[], &self.bsi);
        w.text_element("IdentifikatorProstredku", &[], &self.identifier);
        w.text_element("Stav", &[], &self.state);
        w.end_element();
        Ok(w.into_string())
    }

    fn extract(&self, _response: roxmltree::Node<'_, '_>) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vltava_core::{ns, Error};

    fn wrap(content: &str) -> String {
        format!(
            "<bodies xmlns=\"{}\"><Body Id=\"0\" xmlns=\"{}\">{}</Body></bodies>",
            ns::SUBMISSION,
            ns::GOVTALK,
            content
        )
    }

    #[test]
    fn test_zapis_request_shape() {
        let request = EvidenceZapisMessage::new("bsi-1", "token-9", "Mobile key")
            .create_request()
            .unwrap();
        let doc = vltava_xml::parse(&request).unwrap();
        let root = doc.root_element();
        assert_eq!(root.tag_name().name(), "EvidenceVIPZapisRequest");
        assert_eq!(
            vltava_xml::find_child(root, ZAPIS_REQUEST_NS, "Bsi")
                .unwrap()
                .text()
                .unwrap(),
            "bsi-1"
        );
        assert_eq!(
            vltava_xml::find_child(root, ZAPIS_REQUEST_NS, "NazevProstredku")
                .unwrap()
                .text()
                .unwrap(),
            "Mobile key"
        );
    }

    #[test]
    fn test_zapis_ok_discards_element() {
        let response = wrap(
            "<EvidenceVIPZapisResponse xmlns=\"urn:nia.EvidenceVIPZapis/response:v1\">\
             <Status>OK</Status></EvidenceVIPZapisResponse>",
        );
        EvidenceZapisMessage::new("b", "i", "l")
            .unpack(response.as_bytes())
            .unwrap();
    }

    #[test]
    fn test_edit_error() {
        let response = wrap(
            "<EvidenceVIPEditResponse xmlns=\"urn:nia.EvidenceVIPEdit/response:v1\">\
             <Status>Error</Status><Detail>Unknown authenticator</Detail>\
             </EvidenceVIPEditResponse>",
        );
        match EvidenceEditMessage::new("b", "i", "Aktivni").unpack(response.as_bytes()) {
            Err(Error::TrustFault(detail)) => assert_eq!(detail, "Unknown authenticator"),
            other => panic!("expected TrustFault, got {other:?}"),
        }
    }
}
