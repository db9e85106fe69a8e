#![forbid(unsafe_code)]

//! Identification lookup (`TR_ZTOTOZNENI`): match a citizen by name and
//! birth date, returning their pseudonym.

use chrono::NaiveDate;
use vltava_core::{Error, Result};
use vltava_xml::XmlWriter;

use crate::codec::NiaMessage;

const REQUEST_NS: &str = "urn:nia.ztotozneni/request:v3";
const RESPONSE_NS: &str = "urn:nia.ztotozneni/response:v4";

/// Comparison mode fixed by the broker contract: diacritics-sensitive.
const COMPARE_TYPE: &str = "diakritika";

/// Identification request data.
#[derive(Debug, Clone)]
pub struct ZtotozneniMessage {
    first_name: String,
    last_name: String,
    birth_date: NaiveDate,
}

impl ZtotozneniMessage {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birth_date: NaiveDate,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            birth_date,
        }
    }
}

impl NiaMessage for ZtotozneniMessage {
    type Output = String;

    fn request_namespace(&self) -> &'static str {
        REQUEST_NS
    }

    fn response_namespace(&self) -> &'static str {
        RESPONSE_NS
    }

    fn response_root(&self) -> &'static str {
        "ZtotozneniResponse"
    }

    fn action(&self) -> &'static str {
        "TR_ZTOTOZNENI"
    }

    fn schema(&self) -> Option<&'static str> {
        Some("ztotozneni-request-v3")
    }

    fn create_request(&self) -> Result<String> {
        let mut w = XmlWriter::new();
        w.start_element("ZtotozneniRequest", &[("xmlns", REQUEST_NS)]);
        w.text_element("Jmeno", &[], &self.first_name);
        w.text_element("Prijmeni", &[], &self.last_name);
        w.text_element(
            "DatumNarozeni",
            &[],
            &self.birth_date.format("%Y-%m-%d").to_string(),
        );
        w.text_element("TypPorovnani", &[], COMPARE_TYPE);
        w.end_element();
        Ok(w.into_string())
    }

    fn extract(&self, response: roxmltree::Node<'_, '_>) -> Result<String> {
        vltava_xml::find_child(response, RESPONSE_NS, "Pseudonym")
            .and_then(vltava_xml::element_text)
            .map(str::to_owned)
            .ok_or_else(|| Error::ProtocolShape("ZtotozneniResponse has no Pseudonym".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vltava_core::ns;

    fn message() -> ZtotozneniMessage {
        ZtotozneniMessage::new("Eda", "Tester", NaiveDate::from_ymd_opt(2000, 5, 1).unwrap())
    }

    fn wrap(content: &str) -> String {
        format!(
            "<bodies xmlns=\"{}\"><Body Id=\"0\" xmlns=\"{}\">{}</Body></bodies>",
            ns::SUBMISSION,
            ns::GOVTALK,
            content
        )
    }

    #[test]
    fn test_pack_children() {
        let request = message().create_request().unwrap();
        let doc = vltava_xml::parse(&request).unwrap();
        let root = doc.root_element();
        assert_eq!(root.tag_name().namespace(), Some(REQUEST_NS));

        let expected = [
            ("Jmeno", "Eda"),
            ("Prijmeni", "Tester"),
            ("DatumNarozeni", "2000-05-01"),
            ("TypPorovnani", "diakritika"),
        ];
        let children: Vec<_> = root.children().filter(|n| n.is_element()).collect();
        assert_eq!(children.len(), expected.len());
        for (child, (name, text)) in children.iter().zip(expected) {
            assert_eq!(child.tag_name().namespace(), Some(REQUEST_NS));
            assert_eq!(child.tag_name().name(), name);
            assert_eq!(child.text().unwrap(), text);
        }
    }

    #[test]
    fn test_parse_success() {
        let response = wrap(
            "<ZtotozneniResponse xmlns=\"urn:nia.ztotozneni/response:v4\">\
             <Status>OK</Status><Pseudonym>this is pseudonym</Pseudonym></ZtotozneniResponse>",
        );
        assert_eq!(
            message().unpack(response.as_bytes()).unwrap(),
            "this is pseudonym"
        );
    }

    #[test]
    fn test_parse_error() {
        let response = wrap(
            "<ZtotozneniResponse xmlns=\"urn:nia.ztotozneni/response:v4\">\
             <Status>Error</Status><Detail>Error parsing request</Detail></ZtotozneniResponse>",
        );
        match message().unpack(response.as_bytes()) {
            Err(Error::TrustFault(detail)) => assert_eq!(detail, "Error parsing request"),
            other => panic!("expected TrustFault, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_pseudonym() {
        let response = wrap(
            "<ZtotozneniResponse xmlns=\"urn:nia.ztotozneni/response:v4\">\
             <Status>OK</Status></ZtotozneniResponse>",
        );
        assert!(matches!(
            message().unpack(response.as_bytes()),
            Err(Error::ProtocolShape(_))
        ));
    }
}
