#![forbid(unsafe_code)]

//! Notification polling (`TR_NOTIFIKACE_IDP`): fetch identity-change
//! notifications, optionally resuming from a cursor id.

use vltava_core::{Error, Result};
use vltava_xml::XmlWriter;

use crate::codec::NiaMessage;

const REQUEST_NS: &str = "urn:nia.notifikaceIdp/request:v1";
const RESPONSE_NS: &str = "urn:nia.notifikaceIdp/response:v1";

/// A single identity-change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notifikace {
    pub id: String,
    pub pseudonym: String,
    pub source: String,
}

/// One page of notifications.
///
/// An empty page still carries `last_id = None` and
/// `more_notifications = false` rather than omitting the fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifikaceList {
    pub notifications: Vec<Notifikace>,
    pub last_id: Option<String>,
    pub more_notifications: bool,
}

/// Notification polling request, with an optional cursor.
#[derive(Debug, Clone, Default)]
pub struct NotifikaceMessage {
    last_id: Option<String>,
}

impl NotifikaceMessage {
    pub fn new(last_id: Option<String>) -> Self {
        Self { last_id }
    }
}

impl NiaMessage for NotifikaceMessage {
    type Output = NotifikaceList;

    fn request_namespace(&self) -> &'static str {
        REQUEST_NS
    }

    fn response_namespace(&self) -> &'static str {
        RESPONSE_NS
    }

    fn response_root(&self) -> &'static str {
        "NotifikaceIdpResponse"
    }

    fn action(&self) -> &'static str {
        "TR_NOTIFIKACE_IDP"
    }

    fn create_request(&self) -> Result<String> {
        let mut w = XmlWriter::new();
        w.start_element("NotifikaceIdpRequest", &[("xmlns", REQUEST_NS)]);
        if let Some(id) = &self.last_id {
            w.text_element("NotifikaceIdpId", &[], id);
        }
        w.end_element();
        Ok(w.into_string())
    }

    fn extract(&self, response: roxmltree::Node<'_, '_>) -> Result<NotifikaceList> {
        let mut notifications = Vec::new();
        if let Some(list) = vltava_xml::find_child(response, RESPONSE_NS, "SeznamNotifikaceIdp")
        {
            for item in vltava_xml::find_children(list, RESPONSE_NS, "NotifikaceIdp") {
                notifications.push(Notifikace {
                    id: required_text(item, "NotifikaceIdpId")?,
                    pseudonym: required_text(item, "Bsi")?,
                    source: required_text(item, "Zdroj")?,
                });
            }
        }

        let last_id = vltava_xml::find_child(response, RESPONSE_NS, "NotifikaceIdpPosledniId")
            .and_then(vltava_xml::element_text)
            .map(str::to_owned);
        let more_notifications =
            vltava_xml::find_child(response, RESPONSE_NS, "ExistujiDalsiNotifikace")
                .and_then(vltava_xml::element_text)
                .is_some_and(|t| t == "true" || t == "1");

        Ok(NotifikaceList {
            notifications,
            last_id,
            more_notifications,
        })
    }
}

fn required_text(item: roxmltree::Node<'_, '_>, name: &str) -> Result<String> {
    vltava_xml::find_child(item, RESPONSE_NS, name)
        .and_then(vltava_xml::element_text)
        .map(str::to_owned)
        .ok_or_else(|| Error::ProtocolShape(format!("NotifikaceIdp has no {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vltava_core::ns;

    fn wrap(content: &str) -> String {
        format!(
            "<bodies xmlns=\"{}\"><Body Id=\"0\" xmlns=\"{}\">{}</Body></bodies>",
            ns::SUBMISSION,
            ns::GOVTALK,
            content
        )
    }

    #[test]
    fn test_request_carries_cursor() {
        let request = NotifikaceMessage::new(Some("131".into()))
            .create_request()
            .unwrap();
        let doc = vltava_xml::parse(&request).unwrap();
        let cursor = vltava_xml::find_element(&doc, REQUEST_NS, "NotifikaceIdpId").unwrap();
        assert_eq!(cursor.text().unwrap(), "131");
    }

    #[test]
    fn test_request_without_cursor() {
        let request = NotifikaceMessage::default().create_request().unwrap();
        let doc = vltava_xml::parse(&request).unwrap();
        assert!(vltava_xml::find_element(&doc, REQUEST_NS, "NotifikaceIdpId").is_none());
    }

    #[test]
    fn test_parse_empty_list() {
        let response = wrap(
            "<NotifikaceIdpResponse xmlns=\"urn:nia.notifikaceIdp/response:v1\">\
             <Status>OK</Status><Detail>Nebyly nalezeny zadne notifikace</Detail>\
             <SeznamNotifikaceIdp/></NotifikaceIdpResponse>",
        );
        let result = NotifikaceMessage::default()
            .unpack(response.as_bytes())
            .unwrap();
        assert_eq!(
            result,
            NotifikaceList {
                notifications: vec![],
                last_id: None,
                more_notifications: false,
            }
        );
    }

    #[test]
    fn test_parse_list() {
        let response = wrap(
            "<NotifikaceIdpResponse xmlns=\"urn:nia.notifikaceIdp/response:v1\">\
             <Status>OK</Status>\
             <SeznamNotifikaceIdp><NotifikaceIdp>\
             <NotifikaceIdpId>132</NotifikaceIdpId>\
             <Bsi>some_pseudonym</Bsi>\
             <DatumACasNotifikace>2017-12-07T14:41:01.787</DatumACasNotifikace>\
             <Zdroj>ROBREF</Zdroj>\
             <Text>Zmena referencnich udaju ROB.</Text>\
             </NotifikaceIdp></SeznamNotifikaceIdp>\
             <NotifikaceIdpPosledniId>133</NotifikaceIdpPosledniId>\
             <ExistujiDalsiNotifikace>true</ExistujiDalsiNotifikace>\
             </NotifikaceIdpResponse>",
        );
        let result = NotifikaceMessage::default()
            .unpack(response.as_bytes())
            .unwrap();
        assert_eq!(
            result,
            NotifikaceList {
                notifications: vec![Notifikace {
                    id: "132".into(),
                    pseudonym: "some_pseudonym".into(),
                    source: "ROBREF".into(),
                }],
                last_id: Some("133".into()),
                more_notifications: true,
            }
        );
    }

    #[test]
    fn test_parse_error() {
        let response = wrap(
            "<NotifikaceIdpResponse xmlns=\"urn:nia.notifikaceIdp/response:v1\">\
             <Status>Error</Status><Detail>General Error. See log for more details</Detail>\
             </NotifikaceIdpResponse>",
        );
        match NotifikaceMessage::default().unpack(response.as_bytes()) {
            Err(Error::TrustFault(detail)) => {
                assert_eq!(detail, "General Error. See log for more details")
            }
            other => panic!("expected TrustFault, got {other:?}"),
        }
    }
}
