#![forbid(unsafe_code)]

//! Pseudonym-invalidation query (`TR_ZNEPLATNENI_OVERENI`): list the
//! pseudonyms whose verification the broker has invalidated.

use vltava_core::{Error, Result};
use vltava_xml::XmlWriter;

use crate::codec::NiaMessage;

const REQUEST_NS: &str = "urn:nia.zneplatneniOvereni/request:v1";
const RESPONSE_NS: &str = "urn:nia.zneplatneniOvereni/response:v1";

/// One invalidated pseudonym.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZneplatneneBsi {
    pub bsi: String,
    pub invalidated_at: String,
}

/// The invalidation query carries no parameters.
#[derive(Debug, Clone, Default)]
pub struct ZneplatneniOvereniMessage;

impl NiaMessage for ZneplatneniOvereniMessage {
    type Output = Vec<ZneplatneneBsi>;

    fn request_namespace(&self) -> &'static str {
        REQUEST_NS
    }

    fn response_namespace(&self) -> &'static str {
        RESPONSE_NS
    }

    fn response_root(&self) -> &'static str {
        "ZneplatneniOvereniResponse"
    }

    fn action(&self) -> &'static str {
        "TR_ZNEPLATNENI_OVERENI"
    }

    fn create_request(&self) -> Result<String> {
        let mut w = XmlWriter::new();
        w.empty_element("ZneplatneniOvereniRequest", &[("xmlns", REQUEST_NS)]);
        Ok(w.into_string())
    }

    fn extract(&self, response: roxmltree::Node<'_, '_>) -> Result<Vec<ZneplatneneBsi>> {
        let mut invalidated = Vec::new();
        if let Some(list) =
            vltava_xml::find_child(response, RESPONSE_NS, "SeznamZneplatnenychBsi")
        {
            for item in vltava_xml::find_children(list, RESPONSE_NS, "ZneplatneneBsi") {
                invalidated.push(ZneplatneneBsi {
                    bsi: required_text(item, "Bsi")?,
                    invalidated_at: required_text(item, "DatumACasZneplatneni")?,
                });
            }
        }
        Ok(invalidated)
    }
}

fn required_text(item: roxmltree::Node<'_, '_>, name: &str) -> Result<String> {
    vltava_xml::find_child(item, RESPONSE_NS, name)
        .and_then(vltava_xml::element_text)
        .map(str::to_owned)
        .ok_or_else(|| Error::ProtocolShape(format!("ZneplatneneBsi has no {name}")))
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
    fn test_parse_list() {
        let response = wrap(
            "<ZneplatneniOvereniResponse xmlns=\"urn:nia.zneplatneniOvereni/response:v1\">\
             <Status>OK</Status>\
             <SeznamZneplatnenychBsi>\
             <ZneplatneneBsi><Bsi>bsi-1</Bsi><DatumACasZneplatneni>2018-01-05T09:12:00</DatumACasZneplatneni></ZneplatneneBsi>\
             <ZneplatneneBsi><Bsi>bsi-2</Bsi><DatumACasZneplatneni>2018-02-11T16:40:21</DatumACasZneplatneni></ZneplatneneBsi>\
             </SeznamZneplatnenychBsi>\
             </ZneplatneniOvereniResponse>",
        );
        let result = ZneplatneniOvereniMessage
            .unpack(response.as_bytes())
            .unwrap();
        assert_eq!(
            result,
            vec![
                ZneplatneneBsi {
                    bsi: "bsi-1".into(),
                    invalidated_at: "2018-01-05T09:12:00".into(),
                },
                ZneplatneneBsi {
                    bsi: "bsi-2".into(),
                    invalidated_at: "2018-02-11T16:40:21".into(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_empty() {
        let response = wrap(
            "<ZneplatneniOvereniResponse xmlns=\"urn:nia.zneplatneniOvereni/response:v1\">\
             <Status>OK</Status><SeznamZneplatnenychBsi/></ZneplatneniOvereniResponse>",
        );
        assert!(ZneplatneniOvereniMessage
            .unpack(response.as_bytes())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_missing_item_field() {
        let response = wrap(
            "<ZneplatneniOvereniResponse xmlns=\"urn:nia.zneplatneniOvereni/response:v1\">\
             <Status>OK</Status>\
             <SeznamZneplatnenychBsi><ZneplatneneBsi><Bsi>bsi-1</Bsi></ZneplatneneBsi></SeznamZneplatnenychBsi>\
             </ZneplatneniOvereniResponse>",
        );
        assert!(matches!(
            ZneplatneniOvereniMessage.unpack(response.as_bytes()),
            Err(Error::ProtocolShape(_))
        ));
    }
}
