#![forbid(unsafe_code)]

//! SAML assertion token material.
//!
//! An assertion received from a trust service carries an embedded symmetric
//! proof key (`trust:BinarySecret`) and an `AssertionID`; both are needed
//! to drive the SAML signature binding on the next leg.

use base64::Engine;
use vltava_core::{ns, Error};

/// A parsed SAML assertion with its proof key.
///
/// The assertion XML itself stays opaque: it is re-inserted into the next
/// envelope untouched.
#[derive(Debug, Clone)]
pub struct SamlToken {
    assertion: String,
    id: String,
    secret: Vec<u8>,
}

impl SamlToken {
    /// Extract the proof key and assertion id from a raw assertion element.
    pub fn from_assertion(assertion_xml: &str) -> Result<Self, Error> {
        let doc = vltava_xml::parse(assertion_xml)?;
        let root = doc.root_element();

        let id = root
            .attribute(ns::attr::ASSERTION_ID)
            .ok_or_else(|| {
                Error::ProtocolShape("assertion has no AssertionID attribute".into())
            })?
            .to_owned();

        // An assertion without an embedded secret cannot drive the next
        // leg; report the malformed shape rather than an empty key.
        let secret_node = vltava_xml::find_descendant(root, ns::WS_TRUST, ns::node::BINARY_SECRET)
            .ok_or_else(|| Error::ProtocolShape("assertion has no BinarySecret".into()))?;
        let secret_b64 = secret_node.text().unwrap_or("").trim();
        let secret = base64::engine::general_purpose::STANDARD
            .decode(secret_b64.as_bytes())
            .map_err(|e| Error::Base64(e.to_string()))?;

        Ok(Self {
            assertion: assertion_xml.trim().to_owned(),
            id,
            secret,
        })
    }

    /// The assertion's unique identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The symmetric proof key.
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// The raw assertion element.
    pub fn assertion_xml(&self) -> &str {
        &self.assertion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assertion(secret: &str) -> String {
        format!(
            r#"<saml:Assertion xmlns:saml="{saml}" xmlns:trust="{trust}" AssertionID="_a1b2"><saml:AttributeStatement/><trust:BinarySecret>{secret}</trust:BinarySecret></saml:Assertion>"#,
            saml = ns::SAML,
            trust = ns::WS_TRUST,
        )
    }

    #[test]
    fn test_extracts_id_and_secret() {
        let token = SamlToken::from_assertion(&assertion("c2VjcmV0LWtleQ==")).unwrap();
        assert_eq!(token.id(), "_a1b2");
        assert_eq!(token.secret(), b"secret-key");
    }

    #[test]
    fn test_missing_secret_is_protocol_shape() {
        let xml = format!(
            r#"<saml:Assertion xmlns:saml="{}" AssertionID="_a1b2"/>"#,
            ns::SAML
        );
        assert!(matches!(
            SamlToken::from_assertion(&xml),
            Err(Error::ProtocolShape(_))
        ));
    }

    #[test]
    fn test_missing_id_is_protocol_shape() {
        let xml = format!(
            r#"<saml:Assertion xmlns:saml="{}" xmlns:trust="{}"><trust:BinarySecret>AA==</trust:BinarySecret></saml:Assertion>"#,
            ns::SAML,
            ns::WS_TRUST
        );
        assert!(matches!(
            SamlToken::from_assertion(&xml),
            Err(Error::ProtocolShape(_))
        ));
    }

    #[test]
    fn test_bad_base64_secret() {
        assert!(matches!(
            SamlToken::from_assertion(&assertion("!!notbase64!!")),
            Err(Error::Base64(_))
        ));
    }
}
