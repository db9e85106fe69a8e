#![forbid(unsafe_code)]

//! Key-binding variants over the shared signature preparation.
//!
//! The three bindings differ only in how the recipient is told which key
//! signed the message. All of them rearrange `KeyInfo` strictly after the
//! signing pass: the signature covers Body and Timestamp only, so the
//! rearrangement is outside the signed content.

use uuid::Uuid;
use vltava_core::{algorithm, ns, Error};
use vltava_crypto::SigningKey;
use vltava_keys::Credential;
use vltava_xml::{splice, XmlWriter};

use crate::signature::{sign_envelope, verify_envelope};
use crate::token::SamlToken;

/// Certificate binding via a `BinarySecurityToken`.
///
/// The base64 DER certificate travels in a token inserted after the
/// Timestamp; `KeyInfo` holds a `SecurityTokenReference/Reference` pointing
/// at the token id. The inline `X509Data` becomes redundant and is removed.
pub struct BinarySignature<'a> {
    credential: &'a Credential,
    signature_method: &'static str,
}

impl<'a> BinarySignature<'a> {
    pub fn new(credential: &'a Credential) -> Self {
        Self {
            credential,
            signature_method: algorithm::RSA_SHA1,
        }
    }

    /// Override the default RSA-SHA1 signature method.
    pub fn with_signature_method(mut self, uri: &'static str) -> Self {
        self.signature_method = uri;
        self
    }

    /// Sign the envelope and attach the binary token binding.
    pub fn apply(&self, envelope: &str) -> Result<String, Error> {
        let key = self.credential.signing_key()?;
        let prepared = sign_envelope(
            envelope,
            &key,
            self.signature_method,
            Some(self.credential.certificate()),
        )?;

        let token_id = format!("id-{}", Uuid::new_v4().simple());

        // Reference the token from KeyInfo, dropping the inline X509Data.
        let token_uri = format!("#{token_id}");
        let mut w = XmlWriter::new();
        w.start_element("wsse:SecurityTokenReference", &[]);
        w.empty_element(
            "wsse:Reference",
            &[
                ("URI", token_uri.as_str()),
                ("ValueType", ns::X509_TOKEN_PROFILE),
            ],
        );
        w.end_element();
        let text = replace_key_info(&prepared.xml, &w.into_string())?;

        // The token itself goes into the security header, after the
        // Timestamp.
        let mut w = XmlWriter::new();
        w.text_element(
            "wsse:BinarySecurityToken",
            &[
                ("wsu:Id", token_id.as_str()),
                ("ValueType", ns::X509_TOKEN_PROFILE),
                ("EncodingType", ns::BASE64_ENCODING),
            ],
            &self.credential.certificate().base64(),
        );
        insert_after_timestamp(&text, &w.into_string())
    }

    /// Verify an envelope against the credential's public key.
    pub fn verify(&self, envelope: &str) -> Result<(), Error> {
        verify_envelope(envelope, &self.credential.verification_key())
    }
}

/// Certificate binding with the X.509 data kept inline in `KeyInfo`.
pub struct MemorySignature<'a> {
    credential: &'a Credential,
    signature_method: &'static str,
}

impl<'a> MemorySignature<'a> {
    pub fn new(credential: &'a Credential) -> Self {
        Self {
            credential,
            signature_method: algorithm::RSA_SHA1,
        }
    }

    /// Override the default RSA-SHA1 signature method.
    pub fn with_signature_method(mut self, uri: &'static str) -> Self {
        self.signature_method = uri;
        self
    }

    /// Sign the envelope, wrapping the inline X.509 data in a
    /// `SecurityTokenReference`.
    pub fn apply(&self, envelope: &str) -> Result<String, Error> {
        let key = self.credential.signing_key()?;
        let prepared = sign_envelope(
            envelope,
            &key,
            self.signature_method,
            Some(self.credential.certificate()),
        )?;

        let doc = vltava_xml::parse(&prepared.xml)?;
        let x509 = key_info_x509(&doc)?;
        let x509_xml = prepared.xml[x509.range()].to_owned();
        let mut w = XmlWriter::new();
        w.start_element("wsse:SecurityTokenReference", &[]);
        w.raw(&x509_xml);
        w.end_element();
        replace_key_info(&prepared.xml, &w.into_string())
    }

    /// Verify an envelope against the credential's public key.
    pub fn verify(&self, envelope: &str) -> Result<(), Error> {
        verify_envelope(envelope, &self.credential.verification_key())
    }
}

/// SAML assertion binding with a symmetric proof key.
///
/// HMAC-SHA1 replaces RSA-SHA1: the proof key is derived from the
/// assertion, not from an asymmetric credential. The raw assertion element
/// is carried in the security header and referenced by its assertion id.
pub struct SamlTokenSignature {
    token: SamlToken,
}

impl SamlTokenSignature {
    pub fn new(token: SamlToken) -> Self {
        Self { token }
    }

    /// Sign the envelope with the assertion's proof key and attach the
    /// SAML token binding.
    pub fn apply(&self, envelope: &str) -> Result<String, Error> {
        let key = SigningKey::Hmac(self.token.secret().to_vec());
        let prepared = sign_envelope(envelope, &key, algorithm::HMAC_SHA1, None)?;

        let mut w = XmlWriter::new();
        w.start_element(
            "wsse:SecurityTokenReference",
            &[("TokenType", ns::SAML_TOKEN_PROFILE_11)],
        );
        w.text_element(
            "wsse:KeyIdentifier",
            &[("ValueType", ns::SAML_ASSERTION_ID)],
            self.token.id(),
        );
        w.end_element();
        let text = replace_key_info(&prepared.xml, &w.into_string())?;

        insert_after_timestamp(&text, self.token.assertion_xml())
    }

    /// Verify an envelope against the assertion's proof key.
    pub fn verify(&self, envelope: &str) -> Result<(), Error> {
        let key = SigningKey::Hmac(self.token.secret().to_vec());
        verify_envelope(envelope, &key)
    }
}

// ── Rearrangement helpers ────────────────────────────────────────────

/// Replace the content of the signature's `KeyInfo` with `content`,
/// removing whatever the template put there.
fn replace_key_info(text: &str, content: &str) -> Result<String, Error> {
    let doc = vltava_xml::parse(text)?;
    let signature = vltava_xml::find_element(&doc, ns::DSIG, ns::node::SIGNATURE)
        .ok_or_else(|| Error::MissingElement("Signature".into()))?;
    let key_info = vltava_xml::find_child(signature, ns::DSIG, ns::node::KEY_INFO)
        .ok_or_else(|| Error::MissingElement("KeyInfo".into()))?;
    let range = key_info.range();
    let inner_start = splice::start_tag_close(text, range.start)
        .map(|p| p + 1)
        .ok_or_else(|| Error::XmlStructure("unterminated KeyInfo start tag".into()))?;
    let inner_end = splice::end_tag_start(text, &range)
        .ok_or_else(|| Error::XmlStructure("KeyInfo has no end tag".into()))?;
    let mut out = String::with_capacity(text.len() + content.len());
    out.push_str(&text[..inner_start]);
    out.push_str(content);
    out.push_str(&text[inner_end..]);
    Ok(out)
}

/// Insert pre-serialized XML immediately after the security Timestamp.
fn insert_after_timestamp(text: &str, content: &str) -> Result<String, Error> {
    let doc = vltava_xml::parse(text)?;
    let security = vltava_xml::find_element(&doc, ns::WSSE, ns::node::SECURITY)
        .ok_or_else(|| Error::MissingElement("Security".into()))?;
    let timestamp = vltava_xml::find_child(security, ns::WSU, ns::node::TIMESTAMP)
        .ok_or_else(|| Error::MissingElement("Timestamp".into()))?;
    let at = timestamp.range().end;
    let mut out = String::with_capacity(text.len() + content.len());
    out.push_str(&text[..at]);
    out.push_str(content);
    out.push_str(&text[at..]);
    Ok(out)
}

/// The `X509Data` element inside the signature's `KeyInfo`.
fn key_info_x509<'a>(
    doc: &'a roxmltree::Document<'a>,
) -> Result<roxmltree::Node<'a, 'a>, Error> {
    let signature = vltava_xml::find_element(doc, ns::DSIG, ns::node::SIGNATURE)
        .ok_or_else(|| Error::MissingElement("Signature".into()))?;
    let key_info = vltava_xml::find_child(signature, ns::DSIG, ns::node::KEY_INFO)
        .ok_or_else(|| Error::MissingElement("KeyInfo".into()))?;
    vltava_xml::find_child(key_info, ns::DSIG, ns::node::X509_DATA)
        .ok_or_else(|| Error::MissingElement("X509Data".into()))
}
