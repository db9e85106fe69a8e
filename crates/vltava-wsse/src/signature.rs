#![forbid(unsafe_code)]

//! Signature preparation and verification over SOAP envelopes.
//!
//! Processing order for signing:
//! 1. Detect the envelope namespace, locate Header and Body
//! 2. Strip raw newlines from the covered Body text
//! 3. Assign a `wsu:Id` to the Body if it has none
//! 4. Insert the Security block (Timestamp + Signature template)
//! 5. Digest each referenced subtree under exc-C14N, fill `DigestValue`
//! 6. Canonicalize `SignedInfo`, sign, fill `SignatureValue`
//!
//! The template carries `KeyInfo/X509Data` when a certificate is supplied;
//! binding-specific rearrangement happens after signing, in `binding`.

use base64::Engine;
use uuid::Uuid;
use vltava_core::{algorithm, ns, Error};
use vltava_crypto::SigningKey;
use vltava_keys::CertificateInfo;
use vltava_xml::{splice, XmlWriter};

use crate::timestamp::TimestampWindow;

/// Result of signature preparation: the signed envelope text plus the ids
/// the binding step needs to attach key identification material.
#[derive(Debug)]
pub struct Prepared {
    /// The envelope with digests and signature filled in.
    pub xml: String,
    /// `wsu:Id` of the signed Body.
    pub body_id: String,
    /// `wsu:Id` of the inserted Timestamp.
    pub timestamp_id: String,
}

/// Locate the SOAP envelope namespace of a parsed document.
pub fn soap_namespace(doc: &roxmltree::Document<'_>) -> Result<&'static str, Error> {
    let root = doc.root_element();
    let tag = root.tag_name();
    if tag.name() != ns::node::ENVELOPE {
        return Err(Error::XmlStructure(format!(
            "expected a SOAP Envelope, found {}",
            tag.name()
        )));
    }
    match tag.namespace() {
        Some(uri) if uri == ns::SOAP11 => Ok(ns::SOAP11),
        Some(uri) if uri == ns::SOAP12 => Ok(ns::SOAP12),
        other => Err(Error::XmlStructure(format!(
            "unknown SOAP envelope namespace: {}",
            other.unwrap_or("<none>")
        ))),
    }
}

/// Build the signature template and sign the envelope's Body and Timestamp.
pub fn sign_envelope(
    envelope: &str,
    key: &SigningKey,
    signature_method: &str,
    certificate: Option<&CertificateInfo>,
) -> Result<Prepared, Error> {
    let digest_method = algorithm::digest_for_signature(signature_method)
        .ok_or_else(|| Error::UnsupportedAlgorithm(signature_method.to_owned()))?;

    // 1. Locate Header and Body; both are required for a signable envelope.
    let doc = vltava_xml::parse(envelope)?;
    let soap_ns = soap_namespace(&doc)?;
    let root = doc.root_element();
    vltava_xml::find_child(root, soap_ns, ns::node::HEADER)
        .ok_or_else(|| Error::MissingElement("Header".into()))?;
    let body = vltava_xml::find_child(root, soap_ns, ns::node::BODY)
        .ok_or_else(|| Error::MissingElement("Body".into()))?;

    // 2. Newlines inside covered character data would change under an
    // independent re-serialization by the verifier; remove them before
    // anything is digested.
    let text = splice::strip_text_newlines(envelope, &body.range());

    // 3. Ensure the Body has a wsu:Id to reference.
    let doc = vltava_xml::parse(&text)?;
    let body = vltava_xml::find_child(doc.root_element(), soap_ns, ns::node::BODY)
        .ok_or_else(|| Error::MissingElement("Body".into()))?;
    let (text, body_id) = match body.attribute((ns::WSU, ns::attr::WSU_ID)) {
        Some(id) => (text.clone(), id.to_owned()),
        None => {
            let id = generated_id();
            let attrs = format!(" xmlns:wsu=\"{}\" wsu:Id=\"{}\"", ns::WSU, id);
            let spliced = splice::insert_attributes(&text, body.range().start, &attrs)
                .ok_or_else(|| Error::XmlStructure("unterminated Body start tag".into()))?;
            (spliced, id)
        }
    };

    // 4. Insert the Security block into the Header.
    let timestamp_id = format!("TS-{}", Uuid::new_v4().simple());
    let block = security_block(
        &body_id,
        &timestamp_id,
        signature_method,
        digest_method,
        certificate,
    );
    let doc = vltava_xml::parse(&text)?;
    let header = vltava_xml::find_child(doc.root_element(), soap_ns, ns::node::HEADER)
        .ok_or_else(|| Error::MissingElement("Header".into()))?;
    let mut text = splice::insert_last_child(&text, &header.range(), &block)
        .ok_or_else(|| Error::XmlStructure("unterminated Header element".into()))?;

    // 5. Digest the referenced subtrees, in reference order.
    for id in [&body_id, &timestamp_id] {
        let encoded = {
            let doc = vltava_xml::parse(&text)?;
            let node = find_by_wsu_id(&doc, id)
                .ok_or_else(|| Error::MissingElement(format!("element with wsu:Id {id}")))?;
            let c14n = vltava_c14n::canonicalize_subtree(node)?;
            let value = vltava_crypto::digest::digest(digest_method, &c14n)?;
            base64::engine::general_purpose::STANDARD.encode(&value)
        };
        text = text.replacen(
            "<ds:DigestValue></ds:DigestValue>",
            &format!("<ds:DigestValue>{encoded}</ds:DigestValue>"),
            1,
        );
    }

    // 6. Canonicalize SignedInfo and sign it.
    let encoded = {
        let doc = vltava_xml::parse(&text)?;
        let signature = vltava_xml::find_element(&doc, ns::DSIG, ns::node::SIGNATURE)
            .ok_or_else(|| Error::MissingElement("Signature".into()))?;
        let signed_info = vltava_xml::find_child(signature, ns::DSIG, ns::node::SIGNED_INFO)
            .ok_or_else(|| Error::MissingElement("SignedInfo".into()))?;
        let c14n = vltava_c14n::canonicalize_subtree(signed_info)?;
        let alg = vltava_crypto::sign::from_uri(signature_method)?;
        let sig_value = alg.sign(key, &c14n)?;
        base64::engine::general_purpose::STANDARD.encode(&sig_value)
    };
    let text = text.replacen(
        "<ds:SignatureValue></ds:SignatureValue>",
        &format!("<ds:SignatureValue>{encoded}</ds:SignatureValue>"),
        1,
    );

    Ok(Prepared {
        xml: text,
        body_id,
        timestamp_id,
    })
}

/// Verify the WS-Security signature of an envelope with the given key.
///
/// Recomputes each reference digest and the `SignedInfo` signature;
/// reports digest and signature mismatches as distinct error kinds.
pub fn verify_envelope(envelope: &str, key: &SigningKey) -> Result<(), Error> {
    let doc = vltava_xml::parse(envelope)?;
    let security = vltava_xml::find_element(&doc, ns::WSSE, ns::node::SECURITY)
        .ok_or_else(|| Error::MissingElement("Security".into()))?;
    let signature = vltava_xml::find_descendant(security, ns::DSIG, ns::node::SIGNATURE)
        .ok_or_else(|| Error::MissingElement("Signature".into()))?;
    let signed_info = vltava_xml::find_child(signature, ns::DSIG, ns::node::SIGNED_INFO)
        .ok_or_else(|| Error::MissingElement("SignedInfo".into()))?;

    let c14n_method = vltava_xml::find_child(signed_info, ns::DSIG, ns::node::CANONICALIZATION_METHOD)
        .ok_or_else(|| Error::MissingElement("CanonicalizationMethod".into()))?;
    let c14n_uri = c14n_method
        .attribute(ns::attr::ALGORITHM)
        .ok_or_else(|| Error::MissingAttribute("Algorithm on CanonicalizationMethod".into()))?;
    if c14n_uri != algorithm::EXC_C14N {
        return Err(Error::UnsupportedAlgorithm(format!("C14N: {c14n_uri}")));
    }

    let sig_method = vltava_xml::find_child(signed_info, ns::DSIG, ns::node::SIGNATURE_METHOD)
        .ok_or_else(|| Error::MissingElement("SignatureMethod".into()))?;
    let sig_method_uri = sig_method
        .attribute(ns::attr::ALGORITHM)
        .ok_or_else(|| Error::MissingAttribute("Algorithm on SignatureMethod".into()))?;

    let id_map = vltava_xml::build_id_map(&doc, &[(ns::WSU, ns::attr::WSU_ID)]);

    for reference in vltava_xml::find_children(signed_info, ns::DSIG, ns::node::REFERENCE) {
        let uri = reference
            .attribute(ns::attr::URI)
            .ok_or_else(|| Error::MissingAttribute("URI on Reference".into()))?;
        let id = uri
            .strip_prefix('#')
            .ok_or_else(|| Error::XmlStructure(format!("unsupported reference URI: {uri}")))?;
        let node_id = id_map
            .get(id)
            .ok_or_else(|| Error::MissingElement(format!("referenced element {uri}")))?;
        let node = doc.get_node(*node_id).ok_or_else(|| {
            Error::MissingElement(format!("referenced element {uri}"))
        })?;

        let digest_method = vltava_xml::find_child(reference, ns::DSIG, ns::node::DIGEST_METHOD)
            .ok_or_else(|| Error::MissingElement("DigestMethod".into()))?;
        let digest_uri = digest_method
            .attribute(ns::attr::ALGORITHM)
            .ok_or_else(|| Error::MissingAttribute("Algorithm on DigestMethod".into()))?;

        let c14n = vltava_c14n::canonicalize_subtree(node)?;
        let computed = vltava_crypto::digest::digest(digest_uri, &c14n)?;

        let digest_value = vltava_xml::find_child(reference, ns::DSIG, ns::node::DIGEST_VALUE)
            .and_then(|n| n.text())
            .unwrap_or("");
        let expected = decode_base64(digest_value)?;
        if computed != expected {
            return Err(Error::DigestMismatch(uri.to_owned()));
        }
    }

    let sig_value = vltava_xml::find_child(signature, ns::DSIG, ns::node::SIGNATURE_VALUE)
        .and_then(|n| n.text())
        .ok_or_else(|| Error::MissingElement("SignatureValue".into()))?;
    let sig_bytes = decode_base64(sig_value)?;

    let c14n = vltava_c14n::canonicalize_subtree(signed_info)?;
    let alg = vltava_crypto::sign::from_uri(sig_method_uri)?;
    if !alg.verify(key, &c14n, &sig_bytes)? {
        return Err(Error::SignatureInvalid(
            "SignedInfo signature mismatch".into(),
        ));
    }
    Ok(())
}

/// Find an element by `wsu:Id` (or plain `Id`) value.
fn find_by_wsu_id<'a>(
    doc: &'a roxmltree::Document<'a>,
    id: &str,
) -> Option<roxmltree::Node<'a, 'a>> {
    let map = vltava_xml::build_id_map(doc, &[(ns::WSU, ns::attr::WSU_ID)]);
    map.get(id).and_then(|node_id| doc.get_node(*node_id))
}

fn generated_id() -> String {
    format!("id-{}", Uuid::new_v4().simple())
}

fn decode_base64(value: &str) -> Result<Vec<u8>, Error> {
    let clean: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(clean.as_bytes())
        .map_err(|e| Error::Base64(e.to_string()))
}

/// Render the Security header block: Timestamp first, then the Signature
/// template with empty digest and signature values.
fn security_block(
    body_id: &str,
    timestamp_id: &str,
    signature_method: &str,
    digest_method: &str,
    certificate: Option<&CertificateInfo>,
) -> String {
    let window = TimestampWindow::now();
    let mut w = XmlWriter::new();
    w.start_element(
        "wsse:Security",
        &[("xmlns:wsse", ns::WSSE), ("xmlns:wsu", ns::WSU)],
    );

    w.start_element("wsu:Timestamp", &[("wsu:Id", timestamp_id)]);
    w.text_element("wsu:Created", &[], &window.created());
    w.text_element("wsu:Expires", &[], &window.expires());
    w.end_element();

    w.start_element("ds:Signature", &[("xmlns:ds", ns::DSIG)]);
    w.start_element("ds:SignedInfo", &[]);
    w.empty_element(
        "ds:CanonicalizationMethod",
        &[("Algorithm", algorithm::EXC_C14N)],
    );
    w.empty_element("ds:SignatureMethod", &[("Algorithm", signature_method)]);
    for id in [body_id, timestamp_id] {
        let uri = format!("#{id}");
        w.start_element("ds:Reference", &[("URI", uri.as_str())]);
        w.start_element("ds:Transforms", &[]);
        w.empty_element("ds:Transform", &[("Algorithm", algorithm::EXC_C14N)]);
        w.end_element();
        w.empty_element("ds:DigestMethod", &[("Algorithm", digest_method)]);
        w.start_element("ds:DigestValue", &[]);
        w.end_element();
        w.end_element();
    }
    w.end_element(); // SignedInfo
    w.start_element("ds:SignatureValue", &[]);
    w.end_element();
    w.start_element("ds:KeyInfo", &[]);
    if let Some(cert) = certificate {
        w.start_element("ds:X509Data", &[]);
        w.start_element("ds:X509IssuerSerial", &[]);
        w.text_element("ds:X509IssuerName", &[], cert.issuer());
        w.text_element("ds:X509SerialNumber", &[], cert.serial());
        w.end_element();
        w.text_element("ds:X509Certificate", &[], &cert.base64());
        w.end_element();
    }
    w.end_element(); // KeyInfo
    w.end_element(); // Signature
    w.end_element(); // Security
    w.into_string()
}
