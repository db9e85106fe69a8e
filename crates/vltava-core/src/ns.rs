#![forbid(unsafe_code)]

//! XML namespace constants used across the client.

/// SOAP 1.1 envelope namespace
pub const SOAP11: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// SOAP 1.2 envelope namespace
pub const SOAP12: &str = "http://www.w3.org/2003/05/soap-envelope";

/// WS-Security extensions namespace
pub const WSSE: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";

/// WS-Security utility namespace (Timestamp, wsu:Id)
pub const WSU: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd";

/// WS-Addressing namespace
pub const WSA: &str = "http://www.w3.org/2005/08/addressing";

/// WS-Policy namespace (AppliesTo)
pub const WSP: &str = "http://schemas.xmlsoap.org/ws/2004/09/policy";

/// WS-Trust 1.3 namespace
pub const WS_TRUST: &str = "http://docs.oasis-open.org/ws-sx/ws-trust/200512";

/// SAML 1.0 assertion namespace
pub const SAML: &str = "urn:oasis:names:tc:SAML:1.0:assertion";

/// XML Digital Signature namespace
pub const DSIG: &str = "http://www.w3.org/2000/09/xmldsig#";

/// Government gateway submission service namespace
pub const SUBMISSION: &str = "http://www.government-gateway.cz/wcf/submission";

/// GovTalk response envelope namespace
pub const GOVTALK: &str = "http://www.govtalk.gov.uk/CM/envelope";

/// XML namespace
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

// ── WS-Trust action and type URIs ────────────────────────────────────

/// RequestType / wsa:Action for token issuance
pub const TRUST_ISSUE: &str = "http://docs.oasis-open.org/ws-sx/ws-trust/200512/Issue";

/// wsa:Action for the RST Issue request message
pub const TRUST_RST_ISSUE: &str =
    "http://docs.oasis-open.org/ws-sx/ws-trust/200512/RST/Issue";

/// KeyType for a symmetric proof key
pub const TRUST_SYMMETRIC_KEY: &str =
    "http://docs.oasis-open.org/ws-sx/ws-trust/200512/SymmetricKey";

// ── WS-Security token profile URIs ───────────────────────────────────

/// ValueType of an X.509v3 binary security token
pub const X509_TOKEN_PROFILE: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-x509-token-profile-1.0#X509v3";

/// EncodingType of a base64 binary security token
pub const BASE64_ENCODING: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-soap-message-security-1.0#Base64Binary";

/// TokenType of a SAML 1.1 token reference
pub const SAML_TOKEN_PROFILE_11: &str =
    "http://docs.oasis-open.org/wss/oasis-wss-saml-token-profile-1.1#SAMLV1.1";

/// ValueType of a SAML assertion-id key identifier
pub const SAML_ASSERTION_ID: &str =
    "http://docs.oasis-open.org/wss/oasis-wss-saml-token-profile-1.0#SAMLAssertionID";

// ── Element names ────────────────────────────────────────────────────

pub mod node {
    // SOAP elements
    pub const ENVELOPE: &str = "Envelope";
    pub const HEADER: &str = "Header";
    pub const BODY: &str = "Body";
    pub const FAULT: &str = "Fault";

    // DSig elements
    pub const SIGNATURE: &str = "Signature";
    pub const SIGNED_INFO: &str = "SignedInfo";
    pub const CANONICALIZATION_METHOD: &str = "CanonicalizationMethod";
    pub const SIGNATURE_METHOD: &str = "SignatureMethod";
    pub const SIGNATURE_VALUE: &str = "SignatureValue";
    pub const DIGEST_METHOD: &str = "DigestMethod";
    pub const DIGEST_VALUE: &str = "DigestValue";
    pub const REFERENCE: &str = "Reference";
    pub const TRANSFORMS: &str = "Transforms";
    pub const TRANSFORM: &str = "Transform";
    pub const KEY_INFO: &str = "KeyInfo";
    pub const X509_DATA: &str = "X509Data";
    pub const X509_CERTIFICATE: &str = "X509Certificate";
    pub const X509_ISSUER_SERIAL: &str = "X509IssuerSerial";
    pub const X509_ISSUER_NAME: &str = "X509IssuerName";
    pub const X509_SERIAL_NUMBER: &str = "X509SerialNumber";

    // WS-Security elements
    pub const SECURITY: &str = "Security";
    pub const TIMESTAMP: &str = "Timestamp";
    pub const CREATED: &str = "Created";
    pub const EXPIRES: &str = "Expires";
    pub const BINARY_SECURITY_TOKEN: &str = "BinarySecurityToken";
    pub const SECURITY_TOKEN_REFERENCE: &str = "SecurityTokenReference";
    pub const KEY_IDENTIFIER: &str = "KeyIdentifier";

    // WS-Trust elements
    pub const REQUEST_SECURITY_TOKEN: &str = "RequestSecurityToken";
    pub const RST_RESPONSE: &str = "RequestSecurityTokenResponse";
    pub const RST_RESPONSE_COLLECTION: &str = "RequestSecurityTokenResponseCollection";
    pub const REQUESTED_SECURITY_TOKEN: &str = "RequestedSecurityToken";
    pub const BINARY_SECRET: &str = "BinarySecret";
    pub const TOKEN_TYPE: &str = "TokenType";
    pub const REQUEST_TYPE: &str = "RequestType";
    pub const KEY_TYPE: &str = "KeyType";

    // SAML elements
    pub const ASSERTION: &str = "Assertion";

    // Submission service elements
    pub const SUBMIT: &str = "Submit";
    pub const SUBMIT_RESPONSE: &str = "SubmitResponse";
    pub const BODY_BASE64_XML: &str = "BodyBase64XML";

    // GovTalk response elements
    pub const STATUS: &str = "Status";
    pub const DETAIL: &str = "Detail";
}

// ── Attribute names ──────────────────────────────────────────────────

pub mod attr {
    pub const ALGORITHM: &str = "Algorithm";
    pub const URI: &str = "URI";
    pub const WSU_ID: &str = "Id";
    pub const VALUE_TYPE: &str = "ValueType";
    pub const ENCODING_TYPE: &str = "EncodingType";
    pub const TOKEN_TYPE: &str = "TokenType";
    pub const ASSERTION_ID: &str = "AssertionID";
}
