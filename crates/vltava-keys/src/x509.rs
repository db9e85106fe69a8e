#![forbid(unsafe_code)]

//! X.509 certificate metadata for WS-Security key identification.
//!
//! The signature profile needs three things from the credential
//! certificate: its DER bytes (for the `BinarySecurityToken`), the issuer
//! name and the serial number (for the inline `X509IssuerSerial`).

use base64::Engine;
use der::Decode;
use vltava_core::Error;
use x509_cert::Certificate;

/// Parsed certificate metadata.
#[derive(Debug, Clone)]
pub struct CertificateInfo {
    der: Vec<u8>,
    issuer: String,
    serial: String,
}

impl CertificateInfo {
    /// Parse a DER-encoded certificate.
    pub fn from_der(der_bytes: &[u8]) -> Result<Self, Error> {
        let cert = Certificate::from_der(der_bytes)
            .map_err(|e| Error::Certificate(format!("failed to parse certificate: {e}")))?;
        let issuer = cert.tbs_certificate.issuer.to_string();
        let serial = serial_decimal(cert.tbs_certificate.serial_number.as_bytes());
        Ok(Self {
            der: der_bytes.to_vec(),
            issuer,
            serial,
        })
    }

    /// Parse the first `CERTIFICATE` block of a PEM document.
    pub fn from_pem(pem_data: &[u8]) -> Result<Self, Error> {
        let blocks = pem::parse_many(pem_data)
            .map_err(|e| Error::Certificate(format!("invalid certificate PEM: {e}")))?;
        let block = blocks
            .iter()
            .find(|b| b.tag() == "CERTIFICATE")
            .ok_or_else(|| Error::Certificate("no CERTIFICATE block in PEM input".into()))?;
        Self::from_der(block.contents())
    }

    /// The DER bytes of the certificate.
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// The certificate as standard base64, for token and `X509Certificate`
    /// content.
    pub fn base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.der)
    }

    /// The issuer distinguished name (RFC 4514 string form).
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// The serial number as a decimal string.
    pub fn serial(&self) -> &str {
        &self.serial
    }
}

/// Render a big-endian serial number as a decimal string.
fn serial_decimal(bytes: &[u8]) -> String {
    // Little-endian decimal digits; multiply by 256 and add each byte.
    let mut digits: Vec<u8> = vec![0];
    for &b in bytes {
        let mut carry = u32::from(b);
        for d in digits.iter_mut() {
            let v = u32::from(*d) * 256 + carry;
            *d = (v % 10) as u8;
            carry = v / 10;
        }
        while carry > 0 {
            digits.push((carry % 10) as u8);
            carry /= 10;
        }
    }
    digits.iter().rev().map(|d| char::from(b'0' + d)).collect()
}
