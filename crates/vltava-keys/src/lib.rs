#![forbid(unsafe_code)]

//! Key material handling: PEM loading, X.509 certificate metadata, and the
//! long-lived signing credential.

pub mod credential;
pub mod key;
pub mod loader;
pub mod x509;

pub use credential::Credential;
pub use key::{Key, KeyData};
pub use x509::CertificateInfo;
