#![forbid(unsafe_code)]

//! Cryptographic primitives for the WS-Security signature profile: digest
//! and signature algorithms dispatched by their XML-DSig URIs.

pub mod digest;
pub mod sign;

pub use sign::SigningKey;
