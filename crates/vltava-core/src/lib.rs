#![forbid(unsafe_code)]

//! Core types for the Vltava identity-broker client: the workspace error
//! taxonomy and the namespace/algorithm URI constants shared by every layer.

pub mod algorithm;
pub mod error;
pub mod ns;

pub use error::{Error, Result};
