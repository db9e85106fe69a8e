#![forbid(unsafe_code)]

//! Schema validation collaborators.
//!
//! XSD loading and compilation happen outside this crate; variants declare
//! a schema identifier and the store supplies a compiled validator for it.
//! Failure to produce a validator is a configuration error and is fatal
//! for that message variant's call.

use vltava_core::Result;

/// A compiled schema able to validate a serialized request element.
pub trait SchemaValidator {
    fn validate(&self, request_xml: &str) -> Result<()>;
}

/// Supplies compiled validators by schema identifier.
pub trait SchemaStore {
    fn validator(&self, schema_id: &str) -> Result<&dyn SchemaValidator>;
}
