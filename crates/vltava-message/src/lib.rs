#![forbid(unsafe_code)]

//! Business message codecs: one variant per broker operation, all
//! implementing the shared [`NiaMessage`] capability trait.

pub mod codec;
pub mod evidence;
pub mod identification;
pub mod invalidation;
pub mod notification;
pub mod schema;

pub use codec::NiaMessage;
pub use evidence::{EvidenceEditMessage, EvidenceZapisMessage};
pub use identification::ZtotozneniMessage;
pub use invalidation::{ZneplatneneBsi, ZneplatneniOvereniMessage};
pub use notification::{Notifikace, NotifikaceList, NotifikaceMessage};
pub use schema::{SchemaStore, SchemaValidator};
