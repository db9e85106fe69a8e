#![forbid(unsafe_code)]

pub use vltava_c14n as c14n;
pub use vltava_client as client;
pub use vltava_core as core;
pub use vltava_crypto as crypto;
pub use vltava_keys as keys;
pub use vltava_message as message;
pub use vltava_wsse as wsse;
pub use vltava_xml as xml;
