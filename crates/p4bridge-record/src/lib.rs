// Decoded record type (public API)
pub mod record;

// Wire-to-structured decoding
mod decode;

pub use record::{DecodedRecord, WireRecord};
