// Error types
pub mod error;

// Connection lifecycle and command execution
pub mod connection;

// Settings resolution from the process environment
pub mod settings;

pub use connection::Connection;
pub use error::{Error, Result};
pub use settings::settings_from_env;

// The surface callers actually program against
pub use p4bridge_protocol::{
    Callback, CommandEngine, ConnectionSettings, ExceptionLevel, RecordSet, TextResults,
};
pub use p4bridge_record::{DecodedRecord, WireRecord};
pub use p4bridge_types::{Diagnostic, MergeRequest, MergeResolution, Severity};
