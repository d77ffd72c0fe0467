// Error types
pub mod error;

// User-facing callback trait
pub mod callback;

// Engine boundary (event-sourcing contract + engine trait + settings)
pub mod events;

// Session state machine with the deferred-failure cell
pub mod session;

// Result accumulation (parsed and unparsed shapes)
pub mod result;

// Accumulating callbacks that populate result sets
pub mod accumulate;

// Exception policy
pub mod policy;

pub use accumulate::{RecordSetBuilder, TextResultsBuilder};
pub use callback::Callback;
pub use error::{Error, Result};
pub use events::{ClientEvents, CommandEngine, ConnectionSettings};
pub use policy::{CommandOutcome, ExceptionLevel};
pub use result::{RecordSet, ResultBuffer, TextResults};
pub use session::{CallbackSession, SessionState, drive};
