use crate::Result;
use p4bridge_record::WireRecord;
use p4bridge_types::{Diagnostic, MergeRequest, MergeResolution};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The event-sourcing contract between the engine's command loop and the
/// session driving it.
///
/// The engine calls these in whatever order one command's execution
/// produces, ending with exactly one `finished`, and polls `is_alive` at
/// its own intervals. All methods are infallible by construction: the
/// engine's loop cannot unwind through a failure, so the implementor (the
/// session) is the failure boundary.
pub trait ClientEvents {
    /// A server message (error, warning, or informational).
    fn diagnostic(&mut self, diagnostic: Diagnostic);

    /// One flat tagged record.
    fn record(&mut self, wire: WireRecord);

    /// A bare output line. `level` is the engine's indent level.
    fn info(&mut self, level: char, data: &str);

    /// A chunk of file content.
    fn content(&mut self, chunk: &[u8], is_text: bool);

    /// The engine expects text appended to `buffer` to send upstream.
    fn input_data(&mut self, buffer: &mut String);

    /// The engine expects an interactive answer.
    fn prompt(&mut self, message: &str) -> String;

    /// The engine asks for an editor on a local form file.
    fn edit_file(&mut self, path: &Path);

    /// The engine asks how to resolve one file.
    fn resolve(&mut self, merge: &MergeRequest) -> MergeResolution;

    /// Spec definition announcement for form commands.
    fn spec_def(&mut self, spec_def: &str);

    /// The command is done; the last event of every run.
    fn finished(&mut self);

    /// Cooperative cancellation poll. Returning false asks the engine to
    /// stop the current command as soon as it reaches a poll point.
    fn is_alive(&mut self) -> bool;
}

/// Handle to the native command loop.
///
/// Implementations own the transport and wire protocol; this core only
/// ever drives them through this narrow surface. One engine serves one
/// thread: commands execute fully, one at a time, on the caller's stack.
pub trait CommandEngine {
    /// Establish the session. Failures here are engine-fatal; the
    /// implementation must release anything it half-built before
    /// returning the error.
    fn open(&mut self, settings: &ConnectionSettings) -> Result<()>;

    /// Execute one command, delivering its events to `events`
    /// synchronously on the calling thread.
    fn run(&mut self, command: &str, args: &[String], events: &mut dyn ClientEvents) -> Result<()>;

    /// Tear the session down. Must be safe to call repeatedly and after a
    /// failed `open`.
    fn close(&mut self);
}

/// Connection parameters handed to [`CommandEngine::open`].
///
/// All optional; the engine applies its own defaults for anything unset,
/// typically from the environment or its ticket files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionSettings {
    pub port: Option<String>,
    pub user: Option<String>,
    pub client: Option<String>,
    pub host: Option<String>,
    pub cwd: Option<String>,
    pub password: Option<String>,
    pub charset: Option<String>,
    pub ticket_file: Option<String>,
    /// Name reported to the server as the calling program
    pub program: Option<String>,
    pub program_version: Option<String>,
    /// Protocol api level to pin, if any
    pub api_level: Option<u32>,
    pub max_results: Option<u32>,
    pub max_scan_rows: Option<u32>,
    pub max_lock_time: Option<u32>,
}
