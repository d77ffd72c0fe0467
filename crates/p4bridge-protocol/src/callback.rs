use anyhow::Result;
use p4bridge_record::DecodedRecord;
use p4bridge_types::{Diagnostic, MergeRequest, MergeResolution};
use std::path::Path;

/// Receiver for the events one command produces.
///
/// Responsibilities:
/// - Consume command output (records, diagnostics, info lines, content)
/// - Answer the engine's requests (input, prompts, resolves)
/// - Signal cooperative cancellation
///
/// Every method may fail. A failure never unwinds into the engine's
/// command loop: the session captures the first one, suppresses all
/// further callback work for that command, and re-raises it to the caller
/// of `run` once the loop returns.
pub trait Callback {
    /// One tagged output record, already decoded.
    fn output_record(&mut self, _record: DecodedRecord) -> Result<()> {
        Ok(())
    }

    /// One server message with severity, identity and variables.
    fn output_diagnostic(&mut self, diagnostic: Diagnostic) -> Result<()>;

    /// A bare text line the engine emits without full message data.
    fn output_info(&mut self, _data: &str) -> Result<()> {
        Ok(())
    }

    /// A chunk of file content (`print`, `describe`, `diff`). Large files
    /// arrive as several chunks.
    fn output_content(&mut self, _chunk: &[u8], _is_text: bool) -> Result<()> {
        Ok(())
    }

    /// The engine wants file content to send upstream; append it to
    /// `buffer`. Called by form-input commands.
    fn input_data(&mut self, _buffer: &mut String) -> Result<()> {
        Ok(())
    }

    /// The engine wants an interactive answer; write it to `response`.
    fn prompt(&mut self, _message: &str, _response: &mut String) -> Result<()> {
        Ok(())
    }

    /// The engine asks to launch an editor on a form file. Only form
    /// workflows can service this; everything else should fail here.
    fn edit_file(&mut self, _path: &Path) -> Result<()> {
        Err(anyhow::Error::new(crate::Error::FormCommand))
    }

    /// A resolve wants a disposition for one file.
    fn resolve(&mut self, _merge: &MergeRequest) -> Result<MergeResolution> {
        Ok(MergeResolution::Quit)
    }

    /// The command is finished; no further events follow.
    fn finished(&mut self) -> Result<()> {
        Ok(())
    }

    /// Polled periodically during long-running commands. Return true to
    /// kill the current command. There is no guarantee how often the
    /// engine polls or how quickly it stops.
    fn cancel_requested(&mut self) -> Result<bool> {
        Ok(false)
    }

    /// The engine announced the spec definition for a form command.
    /// Infallible: this is bookkeeping, not output.
    fn set_spec_def(&mut self, _spec_def: &str) {}
}
