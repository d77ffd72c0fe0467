use crate::callback::Callback;
use crate::events::{ClientEvents, CommandEngine};
use crate::{Error, Result};
use p4bridge_record::{DecodedRecord, WireRecord};
use p4bridge_types::{Diagnostic, MergeRequest, MergeResolution};
use std::path::Path;

/// Where a session is in its lifecycle. `Completed` and `Faulted` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed, no event delivered yet
    Idle,
    /// The engine has begun dispatching events
    Executing,
    /// Finished fired with no failure recorded
    Completed,
    /// A callback failed; the deferred cell is set
    Faulted,
}

/// Binds one user [`Callback`] to one engine invocation.
///
/// A failure inside a callback cannot be allowed to unwind through the
/// engine's command loop, so the session captures the first one into a
/// write-once deferred cell and turns the dispatch into a benign default.
/// Once the cell is set, every further event is a silent no-op: user code
/// is never re-entered and the first failure is never overwritten. The
/// caller takes the cell after the engine returns; that is the only point
/// a callback failure becomes visible.
pub struct CallbackSession<'a> {
    callback: &'a mut dyn Callback,
    deferred: Option<anyhow::Error>,
    state: SessionState,
}

impl<'a> CallbackSession<'a> {
    pub fn new(callback: &'a mut dyn Callback) -> Self {
        CallbackSession {
            callback,
            deferred: None,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Remove and return the deferred failure, if one was captured.
    pub fn take_deferred(&mut self) -> Option<anyhow::Error> {
        self.deferred.take()
    }

    /// Run one callback inside the failure boundary. Skipped entirely when
    /// the session is already faulted; a failure faults the session and
    /// yields `fallback` so the engine's loop unwinds normally.
    fn dispatch<T>(
        &mut self,
        fallback: T,
        f: impl FnOnce(&mut dyn Callback) -> anyhow::Result<T>,
    ) -> T {
        if self.deferred.is_some() {
            return fallback;
        }
        if self.state == SessionState::Idle {
            self.state = SessionState::Executing;
        }
        match f(self.callback) {
            Ok(value) => value,
            Err(err) => {
                self.fault(err);
                fallback
            }
        }
    }

    fn fault(&mut self, err: anyhow::Error) {
        // Write-once: first failure wins.
        if self.deferred.is_none() {
            self.deferred = Some(err);
        }
        self.state = SessionState::Faulted;
    }
}

impl ClientEvents for CallbackSession<'_> {
    fn diagnostic(&mut self, diagnostic: Diagnostic) {
        self.dispatch((), |cb| cb.output_diagnostic(diagnostic));
    }

    fn record(&mut self, wire: WireRecord) {
        // Decode inside the boundary so a faulted session skips the work.
        self.dispatch((), |cb| cb.output_record(DecodedRecord::decode(&wire)));
    }

    fn info(&mut self, _level: char, data: &str) {
        self.dispatch((), |cb| cb.output_info(data));
    }

    fn content(&mut self, chunk: &[u8], is_text: bool) {
        self.dispatch((), |cb| cb.output_content(chunk, is_text));
    }

    fn input_data(&mut self, buffer: &mut String) {
        let mut staged = String::new();
        self.dispatch((), |cb| cb.input_data(&mut staged));
        // A faulted dispatch sends the empty buffer upstream; the engine
        // still gets a well-formed (if vacuous) answer.
        *buffer = staged;
    }

    fn prompt(&mut self, message: &str) -> String {
        let mut response = String::new();
        self.dispatch((), |cb| cb.prompt(message, &mut response));
        response
    }

    fn edit_file(&mut self, path: &Path) {
        self.dispatch((), |cb| cb.edit_file(path));
    }

    fn resolve(&mut self, merge: &MergeRequest) -> MergeResolution {
        self.dispatch(MergeResolution::Quit, |cb| cb.resolve(merge))
    }

    fn spec_def(&mut self, spec_def: &str) {
        // Bookkeeping, not output: delivered even mid-fault, infallible.
        self.callback.set_spec_def(spec_def);
    }

    fn finished(&mut self) {
        self.dispatch((), |cb| cb.finished());
        self.state = if self.deferred.is_some() {
            SessionState::Faulted
        } else {
            SessionState::Completed
        };
    }

    fn is_alive(&mut self) -> bool {
        if self.deferred.is_some() {
            return false;
        }
        match self.callback.cancel_requested() {
            Ok(cancel) => !cancel,
            Err(err) => {
                self.fault(err);
                false
            }
        }
    }
}

/// Drive one command through an engine with `callback` attached, then
/// re-raise any failure the session deferred.
pub fn drive(
    engine: &mut dyn CommandEngine,
    command: &str,
    args: &[String],
    callback: &mut dyn Callback,
) -> Result<()> {
    let mut session = CallbackSession::new(callback);
    let outcome = engine.run(command, args, &mut session);

    // The deferred failure outranks the engine's own verdict: if a
    // callback failed, that is what the caller must see, whatever state
    // the loop unwound in.
    if let Some(err) = session.take_deferred() {
        return Err(Error::Callback(err));
    }
    outcome
}
