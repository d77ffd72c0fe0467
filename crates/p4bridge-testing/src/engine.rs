//! A scripted stand-in for the native command engine.
//!
//! Plays back a fixed event sequence per command, polling liveness before
//! each event the way the real loop polls between protocol messages, and
//! always closing with `finished`.

use p4bridge_protocol::{ClientEvents, CommandEngine, ConnectionSettings, Error, Result};
use p4bridge_record::WireRecord;
use p4bridge_types::{Diagnostic, MergeRequest, MergeResolution};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::rc::Rc;

/// One scripted callback event.
#[derive(Debug, Clone)]
pub enum ScriptEvent {
    Diagnostic(Diagnostic),
    Record(WireRecord),
    Info(String),
    Content(Vec<u8>, bool),
    /// Ask the session for input data; the engine logs what it received.
    InputRequest,
    /// Ask the session to answer a prompt; the answer is logged.
    Prompt(String),
    Edit(PathBuf),
    Resolve(MergeRequest),
    SpecDef(String),
}

/// Everything a scripted engine observed, shared out so tests can inspect
/// it after the engine has been boxed into a connection.
#[derive(Debug, Default)]
pub struct EngineLog {
    pub open_calls: usize,
    pub close_calls: usize,
    pub runs: Vec<(String, Vec<String>)>,
    pub received_input: Vec<String>,
    pub prompt_answers: Vec<String>,
    pub resolutions: Vec<MergeResolution>,
    /// Runs cut short because a liveness poll returned false
    pub aborted_runs: usize,
}

pub struct ScriptedEngine {
    scripts: HashMap<String, VecDeque<Vec<ScriptEvent>>>,
    fail_open: Option<String>,
    fail_run: Option<String>,
    log: Rc<RefCell<EngineLog>>,
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedEngine {
    pub fn new() -> Self {
        ScriptedEngine {
            scripts: HashMap::new(),
            fail_open: None,
            fail_run: None,
            log: Rc::new(RefCell::new(EngineLog::default())),
        }
    }

    /// Queue a script for one invocation of `command`. Repeated calls for
    /// the same command queue further invocations; a command with no
    /// script queued runs empty (finished only).
    pub fn script(mut self, command: &str, events: Vec<ScriptEvent>) -> Self {
        self.scripts
            .entry(command.to_string())
            .or_default()
            .push_back(events);
        self
    }

    /// Make `open` fail with an engine-fatal error.
    pub fn fail_open(mut self, message: &str) -> Self {
        self.fail_open = Some(message.to_string());
        self
    }

    /// Make every `run` fail with an engine-fatal error.
    pub fn fail_run(mut self, message: &str) -> Self {
        self.fail_run = Some(message.to_string());
        self
    }

    /// Handle to the observation log; clone before boxing the engine.
    pub fn log(&self) -> Rc<RefCell<EngineLog>> {
        Rc::clone(&self.log)
    }
}

impl CommandEngine for ScriptedEngine {
    fn open(&mut self, _settings: &ConnectionSettings) -> Result<()> {
        self.log.borrow_mut().open_calls += 1;
        match &self.fail_open {
            Some(message) => Err(Error::Engine(message.clone())),
            None => Ok(()),
        }
    }

    fn run(
        &mut self,
        command: &str,
        args: &[String],
        events: &mut dyn ClientEvents,
    ) -> Result<()> {
        self.log
            .borrow_mut()
            .runs
            .push((command.to_string(), args.to_vec()));
        if let Some(message) = &self.fail_run {
            return Err(Error::Engine(message.clone()));
        }

        let script = self
            .scripts
            .get_mut(command)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_default();

        for event in script {
            if !events.is_alive() {
                self.log.borrow_mut().aborted_runs += 1;
                break;
            }
            match event {
                ScriptEvent::Diagnostic(diagnostic) => events.diagnostic(diagnostic),
                ScriptEvent::Record(record) => events.record(record),
                ScriptEvent::Info(data) => events.info('0', &data),
                ScriptEvent::Content(chunk, is_text) => events.content(&chunk, is_text),
                ScriptEvent::InputRequest => {
                    let mut buffer = String::new();
                    events.input_data(&mut buffer);
                    self.log.borrow_mut().received_input.push(buffer);
                }
                ScriptEvent::Prompt(message) => {
                    let answer = events.prompt(&message);
                    self.log.borrow_mut().prompt_answers.push(answer);
                }
                ScriptEvent::Edit(path) => events.edit_file(&path),
                ScriptEvent::Resolve(merge) => {
                    let resolution = events.resolve(&merge);
                    self.log.borrow_mut().resolutions.push(resolution);
                }
                ScriptEvent::SpecDef(spec_def) => events.spec_def(&spec_def),
            }
        }

        events.finished();
        Ok(())
    }

    fn close(&mut self) {
        self.log.borrow_mut().close_calls += 1;
    }
}
