use crate::{Error, Result};
use p4bridge_protocol::{
    Callback, CommandEngine, ConnectionSettings, ExceptionLevel, RecordSet, RecordSetBuilder,
    TextResults, TextResultsBuilder, drive,
};
use std::collections::HashMap;

/// One session with a command engine.
///
/// Strictly single-threaded and non-reentrant: one command executes fully,
/// on the calling thread, before `run` returns. Sharing a connection
/// across threads is a precondition violation, not a supported mode; the
/// spec-definition cache and the engine handle are deliberately
/// unsynchronized.
pub struct Connection {
    engine: Box<dyn CommandEngine>,
    settings: ConnectionSettings,
    exception_level: ExceptionLevel,
    login_password: Option<String>,
    // Lazily populated, one spec definition per form command name.
    spec_defs: HashMap<String, String>,
    connected: bool,
}

impl Connection {
    pub fn new(engine: Box<dyn CommandEngine>, settings: ConnectionSettings) -> Self {
        Connection {
            engine,
            settings,
            exception_level: ExceptionLevel::default(),
            login_password: None,
            spec_defs: HashMap::new(),
            connected: false,
        }
    }

    pub fn exception_level(&self) -> ExceptionLevel {
        self.exception_level
    }

    pub fn set_exception_level(&mut self, level: ExceptionLevel) {
        self.exception_level = level;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Establish the engine session. A no-op when already connected. On
    /// failure the half-built handle is closed before the error
    /// propagates, so a failed connect never leaks the engine.
    pub fn connect(&mut self) -> Result<()> {
        if self.connected {
            return Ok(());
        }
        match self.engine.open(&self.settings) {
            Ok(()) => {
                self.connected = true;
                Ok(())
            }
            Err(err) => {
                self.engine.close();
                Err(Error::Initialization(err.to_string()))
            }
        }
    }

    /// Tear the session down. Safe to call repeatedly, and during partial
    /// initialization failure.
    pub fn disconnect(&mut self) {
        if self.connected {
            self.engine.close();
            self.connected = false;
        }
    }

    /// Execute a command in tagged mode and collect its output.
    ///
    /// Any failure a callback deferred during the loop is re-raised first;
    /// after that the configured [`ExceptionLevel`] decides whether the
    /// accumulated errors/warnings become an error. The error carries the
    /// full result so partial output stays inspectable.
    pub fn run(&mut self, command: &str, args: &[&str]) -> Result<RecordSet> {
        self.connect()?;
        let mut builder = RecordSetBuilder::new();
        if let Some(password) = &self.login_password {
            builder.set_login_password(password.clone());
        }
        drive(self.engine.as_mut(), command, &own(args), &mut builder)?;

        let result = builder.into_result();
        self.remember_spec_def(command, result.spec_def());
        if self.exception_level.should_raise(&result) {
            return Err(p4bridge_protocol::Error::Command(Box::new(result)).into());
        }
        Ok(result)
    }

    /// Execute a command in untagged mode, collecting stdout-like lines.
    pub fn run_unparsed(&mut self, command: &str, args: &[&str]) -> Result<TextResults> {
        self.exec_unparsed(self.exception_level, command, args)
    }

    /// Execute a command against a caller-supplied callback, no
    /// accumulation. The exception policy does not apply (there is no
    /// result to inspect); deferred callback failures still re-raise.
    pub fn run_streaming(
        &mut self,
        command: &str,
        args: &[&str],
        callback: &mut dyn Callback,
    ) -> Result<()> {
        self.connect()?;
        drive(self.engine.as_mut(), command, &own(args), callback)?;
        Ok(())
    }

    /// Authenticate with the server. The probe runs at
    /// `NoExceptionOnErrors` and inspects the outcome itself, with the
    /// password short-circuited into the login prompt.
    pub fn login(&mut self, password: &str) -> Result<()> {
        self.login_password = Some(password.to_string());
        let result = self.exec_unparsed(ExceptionLevel::NoExceptionOnErrors, "login", &[])?;
        if result.has_errors() {
            return Err(Error::InvalidLogin(result.error_message()));
        }
        Ok(())
    }

    /// Spec definition cached from an earlier run of a form command.
    pub fn cached_spec_def(&self, command: &str) -> Option<&str> {
        self.spec_defs.get(command).map(String::as_str)
    }

    fn exec_unparsed(
        &mut self,
        level: ExceptionLevel,
        command: &str,
        args: &[&str],
    ) -> Result<TextResults> {
        self.connect()?;
        let mut builder = TextResultsBuilder::new();
        if let Some(password) = &self.login_password {
            builder.set_login_password(password.clone());
        }
        drive(self.engine.as_mut(), command, &own(args), &mut builder)?;

        let result = builder.into_result();
        self.remember_spec_def(command, result.output().spec_def());
        if level.should_raise(&result) {
            return Err(p4bridge_protocol::Error::CommandUnparsed(Box::new(result)).into());
        }
        Ok(result)
    }

    fn remember_spec_def(&mut self, command: &str, spec_def: Option<&str>) {
        if let Some(spec_def) = spec_def {
            self.spec_defs
                .insert(command.to_string(), spec_def.to_string());
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn own(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
