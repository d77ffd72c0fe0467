use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Severity of a protocol diagnostic, ordered from least to most severe.
///
/// The numeric values mirror the engine's error severities, so ordering
/// comparisons (`severity >= Severity::Failed`) are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// No error; plain output with no severity attached
    Empty = 0,
    /// Informational message, not necessarily a problem
    Info = 1,
    /// A minor error occurred
    Warning = 2,
    /// The command was used incorrectly or failed
    Failed = 3,
    /// Fatal error, the command cannot be processed
    Fatal = 4,
}

impl Severity {
    /// Whether this severity counts as an error (Failed or Fatal).
    pub fn is_error(self) -> bool {
        matches!(self, Severity::Failed | Severity::Fatal)
    }

    /// Map an engine severity code to a `Severity`.
    ///
    /// Codes above the known range are treated as Fatal rather than
    /// rejected; the engine is the authority on its own codes.
    pub fn from_code(code: u8) -> Severity {
        match code {
            0 => Severity::Empty,
            1 => Severity::Info,
            2 => Severity::Warning,
            3 => Severity::Failed,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Empty => "empty",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Failed => "failed",
            Severity::Fatal => "fatal",
        };
        write!(f, "{}", label)
    }
}

/// Immutable snapshot of one protocol message.
///
/// Captures everything from the engine's error object at construction time
/// (severity, numeric identity, pre-formatted text, named variables) so no
/// handle to the engine needs to outlive the callback that delivered it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    severity: Severity,
    identity: i32,
    text: String,
    vars: BTreeMap<String, String>,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        identity: i32,
        text: impl Into<String>,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Diagnostic {
            severity,
            identity,
            text: text.into(),
            vars: vars.into_iter().collect(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Numeric identity code assigned by the server to this message.
    pub fn identity(&self) -> i32 {
        self.identity
    }

    /// The formatted display text of the message.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Names of the message variables, in sorted order.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Value of a named message variable, if present.
    pub fn get(&self, var: &str) -> Option<&str> {
        self.vars.get(var).map(String::as_str)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
