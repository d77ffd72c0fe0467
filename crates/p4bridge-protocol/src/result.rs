use crate::policy::CommandOutcome;
use p4bridge_record::DecodedRecord;
use p4bridge_types::{Diagnostic, Severity};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::ops::Index;

/// Output accumulated over one command, common to both result shapes.
///
/// Appended to exclusively during callback dispatch and conceptually
/// frozen once the command finishes; appends are O(1) and never fail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultBuffer {
    info: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    diagnostics: Vec<Diagnostic>,
    spec_def: Option<String>,
    binary_output: Option<Vec<u8>>,
}

impl ResultBuffer {
    /// Record a diagnostic and route its text by severity:
    /// Empty/Info to info, Warning to warnings, Failed/Fatal to errors.
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Empty | Severity::Info => self.info.push(diagnostic.text().to_string()),
            Severity::Warning => self.warnings.push(diagnostic.text().to_string()),
            Severity::Failed | Severity::Fatal => self.errors.push(diagnostic.text().to_string()),
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn add_info(&mut self, line: impl Into<String>) {
        self.info.push(line.into());
    }

    pub fn set_spec_def(&mut self, spec_def: impl Into<String>) {
        self.spec_def = Some(spec_def.into());
    }

    pub fn set_binary_output(&mut self, bytes: Vec<u8>) {
        self.binary_output = Some(bytes);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// All error texts concatenated, each (including the last) followed by
    /// a newline.
    pub fn error_message(&self) -> String {
        let mut message = String::new();
        for error in &self.errors {
            message.push_str(error);
            message.push('\n');
        }
        message
    }

    pub fn info(&self) -> &[String] {
        &self.info
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn spec_def(&self) -> Option<&str> {
        self.spec_def.as_deref()
    }

    pub fn binary_output(&self) -> Option<&[u8]> {
        self.binary_output.as_deref()
    }

    fn dump_into(&self, out: &mut String) {
        for diag in &self.diagnostics {
            let tag = match diag.severity() {
                Severity::Empty | Severity::Info => "info",
                Severity::Warning => "warn",
                Severity::Failed | Severity::Fatal => "erro",
            };
            let _ = writeln!(out, "... {} <{}> {}", tag, diag.identity(), diag.text());
        }
    }
}

/// Parsed ("tagged") command output: shared buffer plus decoded records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSet {
    buffer: ResultBuffer,
    records: Vec<DecodedRecord>,
}

impl RecordSet {
    pub fn add_record(&mut self, record: DecodedRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[DecodedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn output(&self) -> &ResultBuffer {
        &self.buffer
    }

    pub fn output_mut(&mut self) -> &mut ResultBuffer {
        &mut self.buffer
    }

    pub fn has_errors(&self) -> bool {
        self.buffer.has_errors()
    }

    pub fn has_warnings(&self) -> bool {
        self.buffer.has_warnings()
    }

    pub fn error_message(&self) -> String {
        self.buffer.error_message()
    }

    pub fn spec_def(&self) -> Option<&str> {
        self.buffer.spec_def()
    }

    /// Human-readable rendering of everything accumulated, for debugging.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.buffer.dump_into(&mut out);
        for record in &self.records {
            for (name, value) in record.fields() {
                let _ = writeln!(out, "... ...   {}={}", name, value);
            }
            for (name, values) in record.array_fields() {
                for (i, value) in values.iter().enumerate() {
                    let _ = writeln!(out, "... ...   {}{}={}", name, i, value);
                }
            }
        }
        out
    }
}

impl Index<usize> for RecordSet {
    type Output = DecodedRecord;

    fn index(&self, index: usize) -> &DecodedRecord {
        &self.records[index]
    }
}

/// Unparsed ("untagged") command output: shared buffer plus the raw lines
/// the command would have printed to stdout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextResults {
    buffer: ResultBuffer,
    outputs: Vec<String>,
}

impl TextResults {
    pub fn add_output(&mut self, line: impl Into<String>) {
        self.outputs.push(line.into());
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn output(&self) -> &ResultBuffer {
        &self.buffer
    }

    pub fn output_mut(&mut self) -> &mut ResultBuffer {
        &mut self.buffer
    }

    pub fn has_errors(&self) -> bool {
        self.buffer.has_errors()
    }

    pub fn has_warnings(&self) -> bool {
        self.buffer.has_warnings()
    }

    pub fn error_message(&self) -> String {
        self.buffer.error_message()
    }
}

impl Index<usize> for TextResults {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.outputs[index]
    }
}

impl CommandOutcome for ResultBuffer {
    fn has_errors(&self) -> bool {
        ResultBuffer::has_errors(self)
    }

    fn has_warnings(&self) -> bool {
        ResultBuffer::has_warnings(self)
    }
}

impl CommandOutcome for RecordSet {
    fn has_errors(&self) -> bool {
        RecordSet::has_errors(self)
    }

    fn has_warnings(&self) -> bool {
        RecordSet::has_warnings(self)
    }
}

impl CommandOutcome for TextResults {
    fn has_errors(&self) -> bool {
        TextResults::has_errors(self)
    }

    fn has_warnings(&self) -> bool {
        TextResults::has_warnings(self)
    }
}
