//! Builders for the sample data the scripted engine plays back.

use p4bridge_record::WireRecord;
use p4bridge_types::{Diagnostic, MergeRequest, MergeResolution, Severity};

/// Build a wire record from key/value pairs.
pub fn wire(pairs: &[(&str, &str)]) -> WireRecord {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Build a diagnostic with no variables.
pub fn diag(severity: Severity, identity: i32, text: &str) -> Diagnostic {
    Diagnostic::new(severity, identity, text, [])
}

pub fn info_diag(text: &str) -> Diagnostic {
    diag(Severity::Info, 1, text)
}

pub fn warning_diag(text: &str) -> Diagnostic {
    diag(Severity::Warning, 2, text)
}

pub fn error_diag(text: &str) -> Diagnostic {
    diag(Severity::Failed, 3, text)
}

/// A conflict-free merge request for one file.
pub fn merge_request(name: &str) -> MergeRequest {
    MergeRequest {
        base_name: format!("//depot/{}#1", name),
        your_name: format!("//client/{}", name),
        their_name: format!("//depot/{}#2", name),
        base_file: None,
        your_file: None,
        their_file: None,
        result_file: None,
        your_chunks: 1,
        their_chunks: 0,
        both_chunks: 0,
        conflict_chunks: 0,
        merge_hint: MergeResolution::AcceptMerged,
    }
}
