use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a resolve callback disposes of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeResolution {
    /// Stop resolving entirely
    Quit,
    /// Leave this file for a later resolve
    Skip,
    /// Accept the result file with manual edits
    AcceptEdit,
    /// Accept the merged result
    AcceptMerged,
    /// Accept the server's revision
    AcceptTheirs,
    /// Accept the client's revision
    AcceptYours,
}

/// Description of one file the engine is asking to resolve.
///
/// Snapshot of the engine's merge data: file names and local paths for the
/// base/yours/theirs/result revisions, chunk counts, and the engine's own
/// suggested resolution. The engine reclaims its merge handle as soon as the
/// resolve callback returns, so everything is copied out up front.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequest {
    pub base_name: String,
    pub your_name: String,
    pub their_name: String,

    pub base_file: Option<PathBuf>,
    pub your_file: Option<PathBuf>,
    pub their_file: Option<PathBuf>,
    pub result_file: Option<PathBuf>,

    pub your_chunks: i32,
    pub their_chunks: i32,
    pub both_chunks: i32,
    pub conflict_chunks: i32,

    /// Resolution the engine itself would pick (`p4 resolve -am` behavior)
    pub merge_hint: MergeResolution,
}

impl MergeRequest {
    /// True when the engine found overlapping edits that need a human.
    pub fn has_conflicts(&self) -> bool {
        self.conflict_chunks > 0
    }
}
