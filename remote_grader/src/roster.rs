//! Roster input: the list of candidates to grade in one run.

use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::error::Result;

/// One roster row. Loaded once at startup and immutable thereafter.
///
/// The host column may be named either `ip` or `host_address`; extra columns
/// are ignored.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
pub struct CandidateRecord {
    pub candidate_id: String,
    #[serde(alias = "ip")]
    pub host_address: String,
}

/// Reads the roster CSV. Any failure here is fatal to the run: with no
/// roster there is nothing to recover into.
pub fn load_roster(path: &Path) -> Result<Vec<CandidateRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut candidates = Vec::new();
    for record in reader.deserialize() {
        candidates.push(record?);
    }
    debug!("loaded {} candidate(s) from roster", candidates.len());
    Ok(candidates)
}
