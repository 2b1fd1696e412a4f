//! Backend commands queued from UI to backend worker.

use shared::domain::{Round, Year};

/// Each fetch carries the generation of the selection that issued it so the
/// controller can drop responses for superseded selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendCommand {
    FetchRaces {
        generation: u64,
        year: Year,
    },
    FetchResults {
        generation: u64,
        year: Year,
        round: Round,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::FetchRaces { .. } => "fetch_races",
            BackendCommand::FetchResults { .. } => "fetch_results",
        }
    }
}
