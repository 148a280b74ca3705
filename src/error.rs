use std::path::PathBuf;

use thiserror::Error;

/// A static content catalog that cannot be used. Raised at load time only.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("catalog has no cities")]
    NoCities,
    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },
    #[error("city `{city}` connects to unknown city `{target}`")]
    UnknownConnection { city: String, target: String },
    #[error("city `{city}` lists `{target}` but `{target}` does not list it back")]
    AsymmetricConnection { city: String, target: String },
    #[error("city `{city}` garrisons unknown general `{general}`")]
    UnknownGarrison { city: String, general: String },
    #[error("skill `{skill}` costs {cost} stars; expected 1 to 3")]
    StarCost { skill: String, cost: u32 },
    #[error("event `{event}` has no outcomes")]
    NoOutcomes { event: String },
    #[error("event `{event}` outcome probabilities sum to {total}, expected 100")]
    OutcomeTotal { event: String, total: f64 },
}

/// A fault raised while a turn phase runs. Contained by the turn runner.
#[derive(Debug, Error)]
pub enum PhaseError {
    #[error("unknown city `{0}`")]
    UnknownCity(String),
    #[error("unknown general `{0}`")]
    UnknownGeneral(String),
    #[error("event `{0}` has no outcomes")]
    NoOutcomes(String),
    #[error("{0}")]
    Other(String),
}

/// A draft command the current round cannot accept. Nothing is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("skill `{0}` is not offered this round")]
    NotOffered(String),
    #[error("skill `{skill}` costs {cost} stars but only {remaining} remain")]
    Unaffordable {
        skill: String,
        cost: u32,
        remaining: u32,
    },
    #[error("the draft is already complete")]
    Closed,
}
