use relief_structs::{config::ConfigError, Stage, TargetId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    #[error("swap needs a plan with at least two steps (got {len})")]
    PlanTooShort { len: usize },
    #[error("no unit in the registry can perform {stage:?}")]
    NoCapableUnit { stage: Stage },
    #[error("target id {id} is zero or repeated")]
    BadTargetId { id: TargetId },
    #[error("target {id} is not part of the scenario")]
    UnknownTarget { id: TargetId },
    #[error("cannot substitute a unit in an empty plan")]
    EmptyPlan,
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}
