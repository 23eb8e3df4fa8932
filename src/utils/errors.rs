use thiserror::Error;

/// `SimulationError` enumerates all possible errors returned by queue_sim
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Represents an invalid model configuration, detected before the run
    #[error("An invalid model configuration was encountered: {0}")]
    InvalidModelConfiguration(String),

    /// Represents an invalid model state, such as releasing an idle server
    #[error("An invalid model state was encountered: {0}")]
    InvalidModelState(String),

    /// Represents an event scheduled (or dequeued) earlier than the clock
    #[error("An event was scheduled at {time}, before the current simulation time {now}")]
    EventSchedulingError { time: f64, now: f64 },

    /// Represents an internal logic error, where prerequisite calculations were not executed
    #[error("An internal logic error occured, where prerequisite calculations were not executed")]
    PrerequisiteCalcError,

    /// Represents a failed conversion to num-traits Float
    #[error("Failed to convert to a Float value")]
    FloatConvError,

    /// Transparent serde_json errors
    #[error(transparent)]
    JSONError(#[from] serde_json::error::Error),

    /// Transparent serde_yaml errors
    #[error(transparent)]
    YAMLError(#[from] serde_yaml::Error),

    /// Transparent Exponential distribution errors
    #[error(transparent)]
    ExpError(#[from] rand_distr::ExpError),

    /// Transparent Weighted Index distribution errors
    #[error(transparent)]
    WeightedError(#[from] rand_distr::WeightedError),
}
