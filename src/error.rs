use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while validating a search configuration.
///
/// The search itself cannot fail; finding no combination that respects the power limit is
/// reported as `None` by `Optimizer::search`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Resistor series is empty")]
    EmptySeries,

    #[error("Series value {value} at index {index} must be positive and finite")]
    InvalidSeriesValue { index: usize, value: f64 },

    #[error("Unknown resistor series: {0}")]
    UnknownSeries(String),

    #[error("Combination tolerance {0} must lie strictly between 0 and 1")]
    InvalidTolerance(f64),

    #[error("Decade range {start}..={end} is empty")]
    EmptyDecades { start: i32, end: i32 },

    #[error("Supply voltage {0} must be positive and finite")]
    InvalidSupply(f64),

    #[error("Power limit {0} mW must be positive")]
    InvalidPowerLimit(f64),

    #[error("Target voltage {value} for {state} is not finite")]
    InvalidTarget { state: &'static str, value: f64 },

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
