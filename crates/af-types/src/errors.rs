use thiserror::Error;

/// Main error type for the AdaptFit system
#[derive(Error, Debug)]
pub enum AfError {
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error("Weighting error: {0}")]
    Weighting(#[from] WeightingError),

    #[error("Objective error: {0}")]
    Objective(#[from] ObjectiveError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Caller-supplied arguments that can never produce a valid run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("sample sequence is empty")]
    EmptySamples,

    #[error("{what} has length {actual}, expected {expected}")]
    LengthMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("iteration cap must be positive")]
    ZeroIterations,

    #[error("invalid bounds for dimension {dimension}: lower {lower} > upper {upper}")]
    InvalidBounds {
        dimension: usize,
        lower: f64,
        upper: f64,
    },

    #[error("invalid value for {name}: {message}")]
    InvalidParameter { name: String, message: String },

    #[error("non-finite value in {what} at index {index}")]
    NonFinite { what: String, index: usize },
}

/// Density weighting failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeightingError {
    #[error("all {count} coordinates equal {value}: default bandwidth is zero, pass an explicit bandwidth")]
    DegenerateBandwidth { value: f64, count: usize },
}

/// Failures raised while scoring a parameter vector
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObjectiveError {
    #[error("singular model: decay rates are equal ({rate})")]
    SingularModel { rate: f64 },

    #[error("objective evaluated to a non-finite value: {value}")]
    NonFinite { value: f64 },

    #[error("objective evaluation failed: {message}")]
    EvaluationFailed { message: String },
}

/// Sample loading errors
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Data file not found: {path}")]
    FileNotFound { path: String },

    #[error("Data loading failed: {message}")]
    LoadingFailed { message: String },

    #[error("Data parsing error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("No valid samples in {source_name}")]
    NoValidRows { source_name: String },
}

/// Result type alias for AdaptFit operations
pub type AfResult<T> = Result<T, AfError>;

/// Macro for creating validation errors
#[macro_export]
macro_rules! validation_error {
    ($($arg:tt)*) => {
        $crate::AfError::Validation(format!($($arg)*))
    };
}

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::AfError::Config(format!($($arg)*))
    };
}
