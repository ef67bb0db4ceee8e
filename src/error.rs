use thiserror::Error;

/// Application-level error carried to `main`, which prints the message and
/// exits with the code.
///
/// Exit codes:
/// - 2: input/argument problems (I/O, schema, CSV)
/// - 3: data coverage problems (missing years, empty windows)
/// - 4: model or numeric failures
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    /// Prefix the message with context (e.g. which window or variable failed).
    pub fn context(self, context: impl std::fmt::Display) -> Self {
        Self {
            exit_code: self.exit_code,
            message: format!("{context}: {}", self.message),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Errors raised by the modeling and statistics layers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("non-finite value in {0}")]
    NonFinite(String),

    #[error("singular design matrix: rank {rank} < {cols} columns")]
    SingularDesign { rank: usize, cols: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("degenerate test input: {0}")]
    DegenerateTest(String),

    #[error("unknown series `{0}`")]
    MissingSeries(String),

    #[error("years {start}..={end} are not covered by the table ({first}..={last})")]
    MissingYears {
        start: i32,
        end: i32,
        first: i32,
        last: i32,
    },
}

pub type ModelResult<T> = std::result::Result<T, ModelError>;

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        let code = match err {
            ModelError::MissingSeries(_) | ModelError::MissingYears { .. } => 3,
            ModelError::InsufficientData { .. } => 3,
            _ => 4,
        };
        AppError::new(code, err.to_string())
    }
}
