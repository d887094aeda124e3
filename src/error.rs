use crate::fit::GrowthError;

/// Exit code for a validation failure reported by the growth-rate routines.
pub const EXIT_INVALID_INPUT: u8 = 1;
/// Exit code for I/O, file, and argument problems.
pub const EXIT_IO: u8 = 2;
/// Exit code for a load that was aborted or produced no usable data.
pub const EXIT_DATA: u8 = 3;
/// Exit code for terminal/runtime failures.
pub const EXIT_RUNTIME: u8 = 4;

/// Application-level error: a user-facing message plus the process exit code.
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

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<GrowthError> for AppError {
    fn from(err: GrowthError) -> Self {
        Self::new(EXIT_INVALID_INPUT, err.to_string())
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
