use thiserror::Error;

/// Errors that stop the animator from starting or keep it from running
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid option: {0}")]
    InvalidConfig(String),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("The {0} frontend is not available in this build")]
    FrontendUnavailable(&'static str),

    #[error("Failed to open window: {0}")]
    Platform(String),
}

#[cfg(feature = "gui")]
impl From<druid::PlatformError> for AppError {
    fn from(err: druid::PlatformError) -> Self {
        AppError::Platform(err.to_string())
    }
}
