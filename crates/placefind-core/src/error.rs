use thiserror::Error;

/// All errors that can occur in placefind-core.
#[derive(Debug, Error)]
pub enum PlacefindError {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Mount point not available: {0}")]
    MountPointMissing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl PlacefindError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Network(_) | Self::Decode(_) => ExitCode::NetworkError,
            Self::MountPointMissing(_) => ExitCode::MountFailed,
            _ => ExitCode::GeneralError,
        }
    }
}

/// Exit codes used by the `placefind` binary.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    NetworkError = 6,
    MountFailed = 9,
}

pub type Result<T> = std::result::Result<T, PlacefindError>;
