use thiserror::Error;

/// Failures surfaced by module commands and the command bus.
///
/// Messages are user-facing: the front-end shows them verbatim in its
/// error toast.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Parameter \"{0}\" is missing")]
    MissingParameter(String),

    #[error("{0}")]
    InvalidParameter(String),

    #[error("Unknown command \"{command}\" for module \"{module}\"")]
    UnknownCommand { module: String, command: String },

    #[error("Unknown module \"{0}\"")]
    UnknownModule(String),

    #[error("{0}")]
    Failed(String),

    /// Something went wrong that the user cannot act on; details are in
    /// the log file.
    #[error("Internal error (see logs)")]
    Internal,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Failures reported by the Free Mobile SMS gateway, one variant per
/// documented status code.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Missing parameter")]
    MissingParameter,

    #[error("SMS limit reached")]
    LimitReached,

    #[error("Service not enabled")]
    NotEnabled,

    #[error("Server error")]
    Server,

    #[error("Unknown error [{0}]")]
    Unknown(u16),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}
