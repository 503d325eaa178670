use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("configuration file not found in '{0}'")]
    NotFound(PathBuf),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SecurityError {
    #[error("session key not found in '{0}'")]
    MissingKey(PathBuf),
    #[error("session key in '{path}' is {len} bytes long, expected at least {min}")]
    ShortKey { path: PathBuf, len: usize, min: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Reasons a roster mutation is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("activity '{activity}' not found")]
    NotFound { activity: String },
    #[error("{email} is already signed up for '{activity}'")]
    AlreadyRegistered { activity: String, email: String },
    #[error("{email} is not signed up for '{activity}'")]
    NotRegistered { activity: String, email: String },
    #[error("'{activity}' is full ({max_participants} participants)")]
    ActivityFull {
        activity: String,
        max_participants: u32,
    },
}

#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("unable to read credentials file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("credentials file '{path}' is malformed: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("password verification task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("not a modular crypt string")]
    Format,
    #[error("unsupported bcrypt version '{0}'")]
    Version(String),
    #[error("bcrypt cost '{0}' out of range")]
    Cost(String),
    #[error(transparent)]
    Decode(#[from] base64::DecodeError),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no session cookie")]
    Unauthenticated,
    #[error("session cookie rejected: {0}")]
    BadSession(&'static str),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    CredentialStore(#[from] CredentialStoreError),
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Security(#[from] SecurityError),
    #[error("unable to load activities from '{path}': {source}")]
    Activities {
        path: PathBuf,
        #[source]
        source: ConfigurationError,
    },
}
