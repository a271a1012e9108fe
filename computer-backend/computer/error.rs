use crate::sandbox::SandboxError;

/// Errors surfaced by a `Computer` implementation.
#[derive(thiserror::Error, Debug)]
pub enum ComputerError {
    #[error("failed to create sandbox: {0}")]
    SessionCreation(#[source] SandboxError),

    #[error("screenshot failed: {0}")]
    Screenshot(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no active sandbox session")]
    NoActiveSession,

    #[error("a sandbox session is already active")]
    SessionAlreadyActive,

    #[error(transparent)]
    Remote(#[from] SandboxError),
}
