/// Errors from the Daytona REST surface.
///
/// The client maps transport and HTTP status failures into these variants.
/// The computer adapter decides which of them surface as session-creation
/// or screenshot failures and passes the rest through unchanged.
#[derive(thiserror::Error, Debug)]
pub enum SandboxError {
    #[error("unauthorized: check DAYTONA_API_KEY")]
    Unauthorized,

    #[error("sandbox not found: {0}")]
    NotFound(String),

    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("provision failed: {0}")]
    Provision(String),

    #[error("timeout")]
    Timeout,

    #[error("serialization: {0}")]
    Serde(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<reqwest::Error> for SandboxError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SandboxError::Timeout
        } else if err.is_decode() {
            SandboxError::Serde(err.to_string())
        } else {
            SandboxError::Backend(err.to_string())
        }
    }
}
