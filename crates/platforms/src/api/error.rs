use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("api error ({status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("authentication failed: {0}")]
    AuthError(String),
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    #[error("failed to build http client: {0}")]
    ClientBuild(String),
    #[error("validation error: {0}")]
    ValidationError(String),
}
