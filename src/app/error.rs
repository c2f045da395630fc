use thiserror::Error;

/// Everything that can go wrong between issuing a request to a remote
/// service and holding a usable value.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request failed with status: {0}")]
    Status(reqwest::StatusCode),

    #[error("service reported an error: {0}")]
    Service(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("invalid box office snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("{0} is not set")]
    MissingApiKey(&'static str),

    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
}
