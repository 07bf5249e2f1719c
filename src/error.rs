use hyper::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid request uri: {0}")]
    Uri(#[from] hyper::http::uri::InvalidUri),
    #[error("failed to build request: {0}")]
    Request(#[from] hyper::http::Error),
    #[error("http transport error: {0}")]
    Http(#[from] hyper::Error),
    #[error("{uri} responded with {status}")]
    Status { uri: String, status: StatusCode },
    #[error("failed to decompress response body: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("metrics registry: {0}")]
    Metrics(#[from] prometheus::Error),
}
