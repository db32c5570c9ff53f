use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    /// DNS, connect, timeout, reset, or an undecodable body.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),

    /// Body was JSON but not the shape the envelope expects.
    #[error("malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl FetchError {
    /// Everything except a non-2xx status counts as a transport failure.
    pub fn is_transport(&self) -> bool {
        !matches!(self, FetchError::HttpStatus(_))
    }
}
