use thiserror::Error;

/// Terminal error of a single check run. Any of these ends the run as CRITICAL.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("building HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("reading response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("decoding payload: expected element type <CheckResponse> but have {0}")]
    Root(String),

    #[error("decoding payload: {0}")]
    Decode(#[from] quick_xml::DeError),
}
