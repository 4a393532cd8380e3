use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL does not match a supported Bluesky shape: {0}")]
    InvalidUrl(String),

    #[error("handle did not resolve: {0}")]
    IdentityResolution(String),

    #[error("endpoint {nsid} failed: {message}")]
    Endpoint { nsid: String, message: String },

    #[error("profile lookup failed: {0}")]
    ProfileLookup(String),

    #[error("response is missing expected field `{0}`")]
    UnsupportedShape(&'static str),

    #[error("pagination exceeded the {0}-page safeguard")]
    PageLimitExceeded(usize),
}

pub type Result<T> = std::result::Result<T, ClientError>;
