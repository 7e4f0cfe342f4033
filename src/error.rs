use thiserror::Error;

/// Why a backend call produced no usable data.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request never produced a decodable answer.
    #[error("{endpoint}: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered but did not report success.
    #[error("{endpoint}: {message}")]
    Backend {
        endpoint: &'static str,
        message: String,
    },

    #[error("unrecognised timestamp {0:?}")]
    Timestamp(String),
}

impl FetchError {
    pub fn is_backend(&self) -> bool {
        matches!(self, FetchError::Backend { .. })
    }
}
