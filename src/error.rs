use thiserror::Error;

use crate::tracker::Capability;

#[derive(Error, Debug)]
pub enum Error {
    /// Any failed GET: network failure, non-2xx status or an unusable body.
    #[error("GET {endpoint} {detail}")]
    Api {
        endpoint: String,
        status: Option<u16>,
        detail: String,
    },

    #[error("Project ID not set on API connection and is required by {0}().")]
    MissingProjectId(Capability),

    #[error("Account ID not set on API connection and is required by {0}().")]
    MissingAccountId(Capability),

    #[error("Record is missing field '{field}' required by {capability}()")]
    MissingField {
        field: &'static str,
        capability: Capability,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn api(endpoint: &str, status: Option<u16>, detail: impl Into<String>) -> Self {
        Error::Api {
            endpoint: endpoint.to_string(),
            status,
            detail: detail.into(),
        }
    }

    /// Status code of a non-2xx response. `None` for network failures and
    /// for 2xx bodies that could not be used.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_precondition(&self) -> bool {
        matches!(self, Error::MissingProjectId(_) | Error::MissingAccountId(_))
    }
}
