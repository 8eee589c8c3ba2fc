//! HTTP client adapter error types.

use homepanel_domain::error::{HomePanelError, NotFoundError};
use url::Url;

/// Errors specific to the HTTP client adapter.
#[derive(Debug, thiserror::Error)]
pub enum HttpStoreError {
    /// The configured server URL could not be parsed.
    #[error("invalid server URL {url:?}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The server URL cannot carry a path (`mailto:`, `data:`, …).
    #[error("server URL {0} cannot be used as a base")]
    CannotBeABase(Url),

    /// The reqwest client could not be built.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// The request did not complete (connection, timeout, …).
    #[error("request to {url} failed")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    /// The server has no document for this component.
    #[error("no state stored for {name}")]
    NotFound { name: String },

    /// The server answered with a non-success status.
    #[error("{url} answered {status}")]
    Status {
        url: Url,
        status: reqwest::StatusCode,
    },

    /// The response body is not JSON.
    #[error("response from {url} is not valid JSON")]
    Decode {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
}

impl HttpStoreError {
    /// Convert into a [`HomePanelError`] for propagation across port
    /// boundaries.
    pub fn into_domain(self) -> HomePanelError {
        match self {
            Self::NotFound { name } => NotFoundError {
                resource: "state",
                name,
            }
            .into(),
            other => HomePanelError::Transport(Box::new(other)),
        }
    }
}

impl From<HttpStoreError> for HomePanelError {
    fn from(err: HttpStoreError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_not_found_to_domain_not_found() {
        let err: HomePanelError = HttpStoreError::NotFound {
            name: "heating".to_string(),
        }
        .into();
        assert!(matches!(err, HomePanelError::NotFound(ref e) if e.name == "heating"));
        assert_eq!(err.to_string(), "state heating not found");
    }

    #[test]
    fn should_convert_status_to_transport_error() {
        let err: HomePanelError = HttpStoreError::Status {
            url: Url::parse("http://localhost/data/heating.json").unwrap(),
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        }
        .into();
        assert!(matches!(err, HomePanelError::Transport(_)));
    }

    #[test]
    fn should_display_status_error() {
        let err = HttpStoreError::Status {
            url: Url::parse("http://localhost/data/heating.json").unwrap(),
            status: reqwest::StatusCode::METHOD_NOT_ALLOWED,
        };
        assert_eq!(
            err.to_string(),
            "http://localhost/data/heating.json answered 405 Method Not Allowed"
        );
    }

    #[test]
    fn should_display_invalid_base_url() {
        let source = Url::parse("not a url").unwrap_err();
        let err = HttpStoreError::InvalidBaseUrl {
            url: "not a url".to_string(),
            source,
        };
        assert_eq!(err.to_string(), "invalid server URL \"not a url\"");
    }
}
