//! [`StateStore`] over HTTP.

use std::time::Duration;

use homepanel_app::ports::StateStore;
use homepanel_domain::error::HomePanelError;
use homepanel_domain::name::ComponentName;
use reqwest::StatusCode;
use url::Url;

use crate::error::HttpStoreError;

/// Reads and writes `{base}data/{name}.json` documents.
#[derive(Debug, Clone)]
pub struct HttpStateStore {
    client: reqwest::Client,
    base: Url,
}

impl HttpStateStore {
    /// Create a store rooted at `base` with reqwest's default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is not a usable absolute URL.
    pub fn new(base: &str) -> Result<Self, HttpStoreError> {
        Ok(Self {
            client: reqwest::Client::new(),
            base: parse_base(base)?,
        })
    }

    /// Create a store whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is not a usable absolute URL or the client
    /// cannot be built.
    pub fn with_timeout(base: &str, timeout: Duration) -> Result<Self, HttpStoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(HttpStoreError::Client)?;
        Ok(Self {
            client,
            base: parse_base(base)?,
        })
    }

    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Absolute URL of a component's state document.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is invalid.
    pub fn resource_url(&self, name: &ComponentName) -> Result<Url, HttpStoreError> {
        let path = name.resource_path();
        self.base
            .join(&path)
            .map_err(|source| HttpStoreError::InvalidBaseUrl { url: path, source })
    }
}

fn parse_base(raw: &str) -> Result<Url, HttpStoreError> {
    let mut url = Url::parse(raw).map_err(|source| HttpStoreError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(HttpStoreError::CannotBeABase(url));
    }
    // joined paths are relative to the last `/`
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn check_status(
    name: &ComponentName,
    url: &Url,
    response: reqwest::Response,
) -> Result<reqwest::Response, HttpStoreError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(HttpStoreError::NotFound {
            name: name.to_string(),
        }),
        status => Err(HttpStoreError::Status {
            url: url.clone(),
            status,
        }),
    }
}

impl StateStore for HttpStateStore {
    async fn fetch(&self, name: &ComponentName) -> Result<serde_json::Value, HomePanelError> {
        let url = self.resource_url(name)?;
        tracing::debug!(%url, "fetching state");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| HttpStoreError::Request {
                url: url.clone(),
                source,
            })?;
        let response = check_status(name, &url, response)?;
        let body = response
            .json()
            .await
            .map_err(|source| HttpStoreError::Decode { url, source })?;
        Ok(body)
    }

    async fn store(
        &self,
        name: &ComponentName,
        body: serde_json::Value,
    ) -> Result<(), HomePanelError> {
        let url = self.resource_url(name)?;
        tracing::debug!(%url, %body, "storing state");

        let response = self
            .client
            .put(url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|source| HttpStoreError::Request {
                url: url.clone(),
                source,
            })?;
        check_status(name, &url, response)?;
        Ok(())
    }
}
