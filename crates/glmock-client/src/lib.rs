//! Typed async client for the log-management REST API.
//!
//! # Purpose
//! One async method per API operation. Every call reports its [`CallInfo`]
//! (status plus raw body) next to the decoded value, and every failure after a
//! response carries the same metadata in [`ClientError`].
//!
//! # Deadlines
//! A global timeout is set with [`ClientBuilder::timeout`]. Per-call deadlines
//! are the caller's: wrap the call in `tokio::time::timeout`.
mod error;
mod index_sets;
mod inputs;
mod roles;
mod users;

pub use error::ClientError;

use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Status and raw body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallInfo {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: Url,
    username: String,
    password: String,
}

#[derive(Debug, Clone)]
pub struct ClientBuilder {
    endpoint: String,
    username: String,
    password: String,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Client, ClientError> {
        let endpoint = Url::parse(&self.endpoint).map_err(|err| {
            ClientError::InvalidArgument(format!("endpoint {:?}: {err}", self.endpoint))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(ClientError::InvalidArgument(format!(
                "endpoint {:?} cannot carry a path",
                self.endpoint
            )));
        }
        let mut http = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        Ok(Client {
            http: http.build()?,
            endpoint,
            username: self.username,
            password: self.password,
        })
    }
}

impl Client {
    /// Client for `endpoint` (the API base, e.g. `http://localhost:9000/api`)
    /// authenticating with HTTP Basic credentials.
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ClientError> {
        Self::builder(endpoint, username, password).build()
    }

    pub fn builder(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> ClientBuilder {
        ClientBuilder {
            endpoint: endpoint.into(),
            username: username.into(),
            password: password.into(),
            timeout: None,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Endpoint URL with `segments` appended, each percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<CallInfo, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .basic_auth(&self.username, Some(&self.password));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(%method, %url, status = status.as_u16(), "api call");
        let info = CallInfo { status, body: text };
        if !status.is_success() {
            let error = serde_json::from_str(&info.body).ok();
            return Err(ClientError::Api { info, error });
        }
        Ok(info)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<(T, CallInfo), ClientError> {
        let info = self.send::<()>(Method::GET, url, None).await?;
        decode(info)
    }
}

fn decode<T: DeserializeOwned>(info: CallInfo) -> Result<(T, CallInfo), ClientError> {
    match serde_json::from_str(&info.body) {
        Ok(value) => Ok((value, info)),
        Err(source) => Err(ClientError::Decode { info, source }),
    }
}
