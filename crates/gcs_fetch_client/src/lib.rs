//! # gcs_fetch client
//!
//! Downloads objects from Google Cloud Storage through the JSON API
//! "download object" endpoint, authenticating with a bearer token.
//!
//! Every call issues exactly one `GET`, with no retries and no caching.
//! The outcome is either the raw payload or a [`FetchError`] telling
//! transport failures, non-2xx answers, decode failures and cancellation apart.
//!
//! ```no_run
//! use gcs_fetch_client::StorageClient;
//!
//! # async fn run() -> gcs_fetch_core::error::Result<()> {
//! let client = StorageClient::new()?;
//! let bytes = client.fetch("ya29...", "game-assets", "textures/hero.png").await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod decode;

pub use config::ClientConfig;

use bytes::Bytes;
use gcs_fetch_core::prelude::*;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument, warn};
use url::Url;

fn transport(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Transport(format!("request timed out: {err}"))
    } else {
        FetchError::Transport(err.to_string())
    }
}

#[derive(Clone, Debug)]
pub struct StorageClient {
    endpoint: Url,
    client: Client,
}

impl StorageClient {
    /// A client for the public Cloud Storage endpoint.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            FetchError::InvalidRequest(format!("Invalid endpoint '{}': {e}", config.endpoint))
        })?;

        let mut builder = Client::builder().user_agent(config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        Ok(Self {
            endpoint,
            client: builder.build().map_err(transport)?,
        })
    }

    /// Downloads `object` from `bucket`.
    pub async fn fetch(&self, token: &str, bucket: &str, object: &str) -> Result<Bytes> {
        let request = FetchRequest::new(token, bucket, object)?;
        self.send(&request).await
    }

    /// Like [`fetch`](Self::fetch), asking `tokens` for the credential first.
    pub async fn fetch_with<T: TokenSource>(
        &self,
        tokens: &T,
        bucket: &str,
        object: &str,
    ) -> Result<Bytes> {
        let token = tokens.token().await?;
        let request = FetchRequest::new(token, bucket, object)?;
        self.send(&request).await
    }

    /// Like [`fetch`](Self::fetch), but resolves to [`FetchError::Cancelled`]
    /// as soon as `cancel` fires. The in-flight request is dropped.
    pub async fn fetch_cancellable(
        &self,
        token: &str,
        bucket: &str,
        object: &str,
        cancel: &CancellationToken,
    ) -> Result<Bytes> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(bucket, object, "Fetch cancelled");
                Err(FetchError::Cancelled)
            }
            result = self.fetch(token, bucket, object) => result,
        }
    }

    #[instrument(skip(self, request), fields(bucket = %request.bucket(), object = %request.object()))]
    pub async fn send(&self, request: &FetchRequest) -> Result<Bytes> {
        let url = request.url(&self.endpoint)?;

        let mut authorization = HeaderValue::from_str(&request.token().header_value())
            .map_err(|_| {
                FetchError::InvalidRequest("Token contains characters not valid in a header".into())
            })?;
        authorization.set_sensitive(true);

        debug!("Fetching object...");
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .send()
            .await
            .map_err(|e| {
                error!("Request failed: {e}");
                transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Storage returned an error");
            return Err(FetchError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        let payload = response.bytes().await.map_err(|e| {
            error!("Failed to read response body: {e}");
            transport(e)
        })?;

        debug!(bytes = payload.len(), "Fetch complete");
        Ok(payload)
    }
}
