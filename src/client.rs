//! Onshape API client.
//!
//! Low-level HTTP client that signs and issues requests. Endpoint-specific
//! operations are implemented via traits on model types.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, LOCATION};
use reqwest::redirect::Policy;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::credentials::Credentials;
use crate::error::{OnshapeError, Result};
use crate::request::{ApiRequest, Query};
use crate::signer::RequestSigner;

const USER_AGENT: &str = concat!("onshapi/", env!("CARGO_PKG_VERSION"));

/// Low-level Onshape API client.
///
/// Signs every request with the configured API keys. Entity-specific
/// operations are implemented via the `Get` and `List` traits on model
/// types.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use onshapi::{Credentials, OnshapeClient};
///
/// # fn example() -> onshapi::Result<()> {
/// // Create from environment variables
/// let client = OnshapeClient::from_env()?;
///
/// // Or configure manually
/// let client = OnshapeClient::new(Credentials::new("access-key", "secret-key"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct OnshapeClient {
    http: Client,
    signer: Arc<RequestSigner>,
    base_url: Arc<str>,
    debug: bool,
    max_redirects: u8,
}

impl std::fmt::Debug for OnshapeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnshapeClient")
            .field("base_url", &&*self.base_url)
            .field("debug", &self.debug)
            .field("max_redirects", &self.max_redirects)
            .finish_non_exhaustive()
    }
}

impl OnshapeClient {
    /// Create a client from environment variables.
    ///
    /// See [`Credentials::from_env`] for the variables read.
    ///
    /// # Errors
    ///
    /// Returns an error if either API key is not set.
    pub fn from_env() -> Result<Self> {
        Self::new(Credentials::from_env()?)
    }

    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`OnshapeError::ConfigMissing`] if either key is empty, or an
    /// error if the base URL is invalid.
    pub fn new(credentials: Credentials) -> Result<Self> {
        let signer = RequestSigner::new(credentials.access_key(), credentials.secret_key())?;
        let base_url = normalize_base_url(credentials.base_url())?;

        // Redirects must be re-signed, so the transport never follows them.
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .redirect(Policy::none())
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(OnshapeError::HttpError)?;

        Ok(Self {
            http,
            signer: Arc::new(signer),
            base_url: base_url.into(),
            debug: credentials.debug(),
            max_redirects: 0,
        })
    }

    /// Follow up to `max` same-origin 307 redirects, re-signing each hop.
    ///
    /// Off by default: a 307 surfaces as [`OnshapeError::Redirect`].
    #[must_use]
    pub fn with_max_redirects(mut self, max: u8) -> Self {
        self.max_redirects = max;
        self
    }

    /// Get the base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a signed GET and return the body as untyped JSON.
    pub async fn get_json(&self, request: &ApiRequest) -> Result<serde_json::Value> {
        self.get(request).await
    }

    /// Issue a signed GET and deserialize the body.
    ///
    /// # Errors
    ///
    /// Transport failures, non-2xx statuses and bodies that do not match `T`
    /// are all returned as distinct [`OnshapeError`] variants.
    #[tracing::instrument(skip(self, request), fields(path = %request.path()))]
    pub async fn get<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let response = self.send(request).await?;
        let body = response.bytes().await.map_err(OnshapeError::HttpError)?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn send(&self, request: &ApiRequest) -> Result<Response> {
        let base_url = match request.base_url() {
            Some(base_url) => normalize_base_url(base_url)?,
            None => self.base_url.to_string(),
        };
        let mut path = request.path();
        let mut query = request.query_string();
        let mut hops = 0;

        loop {
            let response = self
                .send_signed(&base_url, &path, &query, request.headers().clone())
                .await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            if status != StatusCode::TEMPORARY_REDIRECT {
                return Err(Self::status_error(response).await);
            }

            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .ok_or_else(|| OnshapeError::UnexpectedStatus {
                    status_code: status.as_u16(),
                    message: "redirect without a Location header".to_string(),
                })?;

            if hops >= self.max_redirects {
                return Err(OnshapeError::Redirect { location });
            }
            let current = request_url(&base_url, &path, &query);
            match same_origin_target(&current, &location)? {
                Some(target) => {
                    tracing::debug!(%location, "following redirect");
                    (path, query) = target;
                    hops += 1;
                }
                None => {
                    tracing::warn!(%location, "not following cross-origin redirect");
                    return Err(OnshapeError::Redirect { location });
                }
            }
        }
    }

    async fn send_signed(
        &self,
        base_url: &str,
        path: &str,
        query: &str,
        headers: HeaderMap,
    ) -> Result<Response> {
        // Sign what goes on the wire, after the URL parser has normalized it.
        let url = Url::parse(&request_url(base_url, path, query))?;
        let headers = self.signer.sign(
            &Method::GET,
            url.path(),
            url.query().unwrap_or_default(),
            headers,
        )?;

        if self.debug {
            tracing::info!("GET {url}");
        } else {
            tracing::debug!("GET {url}");
        }

        self.http
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(OnshapeError::HttpError)
    }

    /// Convert a failed response into an error.
    async fn status_error(response: Response) -> OnshapeError {
        let status = response.status();
        let message = Self::extract_error_message(response, status).await;
        OnshapeError::UnexpectedStatus {
            status_code: status.as_u16(),
            message,
        }
    }

    /// Extract error message from a failed response.
    async fn extract_error_message(response: Response, status: StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
            if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
                return err.to_string();
            }
        }

        if body.is_empty() {
            format!("HTTP {status}")
        } else {
            body
        }
    }
}

/// `base_url + path`, plus `?query` when the query is non-empty.
pub(crate) fn request_url(base_url: &str, path: &str, query: &str) -> String {
    if query.is_empty() {
        format!("{base_url}{path}")
    } else {
        format!("{base_url}{path}?{query}")
    }
}

/// Validate a base URL and strip any trailing slash, since paths start with `/`.
fn normalize_base_url(base_url: &str) -> Result<String> {
    Url::parse(base_url)?;
    Ok(base_url.trim_end_matches('/').to_string())
}

/// Resolve a redirect target against the current URL.
///
/// Returns the new path and re-encoded query when the target shares the
/// current origin, `None` otherwise.
fn same_origin_target(current: &str, location: &str) -> Result<Option<(String, String)>> {
    let current = Url::parse(current)?;
    let target = current.join(location)?;
    if target.origin() != current.origin() {
        return Ok(None);
    }
    let query = Query::parse(target.query().unwrap_or_default()).to_query_string();
    Ok(Some((target.path().to_string(), query)))
}
