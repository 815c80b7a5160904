use std::collections::BTreeMap;
use std::time::Duration;

use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;

use stz_core::config::{HttpConfig, Settings};
use stz_core::error::CoreError;
use stz_util::types::is_nullish;

use crate::error::{FetchError, FetchResult};
use crate::method::HttpMethod;
use crate::query::{QueryParams, normalize_url};

/// Content type sent unless the caller overrides it.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Per-request settings.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra headers; these replace defaults of the same name.
    pub headers: Vec<(String, String)>,
    /// Overrides the client's default timeout.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A decoded response.
#[derive(Debug, Clone)]
pub struct RequestResponse<T> {
    pub data: T,
    pub status: u16,
    /// Canonical reason phrase of the status, empty when there is none.
    pub status_text: String,
    /// Response headers; repeated headers are joined with `", "`.
    pub headers: BTreeMap<String, String>,
}

/// ## Summary
/// Default headers merged with the caller's.
///
/// ## Errors
/// Returns an error if a header name or value is not valid HTTP.
pub(crate) fn build_headers(extra: &[(String, String)]) -> FetchResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

    for (name, value) in extra {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| FetchError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| FetchError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut collected: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            tracing::trace!(header = %name, "Skipping non-text response header");
            continue;
        };
        collected
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    collected
}

/// ## Summary
/// Decodes a JSON body; an empty body decodes as `null`.
fn decode_body<T: DeserializeOwned>(status: u16, body: &[u8]) -> FetchResult<T> {
    let decoded = if body.trim_ascii().is_empty() {
        serde_json::from_value(Value::Null)
    } else {
        serde_json::from_slice(body)
    };
    decoded.map_err(|source| FetchError::Decode { status, source })
}

/// JSON over HTTP with query normalization.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: reqwest::Client,
}

impl FetchClient {
    /// ## Summary
    /// Builds a client with the configured user agent and default timeout.
    ///
    /// ## Errors
    /// Returns an error if the user agent is not a valid header value or the
    /// underlying client cannot be built.
    pub fn new(config: &HttpConfig) -> FetchResult<Self> {
        let user_agent = HeaderValue::from_str(&config.user_agent).map_err(|e| {
            CoreError::ConfigError(format!("invalid user agent {:?}: {e}", config.user_agent))
        })?;

        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        tracing::debug!(
            timeout_ms = config.timeout_ms,
            user_agent = %config.user_agent,
            "Building HTTP client"
        );
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// ## Errors
    /// See [`FetchClient::new`].
    pub fn from_settings(settings: &Settings) -> FetchResult<Self> {
        Self::new(&settings.http)
    }

    /// ## Summary
    /// Sends one request.
    ///
    /// For `POST`, `PUT` and `PATCH` a non-null `payload` is sent as the JSON
    /// body. For the other methods the members of an object `payload` are
    /// appended to the URL as query parameters.
    ///
    /// ## Errors
    /// Returns an error for invalid headers, transport failures, timeouts,
    /// or a body that does not decode as `T`. Non-2xx statuses are not
    /// errors; check [`RequestResponse::status`].
    #[tracing::instrument(skip(self, method, payload, options), fields(method = %method))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        url: &str,
        payload: Option<&Value>,
        options: &RequestOptions,
    ) -> FetchResult<RequestResponse<T>> {
        let target = if method.has_body() {
            url.to_string()
        } else {
            normalize_url(url, &payload.map(QueryParams::from_json).unwrap_or_default())
        };

        let mut builder = self
            .client
            .request(method.into(), &target)
            .headers(build_headers(&options.headers)?);
        if method.has_body() && !is_nullish(payload) {
            let body = serde_json::to_vec(&payload).map_err(FetchError::Encode)?;
            builder = builder.body(body);
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        tracing::debug!(url = %target, "Sending request");
        let response = builder.send().await?;

        let status = response.status();
        let headers = collect_headers(response.headers());
        let body = response.bytes().await?;
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "Received response");

        Ok(RequestResponse {
            data: decode_body(status.as_u16(), &body)?,
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
        })
    }

    /// ## Errors
    /// See [`FetchClient::request`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        params: Option<&Value>,
        options: &RequestOptions,
    ) -> FetchResult<RequestResponse<T>> {
        self.request(HttpMethod::Get, url, params, options).await
    }

    /// ## Errors
    /// See [`FetchClient::request`].
    pub async fn post<T: DeserializeOwned>(
        &self,
        url: &str,
        body: Option<&Value>,
        options: &RequestOptions,
    ) -> FetchResult<RequestResponse<T>> {
        self.request(HttpMethod::Post, url, body, options).await
    }

    /// ## Errors
    /// See [`FetchClient::request`].
    pub async fn put<T: DeserializeOwned>(
        &self,
        url: &str,
        body: Option<&Value>,
        options: &RequestOptions,
    ) -> FetchResult<RequestResponse<T>> {
        self.request(HttpMethod::Put, url, body, options).await
    }

    /// ## Errors
    /// See [`FetchClient::request`].
    pub async fn delete<T: DeserializeOwned>(
        &self,
        url: &str,
        params: Option<&Value>,
        options: &RequestOptions,
    ) -> FetchResult<RequestResponse<T>> {
        self.request(HttpMethod::Delete, url, params, options).await
    }

    /// ## Errors
    /// See [`FetchClient::request`].
    pub async fn patch<T: DeserializeOwned>(
        &self,
        url: &str,
        body: Option<&Value>,
        options: &RequestOptions,
    ) -> FetchResult<RequestResponse<T>> {
        self.request(HttpMethod::Patch, url, body, options).await
    }

    /// ## Errors
    /// See [`FetchClient::request`].
    pub async fn head<T: DeserializeOwned>(
        &self,
        url: &str,
        params: Option<&Value>,
        options: &RequestOptions,
    ) -> FetchResult<RequestResponse<T>> {
        self.request(HttpMethod::Head, url, params, options).await
    }

    /// ## Errors
    /// See [`FetchClient::request`].
    pub async fn options<T: DeserializeOwned>(
        &self,
        url: &str,
        params: Option<&Value>,
        options: &RequestOptions,
    ) -> FetchResult<RequestResponse<T>> {
        self.request(HttpMethod::Options, url, params, options).await
    }
}
