//! Request builder and executor for the account API.
//!
//! # Design
//! `AccountClient` holds an immutable `ClientConfig` and a transport handle.
//! A call goes through three stages:
//! - `build_request` resolves the path and serializes the payload into an
//!   `HttpRequest` without touching the network,
//! - `execute` dispatches it, racing the transport against the caller's
//!   `CancelSignal`,
//! - `decode` fills the caller's container from the response body.
//!
//! Non-2xx responses are not errors at this layer. They are decoded like any
//! other body and handed back so callers can branch on the status code.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::decode::decode;
use crate::error::ApiError;
use crate::http::{
    HttpMethod, HttpRequest, HttpResponse, ACCEPT, API_MEDIA_TYPE, CONTENT_TYPE, JSON_CONTENT_TYPE,
};
use crate::signal::CancelSignal;

/// Async client for the account API.
///
/// Each `new` call creates its own transport. Clones share the transport of
/// the client they were cloned from, which is safe for concurrent requests.
#[derive(Debug, Clone)]
pub struct AccountClient {
    config: ClientConfig,
    http: Arc<reqwest::Client>,
}

impl AccountClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            http: Arc::new(reqwest::Client::new()),
        }
    }

    /// Build a client from the `BASE_URL` environment variable, or the
    /// default base URL when it is unset.
    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether both clients dispatch through the same transport handle.
    pub fn shares_transport_with(&self, other: &AccountClient) -> bool {
        Arc::ptr_eq(&self.http, &other.http)
    }

    /// Build a request for `path`, resolved relative to the base URL.
    ///
    /// `payload`, when present, is serialized as the JSON body. The content
    /// type and accept headers are set either way.
    pub fn build_request<P>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<&P>,
    ) -> Result<HttpRequest, ApiError>
    where
        P: Serialize + ?Sized,
    {
        let url = self.config.base_url().join(path).map_err(|e| ApiError::MalformedUrl {
            input: path.to_string(),
            reason: e.to_string(),
        })?;
        let body = payload
            .map(serde_json::to_vec)
            .transpose()
            .map_err(ApiError::SerializationError)?;
        Ok(HttpRequest {
            method,
            url,
            headers: vec![
                (CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string()),
                (ACCEPT.to_string(), API_MEDIA_TYPE.to_string()),
            ],
            body,
        })
    }

    /// Send `request` and decode the response body into `out`.
    ///
    /// If `cancel` fires before the exchange completes, the in-flight call is
    /// dropped and the cancel reason is returned. A transport failure observed
    /// after the signal fired is also reported as the cancel reason. On a
    /// decoding failure the response travels inside the error.
    pub async fn execute<T>(
        &self,
        request: HttpRequest,
        cancel: &CancelSignal,
        out: &mut T,
    ) -> Result<HttpResponse, ApiError>
    where
        T: DeserializeOwned,
    {
        let method = request.method;
        let url = request.url.clone();

        if let Some(reason) = cancel.reason() {
            debug!(method = method.as_str(), %url, ?reason, "signal fired before dispatch");
            return Err(reason.into());
        }

        let outcome = tokio::select! {
            biased;
            reason = cancel.fired() => {
                debug!(method = method.as_str(), %url, ?reason, "request aborted");
                return Err(reason.into());
            }
            outcome = self.send(request) => outcome,
        };

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                let err = transport_failure(err, cancel);
                if err.is_cancellation() {
                    debug!(
                        method = method.as_str(), %url, error = %err,
                        "cancelled during transport"
                    );
                } else {
                    warn!(method = method.as_str(), %url, error = %err, "transport error");
                }
                return Err(err);
            }
        };
        debug!(method = method.as_str(), %url, status = response.status, "response received");

        match decode(&response.body, out) {
            Ok(()) => Ok(response),
            Err(source) => Err(ApiError::DecodingError { response, source }),
        }
    }

    /// One transport round trip. The body is read to the end before the
    /// transport response is released.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, reqwest::Error> {
        let mut builder = self.http.request(request.method.into(), request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), header_value(value)))
            .collect();
        let body = response.bytes().await?;

        Ok(HttpResponse { status, headers, body })
    }
}

/// Attribute a transport failure to the cancel signal when it has already
/// fired, whatever error the transport surfaced.
fn transport_failure(err: reqwest::Error, cancel: &CancelSignal) -> ApiError {
    match cancel.reason() {
        Some(reason) => reason.into(),
        None => ApiError::TransportError(err),
    }
}

/// Header values that are not valid UTF-8 are kept, with invalid bytes replaced.
fn header_value(value: &reqwest::header::HeaderValue) -> String {
    String::from_utf8_lossy(value.as_bytes()).into_owned()
}
