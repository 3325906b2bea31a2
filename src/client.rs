use std::future::Future;
use std::pin::pin;

use futures::future::{self, Either};
use futures_channel::oneshot;
use leptos::logging;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::ApiError;

/// Cooperative cancellation handle for an in-flight request.
///
/// The transport races the request against this receiver; completing (or
/// dropping) the matching sender cancels the request. Engines that own the
/// fetch future can instead simply drop it.
pub type CancellationSignal = oneshot::Receiver<()>;

/// Minimal JSON transport for the platform API.
///
/// Responses are parsed as JSON regardless of HTTP status, because the API
/// reports application failures inside the body as an `error` member rather
/// than through bare status codes.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// A client rooted at `base_url`, e.g. `https://api.example.com/v1`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST `body` as JSON to `path`, returning the parsed response body.
    pub async fn post_json<B>(
        &self,
        path: &str,
        body: &B,
        signal: Option<CancellationSignal>,
    ) -> Result<Value, ApiError>
    where
        B: Serialize,
    {
        let request = self.http.post(self.url(path)).json(body).send();
        send_with_cancellation(request, signal).await
    }

    /// GET `path`, returning the parsed response body.
    pub async fn get_json(
        &self,
        path: &str,
        signal: Option<CancellationSignal>,
    ) -> Result<Value, ApiError> {
        let request = self.http.get(self.url(path)).send();
        send_with_cancellation(request, signal).await
    }
}

async fn send_with_cancellation<Fu>(
    request: Fu,
    signal: Option<CancellationSignal>,
) -> Result<Value, ApiError>
where
    Fu: Future<Output = reqwest::Result<reqwest::Response>>,
{
    let response = match signal {
        None => request.await,
        Some(cancellation) => {
            let request = pin!(request);
            match future::select(request, cancellation).await {
                Either::Left((response, _)) => response,
                Either::Right((cancelled, _)) => {
                    if cancelled.is_err() {
                        logging::debug_warn!("cancellation handle dropped without firing");
                    }
                    return Err(ApiError::cancelled());
                }
            }
        }
    };

    let response = response.map_err(transport_error)?;
    let status = response.status().as_u16();
    response
        .json()
        .await
        .map_err(|e| ApiError::with_code(format!("invalid response body: {e}"), status))
}

fn transport_error(error: reqwest::Error) -> ApiError {
    match error.status() {
        Some(status) => ApiError::with_code(error.to_string(), status.as_u16()),
        None => ApiError::new(error.to_string()),
    }
}

/// Splits the API's response envelope: an `error` member is an application
/// failure and is propagated unmodified; anything else is decoded as `T`.
pub(crate) fn decode_response<T>(value: Value) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    if let Some(error) = value.get("error") {
        let error = serde_json::from_value::<ApiError>(error.clone())
            .unwrap_or_else(|_| ApiError::new(error.to_string()));
        return Err(error);
    }

    serde_json::from_value(value)
        .map_err(|e| ApiError::new(format!("unexpected response shape: {e}")))
}
