use super::{
    config::ApiConfigTrait,
    error::{map_deserialization_error, map_serialization_error, ApiError, ClientError, WrappedError},
};
use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

/// Exponential backoff for rate-limited or failing requests.
///
/// Off unless set on the backend builder: a failed call normally ends the classification run.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    /// Give up once this much time has passed since the first attempt.
    pub max_elapsed_time: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(10),
            max_elapsed_time: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    pub(crate) fn backoff(&self) -> backoff::ExponentialBackoff {
        backoff::ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_interval)
            .with_max_interval(self.max_interval)
            .with_max_elapsed_time(Some(self.max_elapsed_time))
            .build()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ApiClient<C: ApiConfigTrait> {
    http_client: reqwest::Client,
    pub config: C,
    pub retry: Option<RetryPolicy>,
}

impl<C: ApiConfigTrait> ApiClient<C> {
    pub fn new(config: C, retry: Option<RetryPolicy>) -> crate::Result<Self, ClientError> {
        Ok(Self {
            http_client: reqwest::Client::builder().build()?,
            config,
            retry,
        })
    }

    /// Make a POST request to {path} and deserialize the response body
    ///
    /// The credential is resolved before anything is sent, so a missing key never costs a
    /// round-trip.
    pub(crate) async fn post<I, O>(
        &self,
        path: &str,
        request: I,
        timeout: Duration,
    ) -> crate::Result<O, ClientError>
    where
        I: Serialize + std::fmt::Debug,
        O: DeserializeOwned,
    {
        let headers = self.config.headers()?;
        let serialized_request =
            serde_json::to_string(&request).map_err(map_serialization_error)?;
        crate::trace!("Serialized request: {}", serialized_request);
        let url = self.config.url(path);

        let request_maker = || {
            self.http_client
                .post(&url)
                .headers(headers.clone())
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .timeout(timeout)
                .body(serialized_request.clone())
                .build()
                .map_err(ClientError::Reqwest)
        };
        self.execute(request_maker).await
    }

    /// Execute a HTTP request once, or under the retry policy when one is set.
    ///
    /// request_maker serves one purpose: to be able to create request again
    /// to retry API call after getting rate limited.
    async fn execute_raw<M>(&self, request_maker: M) -> crate::Result<Bytes, ClientError>
    where
        M: Fn() -> crate::Result<reqwest::Request, ClientError>,
    {
        let request_maker = &request_maker;
        let http_client = &self.http_client;
        let attempt = move || async move {
            let request = request_maker()?;
            let response = http_client.execute(request).await?;
            let status = response.status();
            let bytes = response.bytes().await?;

            if !status.is_success() {
                return Err(status_error(status.as_u16(), bytes.as_ref()));
            }
            Ok::<Bytes, ClientError>(bytes)
        };

        let Some(policy) = &self.retry else {
            return attempt().await;
        };
        backoff::future::retry(policy.backoff(), move || async move {
            attempt().await.map_err(|err| {
                if err.is_transient() {
                    crate::warn!("Retrying after transient failure: {}", err);
                    backoff::Error::Transient {
                        err,
                        retry_after: None,
                    }
                } else {
                    backoff::Error::Permanent(err)
                }
            })
        })
        .await
    }

    async fn execute<O, M>(&self, request_maker: M) -> crate::Result<O, ClientError>
    where
        O: DeserializeOwned,
        M: Fn() -> crate::Result<reqwest::Request, ClientError>,
    {
        let bytes = self.execute_raw(request_maker).await?;

        // Deserialize once into a generic Value
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| map_deserialization_error(e, &bytes))?;

        // Log the pretty-printed JSON
        let pretty_json = serde_json::to_string_pretty(&value).map_err(map_serialization_error)?;
        crate::trace!("Serialized response: {}", pretty_json);

        // Some providers report failures inside a 2xx body
        if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
            return Err(ClientError::ApiError(embedded_error(error)));
        }

        // Convert the Value into the target type
        let response: O =
            serde_json::from_value(value).map_err(|e| map_deserialization_error(e, &bytes))?;

        Ok(response)
    }
}

fn status_error(status: u16, bytes: &[u8]) -> ClientError {
    match serde_json::from_slice::<WrappedError>(bytes) {
        Ok(wrapped) => ClientError::ApiError(ApiError {
            status: Some(status),
            ..wrapped.error
        }),
        Err(_) => ClientError::HttpStatus {
            status,
            body: String::from_utf8_lossy(bytes).into_owned(),
        },
    }
}

fn embedded_error(error: &serde_json::Value) -> ApiError {
    match serde_json::from_value::<ApiError>(error.clone()) {
        Ok(api_error) => api_error,
        Err(_) => ApiError {
            message: match error.as_str() {
                Some(message) => message.to_string(),
                None => error.to_string(),
            },
            r#type: None,
            param: None,
            code: None,
            status: None,
        },
    }
}
