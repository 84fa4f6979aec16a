use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Failure modes of a single API call. Callers collapse all three into one
/// "operation failed" notification; the variants exist so the log can say
/// what actually went wrong.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to construct HTTP client")]
    Init(#[source] reqwest::Error),
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("server responded {status} for {url}")]
    Status { url: String, status: StatusCode },
    #[error("invalid response body from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// The one configured HTTP client the whole application shares: a single
/// base URL plus a blocking `reqwest` client. Every resource module issues
/// its requests through this handle. No retries, no batching; each call is
/// one request awaiting one response.
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client against the given base URL (e.g.
    /// `http://localhost:5000/api`). A trailing slash is tolerated.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = Client::builder().build().map_err(ApiError::Init)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path` and decode the JSON body. `params` become query
    /// parameters; an empty slice appends nothing.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        debug!(%url, "GET");
        let mut request = self.http.get(&url);
        if !params.is_empty() {
            request = request.query(params);
        }
        let response = request.send().map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;
        decode_json(url, response)
    }

    /// POST `body` as JSON to `path` and decode the resource echoed back.
    pub fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        debug!(%url, "POST");
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        decode_json(url, response)
    }

    /// PUT `body` as JSON to `path` and decode the resource echoed back.
    pub fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        debug!(%url, "PUT");
        let response = self
            .http
            .put(&url)
            .json(body)
            .send()
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        decode_json(url, response)
    }

    /// DELETE `path`. Only the status matters; any body is discarded.
    pub fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.endpoint(path);
        debug!(%url, "DELETE");
        let response = self
            .http
            .delete(&url)
            .send()
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Status { url, status })
        }
    }
}

/// Treat any non-2xx as a failure before attempting to decode the body.
fn decode_json<T: DeserializeOwned>(url: String, response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status { url, status });
    }
    response
        .json()
        .map_err(|source| ApiError::Decode { url, source })
}
