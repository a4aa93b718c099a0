use crate::{
    error::{self, CommonRequestError},
    streaming::SseParser,
};
use async_stream::try_stream;
use futures_util::stream::{self, BoxStream};
use reqwest::{RequestBuilder as ReqwestRequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{collections::HashMap, time::Duration};

/// Authentication method for API requests
#[derive(Debug, Clone)]
pub enum AuthMethod {
    /// Bearer token authentication (Authorization: Bearer <token>)
    Bearer(String),
    /// API key header (e.g., api-key: <key>)
    ApiKey { header_name: String, key: String },
}

/// Represents an API endpoint relative to the configured base URL
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// Path relative to the base URL; empty means the base URL itself
    pub path: String,
}

impl Endpoint {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Configuration for request building
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub base_url: String,
    pub auth: Option<AuthMethod>,
    pub default_headers: HashMap<String, String>,
    pub user_agent: Option<String>,
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth: None,
            default_headers: HashMap::new(),
            user_agent: None,
            timeout: None,
        }
    }

    pub fn with_auth(mut self, auth: AuthMethod) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Generic request builder for JSON POST endpoints
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    client: reqwest::Client,
    config: RequestConfig,
}

impl RequestBuilder {
    pub fn new(client: reqwest::Client, config: RequestConfig) -> Self {
        Self { client, config }
    }

    /// Full URL of an endpoint
    pub fn url(&self, endpoint: &Endpoint) -> String {
        if endpoint.path.is_empty() {
            return self.config.base_url.clone();
        }
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.path.trim_start_matches('/')
        )
    }

    /// Build a reqwest POST request for the given endpoint with auth and headers applied
    pub fn build_request(&self, endpoint: &Endpoint) -> ReqwestRequestBuilder {
        let mut req = self
            .client
            .post(self.url(endpoint))
            .header("content-type", "application/json");

        if let Some(ref auth) = self.config.auth {
            req = match auth {
                AuthMethod::Bearer(token) => req.bearer_auth(token),
                AuthMethod::ApiKey { header_name, key } => req.header(header_name, key),
            };
        }

        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }

        if let Some(ref user_agent) = self.config.user_agent {
            req = req.header("user-agent", user_agent);
        }

        if let Some(timeout) = self.config.timeout {
            req = req.timeout(timeout);
        }

        req
    }

    /// POST a JSON body and return the response once its status is known to be a success
    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        body: &B,
    ) -> Result<Response, CommonRequestError> {
        let payload = serde_json::to_value(body)?;
        send_value(self.build_request(endpoint), &self.url(endpoint), &payload).await
    }

    /// Execute a request with JSON body and decode the whole response body as one value
    pub async fn request_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        body: &B,
    ) -> Result<T, CommonRequestError> {
        let res = self.send_json(endpoint, body).await?;
        let bytes = res.bytes().await?;
        Ok(serde_json::from_slice::<T>(&bytes)?)
    }

    /// Execute a streaming request, decoding every `data: ` line of the body.
    ///
    /// Nothing is sent until the returned stream is first polled.
    pub fn stream<T, B>(
        &self,
        endpoint: &Endpoint,
        body: &B,
    ) -> BoxStream<'static, Result<T, CommonRequestError>>
    where
        T: DeserializeOwned + Send + 'static,
        B: Serialize + ?Sized,
    {
        let payload = match serde_json::to_value(body) {
            Ok(value) => value,
            Err(e) => {
                return Box::pin(stream::once(async move {
                    Err::<T, CommonRequestError>(e.into())
                }));
            }
        };
        let req = self.build_request(endpoint);
        let url = self.url(endpoint);

        Box::pin(try_stream! {
            let response = send_value(req, &url, &payload).await?;
            let mut parser = SseParser::new(response);

            while let Some(event) = parser.next_event::<T>().await? {
                yield event;
            }
        })
    }
}

async fn send_value(
    req: ReqwestRequestBuilder,
    url: &str,
    payload: &Value,
) -> Result<Response, CommonRequestError> {
    log::trace!("POST {url} payload: {payload}");

    let res = req.json(payload).send().await?;
    let status = res.status();

    if status.is_success() {
        Ok(res)
    } else {
        let bytes = res.bytes().await?;
        Err(error::parse_error_response(status, &bytes))
    }
}
