use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::Error;

/// Describes one request: method, target path or absolute URL, extra
/// headers, optional JSON body. A bare string converts into a GET for that
/// path, so `client.request("Patient/123")` works without a builder.
#[derive(Clone, Debug)]
pub struct RequestOptions {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Option<Value>,
}

impl RequestOptions {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Adds a header. A caller-supplied `Authorization` header is overridden
    /// by the injected bearer token at dispatch time; everything else passes
    /// through untouched.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// JSON body for the request. The content type defaults to
    /// `application/json` unless a header set one explicitly.
    pub fn body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl From<&str> for RequestOptions {
    fn from(url: &str) -> Self {
        RequestOptions::get(url)
    }
}

impl From<String> for RequestOptions {
    fn from(url: String) -> Self {
        RequestOptions::get(url)
    }
}

/// Decoded server response: status, headers, and the JSON payload. An empty
/// body decodes to `Value::Null`, a non-JSON body to a JSON string.
#[derive(Clone, Debug)]
pub struct FhirResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub data: Value,
}

impl FhirResponse {
    /// Decodes the payload into a typed value.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_value(self.data.clone()).map_err(Error::from)
    }
}

/// Resolves a request target against the configured server URL. The base
/// keeps exactly one trailing slash and leading slashes on the target are
/// trimmed, so no combination produces doubled slashes. Absolute http(s)
/// targets bypass the base entirely.
pub(crate) fn resolve_url(server_url: &str, target: &str) -> Result<Url, Error> {
    if target.starts_with("http://") || target.starts_with("https://") {
        return Url::parse(target)
            .map_err(|e| Error::Config(format!("Invalid request URL '{target}': {e}")));
    }
    let resolved = format!(
        "{}/{}",
        server_url.trim_end_matches('/'),
        target.trim_start_matches('/')
    );
    Url::parse(&resolved)
        .map_err(|e| Error::Config(format!("Invalid request URL '{resolved}': {e}")))
}

/// Lenient body decode. FHIR servers speak JSON, but error bodies and empty
/// responses must never turn into decode failures of their own.
pub(crate) async fn decode_body(response: reqwest::Response) -> Value {
    let text = response.text().await.unwrap_or_default();
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}
