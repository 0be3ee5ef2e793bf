use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const ACCESS_TOKEN: &str = "access_token";
const REFRESH_TOKEN: &str = "refresh_token";

/// Token material as returned by the authorization server: `access_token`,
/// optionally `refresh_token`, plus whatever else the server included
/// (expiry, scope, launch context). Fields are kept verbatim so a merge
/// never drops server-supplied data this crate does not know about.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenResponse(Map<String, Value>);

impl TokenResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.token_field(ACCESS_TOKEN)
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.token_field(REFRESH_TOKEN)
    }

    // Blank token values count as absent: they must neither reach the wire
    // nor trigger a refresh.
    fn token_field(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Shallow merge: fields present in `newer` overwrite same-named fields
    /// here, everything else is preserved.
    pub fn merge_from(&mut self, newer: &TokenResponse) {
        for (field, value) in &newer.0 {
            self.0.insert(field.clone(), value.clone());
        }
    }

    /// Removes `refresh_token` only; all other token fields stay.
    pub fn clear_refresh_token(&mut self) {
        self.0.remove(REFRESH_TOKEN);
    }
}

impl From<Map<String, Value>> for TokenResponse {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Caller-owned SMART authorization state.
///
/// The client borrows this exclusively for its lifetime and is its only
/// writer: a successful refresh merges new token material in, a rejected
/// refresh token is deleted. Serialization round-trips the launch-time wire
/// shape (`serverUrl`, `tokenUri`, `tokenResponse`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientState {
    server_url: String,
    token_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_response: Option<TokenResponse>,
}

impl ClientState {
    pub fn new(server_url: impl Into<String>, token_uri: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            token_uri: token_uri.into(),
            token_response: None,
        }
    }

    pub fn with_token_response(mut self, token_response: TokenResponse) -> Self {
        self.token_response = Some(token_response);
        self
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    pub fn token_response(&self) -> Option<&TokenResponse> {
        self.token_response.as_ref()
    }

    /// Replaces the stored token material wholesale, e.g. after an
    /// out-of-band authorization exchange.
    pub fn set_token_response(&mut self, token_response: Option<TokenResponse>) {
        self.token_response = token_response;
    }

    pub fn access_token(&self) -> Option<&str> {
        self.token_response
            .as_ref()
            .and_then(TokenResponse::access_token)
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.token_response
            .as_ref()
            .and_then(TokenResponse::refresh_token)
    }

    pub(crate) fn merge_token_response(&mut self, payload: &TokenResponse) {
        match self.token_response.as_mut() {
            Some(existing) => existing.merge_from(payload),
            None => self.token_response = Some(payload.clone()),
        }
    }

    pub(crate) fn invalidate_refresh_token(&mut self) {
        if let Some(token_response) = self.token_response.as_mut() {
            token_response.clear_refresh_token();
        }
    }
}
