use reqwest::header::{self, HeaderValue};
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, error, info, warn};

use crate::{
    errors::Error,
    request::{FhirResponse, RequestOptions, decode_body, resolve_url},
    state::{ClientState, TokenResponse},
    telemetry::RefreshTelemetry,
    types::OperationOutcome,
};

const USER_AGENT: &str = "smart-fhir-client/0.1.0";

/// Authorized request wrapper over a caller-owned [`ClientState`].
///
/// The client resolves relative URLs against the state's server URL, injects
/// the current access token as a bearer header, transparently re-authorizes
/// once per request when the server answers 401 and a refresh token is
/// available, and folds OperationOutcome error payloads into readable
/// errors. It borrows the state exclusively and is its only writer.
pub struct SmartClient<'a> {
    state: &'a mut ClientState,
    http: Client,
}

impl<'a> SmartClient<'a> {
    /// Wraps an authorization state with the default transport. Fails if the
    /// state's server URL does not parse, so misconfiguration surfaces here
    /// instead of on the first request.
    pub fn new(state: &'a mut ClientState) -> Result<Self, Error> {
        Self::with_http_client(state, Client::new())
    }

    /// Same as [`SmartClient::new`] with a caller-configured transport
    /// (timeouts, proxies, TLS) instead of the default one.
    pub fn with_http_client(state: &'a mut ClientState, http: Client) -> Result<Self, Error> {
        Url::parse(state.server_url()).map_err(|e| {
            Error::Config(format!(
                "Invalid server URL '{}': {}",
                state.server_url(),
                e
            ))
        })?;
        Ok(Self { state, http })
    }

    pub fn state(&self) -> &ClientState {
        self.state
    }

    /// Issues a request against the configured server.
    ///
    /// Relative targets resolve against the state's server URL; the current
    /// access token, if any, rides along as a bearer header. A 401 response
    /// triggers exactly one refresh-and-retry cycle when a refresh token is
    /// stored, and OperationOutcome error bodies come back as
    /// [`Error::Protocol`] with one line per issue.
    pub async fn request(
        &mut self,
        target: impl Into<RequestOptions>,
    ) -> Result<FhirResponse, Error> {
        let options = target.into();
        let first = self.dispatch(&options).await;
        let outcome = match first {
            Err(Error::Http(status, _))
                if status == StatusCode::UNAUTHORIZED && self.state.refresh_token().is_some() =>
            {
                debug!("401 received; re-authorizing with the stored refresh token");
                self.refresh().await?;
                self.dispatch(&options).await
            }
            other => other,
        };
        outcome.map_err(normalize_failure)
    }

    /// Exchanges the stored refresh token for fresh token material and merges
    /// it into the state. Resolves with the grant payload itself. A rejected
    /// (401) refresh token is deleted from the state so later requests fail
    /// fast instead of looping through the same dead grant.
    pub async fn refresh(&mut self) -> Result<TokenResponse, Error> {
        let refresh_token = match self.state.refresh_token() {
            Some(token) => token.to_string(),
            None => return Err(Error::NoRefreshToken),
        };
        let token_uri = Url::parse(self.state.token_uri()).map_err(|e| {
            Error::Config(format!(
                "Invalid token URI '{}': {}",
                self.state.token_uri(),
                e
            ))
        })?;

        let telemetry = RefreshTelemetry::new(token_uri.as_str());
        telemetry.emit_start();

        let form = format!(
            "grant_type=refresh_token&refresh_token={}",
            urlencoding::encode(&refresh_token)
        );
        let response = match self
            .http
            .post(token_uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::USER_AGENT, USER_AGENT)
            .body(form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!("refresh exchange reached no server: {err}");
                let err = Error::NoResponse;
                telemetry.emit_failure(&err);
                return Err(err);
            }
        };

        let status = response.status();
        let data = decode_body(response).await;
        if status.is_success() {
            let payload: TokenResponse = match serde_json::from_value(data) {
                Ok(payload) => payload,
                Err(err) => {
                    error!("token endpoint returned a non-object grant payload: {err}");
                    let err = Error::Json(err);
                    telemetry.emit_failure(&err);
                    return Err(err);
                }
            };
            self.state.merge_token_response(&payload);
            telemetry.emit_success(payload.refresh_token().is_some());
            info!("access token refreshed");
            Ok(payload)
        } else {
            if status == StatusCode::UNAUTHORIZED {
                // A rejected refresh token is dead. Drop it now so the next
                // 401 is terminal rather than another grant round-trip.
                warn!("refresh token rejected (401); clearing it from state");
                self.state.invalidate_refresh_token();
            }
            let err = Error::Http(status, data);
            telemetry.emit_failure(&err);
            Err(err)
        }
    }

    async fn dispatch(&self, options: &RequestOptions) -> Result<FhirResponse, Error> {
        let url = resolve_url(self.state.server_url(), &options.url)?;

        let mut headers = options.headers.clone();
        if !headers.contains_key(header::USER_AGENT) {
            headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        }
        if let Some(token) = self.state.access_token() {
            let mut bearer = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                Error::Config("Access token cannot be carried in an Authorization header".into())
            })?;
            bearer.set_sensitive(true);
            // Inserted last so it replaces any caller-supplied Authorization.
            headers.insert(header::AUTHORIZATION, bearer);
        }

        debug!("dispatch: {} {}", options.method, url);
        let mut builder = self.http.request(options.method.clone(), url).headers(headers);
        if let Some(body) = options.body.as_ref() {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!("no response from server: {err}");
                return Err(Error::NoResponse);
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let data = decode_body(response).await;
        if status.is_success() {
            Ok(FhirResponse {
                status,
                headers,
                data,
            })
        } else {
            Err(Error::Http(status, data))
        }
    }
}

/// Maps a failed dispatch onto the error taxonomy: OperationOutcome bodies
/// become [`Error::Protocol`], everything else surfaces unchanged.
fn normalize_failure(err: Error) -> Error {
    match err {
        Error::Http(status, body) => match OperationOutcome::from_error_body(&body) {
            Some(outcome) => {
                debug!("OperationOutcome error response detected");
                Error::Protocol(outcome.message())
            }
            None => Error::Http(status, body),
        },
        other => other,
    }
}
