use tracing::{Level, event};
use uuid::Uuid;

use crate::errors::Error;

/// Correlates the tracing events of one refresh-grant exchange under a
/// shared attempt id.
#[derive(Clone, Debug)]
pub struct RefreshTelemetry {
    attempt_id: Uuid,
    token_uri: String,
}

impl RefreshTelemetry {
    pub fn new(token_uri: impl Into<String>) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            token_uri: token_uri.into(),
        }
    }

    pub fn emit_start(&self) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            token_uri = %self.token_uri,
            "refresh.start"
        );
    }

    pub fn emit_success(&self, rotated_refresh_token: bool) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            token_uri = %self.token_uri,
            rotated_refresh_token,
            "refresh.success"
        );
    }

    pub fn emit_failure(&self, error: &Error) {
        event!(
            Level::ERROR,
            attempt_id = %self.attempt_id,
            token_uri = %self.token_uri,
            error = %error,
            "refresh.failure"
        );
    }
}
