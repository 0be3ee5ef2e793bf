mod client;
mod errors;
mod request;
mod state;
mod telemetry;
mod types;

pub use client::SmartClient;
pub use errors::Error;
pub use request::{FhirResponse, RequestOptions};
pub use state::{ClientState, TokenResponse};
pub use types::{OperationOutcome, OutcomeIssue};

pub use reqwest::{Method, header};

#[cfg(test)]
mod tests;
