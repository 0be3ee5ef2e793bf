use serde::Deserialize;
use serde_json::Value;

const OUTCOME_RESOURCE_TYPE: &str = "OperationOutcome";

/// FHIR OperationOutcome resource, the shape servers use to describe why a
/// request failed.
#[derive(Clone, Debug, Deserialize)]
pub struct OperationOutcome {
    #[serde(rename = "resourceType")]
    pub resource_type: String,
    #[serde(default)]
    pub issue: Vec<OutcomeIssue>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OutcomeIssue {
    pub severity: String,
    pub code: String,
    #[serde(default)]
    pub diagnostics: String,
}

impl OperationOutcome {
    /// Detects an OperationOutcome in an error body. Anything that does not
    /// parse as the outcome shape, carries a different resource type, or has
    /// an empty issue list is not one, and the caller keeps the plain HTTP
    /// error instead.
    pub(crate) fn from_error_body(body: &Value) -> Option<Self> {
        let outcome: OperationOutcome = serde_json::from_value(body.clone()).ok()?;
        if outcome.resource_type == OUTCOME_RESOURCE_TYPE && !outcome.issue.is_empty() {
            Some(outcome)
        } else {
            None
        }
    }

    /// One `severity code diagnostics` line per issue, newline-joined.
    pub fn message(&self) -> String {
        self.issue
            .iter()
            .map(|issue| {
                format!("{} {} {}", issue.severity, issue.code, issue.diagnostics)
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
