pub(crate) mod token_merge;

use super::*;

#[ignore]
#[tokio::test]
async fn smart_sandbox_smoke() {
    // Hits the public SMART sandbox, so this only runs on request.
    let mut state = ClientState::new(
        "https://r4.smarthealthit.org",
        "https://launch.smarthealthit.org/v/r4/auth/token",
    );
    let mut client = SmartClient::new(&mut state).expect("Failed to create client");
    let capabilities = client
        .request("metadata")
        .await
        .expect("Failed to fetch the capability statement");
    assert_eq!(
        capabilities.data["resourceType"],
        serde_json::json!("CapabilityStatement")
    );
}
