use smart_fhir_client::{ClientState, RequestOptions, SmartClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional: enable basic logging for the example
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    // A state like this normally comes out of the SMART launch sequence; the
    // open sandbox answers without tokens.
    let mut state = ClientState::new(
        "https://r4.smarthealthit.org",
        "https://launch.smarthealthit.org/v/r4/auth/token",
    );
    let mut client = SmartClient::new(&mut state)?;

    let capabilities = client.request("metadata").await?;
    let software = &capabilities.data["software"]["name"];
    println!("server software: {software}");

    let patients = client
        .request(RequestOptions::get("Patient?_count=3"))
        .await?;
    for entry in patients.data["entry"].as_array().into_iter().flatten() {
        println!("patient: {}", entry["resource"]["id"]);
    }
    Ok(())
}
