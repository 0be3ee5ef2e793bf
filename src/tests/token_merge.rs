use serde_json::{Map, Value, json};

use crate::state::{ClientState, TokenResponse};
use crate::tests::test_support::tokens;

#[test]
fn merge_keeps_fields_missing_from_the_new_payload() {
    let mut current = tokens(json!({"access_token": "T1", "refresh_token": "R1"}));
    current.merge_from(&tokens(json!({"access_token": "T2"})));
    assert_eq!(
        current,
        tokens(json!({"access_token": "T2", "refresh_token": "R1"}))
    );
}

#[test]
fn merge_overwrites_rotated_fields_and_adds_new_ones() {
    let mut current = tokens(json!({
        "access_token": "T1",
        "refresh_token": "R1",
        "scope": "patient/*.read",
    }));
    current.merge_from(&tokens(json!({
        "access_token": "T2",
        "refresh_token": "R2",
        "expires_in": 3600,
    })));
    assert_eq!(current.access_token(), Some("T2"));
    assert_eq!(current.refresh_token(), Some("R2"));
    assert_eq!(
        current.get("scope").and_then(|v| v.as_str()),
        Some("patient/*.read")
    );
    assert_eq!(current.get("expires_in").and_then(|v| v.as_i64()), Some(3600));
    assert_eq!(current.fields().len(), 4);
}

#[test]
fn blank_token_values_count_as_absent() {
    let payload = tokens(json!({"access_token": "", "refresh_token": ""}));
    assert_eq!(payload.access_token(), None);
    assert_eq!(payload.refresh_token(), None);
    assert_eq!(
        payload.get("access_token"),
        Some(&json!("")),
        "the raw field itself must survive untouched"
    );

    let state = ClientState::new("http://fhir.example", "http://auth.example/token")
        .with_token_response(payload);
    assert_eq!(state.access_token(), None);
    assert_eq!(state.refresh_token(), None);
}

#[test]
fn a_token_response_builds_from_a_plain_field_map() {
    let map: Map<String, Value> = [("access_token".to_string(), json!("T1"))]
        .into_iter()
        .collect();
    let payload = TokenResponse::from(map);
    assert_eq!(payload.access_token(), Some("T1"));
    assert_eq!(payload.refresh_token(), None);
}

#[test]
fn merge_into_a_state_without_tokens_adopts_the_payload() {
    let mut state = ClientState::new("http://fhir.example", "http://auth.example/token");
    state.merge_token_response(&tokens(json!({"access_token": "T1"})));
    assert_eq!(state.access_token(), Some("T1"));
    assert_eq!(state.refresh_token(), None);
}

#[test]
fn clearing_the_refresh_token_leaves_other_fields() {
    let mut state = ClientState::new("http://fhir.example", "http://auth.example/token")
        .with_token_response(tokens(json!({"access_token": "T1", "refresh_token": "R1"})));
    state.invalidate_refresh_token();
    assert_eq!(state.refresh_token(), None);
    assert_eq!(state.access_token(), Some("T1"));
}

#[test]
fn set_token_response_replaces_the_whole_payload() {
    let mut state = ClientState::new("http://fhir.example", "http://auth.example/token")
        .with_token_response(tokens(json!({"access_token": "T1", "refresh_token": "R1"})));

    state.set_token_response(Some(tokens(json!({"access_token": "T9"}))));
    assert_eq!(state.access_token(), Some("T9"));
    assert_eq!(state.refresh_token(), None);

    state.set_token_response(Some(TokenResponse::new()));
    assert_eq!(state.access_token(), None);

    state.set_token_response(None);
    assert_eq!(state.token_response(), None);
}

#[test]
fn state_round_trips_through_the_launch_wire_shape() {
    let state = ClientState::new("http://fhir.example/r4", "http://auth.example/token")
        .with_token_response(tokens(json!({"access_token": "T1"})));
    let encoded = serde_json::to_value(&state).unwrap();
    assert_eq!(
        encoded,
        json!({
            "serverUrl": "http://fhir.example/r4",
            "tokenUri": "http://auth.example/token",
            "tokenResponse": {"access_token": "T1"},
        })
    );
    let decoded: ClientState = serde_json::from_value(encoded).unwrap();
    assert_eq!(decoded, state);
}

#[test]
fn a_state_without_tokens_serializes_without_the_field() {
    let state = ClientState::new("http://fhir.example", "http://auth.example/token");
    let encoded = serde_json::to_value(&state).unwrap();
    assert_eq!(
        encoded,
        json!({
            "serverUrl": "http://fhir.example",
            "tokenUri": "http://auth.example/token",
        })
    );
}
