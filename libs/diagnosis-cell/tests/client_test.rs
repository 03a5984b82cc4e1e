use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use diagnosis_cell::services::fallback::FALLBACK_DISCLAIMER;
use diagnosis_cell::{
    build_enhanced_request, DiagnoseRequest, DiagnosisClient, DiagnosisError, ResponseSource,
    Severity,
};
use shared_utils::test_utils::{MockDiagnosisResponses, TestConfig, TestForms};

fn headache_request(pain_level: u8) -> DiagnoseRequest {
    let mut request = build_enhanced_request(
        &TestForms::headache_and_fever(),
        &[format!("Pain level: {}/10", pain_level)],
    );
    request.pain_level = Some(pain_level);
    request
}

fn client_for(server: &MockServer) -> DiagnosisClient {
    DiagnosisClient::new(&TestConfig::with_api(server.uri()).to_app_config()).unwrap()
}

#[tokio::test]
async fn test_remote_response_is_enhanced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/diagnose"))
        .and(header("accept", "application/json"))
        .and(body_partial_json(json!({ "age": 30, "gender": "female", "pain_level": 4 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockDiagnosisResponses::full_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = client_for(&mock_server).diagnose_symptoms(&headache_request(4)).await;

    assert_eq!(outcome.source, ResponseSource::Remote);
    let response = outcome.response;
    assert_eq!(response.advice, "Rest and drink plenty of fluids.");
    assert_eq!(response.severity, Severity::Moderate);
    assert_eq!(response.disclaimer, "This is not a medical diagnosis.");
    assert_eq!(response.conditions[0].condition, "Migraine");
    assert!(response.conditions.len() >= 3 && response.conditions.len() <= 5);
    assert!(response
        .conditions
        .windows(2)
        .all(|w| w[0].confidence >= w[1].confidence));
}

#[tokio::test]
async fn test_saturated_remote_confidences_are_corrected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/diagnose"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockDiagnosisResponses::saturated_response()))
        .mount(&mock_server)
        .await;

    let outcome = client_for(&mock_server).diagnose_symptoms(&headache_request(6)).await;

    assert!(!outcome.is_fallback());
    assert_eq!(outcome.response.severity, Severity::High);
    for condition in &outcome.response.conditions {
        assert!(condition.confidence >= 0.2 && condition.confidence <= 0.85);
    }
}

#[tokio::test]
async fn test_server_error_retries_once_then_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/diagnose"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(MockDiagnosisResponses::error_response("boom")),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let outcome = client_for(&mock_server).diagnose_symptoms(&headache_request(9)).await;

    assert_matches!(&outcome.source, ResponseSource::Fallback { reason } if reason.contains("500"));
    let response = outcome.response;
    assert_eq!(response.severity, Severity::High);
    assert_eq!(response.disclaimer, FALLBACK_DISCLAIMER);
    assert!(response.next_steps[0].contains("within 24 hours"));
    assert!(response
        .conditions
        .iter()
        .any(|c| c.condition == "Tension Headache" || c.condition == "Migraine"));
}

#[tokio::test]
async fn test_transient_failure_recovers_on_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/diagnose"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/diagnose"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockDiagnosisResponses::full_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = client_for(&mock_server).diagnose_symptoms(&headache_request(5)).await;

    assert_eq!(outcome.source, ResponseSource::Remote);
    assert_eq!(outcome.response.advice, "Rest and drink plenty of fluids.");
}

#[tokio::test]
async fn test_slow_api_times_out_and_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/diagnose"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockDiagnosisResponses::full_response())
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&mock_server)
        .await;

    let config = TestConfig {
        diagnosis_timeout_ms: 100,
        ..TestConfig::with_api(mock_server.uri())
    };
    let client = DiagnosisClient::new(&config.to_app_config()).unwrap();

    let err = client.request_diagnosis(&headache_request(3)).await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {}", err);

    let outcome = client.diagnose_symptoms(&headache_request(3)).await;
    assert!(outcome.is_fallback());
}

#[tokio::test]
async fn test_non_object_payload_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/diagnose"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["not", "an", "object"])))
        .expect(2)
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .request_diagnosis(&headache_request(2))
        .await
        .unwrap_err();

    assert_matches!(err, DiagnosisError::InvalidPayload(_));
}

#[tokio::test]
async fn test_raw_payload_is_returned_untouched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/diagnose"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "severity": "mild" })))
        .mount(&mock_server)
        .await;

    let data = assert_ok!(client_for(&mock_server).request_diagnosis(&headache_request(2)).await);
    assert_eq!(data, json!({ "severity": "mild" }));
}

#[tokio::test]
async fn test_unconfigured_client_falls_back_without_network() {
    let config = TestConfig::with_api("").to_app_config();
    let client = DiagnosisClient::new(&config).unwrap();

    let err = client.request_diagnosis(&headache_request(7)).await.unwrap_err();
    assert_matches!(err, DiagnosisError::NotConfigured);

    let outcome = client.diagnose_symptoms(&headache_request(7)).await;
    assert!(outcome.is_fallback());
    assert!(!outcome.response.conditions.is_empty());
}

#[tokio::test]
async fn test_unrecognized_symptoms_still_get_three_conditions() {
    let config = TestConfig::default().to_app_config();
    let client = DiagnosisClient::new(&config).unwrap();

    let request = DiagnoseRequest {
        age: 50,
        gender: "other".into(),
        input: "Primary symptoms: my left elbow feels odd. Duration: 1 week".into(),
        ..DiagnoseRequest::default()
    };

    let outcome = client.diagnose_symptoms(&request).await;

    assert!(outcome.is_fallback());
    let response = outcome.response;
    assert!(response.conditions.len() >= 3);
    assert!(!response.advice.is_empty());
    assert!(!response.disclaimer.is_empty());
    for condition in &response.conditions {
        assert!((0.2..=0.9).contains(&condition.confidence));
    }
}
