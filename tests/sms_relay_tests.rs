//! SMS relay and alert dispatch against a local mock relay server

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use safeguard::application::ports::{SmsError, SmsRelay};
use safeguard::application::{AlertConfig, AlertDispatcher, AlertError};
use safeguard::domain::contacts::{ContactList, EmergencyContact};
use safeguard::domain::geo::Position;
use safeguard::domain::recording::Duration;
use safeguard::domain::trigger::TriggerWord;
use safeguard::infrastructure::{FixedLocation, HttpSmsRelay, NoopNotifier, RetryingSmsRelay};

fn relay_for(server: &MockServer) -> HttpSmsRelay {
    HttpSmsRelay::new(
        Some(format!("{}/send-sms", server.uri())),
        Duration::from_secs(5),
    )
}

fn recipients() -> Vec<String> {
    vec!["911".to_string(), "+15555550123".to_string()]
}

#[tokio::test]
async fn posts_recipients_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send-sms"))
        .and(body_json(json!({
            "to": ["911", "+15555550123"],
            "message": "test alert"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    relay_for(&server)
        .send(&recipients(), "test alert")
        .await
        .unwrap();
}

#[tokio::test]
async fn relay_refusal_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Twilio credentials missing"
        })))
        .mount(&server)
        .await;

    let err = relay_for(&server)
        .send(&recipients(), "test alert")
        .await
        .unwrap_err();
    match err {
        SmsError::Rejected(reason) => assert_eq!(reason, "Twilio credentials missing"),
        other => panic!("expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn error_status_with_json_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": "upstream failure"
        })))
        .mount(&server)
        .await;

    let err = relay_for(&server).send(&recipients(), "x").await.unwrap_err();
    assert!(matches!(err, SmsError::Rejected(ref r) if r == "upstream failure"), "got {:?}", err);
}

#[tokio::test]
async fn bare_server_error_is_request_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = relay_for(&server).send(&recipients(), "x").await.unwrap_err();
    assert!(matches!(err, SmsError::RequestFailed(_)), "got {:?}", err);
}

#[tokio::test]
async fn retries_transport_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .up_to_n_times(2)
        .with_priority(1)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    RetryingSmsRelay::new(relay_for(&server), 2)
        .send(&recipients(), "x")
        .await
        .unwrap();
}

#[tokio::test]
async fn retries_run_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .expect(2)
        .mount(&server)
        .await;

    let err = RetryingSmsRelay::new(relay_for(&server), 1)
        .send(&recipients(), "x")
        .await
        .unwrap_err();
    assert!(matches!(err, SmsError::RequestFailed(_)));
}

#[tokio::test]
async fn dispatcher_sends_message_with_map_link() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/send-sms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = AlertDispatcher::new(
        relay_for(&server),
        FixedLocation(Position::new(37.7749, -122.4194)),
        NoopNotifier,
        AlertConfig {
            enable_notify: false,
        },
    );
    let contacts = ContactList::from_contacts([
        EmergencyContact::new("Alex", "555-0100").unwrap(),
        EmergencyContact::new("Jordan", "+1 555 0101").unwrap(),
    ]);

    let receipt = dispatcher
        .dispatch(&contacts, &TriggerWord::new("mango"))
        .await
        .unwrap();

    assert_eq!(receipt.recipients, vec!["5550100".to_string(), "+15550101".to_string()]);
    assert!(receipt.message.body().contains("mango"));
    assert!(receipt
        .message
        .body()
        .contains("https://www.google.com/maps/search/?api=1&query=37.7749,-122.4194"));

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["to"], json!(["5550100", "+15550101"]));
    assert_eq!(sent["message"], json!(receipt.message.body()));
}

#[tokio::test]
async fn dispatcher_without_contacts_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;

    let dispatcher = AlertDispatcher::new(
        relay_for(&server),
        FixedLocation(Position::new(1.0, 2.0)),
        NoopNotifier,
        AlertConfig {
            enable_notify: false,
        },
    );

    let err = dispatcher
        .dispatch(&ContactList::new(), &TriggerWord::new("help"))
        .await
        .unwrap_err();
    assert!(matches!(err, AlertError::NoContacts));
}
