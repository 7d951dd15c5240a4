use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{Form, Json, Router, extract::State, routing::post};
use folio_core::guard::VERIFY_TIMEOUT;
use folio_core::TestApp;
use folio_core::guard::{CaptchaError, CaptchaVerifier, TurnstileVerifier};
use serde_json::json;

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// Local stand-in for the Turnstile `siteverify` endpoint. Accepts the
/// token `"pass"` and records every form it receives.
async fn fake_siteverify() -> (String, Seen) {
    async fn verify(
        State(seen): State<Seen>,
        Form(form): Form<HashMap<String, String>>,
    ) -> Json<serde_json::Value> {
        let ok = form.get("response").map(String::as_str) == Some("pass");
        seen.lock().unwrap().push(form);
        if ok {
            Json(json!({ "success": true }))
        } else {
            Json(json!({ "success": false, "error-codes": ["invalid-input-response"] }))
        }
    }

    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route("/siteverify", post(verify))
        .with_state(seen.clone());

    (serve(router).await, seen)
}

/// Serve `router` on a random local port and return its `/siteverify` URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}/siteverify", addr)
}

#[tokio::test]
async fn test_disabled_without_secret() {
    let verifier = TurnstileVerifier::new(None, "http://127.0.0.1:9/unused").unwrap();
    assert!(!verifier.is_enabled());
    assert!(verifier.verify("", "203.0.113.1").await.is_ok());
}

#[tokio::test]
async fn test_missing_token() {
    let (url, seen) = fake_siteverify().await;
    let verifier = TurnstileVerifier::new(Some("secret".to_string()), url).unwrap();

    let err = verifier.verify("   ", "203.0.113.1").await.unwrap_err();
    assert!(matches!(err, CaptchaError::MissingToken));
    assert!(seen.lock().unwrap().is_empty(), "no request for a blank token");
}

#[tokio::test]
async fn test_success_sends_secret_token_and_ip() {
    let (url, seen) = fake_siteverify().await;
    let verifier = TurnstileVerifier::new(Some("secret".to_string()), url).unwrap();

    verifier.verify("pass", "203.0.113.1").await.unwrap();

    let forms = seen.lock().unwrap();
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0]["secret"], "secret");
    assert_eq!(forms[0]["response"], "pass");
    assert_eq!(forms[0]["remoteip"], "203.0.113.1");
}

#[tokio::test]
async fn test_unknown_identity_is_not_sent() {
    let (url, seen) = fake_siteverify().await;
    let verifier = TurnstileVerifier::new(Some("secret".to_string()), url).unwrap();

    verifier.verify("pass", "unknown").await.unwrap();
    assert!(!seen.lock().unwrap()[0].contains_key("remoteip"));
}

#[tokio::test]
async fn test_rejection_carries_error_codes() {
    let (url, _seen) = fake_siteverify().await;
    let verifier = TurnstileVerifier::new(Some("secret".to_string()), url).unwrap();

    let err = verifier.verify("fail", "203.0.113.1").await.unwrap_err();
    match err {
        CaptchaError::Rejected { codes } => assert_eq!(codes, "invalid-input-response"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    // Nothing listens on the discard port.
    let verifier =
        TurnstileVerifier::new(Some("secret".to_string()), "http://127.0.0.1:9/").unwrap();
    let err = verifier.verify("pass", "203.0.113.1").await.unwrap_err();
    assert_eq!(err.kind(), "transport");
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let not_json = || async { "<html>oops</html>" };
    let url = serve(Router::new().route("/siteverify", post(not_json))).await;
    let verifier = TurnstileVerifier::new(Some("secret".to_string()), url).unwrap();

    let err = verifier.verify("pass", "203.0.113.1").await.unwrap_err();
    assert!(matches!(err, CaptchaError::Decode(_)), "unexpected error: {:?}", err);
    assert_eq!(err.kind(), "decode");
}

#[tokio::test]
async fn test_slow_endpoint_is_cut_off() {
    let slow = || async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Json(json!({ "success": true }))
    };
    let url = serve(Router::new().route("/siteverify", post(slow))).await;
    let verifier = TurnstileVerifier::with_timeout(
        Some("secret".to_string()),
        url,
        Duration::from_millis(200),
    )
    .unwrap();

    let started = std::time::Instant::now();
    let err = verifier.verify("pass", "203.0.113.1").await.unwrap_err();
    assert!(matches!(err, CaptchaError::Transport(_)), "unexpected error: {:?}", err);
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[test]
fn test_default_timeout_is_six_seconds() {
    assert_eq!(VERIFY_TIMEOUT, Duration::from_secs(6));
}

#[tokio::test]
async fn test_contact_form_uses_configured_turnstile() {
    let (url, seen) = fake_siteverify().await;
    let mut config = TestApp::test_config();
    config.guard.turnstile_secret = Some("secret".to_string());
    config.guard.turnstile_verify_url = url;
    let app = TestApp::with_config(config).await;

    let mut body = json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "subject": "Hello",
        "content": "I would like to talk about a project.",
        "turnstileToken": "fail",
    });
    let res = app
        .client
        .post_with_headers(
            &app.url("/api/public/contact"),
            &body.to_string(),
            &[("X-Forwarded-For", "203.0.113.1")],
        )
        .await;
    assert_eq!(res.status, 400);

    body["turnstileToken"] = "pass".into();
    let res = app
        .client
        .post_with_headers(
            &app.url("/api/public/contact"),
            &body.to_string(),
            &[("X-Forwarded-For", "203.0.113.1")],
        )
        .await;
    assert_eq!(res.status, 201, "body: {}", res.body);
    assert_eq!(seen.lock().unwrap().len(), 2);
}
