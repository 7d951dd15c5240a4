use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Duration;
use folio_core::clock::Clock;
use folio_core::guard::{CaptchaError, CaptchaVerifier};
use folio_core::{TestApp, TestResponse};

fn message(subject: &str) -> serde_json::Value {
    serde_json::json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "subject": subject,
        "content": "I would like to talk about a project.",
    })
}

async fn send(app: &TestApp, body: &serde_json::Value, client_ip: &str) -> TestResponse {
    app.client
        .post_with_headers(
            &app.url("/api/public/contact"),
            &body.to_string(),
            &[("X-Forwarded-For", client_ip)],
        )
        .await
}

async fn stored_messages(app: &TestApp) -> Vec<serde_json::Value> {
    let token = app.login_admin().await;
    let res = app
        .client
        .get_with_auth(&app.url("/api/admin/messages"), &token)
        .await;
    assert_eq!(res.status, 200);
    res.data().as_array().cloned().unwrap_or_default()
}

// ═══ Accepted messages ═══

#[tokio::test]
async fn test_contact_message_is_stored() {
    let app = TestApp::new().await;

    let res = send(&app, &message("Hello"), "203.0.113.1").await;
    assert_eq!(res.status, 201, "body: {}", res.body);
    assert_eq!(res.data()["message"], "Message received");

    let messages = stored_messages(&app).await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["subject"], "Hello");
    assert_eq!(messages[0]["read"], false);
    assert!(messages[0].get("contentHash").is_none());
}

#[tokio::test]
async fn test_contact_validation() {
    let app = TestApp::new().await;

    let mut body = message("Hello");
    body["content"] = "too short".into();
    let res = send(&app, &body, "203.0.113.1").await;
    assert_eq!(res.status, 422);

    let mut body = message("Hello");
    body["email"] = "not-an-email".into();
    let res = send(&app, &body, "203.0.113.1").await;
    assert_eq!(res.status, 422);

    let mut body = message("Hello");
    body["name"] = "A".into();
    let res = send(&app, &body, "203.0.113.1").await;
    assert_eq!(res.status, 422);
}

// ═══ Honeypot and timing ═══

#[tokio::test]
async fn test_honeypot_is_masked_and_not_stored() {
    let app = TestApp::new().await;

    let mut body = message("Hello");
    body["website"] = "http://spam.example".into();
    let res = send(&app, &body, "203.0.113.1").await;

    assert_eq!(res.status, 201);
    assert_eq!(res.data()["message"], "Message received");
    assert!(stored_messages(&app).await.is_empty());
}

#[tokio::test]
async fn test_honeypot_without_masking_is_bad_request() {
    let mut config = TestApp::test_config();
    config.guard.mask_spam_rejections = false;
    let app = TestApp::with_config(config).await;

    let mut body = message("Hello");
    body["website"] = "x".into();
    let res = send(&app, &body, "203.0.113.1").await;

    assert_eq!(res.status, 400);
    assert!(
        res.error()["message"]
            .as_str()
            .unwrap()
            .contains("Message rejected")
    );
}

#[tokio::test]
async fn test_too_fast_submission_is_rejected() {
    let mut config = TestApp::test_config();
    config.guard.contact_min_submit_secs = 3;
    config.guard.mask_spam_rejections = false;
    let app = TestApp::with_config(config).await;
    let now_ms = app.clock.now().timestamp_millis();

    let mut body = message("Hello");
    body["submittedAtMs"] = (now_ms - 1_000).into();
    assert_eq!(send(&app, &body, "203.0.113.1").await.status, 400);

    // Missing render time counts as too fast.
    assert_eq!(send(&app, &message("Hello"), "203.0.113.1").await.status, 400);

    body["submittedAtMs"] = (now_ms - 5_000).into();
    assert_eq!(send(&app, &body, "203.0.113.1").await.status, 201);
}

// ═══ Rate limiting ═══

#[tokio::test]
async fn test_fourth_message_in_window_is_rate_limited() {
    let app = TestApp::new().await;

    for i in 0..3 {
        let res = send(&app, &message(&format!("Subject {}", i)), "203.0.113.1").await;
        assert_eq!(res.status, 201, "message {} should pass: {}", i, res.body);
    }

    let res = send(&app, &message("Subject 3"), "203.0.113.1").await;
    assert_eq!(res.status, 429);
    assert_eq!(res.error()["message"], "Too many messages");
    assert!(res.header("retry-after").is_none());

    let res = send(&app, &message("Subject 3"), "198.51.100.2").await;
    assert_eq!(res.status, 201, "other clients are unaffected");
}

#[tokio::test]
async fn test_rate_limit_window_slides() {
    let app = TestApp::new().await;

    for i in 0..3 {
        send(&app, &message(&format!("Subject {}", i)), "203.0.113.1").await;
    }
    app.clock.advance(Duration::minutes(11));

    let res = send(&app, &message("Later"), "203.0.113.1").await;
    assert_eq!(res.status, 201);
}

// ═══ Duplicates ═══

#[tokio::test]
async fn test_duplicate_message_is_conflict() {
    let app = TestApp::new().await;

    assert_eq!(send(&app, &message("Hello"), "203.0.113.1").await.status, 201);

    // Case and whitespace differences still count as the same message.
    let mut again = message("  HELLO ");
    again["email"] = "ADA@example.com".into();
    let res = send(&app, &again, "198.51.100.2").await;
    assert_eq!(res.status, 409);
    assert!(
        res.error()["message"]
            .as_str()
            .unwrap()
            .contains("Duplicate message")
    );

    assert_eq!(stored_messages(&app).await.len(), 1);
}

#[tokio::test]
async fn test_duplicate_window_expires() {
    let app = TestApp::new().await;

    assert_eq!(send(&app, &message("Hello"), "203.0.113.1").await.status, 201);
    app.clock.advance(Duration::hours(25));
    assert_eq!(send(&app, &message("Hello"), "203.0.113.1").await.status, 201);
}

// ═══ Captcha ═══

/// Accepts only the token `"good"` and counts calls.
struct FixedTokenVerifier {
    calls: AtomicUsize,
}

#[async_trait]
impl CaptchaVerifier for FixedTokenVerifier {
    async fn verify(&self, token: &str, _client_identity: &str) -> Result<(), CaptchaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match token {
            "" => Err(CaptchaError::MissingToken),
            "good" => Ok(()),
            _ => Err(CaptchaError::Rejected {
                codes: "invalid-input-response".to_string(),
            }),
        }
    }
}

#[tokio::test]
async fn test_captcha_failure_is_bad_request() {
    let verifier = Arc::new(FixedTokenVerifier {
        calls: AtomicUsize::new(0),
    });
    let app = TestApp::with_captcha(TestApp::test_config(), verifier.clone()).await;

    let res = send(&app, &message("No token"), "203.0.113.1").await;
    assert_eq!(res.status, 400);
    assert!(
        res.error()["message"]
            .as_str()
            .unwrap()
            .contains("Captcha verification failed")
    );

    let mut body = message("Good token");
    body["turnstileToken"] = "good".into();
    assert_eq!(send(&app, &body, "203.0.113.1").await.status, 201);
    assert_eq!(verifier.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_captcha_is_not_called_for_honeypot_hits() {
    let verifier = Arc::new(FixedTokenVerifier {
        calls: AtomicUsize::new(0),
    });
    let app = TestApp::with_captcha(TestApp::test_config(), verifier.clone()).await;

    let mut body = message("Hello");
    body["website"] = "bot".into();
    body["turnstileToken"] = "good".into();
    send(&app, &body, "203.0.113.1").await;

    assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
}

// ═══ Admin message management ═══

#[tokio::test]
async fn test_mark_read_and_delete() {
    let app = TestApp::new().await;
    send(&app, &message("Hello"), "203.0.113.1").await;

    let token = app.login_admin().await;
    let messages = stored_messages(&app).await;
    let id = messages[0]["id"].as_str().unwrap().to_string();

    let res = app
        .client
        .put_with_auth(&app.url(&format!("/api/admin/messages/{}/read", id)), &token, "")
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.data()["read"], true);

    let res = app
        .client
        .delete_with_auth(&app.url(&format!("/api/admin/messages/{}", id)), &token)
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.data()["message"], "Message deleted");
    assert_eq!(res.data()["id"], id);

    let res = app
        .client
        .delete_with_auth(&app.url(&format!("/api/admin/messages/{}", id)), &token)
        .await;
    assert_eq!(res.status, 404);
}
