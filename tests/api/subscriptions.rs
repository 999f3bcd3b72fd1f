//! Tests for the subscription-forwarding endpoints: validation order,
//! error taxonomy and downstream response mapping.

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;
use wiremock::{
    matchers::{header, method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{TestApp, TEST_API_KEY, TEST_GROUP_ID};

#[tokio::test]
async fn mailer_lite_forwards_and_normalizes_success() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/api/subscribers"))
        .and(method("POST"))
        .and(header("Authorization", format!("Bearer {TEST_API_KEY}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 1}})))
        .expect(1)
        .mount(&app.newsletter_server)
        .await;

    let res = app
        .post_mailer_lite(&json!({"email": "jd@example.com", "groupId": "123"}))
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body, json!({"ok": true}));

    Ok(())
}

#[tokio::test]
async fn downstream_201_is_normalized_to_200_ok_true() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/api/subscribers"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"anything": "at all"})))
        .expect(1)
        .mount(&app.newsletter_server)
        .await;

    let res = app
        .post_mailer_lite(&json!({"email": "jd@example.com", "groupId": "123"}))
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body, json!({"ok": true}));

    Ok(())
}

#[tokio::test]
async fn downstream_rejection_passes_through_verbatim() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/api/subscribers"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"error": "invalid"})))
        .expect(1)
        .mount(&app.newsletter_server)
        .await;

    let res = app
        .post_mailer_lite(&json!({"email": "jd@example.com", "groupId": "123"}))
        .await?;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body, json!({"error": "invalid"}));

    Ok(())
}

#[tokio::test]
async fn api_subscribe_uses_configured_group_not_callers() -> Result<()> {
    let app = TestApp::spawn().await?;

    struct ConfiguredGroupMatcher;
    impl wiremock::Match for ConfiguredGroupMatcher {
        fn matches(&self, request: &wiremock::Request) -> bool {
            serde_json::from_slice::<serde_json::Value>(&request.body)
                .ok()
                .and_then(|body| body.get("groups").cloned())
                .is_some_and(|groups| groups == json!([TEST_GROUP_ID]))
        }
    }

    Mock::given(path("/api/subscribers"))
        .and(method("POST"))
        .and(ConfiguredGroupMatcher)
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.newsletter_server)
        .await;

    // The caller-supplied groupId must be ignored on this route.
    let res = app
        .post_api_subscribe(&json!({"email": "jd@example.com", "groupId": "caller-picked"}))
        .await?;

    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn mailer_lite_missing_fields_is_400() -> Result<()> {
    let app = TestApp::spawn().await?;

    // No outbound call may be attempted for any of these.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.newsletter_server)
        .await;

    let cases = [
        (json!({}), "empty json"),
        (json!({"groupId": "123"}), "missing email"),
        (json!({"email": "jd@example.com"}), "missing groupId"),
        (json!({"email": "", "groupId": "123"}), "empty email"),
        (json!({"email": "jd@example.com", "groupId": ""}), "empty groupId"),
    ];

    for (body, description) in cases {
        let res = app.post_mailer_lite(&body).await?;
        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "wrong status for: {description}"
        );
        let body: serde_json::Value = res.json().await?;
        assert_eq!(body["error"], "MISSING_FIELDS", "for: {description}");
        assert_eq!(
            body["message"], "email and groupId required",
            "for: {description}"
        );
    }

    Ok(())
}

#[tokio::test]
async fn api_subscribe_missing_email_is_400() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.newsletter_server)
        .await;

    for body in [json!({}), json!({"email": ""})] {
        let res = app.post_api_subscribe(&body).await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = res.json().await?;
        assert_eq!(body["error"], "MISSING_FIELDS");
        assert_eq!(body["message"], "email required");
    }

    Ok(())
}

#[tokio::test]
async fn unparseable_body_is_400_bad_request() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.newsletter_server)
        .await;

    let res = app
        .http_client
        .post(format!("http://{}/mailer-lite", app.addr))
        .header("content-type", "application/json")
        .body("definitely not json")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["error"], "BAD_REQUEST");

    Ok(())
}

#[tokio::test]
async fn missing_api_key_is_500_misconfigured_and_no_outbound_call() -> Result<()> {
    let app = TestApp::spawn_misconfigured().await?;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.newsletter_server)
        .await;

    let res = app
        .post_mailer_lite(&json!({"email": "jd@example.com", "groupId": "123"}))
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["error"], "SERVER_MISCONFIGURED");
    assert_eq!(body["message"], "Missing MAILERLITE_API_KEY");

    Ok(())
}

#[tokio::test]
async fn misconfiguration_takes_precedence_over_bad_body() -> Result<()> {
    let app = TestApp::spawn_misconfigured().await?;

    let res = app.post_mailer_lite(&json!({})).await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["error"], "SERVER_MISCONFIGURED");

    Ok(())
}

#[tokio::test]
async fn get_on_subscribe_endpoints_is_405() -> Result<()> {
    let app = TestApp::spawn().await?;

    for route in ["mailer-lite", "api/subscribe"] {
        let res = app
            .http_client
            .get(format!("http://{}/{route}", app.addr))
            .send()
            .await?;
        assert_eq!(
            res.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "wrong status for GET /{route}"
        );
        let body: serde_json::Value = res.json().await?;
        assert_eq!(body["error"], "Method Not Allowed");
    }

    Ok(())
}

#[tokio::test]
async fn refused_connection_is_500_server_error() -> Result<()> {
    let app = TestApp::spawn_with_unreachable_newsletter().await?;

    let res = app
        .post_mailer_lite(&json!({"email": "jd@example.com", "groupId": "123"}))
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await?;
    assert_eq!(body["error"], "SERVER_ERROR");

    Ok(())
}
