//! End-to-end account flows: signup, login, session and logout.

mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use proflink::domain::TRACE_ID_HEADER;
use proflink::test_support::{SentEmail, TestWorld};
use rstest::rstest;
use serde_json::{Value, json};
use std::time::Duration;

use support::{app, session_cookie, signup_body, signup_request};

#[rstest]
#[case("abc12", StatusCode::BAD_REQUEST)]
#[case("abc123", StatusCode::CREATED)]
#[actix_web::test]
async fn six_characters_is_the_minimum_password(
    #[case] password: &str,
    #[case] expected: StatusCode,
) {
    let world = TestWorld::new();
    let app = test::init_service(app(&world)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(signup_body("alice", "alice@example.com", password))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), expected);
}

#[rstest]
#[case(signup_body("alice", "other@example.com", "secret1"), "Username already exists")]
#[case(signup_body("alicia", "alice@example.com", "secret1"), "Email already exists")]
#[actix_web::test]
async fn usernames_and_emails_are_unique(#[case] second: Value, #[case] message: &str) {
    let world = TestWorld::new();
    let app = test::init_service(app(&world)).await;
    let first = test::call_service(&app, signup_request("alice").to_request()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(second)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], json!("duplicate"));
    assert_eq!(body["message"], json!(message));
    assert_eq!(world.store.user_count(), 1);
}

#[actix_web::test]
async fn signup_sends_a_welcome_email() {
    let world = TestWorld::new();
    let app = test::init_service(app(&world)).await;

    let res = test::call_service(&app, signup_request("alice").to_request()).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let sent = world.mailer.wait_for(1, Duration::from_secs(2)).await;
    assert!(matches!(
        sent.as_slice(),
        [SentEmail::Welcome(email)] if email.to.to_string() == "alice@example.com"
    ));
}

#[actix_web::test]
async fn mail_outages_do_not_fail_signup() {
    let world = TestWorld::new();
    world.mailer.fail_deliveries();
    let app = test::init_service(app(&world)).await;

    let res = test::call_service(&app, signup_request("alice").to_request()).await;

    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(world.store.user_count(), 1);
}

#[actix_web::test]
async fn login_issues_a_working_session() {
    let world = TestWorld::new();
    let app = test::init_service(app(&world)).await;
    test::call_service(&app, signup_request("alice").to_request()).await;

    let login = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"username": "alice", "password": "secret1"}))
            .to_request(),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
    let cookie = session_cookie(&login).expect("session cookie");
    let body: Value = test::read_body_json(login).await;
    assert_eq!(body["message"], json!("Logged in successfully"));

    let me = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(me.status(), StatusCode::OK);
    let user: Value = test::read_body_json(me).await;
    assert_eq!(user["username"], json!("alice"));
}

#[actix_web::test]
async fn unauthorised_responses_carry_the_trace_id() {
    let world = TestWorld::new();
    let app = test::init_service(app(&world)).await;

    let res =
        test::call_service(&app, test::TestRequest::get().uri("/api/v1/auth/me").to_request())
            .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["traceId"], json!(header));
    assert_eq!(body["message"], json!("Unauthorized - No Token Provided"));
}

#[actix_web::test]
async fn malformed_json_is_a_client_error() {
    let world = TestWorld::new();
    let app = test::init_service(app(&world)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], json!("invalid_request"));
    assert_eq!(body["details"]["code"], json!("invalid_body"));
}

#[rstest]
#[case("/api/v1/health/live")]
#[case("/api/v1/health/ready")]
#[actix_web::test]
async fn health_probes_need_no_session(#[case] uri: &str) {
    let world = TestWorld::new();
    let app = test::init_service(app(&world)).await;

    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
}
