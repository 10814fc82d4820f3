//! End-to-end engagement scenario: alice posts, bob comments, likes and
//! unlikes, and alice's notifications track each qualifying action.

// Shared harness helpers not every suite calls.
#[allow(dead_code)]
mod support;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test;
use proflink::domain::ports::NotificationRepository;
use proflink::domain::{NotificationKind, UserId};
use proflink::test_support::TestWorld;
use serde_json::{Value, json};

use support::{app, session_cookie, signup_request};

async fn notification_kinds(world: &TestWorld, user: &str) -> Vec<NotificationKind> {
    let id = UserId::new(user).expect("user id");
    NotificationRepository::list_for_recipient(world.store.as_ref(), &id)
        .await
        .expect("notifications listed")
        .into_iter()
        .map(|notification| notification.kind)
        .collect()
}

fn post(uri: &str, cookie: &Cookie<'static>) -> test::TestRequest {
    test::TestRequest::post().uri(uri).cookie(cookie.clone())
}

#[actix_web::test]
async fn comment_like_and_unlike_scenario() {
    let world = TestWorld::new();
    let app = test::init_service(app(&world)).await;

    let mut sessions = Vec::new();
    for username in ["alice", "bob"] {
        let res = test::call_service(&app, signup_request(username).to_request()).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let cookie = session_cookie(&res).expect("session cookie");
        let body: Value = test::read_body_json(res).await;
        let id = body["user"]["id"].as_str().expect("user id").to_owned();
        sessions.push((cookie, id));
    }
    let (alice, alice_id) = &sessions[0];
    let (bob, bob_id) = &sessions[1];

    let created = test::call_service(
        &app,
        post("/api/v1/posts/create", alice)
            .set_json(json!({"content": "Hello world"}))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(created).await;
    let post_id = created["id"].as_str().expect("post id").to_owned();

    let commented = test::call_service(
        &app,
        post(&format!("/api/v1/posts/{post_id}/comment"), bob)
            .set_json(json!({"content": "Nice!"}))
            .to_request(),
    )
    .await;
    assert_eq!(commented.status(), StatusCode::OK);
    assert_eq!(
        notification_kinds(&world, alice_id).await,
        [NotificationKind::Comment]
    );
    assert!(notification_kinds(&world, bob_id).await.is_empty());

    let liked = test::call_service(
        &app,
        post(&format!("/api/v1/posts/{post_id}/like"), bob).to_request(),
    )
    .await;
    let liked: Value = test::read_body_json(liked).await;
    assert_eq!(liked["likes"], json!([bob_id]));
    assert_eq!(
        notification_kinds(&world, alice_id).await,
        [NotificationKind::Like, NotificationKind::Comment]
    );

    let unliked = test::call_service(
        &app,
        post(&format!("/api/v1/posts/{post_id}/like"), bob).to_request(),
    )
    .await;
    let unliked: Value = test::read_body_json(unliked).await;
    assert_eq!(unliked["likes"], json!([]));
    assert_eq!(notification_kinds(&world, alice_id).await.len(), 2);

    let fetched = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/posts/{post_id}"))
            .cookie(alice.clone())
            .to_request(),
    )
    .await;
    let fetched: Value = test::read_body_json(fetched).await;
    assert_eq!(fetched["comments"][0]["content"], json!("Nice!"));
    assert_eq!(fetched["comments"][0]["user"]["username"], json!("bob"));
}

#[actix_web::test]
async fn relike_cycles_notify_each_time() {
    let world = TestWorld::new();
    let app = test::init_service(app(&world)).await;
    let alice_res = test::call_service(&app, signup_request("alice").to_request()).await;
    let alice = session_cookie(&alice_res).expect("alice session");
    let alice_body: Value = test::read_body_json(alice_res).await;
    let alice_id = alice_body["user"]["id"].as_str().expect("id").to_owned();
    let bob_res = test::call_service(&app, signup_request("bob").to_request()).await;
    let bob = session_cookie(&bob_res).expect("bob session");

    let created = test::call_service(
        &app,
        post("/api/v1/posts/create", &alice)
            .set_json(json!({"content": "like me twice"}))
            .to_request(),
    )
    .await;
    let created: Value = test::read_body_json(created).await;
    let uri = format!("/api/v1/posts/{}/like", created["id"].as_str().expect("id"));

    for _ in 0..3 {
        let res = test::call_service(&app, post(&uri, &bob).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    assert_eq!(
        notification_kinds(&world, &alice_id).await,
        [NotificationKind::Like, NotificationKind::Like]
    );
}

#[actix_web::test]
async fn strangers_cannot_delete_and_the_post_survives() {
    let world = TestWorld::new();
    let app = test::init_service(app(&world)).await;
    let alice_res = test::call_service(&app, signup_request("alice").to_request()).await;
    let alice = session_cookie(&alice_res).expect("alice session");
    let bob_res = test::call_service(&app, signup_request("bob").to_request()).await;
    let bob = session_cookie(&bob_res).expect("bob session");

    let created = test::call_service(
        &app,
        post("/api/v1/posts/create", &alice)
            .set_json(json!({"content": "keep me"}))
            .to_request(),
    )
    .await;
    let created: Value = test::read_body_json(created).await;
    let id = created["id"].as_str().expect("id").to_owned();

    let refused = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/posts/delete/{id}"))
            .cookie(bob)
            .to_request(),
    )
    .await;
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);

    let fetched = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/posts/{id}"))
            .cookie(alice)
            .to_request(),
    )
    .await;
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched: Value = test::read_body_json(fetched).await;
    assert_eq!(fetched, created);
}
