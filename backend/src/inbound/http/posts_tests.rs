//! Handler coverage for posts, comments and likes over the in-memory store.

use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::NotificationRepository;
use crate::domain::{ErrorCode, NotificationKind, UserId};
use crate::inbound::http::test_utils::{sign_up, test_app};
use crate::test_support::{FakeMediaStore, SentEmail, TestWorld};

const PNG: &str = "data:image/png;base64,iVBORw0KGgo=";

fn user_id(raw: &str) -> UserId {
    UserId::new(raw).expect("user id from response")
}

#[actix_web::test]
async fn create_then_read_back() {
    let world = TestWorld::new();
    let app = test::init_service(test_app(&world)).await;
    let (cookie, alice) = sign_up!(&app, "alice");

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts/create")
            .cookie(cookie.clone())
            .set_json(json!({"content": "  Hello world  "}))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let post: PostResponse = test::read_body_json(created).await;
    assert_eq!(post.content, "Hello world");
    assert_eq!(post.author.username, "alice");
    assert_eq!(post.author.id, alice.id);
    assert!(post.likes.is_empty());

    let fetched = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/posts/{}", post.id))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(fetched.status(), StatusCode::OK);
    let again: PostResponse = test::read_body_json(fetched).await;
    assert_eq!(again, post);
}

#[actix_web::test]
async fn images_are_uploaded_before_the_post_is_stored() {
    let world = TestWorld::new();
    let app = test::init_service(test_app(&world)).await;
    let (cookie, _) = sign_up!(&app, "alice");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts/create")
            .cookie(cookie)
            .set_json(json!({"image": PNG}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let post: PostResponse = test::read_body_json(res).await;
    assert_eq!(post.content, "");
    assert_eq!(
        post.image.as_deref(),
        Some(format!("{}/1.png", FakeMediaStore::BASE_URL).as_str())
    );
}

#[actix_web::test]
async fn failed_uploads_store_nothing() {
    let world = TestWorld::new();
    world.media.fail_uploads();
    let app = test::init_service(test_app(&world)).await;
    let (cookie, _) = sign_up!(&app, "alice");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts/create")
            .cookie(cookie)
            .set_json(json!({"content": "with picture", "image": PNG}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error: Error = test::read_body_json(res).await;
    assert_eq!(
        error.message(),
        "Failed to upload image. Please try with a smaller image."
    );
    assert_eq!(world.store.post_count(), 0);
}

#[rstest]
#[case(json!({}), "Post must have content or an image")]
#[case(json!({"content": "   "}), "Post must have content or an image")]
#[case(json!({"content": "x".repeat(2_001)}), "Content cannot exceed 2000 characters")]
#[case(json!({"image": "data:text/plain;base64,aGk="}), "Invalid image format")]
#[actix_web::test]
async fn invalid_posts_are_rejected(#[case] body: Value, #[case] message: &str) {
    let world = TestWorld::new();
    let app = test::init_service(test_app(&world)).await;
    let (cookie, _) = sign_up!(&app, "alice");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts/create")
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error: Error = test::read_body_json(res).await;
    assert_eq!(error.message(), message);
    assert_eq!(world.store.post_count(), 0);
    assert_eq!(world.media.upload_count(), 0);
}

#[rstest]
#[case("GET", "/api/v1/posts")]
#[case("POST", "/api/v1/posts/create")]
#[case("GET", "/api/v1/posts/user/alice")]
#[case("GET", "/api/v1/posts/3fa85f64-5717-4562-b3fc-2c963f66afa6")]
#[case("POST", "/api/v1/posts/3fa85f64-5717-4562-b3fc-2c963f66afa6/like")]
#[case("DELETE", "/api/v1/posts/delete/3fa85f64-5717-4562-b3fc-2c963f66afa6")]
#[actix_web::test]
async fn anonymous_callers_are_refused(#[case] method: &str, #[case] uri: &str) {
    let world = TestWorld::new();
    let app = test::init_service(test_app(&world)).await;

    let request = match method {
        "GET" => test::TestRequest::get(),
        "DELETE" => test::TestRequest::delete(),
        _ => test::TestRequest::post().set_json(json!({"content": "hi"})),
    };
    let res = test::call_service(&app, request.uri(uri).to_request()).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let error: Error = test::read_body_json(res).await;
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[case("/api/v1/posts/not-a-uuid")]
#[case("/api/v1/posts/3fa85f64-5717-4562-b3fc-2c963f66afa6")]
#[actix_web::test]
async fn unknown_posts_are_not_found(#[case] uri: &str) {
    let world = TestWorld::new();
    let app = test::init_service(test_app(&world)).await;
    let (cookie, _) = sign_up!(&app, "alice");

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri(uri).cookie(cookie).to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let error: Error = test::read_body_json(res).await;
    assert_eq!(error.message(), "Post not found");
}

#[actix_web::test]
async fn feed_shows_own_and_connected_posts_newest_first() {
    let world = TestWorld::new();
    let app = test::init_service(test_app(&world)).await;
    let (alice_cookie, alice) = sign_up!(&app, "alice");
    let (bob_cookie, bob) = sign_up!(&app, "bob");
    let (carol_cookie, _) = sign_up!(&app, "carol");
    world.store.connect(&user_id(&alice.id), &user_id(&bob.id));

    for (cookie, content) in [
        (&alice_cookie, "alice first"),
        (&bob_cookie, "bob second"),
        (&carol_cookie, "carol stranger"),
    ] {
        world.clock.advance(chrono::TimeDelta::minutes(1));
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/posts/create")
                .cookie(cookie.clone())
                .set_json(json!({"content": content}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/posts")
            .cookie(alice_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let listed: Vec<PostResponse> = test::read_body_json(res).await;
    let contents: Vec<&str> = listed.iter().map(|post| post.content.as_str()).collect();
    assert_eq!(contents, ["bob second", "alice first"]);
}

#[actix_web::test]
async fn user_posts_are_listed_by_username() {
    let world = TestWorld::new();
    let app = test::init_service(test_app(&world)).await;
    let (alice_cookie, _) = sign_up!(&app, "alice");
    let (bob_cookie, _) = sign_up!(&app, "bob");
    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts/create")
            .cookie(alice_cookie)
            .set_json(json!({"content": "by alice"}))
            .to_request(),
    )
    .await;

    let listed = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/posts/user/alice")
            .cookie(bob_cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(listed.status(), StatusCode::OK);
    let posts: Vec<PostResponse> = test::read_body_json(listed).await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].content, "by alice");

    let missing = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/posts/user/nobody")
            .cookie(bob_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let error: Error = test::read_body_json(missing).await;
    assert_eq!(error.message(), "User not found");
}

#[actix_web::test]
async fn only_the_author_may_delete() {
    let world = TestWorld::new();
    let app = test::init_service(test_app(&world)).await;
    let (alice_cookie, _) = sign_up!(&app, "alice");
    let (bob_cookie, _) = sign_up!(&app, "bob");
    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts/create")
            .cookie(alice_cookie.clone())
            .set_json(json!({"content": "mine", "image": PNG}))
            .to_request(),
    )
    .await;
    let post: PostResponse = test::read_body_json(created).await;
    let uri = format!("/api/v1/posts/delete/{}", post.id);

    let refused = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&uri)
            .cookie(bob_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);
    let error: Error = test::read_body_json(refused).await;
    assert_eq!(error.message(), "You are not authorized to delete this post");
    assert_eq!(world.store.post_count(), 1);

    let deleted = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&uri)
            .cookie(alice_cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);
    let body: MessageResponse = test::read_body_json(deleted).await;
    assert_eq!(body.message, "Post deleted successfully");
    assert_eq!(world.store.post_count(), 0);
    assert_eq!(world.media.deleted(), post.image.into_iter().collect::<Vec<_>>());

    let again = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&uri)
            .cookie(alice_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn image_cleanup_failures_do_not_block_deletion() {
    let world = TestWorld::new();
    world.media.fail_deletes();
    let app = test::init_service(test_app(&world)).await;
    let (cookie, _) = sign_up!(&app, "alice");
    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts/create")
            .cookie(cookie.clone())
            .set_json(json!({"image": PNG}))
            .to_request(),
    )
    .await;
    let post: PostResponse = test::read_body_json(created).await;

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/posts/delete/{}", post.id))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(world.store.post_count(), 0);
}

#[actix_web::test]
async fn comments_notify_and_email_the_author() {
    let world = TestWorld::new();
    let app = test::init_service(test_app(&world)).await;
    let (alice_cookie, alice) = sign_up!(&app, "alice");
    let (bob_cookie, bob) = sign_up!(&app, "bob");
    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts/create")
            .cookie(alice_cookie)
            .set_json(json!({"content": "thoughts?"}))
            .to_request(),
    )
    .await;
    let post: PostResponse = test::read_body_json(created).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/posts/{}/comment", post.id))
            .cookie(bob_cookie)
            .set_json(json!({"content": " Nice! "}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let updated: PostResponse = test::read_body_json(res).await;
    assert_eq!(updated.comments.len(), 1);
    assert_eq!(updated.comments[0].content, "Nice!");
    assert_eq!(updated.comments[0].user.username, "bob");

    let notifications =
        NotificationRepository::list_for_recipient(world.store.as_ref(), &user_id(&alice.id))
            .await
            .expect("notifications listed");
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Comment);
    assert_eq!(notifications[0].actor, user_id(&bob.id));
    assert!(!notifications[0].read);

    let sent = world.mailer.wait_for(3, Duration::from_secs(2)).await;
    let comment_email = sent
        .iter()
        .find_map(|email| match email {
            SentEmail::Comment(email) => Some(email.clone()),
            SentEmail::Welcome(_) => None,
        })
        .expect("comment email sent");
    assert_eq!(comment_email.to.to_string(), "alice@example.com");
    assert_eq!(comment_email.commenter_name, "bob Example");
    assert_eq!(comment_email.comment, "Nice!");
}

#[actix_web::test]
async fn commenting_on_your_own_post_is_silent() {
    let world = TestWorld::new();
    let app = test::init_service(test_app(&world)).await;
    let (cookie, alice) = sign_up!(&app, "alice");
    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts/create")
            .cookie(cookie.clone())
            .set_json(json!({"content": "note to self"}))
            .to_request(),
    )
    .await;
    let post: PostResponse = test::read_body_json(created).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/posts/{}/comment", post.id))
            .cookie(cookie)
            .set_json(json!({"content": "reminder"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let notifications =
        NotificationRepository::list_for_recipient(world.store.as_ref(), &user_id(&alice.id))
            .await
            .expect("notifications listed");
    assert!(notifications.is_empty());
}

#[rstest]
#[case(json!({"content": "   "}), "Comment content is required")]
#[case(json!({"content": "y".repeat(501)}), "Comment cannot exceed 500 characters")]
#[actix_web::test]
async fn invalid_comments_are_rejected(#[case] body: Value, #[case] message: &str) {
    let world = TestWorld::new();
    let app = test::init_service(test_app(&world)).await;
    let (cookie, _) = sign_up!(&app, "alice");
    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts/create")
            .cookie(cookie.clone())
            .set_json(json!({"content": "post"}))
            .to_request(),
    )
    .await;
    let post: PostResponse = test::read_body_json(created).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/posts/{}/comment", post.id))
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error: Error = test::read_body_json(res).await;
    assert_eq!(error.message(), message);
}

#[actix_web::test]
async fn likes_toggle_and_only_liking_notifies() {
    let world = TestWorld::new();
    let app = test::init_service(test_app(&world)).await;
    let (alice_cookie, alice) = sign_up!(&app, "alice");
    let (bob_cookie, bob) = sign_up!(&app, "bob");
    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts/create")
            .cookie(alice_cookie)
            .set_json(json!({"content": "like me"}))
            .to_request(),
    )
    .await;
    let post: PostResponse = test::read_body_json(created).await;
    let uri = format!("/api/v1/posts/{}/like", post.id);

    let liked = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&uri)
            .cookie(bob_cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(liked.status(), StatusCode::OK);
    let liked: PostResponse = test::read_body_json(liked).await;
    assert_eq!(liked.likes, vec![bob.id.clone()]);

    let unliked = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&uri)
            .cookie(bob_cookie)
            .to_request(),
    )
    .await;
    let unliked: PostResponse = test::read_body_json(unliked).await;
    assert!(unliked.likes.is_empty());

    let notifications =
        NotificationRepository::list_for_recipient(world.store.as_ref(), &user_id(&alice.id))
            .await
            .expect("notifications listed");
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Like);
}
