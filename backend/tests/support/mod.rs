//! Shared harness for HTTP integration tests over the in-memory store.

use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use proflink::Trace;
use proflink::inbound::http::configure_api;
use proflink::inbound::http::health::HealthState;
use proflink::inbound::http::session_config::{SESSION_COOKIE_NAME, SessionSettings};
use proflink::test_support::TestWorld;
use serde_json::{Value, json};

/// The API as deployed: trace middleware, then the session-wrapped scope.
pub fn app(
    world: &TestWorld,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    let session = SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    };
    App::new()
        .app_data(web::Data::new(world.state.clone()))
        .app_data(health)
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .wrap(session.middleware())
                .configure(configure_api),
        )
}

pub fn signup_body(username: &str, email: &str, password: &str) -> Value {
    json!({
        "name": format!("{username} Example"),
        "username": username,
        "email": email,
        "password": password,
    })
}

pub fn signup_request(username: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(signup_body(
            username,
            &format!("{username}@example.com"),
            "secret1",
        ))
}

/// Session cookie set on `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
}
