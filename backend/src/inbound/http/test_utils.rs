//! Test helpers for inbound HTTP components.

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::Trace;
use crate::inbound::http::configure_api;
use crate::inbound::http::health::HealthState;
use crate::inbound::http::session_config::{SESSION_COOKIE_NAME, SessionSettings};
use crate::test_support::TestWorld;

/// Session middleware with a fresh key and the `Secure` flag disabled for
/// plain HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
    .middleware()
}

/// The full API over `world`'s state, mounted at `/api/v1`.
pub fn test_app(
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
    App::new()
        .app_data(web::Data::new(world.state.clone()))
        .app_data(health)
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .configure(configure_api),
        )
}

/// Session cookie set on `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
}

/// Signup request for `username` with a throwaway password.
pub fn signup_request(username: &str) -> actix_web::test::TestRequest {
    actix_web::test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(serde_json::json!({
            "name": format!("{username} Example"),
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "secret1",
        }))
}

/// Sign `$username` up against `$app`, yielding the session cookie and the
/// created user.
macro_rules! sign_up {
    ($app:expr, $username:expr) => {{
        let res = actix_web::test::call_service(
            $app,
            $crate::inbound::http::test_utils::signup_request($username).to_request(),
        )
        .await;
        assert_eq!(res.status(), actix_web::http::StatusCode::CREATED);
        let cookie =
            $crate::inbound::http::test_utils::session_cookie(&res).expect("session cookie");
        let body: $crate::inbound::http::dto::AuthResponse =
            actix_web::test::read_body_json(res).await;
        (cookie, body.user)
    }};
}
pub(crate) use sign_up;
