//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so handlers only deal with domain
//! [`SessionClaims`]. Expiry is enforced by the account service, not by the
//! cookie, so a replayed cookie past its claims' expiry is still refused.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::ports::AccountService;
use crate::domain::{Error, SessionClaims, User};

pub(crate) const CLAIMS_KEY: &str = "claims";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store freshly issued claims, replacing any previous session.
    pub fn persist(&self, claims: &SessionClaims) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(CLAIMS_KEY, claims)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Claims stored in the session cookie, if any.
    ///
    /// Undecodable claims are treated as absent.
    pub fn claims(&self) -> Option<SessionClaims> {
        match self.0.get::<SessionClaims>(CLAIMS_KEY) {
            Ok(claims) => claims,
            Err(error) => {
                warn!(%error, "discarding undecodable session claims");
                None
            }
        }
    }

    /// Require session claims or return `401 Unauthorized`.
    pub fn require_claims(&self) -> Result<SessionClaims, Error> {
        self.claims()
            .ok_or_else(|| Error::unauthorized("Unauthorized - No Token Provided"))
    }

    /// Drop the session and expire its cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

/// Resolve the session to a live user, refusing missing or expired sessions
/// and sessions whose user no longer exists.
pub async fn require_user(
    session: &SessionContext,
    accounts: &dyn AccountService,
) -> Result<User, Error> {
    let claims = session.require_claims()?;
    accounts.current_user(&claims).await
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{ErrorCode, UserId};
    use crate::inbound::http::session_config::SESSION_COOKIE_NAME;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use chrono::{TimeZone, Utc};

    fn fixed_claims() -> SessionClaims {
        let now = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id");
        SessionClaims::issue(id, now)
    }

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .route(
                "/set",
                web::get().to(|session: SessionContext| async move {
                    session.persist(&fixed_claims())?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/get",
                web::get().to(|session: SessionContext| async move {
                    let claims = session.require_claims()?;
                    Ok::<_, Error>(HttpResponse::Ok().body(claims.user_id().to_string()))
                }),
            )
            .route(
                "/purge",
                web::get().to(|session: SessionContext| async move {
                    session.purge();
                    HttpResponse::Ok()
                }),
            )
    }

    #[actix_web::test]
    async fn round_trips_claims() {
        let app = test::init_service(session_test_app()).await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
            .expect("session cookie set")
            .into_owned();

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        let body = test::read_body(get_res).await;
        assert_eq!(body, "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[actix_web::test]
    async fn missing_claims_are_unauthorised() {
        let app = test::init_service(session_test_app()).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/get").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Error = test::read_body_json(res).await;
        assert_eq!(body.code(), ErrorCode::Unauthorized);
    }

    #[actix_web::test]
    async fn purge_expires_the_cookie() {
        let app = test::init_service(session_test_app()).await;
        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
            .expect("session cookie set")
            .into_owned();

        let purge_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/purge")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let removal = purge_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
            .expect("removal cookie set");
        assert_eq!(removal.value(), "");
    }

    #[actix_web::test]
    async fn tampered_claims_are_unauthorised() {
        let app = test::init_service(
            session_test_app().route(
                "/set-invalid",
                web::get().to(|session: Session| async move {
                    session
                        .insert(CLAIMS_KEY, "not-claims")
                        .expect("set invalid claims");
                    HttpResponse::Ok()
                }),
            ),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
            .expect("session cookie set")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
