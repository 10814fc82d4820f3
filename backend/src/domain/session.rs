//! Session claims carried by the authentication cookie.
//!
//! The cookie itself is encrypted and signed by the HTTP adapter; the claims
//! only record who the session belongs to and when it lapses, so an expired
//! cookie replayed by a client is still refused.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Session lifetime in days.
pub const SESSION_TTL_DAYS: i64 = 3;

/// Lifetime of a freshly issued session.
pub fn session_ttl() -> Duration {
    Duration::days(SESSION_TTL_DAYS)
}

/// Identity and validity window of an authenticated session.
///
/// # Examples
/// ```
/// use chrono::{Duration, Utc};
/// use proflink::domain::{SessionClaims, UserId};
///
/// let now = Utc::now();
/// let claims = SessionClaims::issue(UserId::random(), now);
/// assert!(!claims.is_expired(now));
/// assert!(claims.is_expired(now + Duration::days(3)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    user_id: UserId,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl SessionClaims {
    /// Issue claims for `user_id` valid for [`SESSION_TTL_DAYS`] from `now`.
    pub fn issue(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            issued_at: now,
            expires_at: now + session_ttl(),
        }
    }

    /// Signed-in user.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// When the session was issued.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// When the session stops being honoured.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the session has lapsed at `now`. The expiry instant itself
    /// counts as expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    #[case(Duration::zero(), false)]
    #[case(Duration::days(3) - Duration::seconds(1), false)]
    #[case(Duration::days(3), true)]
    #[case(Duration::days(30), true)]
    fn expiry_window(#[case] elapsed: Duration, #[case] expired: bool) {
        let claims = SessionClaims::issue(UserId::random(), noon());
        assert_eq!(claims.is_expired(noon() + elapsed), expired);
    }

    #[rstest]
    fn claims_serialise_camel_case() {
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        let value = serde_json::to_value(SessionClaims::issue(id, noon())).expect("serialise");
        assert_eq!(value["userId"], "3fa85f64-5717-4562-b3fc-2c963f66afa6");
        assert!(value.get("expiresAt").is_some());
    }
}
