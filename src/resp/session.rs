use std::collections::HashMap;

use chrono::serde::ts_seconds;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest, Request};
use rocket::time::OffsetDateTime;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AuthError;
use crate::resp::problem::Problem;
use crate::security::Security;

pub static SESSION_COOKIE_NAME: &str = "mhsauth";

/// Claims carried by the `mhsauth` cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    #[serde(with = "ts_seconds")]
    iat: DateTime<Utc>,
    #[serde(with = "ts_seconds")]
    exp: DateTime<Utc>,
    pub jti: Uuid,
    pub sub: String,
}

impl SessionToken {
    pub fn new(username: impl ToString, ttl: Duration) -> SessionToken {
        let now = Utc::now();
        SessionToken {
            iat: now,
            exp: now + ttl,
            jti: Uuid::new_v4(),
            sub: username.to_string(),
        }
    }

    pub fn expires(&self) -> DateTime<Utc> {
        self.exp
    }

    pub fn encode_jwt(&self, key: impl AsRef<[u8]>) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::new(Algorithm::HS256),
            &self,
            &EncodingKey::from_secret(key.as_ref()),
        )
    }

    pub fn decode_jwt(
        token: &str,
        key: impl AsRef<[u8]>,
    ) -> Result<SessionToken, jsonwebtoken::errors::Error> {
        decode::<SessionToken>(
            token,
            &DecodingKey::from_secret(key.as_ref()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
    }

    pub fn cookie(
        &self,
        key: impl AsRef<[u8]>,
        secure: bool,
    ) -> Result<Cookie<'static>, jsonwebtoken::errors::Error> {
        Ok(Cookie::build((SESSION_COOKIE_NAME, self.encode_jwt(key)?))
            .secure(secure)
            .expires(OffsetDateTime::from_unix_timestamp(self.exp.timestamp()).ok())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build())
    }
}

/// Session ids ended by logout. Entries are dropped once the token would have
/// expired on its own.
#[derive(Debug, Default)]
pub struct SessionStore {
    revoked: Mutex<HashMap<Uuid, DateTime<Utc>>>,
}

impl SessionStore {
    pub async fn revoke(&self, token: &SessionToken) {
        let now = Utc::now();
        let mut revoked = self.revoked.lock().await;
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(token.jti, token.exp);
    }

    pub async fn is_revoked(&self, id: &Uuid) -> bool {
        self.revoked.lock().await.contains_key(id)
    }

    pub async fn revoked_count(&self) -> usize {
        self.revoked.lock().await.len()
    }
}

/// The logged in teacher behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teacher {
    pub username: String,
    /// `None` when the cookie was accepted unsigned.
    pub session: Option<SessionToken>,
}

pub async fn extract_teacher(
    cookies: &CookieJar<'_>,
    security: &Security,
    sessions: &SessionStore,
    accept_unsigned: bool,
) -> Result<Teacher, AuthError> {
    let value = cookies
        .get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::Unauthenticated)?;
    tracing::trace!("extracted session from cookie");

    match SessionToken::decode_jwt(&value, &security.session_key) {
        Ok(token) => {
            if sessions.is_revoked(&token.jti).await {
                return Err(AuthError::BadSession("session was logged out"));
            }
            tracing::debug!("decoded session token for teacher: {}", token.sub);
            Ok(Teacher {
                username: token.sub.clone(),
                session: Some(token),
            })
        }
        // Only values that aren't tokens at all count as unsigned usernames.
        Err(_) if accept_unsigned && jsonwebtoken::decode_header(&value).is_err() => {
            tracing::debug!("accepting unsigned session for: {}", value);
            Ok(Teacher {
                username: value,
                session: None,
            })
        }
        Err(err) => Err(err.into()),
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Teacher {
    type Error = Problem;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let rocket = req.rocket();
        let (Some(security), Some(sessions), Some(config)) = (
            rocket.state::<Security>(),
            rocket.state::<SessionStore>(),
            rocket.state::<Config>(),
        ) else {
            tracing::error!("session state isn't managed by this instance");
            return Outcome::Error((
                Status::InternalServerError,
                Problem::new_untyped(Status::InternalServerError, "Sessions are unavailable."),
            ));
        };

        match extract_teacher(
            req.cookies(),
            security,
            sessions,
            config.accept_unsigned_sessions,
        )
        .await
        {
            Ok(teacher) => Outcome::Success(teacher),
            Err(e) => {
                tracing::debug!("unable to extract teacher from cookies: {}", e);
                Outcome::Error((Status::Unauthorized, Problem::from(e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::SubsecRound;

    #[test]
    fn token_round_trips_through_jwt() {
        let security = Security::ephemeral();
        let mut token = SessionToken::new("mchen", Duration::hours(2));
        token.iat = token.iat.round_subsecs(0);
        token.exp = token.exp.round_subsecs(0);

        let jwt = token
            .encode_jwt(&security.session_key)
            .expect("encoding should work");
        let decoded =
            SessionToken::decode_jwt(&jwt, &security.session_key).expect("decoding should work");

        assert_eq!(decoded, token);
    }

    #[test]
    fn token_from_another_key_is_rejected() {
        let token = SessionToken::new("mchen", Duration::hours(2));
        let jwt = token.encode_jwt(&Security::ephemeral().session_key).unwrap();

        assert!(SessionToken::decode_jwt(&jwt, &Security::ephemeral().session_key).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let security = Security::ephemeral();
        let token = SessionToken::new("mchen", Duration::hours(-2));
        let jwt = token.encode_jwt(&security.session_key).unwrap();

        let err = SessionToken::decode_jwt(&jwt, &security.session_key).unwrap_err();
        assert!(matches!(
            err.kind(),
            jsonwebtoken::errors::ErrorKind::ExpiredSignature
        ));
    }

    #[test]
    fn cookie_is_http_only() {
        let security = Security::ephemeral();
        let cookie = SessionToken::new("mchen", Duration::hours(1))
            .cookie(&security.session_key, false)
            .unwrap();

        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_ne!(cookie.value(), "mchen");
    }

    #[tokio::test]
    async fn revoked_ids_are_remembered_until_expiry() {
        let store = SessionStore::default();
        let live = SessionToken::new("mchen", Duration::hours(1));
        let stale = SessionToken::new("mrodriguez", Duration::hours(-1));

        store.revoke(&stale).await;
        assert!(store.is_revoked(&stale.jti).await);

        store.revoke(&live).await;
        assert!(store.is_revoked(&live.jti).await);
        assert!(!store.is_revoked(&stale.jti).await);
        assert_eq!(store.revoked_count().await, 1);
    }
}
