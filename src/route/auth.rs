use rocket::form::Form;
use rocket::http::{Cookie, CookieJar};
use rocket::serde::json::Json;
use rocket::State;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::Config;
use crate::data::teacher::db::CredentialFile;
use crate::resp::problem::Problem;
use crate::resp::session::{SessionStore, SessionToken, Teacher, SESSION_COOKIE_NAME};
use crate::route::activities::MessageResponse;
use crate::security::Security;

#[derive(Clone, FromForm, ToSchema)]
pub struct LoginData {
    pub username: String,
    #[schema(format = "password")]
    pub password: String,
}

impl std::fmt::Debug for LoginData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LoginData:{}", self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WhoAmIResponse {
    pub user: Option<String>,
}

/// Log a teacher in and set the session cookie
#[utoipa::path(
    request_body(content = LoginData, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Session cookie set", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Credentials file can't be read"),
    )
)]
#[post("/login", data = "<login>")]
#[tracing::instrument(skip(cookies, teachers, security, config))]
pub async fn login_submit(
    login: Form<LoginData>,
    cookies: &CookieJar<'_>,
    teachers: &State<CredentialFile>,
    security: &State<Security>,
    config: &State<Config>,
) -> Result<Json<LoginResponse>, Problem> {
    // VULN: no rate limiting on failed logins
    let teacher = teachers
        .authenticate(&login.username, &login.password)
        .await?;

    let token = SessionToken::new(&teacher.username, config.session_ttl());
    cookies.add(token.cookie(&security.session_key, config.secure_cookies)?);
    tracing::info!(
        "{} logged in, session expires {}",
        teacher.username,
        token.expires()
    );

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: teacher.username,
    }))
}

/// End the current session
#[utoipa::path(
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse),
    )
)]
#[post("/logout")]
#[tracing::instrument(skip_all)]
pub async fn logout(
    teacher: Option<Teacher>,
    cookies: &CookieJar<'_>,
    sessions: &State<SessionStore>,
) -> Json<MessageResponse> {
    if let Some(Teacher {
        username,
        session: Some(token),
    }) = teacher
    {
        sessions.revoke(&token).await;
        tracing::info!("{} logged out", username);
    }

    cookies.remove(Cookie::from(SESSION_COOKIE_NAME));
    Json(MessageResponse::new("Logged out"))
}

/// Name of the teacher owning the current session
#[utoipa::path(
    responses(
        (status = 200, description = "Logged in teacher or null", body = WhoAmIResponse),
    )
)]
#[get("/me")]
#[tracing::instrument(skip_all)]
pub async fn whoami(teacher: Option<Teacher>) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        user: teacher.map(|it| it.username),
    })
}

///////////////////////
//       TESTS
///////////////////////
