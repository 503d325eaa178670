use std::io::Cursor;

use rocket::http::hyper::header::CONTENT_LANGUAGE;
use rocket::http::ContentType;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::{response, Request, Response};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

use crate::error::{AuthError, RosterError};

/// Implements [RFC7807](https://tools.ietf.org/html/rfc7807).
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub status: Status,
    pub type_uri: String,
    pub title: String,

    pub detail: Option<String>,

    pub body: Map<String, Value>,
}

impl Default for Problem {
    fn default() -> Self {
        Problem {
            status: Status::InternalServerError,
            type_uri: "about:blank".to_string(),
            title: "Problem".to_string(),
            detail: None,
            body: Map::new(),
        }
    }
}

impl Problem {
    pub fn new_untyped(status: Status, title: impl ToString) -> Problem {
        Problem {
            status,
            type_uri: "about:blank".to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn detail(&mut self, value: impl ToString) -> &mut Problem {
        self.detail = Some(value.to_string());
        self
    }

    pub fn insert_json_value(&mut self, key: impl ToString, value: Value) -> &mut Problem {
        self.body.insert(key.to_string(), value);
        self
    }

    pub fn insert_str(&mut self, key: impl ToString, value: impl ToString) -> &mut Problem {
        self.body
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    fn to_json(&self) -> Map<String, Value> {
        let mut body = self.body.clone();

        // Following are required by rfc7807
        body.insert(String::from("type"), Value::from(self.type_uri.clone()));
        body.insert(String::from("title"), Value::from(self.title.clone()));

        // Optional parameters as specified by rfc7807
        if let Some(detail) = &self.detail {
            body.insert(String::from("detail"), Value::from(detail.clone()));
        }
        body.insert(String::from("status"), Value::from(self.status.code));

        body
    }
}

impl Display for Problem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.title)
    }
}

impl std::error::Error for Problem {}

impl<'r> Responder<'r, 'static> for Problem {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let body_string = Value::Object(self.to_json()).to_string();

        Response::build()
            .status(self.status)
            .header(ContentType::new("application", "problem+json"))
            .raw_header(CONTENT_LANGUAGE.as_str(), "en")
            .sized_body(body_string.len(), Cursor::new(body_string))
            .ok()
    }
}

pub mod problems {
    use crate::resp::problem::Problem;
    use rocket::http::Status;

    #[inline]
    pub fn unauthenticated() -> Problem {
        Problem::new_untyped(Status::Unauthorized, "Unable to authorize user.")
            .detail("Authentication required (teacher/admin only)")
            .to_owned()
    }

    #[inline]
    pub fn bad_login() -> Problem {
        Problem::new_untyped(Status::Unauthorized, "Bad username or password.")
            .detail("Invalid credentials")
            .to_owned()
    }

    #[inline]
    pub fn credentials_unavailable() -> Problem {
        Problem::new_untyped(
            Status::InternalServerError,
            "Teacher credentials are unavailable.",
        )
    }
}

impl From<RosterError> for Problem {
    fn from(e: RosterError) -> Self {
        match e {
            RosterError::NotFound { activity } => {
                Problem::new_untyped(Status::NotFound, "Activity doesn't exist.")
                    .detail("Activity not found")
                    .insert_str("activity", activity)
                    .to_owned()
            }
            RosterError::AlreadyRegistered { activity, email } => {
                Problem::new_untyped(Status::BadRequest, "Bad signup.")
                    .detail("Student is already signed up")
                    .insert_str("activity", activity)
                    .insert_str("email", email)
                    .to_owned()
            }
            RosterError::NotRegistered { activity, email } => {
                Problem::new_untyped(Status::BadRequest, "Bad unregistration.")
                    .detail("Student is not signed up for this activity")
                    .insert_str("activity", activity)
                    .insert_str("email", email)
                    .to_owned()
            }
            RosterError::ActivityFull {
                activity,
                max_participants,
            } => Problem::new_untyped(Status::BadRequest, "Bad signup.")
                .detail("Activity is full")
                .insert_str("activity", activity)
                .insert_json_value("max_participants", Value::from(max_participants))
                .to_owned(),
        }
    }
}

impl From<AuthError> for Problem {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Unauthenticated | AuthError::BadSession(_) | AuthError::Jwt(_) => {
                problems::unauthenticated()
            }
            AuthError::InvalidCredentials => problems::bad_login(),
            AuthError::CredentialStore(err) => {
                tracing::error!("{}", err);
                problems::credentials_unavailable()
            }
        }
    }
}

impl From<jsonwebtoken::errors::Error> for Problem {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.into_kind() {
            ErrorKind::ExpiredSignature => {
                Problem::new_untyped(Status::Unauthorized, "Expired session signature.")
            }
            _ => Problem::new_untyped(Status::Unauthorized, "Error while handling session token."),
        }
    }
}
