use rocket::serde::json::Json;
use rocket::State;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::data::activity::{Registry, Roster};
use crate::resp::problem::Problem;
use crate::resp::session::Teacher;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl ToString) -> Self {
        MessageResponse {
            message: message.to_string(),
        }
    }
}

/// List all activities and their participants
#[utoipa::path(
    responses(
        (status = 200, description = "Activities keyed by name", body = HashMap<String, Activity>),
    )
)]
#[get("/activities")]
#[tracing::instrument(skip(registry))]
pub async fn activity_list(registry: &State<Registry>) -> Json<Roster> {
    Json(registry.snapshot().await)
}

/// Sign a student up for an activity
#[utoipa::path(
    params(
        ("activity_name", description = "Name of the activity"),
        ("email", description = "Student email"),
    ),
    responses(
        (status = 200, description = "Student signed up", body = MessageResponse),
        (status = 400, description = "Student already signed up or activity full"),
        (status = 401, description = "No teacher session"),
        (status = 404, description = "Activity not found"),
    )
)]
#[post("/activities/<activity_name>/signup?<email>")]
#[tracing::instrument(skip(auth, registry))]
pub async fn activity_signup(
    activity_name: &str,
    email: &str,
    auth: Result<Teacher, Problem>,
    registry: &State<Registry>,
) -> Result<Json<MessageResponse>, Problem> {
    let teacher = auth?;

    if let Err(e) = registry.sign_up(activity_name, email).await {
        tracing::warn!("signup by {} rejected: {}", teacher.username, e);
        return Err(e.into());
    }

    tracing::info!("{} signed up {} for {}", teacher.username, email, activity_name);
    Ok(Json(MessageResponse::new(format!(
        "Signed up {} for {}",
        email, activity_name
    ))))
}

/// Remove a student from an activity
#[utoipa::path(
    params(
        ("activity_name", description = "Name of the activity"),
        ("email", description = "Student email"),
    ),
    responses(
        (status = 200, description = "Student unregistered", body = MessageResponse),
        (status = 400, description = "Student is not signed up"),
        (status = 401, description = "No teacher session"),
        (status = 404, description = "Activity not found"),
    )
)]
#[delete("/activities/<activity_name>/unregister?<email>")]
#[tracing::instrument(skip(auth, registry))]
pub async fn activity_unregister(
    activity_name: &str,
    email: &str,
    auth: Result<Teacher, Problem>,
    registry: &State<Registry>,
) -> Result<Json<MessageResponse>, Problem> {
    let teacher = auth?;

    if let Err(e) = registry.unregister(activity_name, email).await {
        tracing::warn!("unregistration by {} rejected: {}", teacher.username, e);
        return Err(e.into());
    }

    tracing::info!("{} unregistered {} from {}", teacher.username, email, activity_name);
    Ok(Json(MessageResponse::new(format!(
        "Unregistered {} from {}",
        email, activity_name
    ))))
}

///////////////////////
//       TESTS
///////////////////////

#[cfg(test)]
mod activity_endpoints {
    use std::collections::HashMap;

    use rocket::http::{ContentType, Cookie, Status};
    use rocket::local::asynchronous::Client;
    use serde_json::Value;

    use crate::data::activity::{seed, Activity, Roster};
    use crate::resp::session::SESSION_COOKIE_NAME;
    use crate::route::tests::{logged_in_client, test_client, test_config};

    async fn participants(client: &Client, activity: &str) -> Vec<String> {
        let response = client.get("/activities").dispatch().await;
        let roster: HashMap<String, Activity> =
            response.into_json().await.expect("invalid response json");
        roster
            .get(activity)
            .map(|a| a.participants.clone())
            .unwrap_or_default()
    }

    #[rocket::async_test]
    async fn list_returns_seed_roster_in_order() {
        let client = test_client(test_config(), seed::mergington()).await;

        let response = client.get("/activities").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.content_type(), Some(ContentType::JSON));

        let body = response.into_string().await.expect("response body");
        let roster: Roster = serde_json::from_str(&body).expect("invalid response json");
        assert_eq!(roster, seed::mergington());

        let chess = body.find("Chess Club").unwrap();
        let debate = body.find("Debate Team").unwrap();
        assert!(chess < debate);
    }

    #[rocket::async_test]
    async fn signup_appends_participant() {
        let client = logged_in_client(test_config(), seed::mergington()).await;

        let response = client
            .post("/activities/Chess%20Club/signup?email=new@mergington.edu")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let body: HashMap<String, String> =
            response.into_json().await.expect("invalid response json");
        assert_eq!(
            body.get("message").map(String::as_str),
            Some("Signed up new@mergington.edu for Chess Club")
        );

        assert_eq!(
            participants(&client, "Chess Club").await,
            vec![
                "michael@mergington.edu",
                "daniel@mergington.edu",
                "new@mergington.edu"
            ]
        );
    }

    #[rocket::async_test]
    async fn duplicate_signup_is_bad_request() {
        let client = logged_in_client(test_config(), seed::mergington()).await;

        let response = client
            .post("/activities/Chess%20Club/signup?email=michael@mergington.edu")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
        assert_eq!(
            response.content_type(),
            Some(ContentType::new("application", "problem+json"))
        );

        let problem: Value = response.into_json().await.expect("invalid problem json");
        assert_eq!(problem["detail"], "Student is already signed up");
        assert_eq!(participants(&client, "Chess Club").await.len(), 2);
    }

    #[rocket::async_test]
    async fn unknown_activity_is_not_found() {
        let client = logged_in_client(test_config(), seed::mergington()).await;

        let response = client
            .post("/activities/Underwater%20Basket%20Weaving/signup?email=new@mergington.edu")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);

        let response = client
            .delete("/activities/Underwater%20Basket%20Weaving/unregister?email=new@mergington.edu")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn mutations_require_session() {
        let client = test_client(test_config(), seed::mergington()).await;

        for uri in [
            "/activities/Chess%20Club/signup?email=new@mergington.edu",
            "/activities/Nonexistent/signup?email=new@mergington.edu",
        ] {
            let response = client.post(uri).dispatch().await;
            assert_eq!(response.status(), Status::Unauthorized, "{}", uri);
        }

        let response = client
            .delete("/activities/Nonexistent/unregister?email=michael@mergington.edu")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);

        let response = client
            .delete("/activities/Chess%20Club/unregister?email=michael@mergington.edu")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);

        let problem: Value = response.into_json().await.expect("invalid problem json");
        assert_eq!(
            problem["detail"],
            "Authentication required (teacher/admin only)"
        );
        assert_eq!(participants(&client, "Chess Club").await.len(), 2);
    }

    #[rocket::async_test]
    async fn forged_cookie_is_rejected() {
        let client = test_client(test_config(), seed::mergington()).await;

        let response = client
            .post("/activities/Chess%20Club/signup?email=new@mergington.edu")
            .cookie(Cookie::new(SESSION_COOKIE_NAME, "mrodriguez"))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);
    }

    #[rocket::async_test]
    async fn unsigned_cookie_is_accepted_when_configured() {
        let mut config = test_config();
        config.accept_unsigned_sessions = true;
        let client = test_client(config, seed::mergington()).await;

        let response = client
            .post("/activities/Chess%20Club/signup?email=new@mergington.edu")
            .cookie(Cookie::new(SESSION_COOKIE_NAME, "anyone"))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let response = client
            .post("/activities/Chess%20Club/signup?email=other@mergington.edu")
            .cookie(Cookie::new(SESSION_COOKIE_NAME, ""))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);
    }

    #[rocket::async_test]
    async fn unregister_removes_participant() {
        let client = logged_in_client(test_config(), seed::mergington()).await;

        let response = client
            .delete("/activities/Chess%20Club/unregister?email=michael@mergington.edu")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let body: HashMap<String, String> =
            response.into_json().await.expect("invalid response json");
        assert_eq!(
            body.get("message").map(String::as_str),
            Some("Unregistered michael@mergington.edu from Chess Club")
        );
        assert_eq!(
            participants(&client, "Chess Club").await,
            vec!["daniel@mergington.edu"]
        );

        let response = client
            .delete("/activities/Chess%20Club/unregister?email=michael@mergington.edu")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        let problem: Value = response.into_json().await.expect("invalid problem json");
        assert_eq!(
            problem["detail"],
            "Student is not signed up for this activity"
        );
        assert_eq!(
            participants(&client, "Chess Club").await,
            vec!["daniel@mergington.edu"]
        );
    }

    #[rocket::async_test]
    async fn full_activity_rejects_signup() {
        let mut roster = Roster::new();
        roster.insert(
            "Tiny Club",
            Activity::new("Small", "Sundays", 1).with_participants(["only@mergington.edu"]),
        );
        let client = logged_in_client(test_config(), roster.clone()).await;

        let response = client
            .post("/activities/Tiny%20Club/signup?email=new@mergington.edu")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
        let problem: Value = response.into_json().await.expect("invalid problem json");
        assert_eq!(problem["detail"], "Activity is full");

        let mut lenient = test_config();
        lenient.enforce_capacity = false;
        let client = logged_in_client(lenient, roster).await;
        let response = client
            .post("/activities/Tiny%20Club/signup?email=new@mergington.edu")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(participants(&client, "Tiny Club").await.len(), 2);
    }
}
