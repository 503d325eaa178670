use std::path::Path;

use rocket::fs::{FileServer, Options};
use rocket::serde::json::Json;
use rocket::{Build, Rocket, Route};

pub mod activities;
pub mod auth;
pub mod files;

use activities::*;
use auth::*;
use files::*;

use utoipa::OpenApi;

use crate::data::activity::Activity;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mergington High School API",
        description = "API for viewing and signing up for extracurricular activities"
    ),
    paths(
        index,
        activity_list,
        activity_signup,
        activity_unregister,
        login_submit,
        logout,
        whoami
    ),
    components(schemas(
        Activity,
        MessageResponse,
        LoginData,
        LoginResponse,
        WhoAmIResponse
    ))
)]
pub struct ApiDoc;

#[get("/openapi.json")]
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn api() -> Vec<Route> {
    routes![
        index,
        openapi_json,
        activity_list,
        activity_signup,
        activity_unregister,
        login_submit,
        logout,
        whoami
    ]
}

pub fn mount_api(rocket: Rocket<Build>, static_dir: impl AsRef<Path>) -> Rocket<Build> {
    let static_dir = static_dir.as_ref();
    if !static_dir.is_dir() {
        tracing::warn!(
            "Static directory '{}' doesn't exist, front page won't be served.",
            static_dir.display()
        );
    }

    rocket.mount("/", api()).mount(
        "/static",
        FileServer::new(static_dir, Options::Index | Options::Missing),
    )
}
