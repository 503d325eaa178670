use rocket::response::Redirect;

/// Send browsers to the static front page
#[utoipa::path(
    responses(
        (status = 307, description = "Redirect to /static/index.html"),
    )
)]
#[get("/")]
pub async fn index() -> Redirect {
    Redirect::temporary(uri!("/static/index.html"))
}

#[cfg(test)]
mod file_endpoints {
    use rocket::http::{ContentType, Status};

    use crate::data::activity::seed;
    use crate::route::tests::{test_client, test_config};

    #[rocket::async_test]
    async fn root_redirects_to_front_page() {
        let client = test_client(test_config(), seed::mergington()).await;

        let response = client.get("/").dispatch().await;
        assert_eq!(response.status(), Status::TemporaryRedirect);
        assert_eq!(
            response.headers().get_one("Location"),
            Some("/static/index.html")
        );
    }

    #[rocket::async_test]
    async fn static_files_are_served() {
        let client = test_client(test_config(), seed::mergington()).await;

        let response = client.get("/static/index.html").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.content_type(), Some(ContentType::HTML));

        let response = client.get("/static/missing.css").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn missing_static_dir_is_tolerated() {
        let mut config = test_config();
        config.static_dir = "/nonexistent/static".into();
        let client = test_client(config, seed::mergington()).await;

        let response = client.get("/activities").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let response = client.get("/static/index.html").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
    }
}
