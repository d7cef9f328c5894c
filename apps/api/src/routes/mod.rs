pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::resumes::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api/v1/resumes", resume_routes())
        .with_state(state)
}

fn resume_routes() -> Router<AppState> {
    Router::new()
        // Unauthenticated
        .route("/public", get(handlers::handle_public_resumes))
        // Caller-scoped
        .route(
            "/",
            post(handlers::handle_create_resume).get(handlers::handle_list_resumes),
        )
        .route("/default", get(handlers::handle_default_resume))
        .route(
            "/:id",
            get(handlers::handle_get_resume)
                .put(handlers::handle_update_resume)
                .delete(handlers::handle_delete_resume),
        )
        .route("/:id/set-default", patch(handlers::handle_set_default))
        .route("/:id/duplicate", post(handlers::handle_duplicate_resume))
        .route("/:id/preview", get(handlers::handle_preview_resume))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::build_router;
    use crate::auth::USER_ID_HEADER;
    use crate::resumes::store::MemoryResumeStore;
    use crate::state::AppState;

    const BASE: &str = "/api/v1/resumes";

    fn app() -> Router {
        build_router(AppState {
            store: Arc::new(MemoryResumeStore::new()),
        })
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        user: Option<Uuid>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn resume_body(first_name: &str) -> Value {
        json!({
            "personalInfo": {
                "firstName": first_name,
                "lastName": "Smith",
                "email": "someone@example.com",
                "summary": "Builds things."
            },
            "experience": [{ "company": "Acme", "title": "Engineer", "current": true }]
        })
    }

    async fn create(app: &Router, user: Uuid, first_name: &str) -> Value {
        let (status, body) = send(
            app,
            Method::POST,
            BASE,
            Some(user),
            Some(resume_body(first_name)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"].clone()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = send(&app(), Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn missing_caller_is_unauthorized() {
        let (status, body) = send(&app(), Method::GET, BASE, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn create_list_and_default_flow() {
        let app = app();
        let user = Uuid::new_v4();

        let a = create(&app, user, "Alpha").await;
        let b = create(&app, user, "Beta").await;
        assert_eq!(a["isDefault"], true);
        assert_eq!(b["isDefault"], false);
        assert_eq!(a["userId"], user.to_string());

        let (status, list) = send(&app, Method::GET, BASE, Some(user), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["success"], true);
        assert_eq!(list["count"], 2);

        let b_id = b["id"].as_str().unwrap();
        let (status, body) = send(
            &app,
            Method::PATCH,
            &format!("{BASE}/{b_id}/set-default"),
            Some(user),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["isDefault"], true);

        let (_, default) = send(&app, Method::GET, &format!("{BASE}/default"), Some(user), None).await;
        assert_eq!(default["data"]["id"], b["id"]);

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("{BASE}/{b_id}"),
            Some(user),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, default) = send(&app, Method::GET, &format!("{BASE}/default"), Some(user), None).await;
        assert_eq!(default["data"]["id"], a["id"]);
    }

    #[tokio::test]
    async fn default_is_not_found_without_resumes() {
        let (status, body) = send(
            &app(),
            Method::GET,
            &format!("{BASE}/default"),
            Some(Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No default resume found");
    }

    #[tokio::test]
    async fn invalid_document_is_a_bad_request() {
        let (status, body) = send(
            &app(),
            Method::POST,
            BASE,
            Some(Uuid::new_v4()),
            Some(json!({ "personalInfo": { "firstName": "NoEmail", "lastName": "X" } })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("personalInfo.email is required"));
    }

    #[tokio::test]
    async fn private_resume_is_forbidden_to_others_until_public() {
        let app = app();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let resume = create(&app, owner, "Owner").await;
        let uri = format!("{BASE}/{}", resume["id"].as_str().unwrap());

        let (status, _) = send(&app, Method::GET, &uri, Some(stranger), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            Method::PUT,
            &uri,
            Some(owner),
            Some(json!({ "isPublic": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::GET, &uri, Some(stranger), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["isPublic"], true);

        let (status, _) = send(&app, Method::DELETE, &uri, Some(stranger), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn duplicate_returns_private_non_default_copy() {
        let app = app();
        let user = Uuid::new_v4();
        let original = create(&app, user, "Orig").await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("{BASE}/{}/duplicate", original["id"].as_str().unwrap()),
            Some(user),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let copy = &body["data"];
        assert_ne!(copy["id"], original["id"]);
        assert_eq!(copy["isDefault"], false);
        assert_eq!(copy["isPublic"], false);
        assert_eq!(copy["personalInfo"], original["personalInfo"]);
        assert_eq!(copy["experience"], original["experience"]);
    }

    #[tokio::test]
    async fn public_listing_is_unauthenticated_and_paged() {
        let app = app();
        let user = Uuid::new_v4();
        for name in ["Ann", "Ben", "Cat"] {
            let resume = create(&app, user, name).await;
            send(
                &app,
                Method::PUT,
                &format!("{BASE}/{}", resume["id"].as_str().unwrap()),
                Some(user),
                Some(json!({ "isPublic": true })),
            )
            .await;
        }
        create(&app, user, "Private").await;

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("{BASE}/public?page=2&limit=2"),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["currentPage"], 2);
        assert_eq!(body["count"], 1);
        assert!(body["data"][0]["personalInfo"].get("email").is_none());

        let (_, body) = send(
            &app,
            Method::GET,
            &format!("{BASE}/public?search=cAt"),
            None,
            None,
        )
        .await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"][0]["personalInfo"]["firstName"], "Cat");
    }

    #[tokio::test]
    async fn malformed_id_is_a_bad_request() {
        let (status, body) = send(
            &app(),
            Method::GET,
            &format!("{BASE}/not-a-uuid"),
            Some(Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid resume id");
    }

    #[tokio::test]
    async fn preview_renders_markdown() {
        let app = app();
        let user = Uuid::new_v4();
        let resume = create(&app, user, "Prev").await;

        let request = Request::builder()
            .uri(format!("{BASE}/{}/preview", resume["id"].as_str().unwrap()))
            .header(USER_ID_HEADER, user.to_string())
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("# Prev Smith"));
        assert!(text.contains("### Engineer — Acme\n_Present_\n"));
    }
}
