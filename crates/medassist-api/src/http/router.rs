//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(handlers::health::get_health))
        // Consultation
        .route(
            "/consultation",
            get(handlers::consultation::get_consultation),
        )
        .route(
            "/consultation/messages",
            post(handlers::consultation::post_message),
        )
        .route(
            "/consultation/form",
            put(handlers::consultation::update_form).delete(handlers::consultation::cancel_form),
        )
        .route(
            "/consultation/form/submit",
            post(handlers::consultation::submit_form),
        )
        .route(
            "/consultation/attachments",
            post(handlers::consultation::post_attachment),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::testing::stub_state;

    fn test_router() -> Router {
        build_router(stub_state())
    }

    async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(body) => {
                request = request.header("content-type", "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };
        let response = router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_agent_state() {
        let router = test_router();
        let (status, body) = call(&router, Method::GET, "/api/v1/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["agent"], "up");
        assert_eq!(body["data"]["connectivity"], "unknown");
        assert_eq!(body["data"]["agent_url"], "http://agent.test");
    }

    #[tokio::test]
    async fn consultation_starts_with_greeting() {
        let router = test_router();
        let (status, body) = call(&router, Method::GET, "/api/v1/consultation", None).await;

        assert_eq!(status, StatusCode::OK);
        let turns = body["data"]["turns"].as_array().unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0]["text"], "Case created.");
        assert_eq!(body["data"]["busy"], false);
        assert!(body["data"]["form"].is_null());
        assert_eq!(body["_links"]["self"], "/api/v1/consultation");
    }

    #[tokio::test]
    async fn message_opens_form_and_submit_delivers_result() {
        let router = test_router();

        let (status, body) = call(
            &router,
            Method::POST,
            "/api/v1/consultation/messages",
            Some(json!({"message": "What is my diabetes risk?"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["outcome"], "delivered");
        assert_eq!(body["data"]["route"], "primary");
        let fields = body["data"]["consultation"]["form"]["fields"]
            .as_array()
            .unwrap();
        assert_eq!(fields.len(), 2);

        let (status, body) = call(
            &router,
            Method::PUT,
            "/api/v1/consultation/form",
            Some(json!({"values": {"age": "45"}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["values"]["age"], "45");

        let (status, body) = call(
            &router,
            Method::POST,
            "/api/v1/consultation/form/submit",
            Some(json!({"values": {"gender": "male"}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["outcome"], "delivered");
        let consultation = &body["data"]["consultation"];
        assert!(consultation["form"].is_null());
        let turns = consultation["turns"].as_array().unwrap();
        assert_eq!(turns.len(), 5);
        assert_eq!(turns[3]["text"], "Predict diabetes risk: male, 45");
        assert_eq!(turns[4]["metadata"]["model_result"]["risk"], 0.12);
    }

    #[tokio::test]
    async fn invalid_form_value_is_a_validation_error() {
        let router = test_router();
        call(
            &router,
            Method::POST,
            "/api/v1/consultation/messages",
            Some(json!({"message": "risk check"})),
        )
        .await;

        let (status, body) = call(
            &router,
            Method::PUT,
            "/api/v1/consultation/form",
            Some(json!({"values": {"age": "forty"}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
        assert_eq!(body["errors"][0]["details"]["field"], "age");
    }

    #[tokio::test]
    async fn invalid_value_leaves_other_values_unwritten() {
        let router = test_router();
        call(
            &router,
            Method::POST,
            "/api/v1/consultation/messages",
            Some(json!({"message": "risk check"})),
        )
        .await;

        let (status, _) = call(
            &router,
            Method::PUT,
            "/api/v1/consultation/form",
            Some(json!({"values": {"age": "forty", "gender": "female"}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = call(&router, Method::GET, "/api/v1/consultation", None).await;
        let values = &body["data"]["form"]["values"];
        assert!(values.get("gender").is_none());
        assert!(values.get("age").is_none());
    }

    #[tokio::test]
    async fn submit_without_form_is_rejected() {
        let router = test_router();
        let (status, body) =
            call(&router, Method::POST, "/api/v1/consultation/form/submit", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn blank_message_is_rejected_without_turns() {
        let router = test_router();
        let (status, body) = call(
            &router,
            Method::POST,
            "/api/v1/consultation/messages",
            Some(json!({"message": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["message"], "message is empty");

        let (_, body) = call(&router, Method::GET, "/api/v1/consultation", None).await;
        assert_eq!(body["data"]["turns"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cancel_form_reports_whether_one_was_open() {
        let router = test_router();
        let (_, body) = call(&router, Method::DELETE, "/api/v1/consultation/form", None).await;
        assert_eq!(body["data"]["cancelled"], false);

        call(
            &router,
            Method::POST,
            "/api/v1/consultation/messages",
            Some(json!({"message": "risk check"})),
        )
        .await;
        let (status, body) =
            call(&router, Method::DELETE, "/api/v1/consultation/form", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["cancelled"], true);
    }

    #[tokio::test]
    async fn attachment_appends_two_turns() {
        let router = test_router();
        let (status, body) = call(
            &router,
            Method::POST,
            "/api/v1/consultation/attachments",
            Some(json!({"file_name": "labs.pdf"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let turns = body["data"]["turns"].as_array().unwrap();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1]["text"], "Attached file: labs.pdf");
    }
}
