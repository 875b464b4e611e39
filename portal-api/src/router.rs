use axum::{
    http::{header::CONTENT_TYPE, HeaderName, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{
    app_state::AppState,
    auth::{USER_ID_HEADER, USER_ROLE_HEADER},
    config::Settings,
    routes,
};

pub fn create(app_state: AppState, config: &Settings) -> Router<()> {
    let app_url = config.application.app_url.clone();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static(USER_ROLE_HEADER),
        ])
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            origin.to_str().unwrap_or_default() == app_url
        }));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/search", routes::search::router())
        .with_state(app_state)
        .layer(TimeoutLayer::new(config.search.request_timeout()))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use portal_search::{
        directory::{InMemoryDirectory, StaticFilePermissions},
        CompanyRecord, Module, PermissionMatrix, SearchResponse, SearchService, UserRecord,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{ApplicationSettings, DatabaseSettings, SearchBackend, SearchSettings};

    fn settings() -> Settings {
        Settings {
            application: ApplicationSettings {
                port: 0,
                host: "127.0.0.1".to_string(),
                app_url: "http://localhost:5173".to_string(),
            },
            database: DatabaseSettings {
                username: "postgres".to_string(),
                password: "password".to_string(),
                port: 5432,
                host: "localhost".to_string(),
                database_name: "portal".to_string(),
                require_ssl: false,
                max_connections: 1,
            },
            search: SearchSettings {
                backend: SearchBackend::Memory,
                result_limit: 5,
                max_limit: 10,
                min_query_length: 3,
                rank_results: false,
                request_timeout_secs: 5,
            },
        }
    }

    fn directory() -> InMemoryDirectory {
        InMemoryDirectory::new()
            .with_users(vec![UserRecord {
                id: "u-1".to_string(),
                first_name: "Mario".to_string(),
                last_name: Some("Rojas".to_string()),
                second_last_name: None,
                email: "mario@example.com".to_string(),
                username: None,
                rut: None,
                role: "agent".to_string(),
                is_active: true,
            }])
            .with_companies(
                (0..20)
                    .map(|i| CompanyRecord {
                        id: format!("c-{i}"),
                        name: format!("Marítima {i}"),
                        rut: None,
                        is_active: true,
                    })
                    .collect(),
            )
    }

    fn app(directory: InMemoryDirectory) -> Router {
        let config = settings();
        let service = SearchService::new(
            directory,
            StaticFilePermissions::new(PermissionMatrix::portal_defaults()),
        );
        let state = AppState::new(Arc::new(service), config.search.clone());
        create(state, &config)
    }

    fn search_request(uri: &str, user_id: Option<&str>, role: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(user_id) = user_id {
            builder = builder.header(USER_ID_HEADER, user_id);
        }
        if let Some(role) = role {
            builder = builder.header(USER_ROLE_HEADER, role);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let response = app(directory())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn admin_search_returns_grouped_results() {
        let response = app(directory())
            .oneshot(search_request("/search?q=mar", Some("42"), Some("admin")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: SearchResponse = serde_json::from_value(json_body(response).await).unwrap();
        assert_eq!(body.users.len(), 1);
        assert_eq!(body.companies.len(), 5);
        assert_eq!(body.total_results, 6);
        assert_eq!(body.users[0].navigation_path, "/admin/users?user=u-1");
    }

    #[tokio::test]
    async fn response_uses_camel_case() {
        let response = app(directory())
            .oneshot(search_request("/search?q=mar", Some("42"), Some("admin")))
            .await
            .unwrap();

        let body = json_body(response).await;
        assert!(body.get("totalResults").is_some());
        assert!(body.get("paymentMethods").is_some());
        assert_eq!(body["users"][0]["type"], "user");
    }

    #[tokio::test]
    async fn missing_user_id_is_unauthenticated() {
        let response = app(directory())
            .oneshot(search_request("/search?q=mar", None, Some("admin")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["code"], "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn missing_role_is_reported() {
        let response = app(directory())
            .oneshot(search_request("/search?q=mar", Some("42"), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "MISSING_USER_INFO");
    }

    #[tokio::test]
    async fn short_query_is_empty_without_lookups() {
        let directory = directory();
        let response = app(directory.clone())
            .oneshot(search_request("/search?q=ma", Some("42"), Some("admin")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["totalResults"], 0);
        assert_eq!(directory.call_count(Module::Companies), 0);
    }

    #[tokio::test]
    async fn query_params_override_defaults() {
        let directory = directory();
        let response = app(directory.clone())
            .oneshot(search_request(
                "/search?q=ma&minQueryLength=2&limit=500",
                Some("42"),
                Some("admin"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(directory.last_limit(Module::Companies), Some(10));
        assert_eq!(json_body(response).await["companies"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn non_admin_gets_no_users() {
        let response = app(directory())
            .oneshot(search_request("/search?q=mar", Some("7"), Some("agent")))
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["users"].as_array().unwrap().len(), 0);
        assert_eq!(body["companies"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn failing_module_still_succeeds() {
        let response = app(directory().failing(Module::Companies))
            .oneshot(search_request("/search?q=mar", Some("42"), Some("admin")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["companies"].as_array().unwrap().len(), 0);
        assert_eq!(body["totalResults"], 1);
    }

    #[tokio::test]
    async fn missing_query_is_rejected() {
        let response = app(directory())
            .oneshot(search_request("/search", Some("42"), Some("admin")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("q"));
        assert!(body.get("code").is_none());
    }

    #[tokio::test]
    async fn malformed_limit_is_rejected_as_json() {
        let response = app(directory())
            .oneshot(search_request("/search?q=mar&limit=many", Some("42"), Some("admin")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }
}
