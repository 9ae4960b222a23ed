//! OpenAPI document and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{auth, health, users};
use crate::data::sql::{
    BoolFilter, IntFilter, LimitOffsetPagination, OneColumnSort, StringFilter, TimeFilter,
};
use crate::data::types::{UserFilter, UserListParams};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Userbase API",
        version = env!("CARGO_PKG_VERSION"),
        description = "User management service"
    ),
    tags(
        (name = "health", description = "Liveness endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management")
    ),
    paths(
        // Health
        health::health,
        health::ping,
        // Auth
        auth::login,
        auth::logout,
        // Users
        users::create_user,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::list_users,
    ),
    components(schemas(
        health::HealthResponse,
        auth::LoginRequest,
        auth::LoginResponse,
        users::types::UserDto,
        users::types::UserResponse,
        users::types::UserListResponse,
        users::types::UserCreateRequest,
        users::types::UserIdRequest,
        users::types::UserUpdateRequest,
        users::types::UserListRequest,
        // Query types
        UserListParams,
        UserFilter,
        IntFilter,
        StringFilter,
        BoolFilter,
        TimeFilter,
        OneColumnSort,
        LimitOffsetPagination,
    ))
)]
pub struct ApiDoc;

/// Serve the OpenAPI document as JSON
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Userbase API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true,
                showExtensions: true,
                showCommonExtensions: true
            });
        };
    </script>
</body>
</html>"#;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_user_operations() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        for path in [
            "/health",
            "/ping",
            "/auth/v1/Login",
            "/users/v1/UserCreate",
            "/users/v1/UserList",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
        assert_eq!(doc["info"]["title"], "Userbase API");
    }
}
