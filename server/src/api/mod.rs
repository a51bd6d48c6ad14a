pub mod auth;
pub mod edges;
pub mod ingredients;
pub mod media;
pub mod recipes;
pub mod short_links;
pub mod tags;
pub mod users;

use crate::config::Config;
use axum::extract::FromRequest;
use foodgram_core::{PageLinks, PageRequest};
use serde::Serialize;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{OpenApi, ToSchema};

use crate::error::ApiError;

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// JSON request body whose rejections (bad syntax, wrong field types, missing
/// content type) are reported as `ApiError::BadRequest`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Validate `request` against the total row count and build neighbour links
/// for the list served at `path`.
pub fn page_links(
    config: &Config,
    path: &str,
    pairs: &[(String, String)],
    request: PageRequest,
    count: i64,
) -> Result<PageLinks, ApiError> {
    if !request.is_valid_for(count) {
        return Err(ApiError::InvalidPage);
    }
    Ok(PageLinks::build(
        &config.absolute_url(path),
        pairs,
        request,
        count,
    ))
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components and security
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Foodgram API", description = "Recipes, favorites, subscriptions and shopping lists"),
        components(schemas(ErrorResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    // Clients send `Authorization: Token <token>`; `Bearer <token>` is accepted too.
    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "token_auth",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "Token <auth_token>",
            ))),
        );
    }

    // Merge in each module's spec
    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        auth::ApiDoc::openapi(),
        users::ApiDoc::openapi(),
        tags::ApiDoc::openapi(),
        ingredients::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        media::ApiDoc::openapi(),
        short_links::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        // Merge paths
        spec.paths.paths.extend(module_spec.paths.paths);

        // Merge components (schemas)
        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Login {
        email: String,
    }

    async fn extract(request: Request<Body>) -> Result<Login, ApiError> {
        JsonBody::<Login>::from_request(request, &()).await.map(|JsonBody(body)| body)
    }

    fn json_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/auth/token/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_extracted() {
        let login = extract(json_request(r#"{"email": "cook@example.com"}"#))
            .await
            .unwrap();
        assert_eq!(login.email, "cook@example.com");
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let err = extract(json_request("{}")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_wrong_type_is_bad_request() {
        let err = extract(json_request(r#"{"email": 5}"#)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/token/login")
            .body(Body::from(r#"{"email": "cook@example.com"}"#))
            .unwrap();
        let err = extract(request).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
