//! OpenAPI document and Swagger UI mount.

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::routes::ApiState;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::meta::welcome_handler,
        crate::api::handlers::account::personal_account_handler,
        crate::api::handlers::account::list_accounts_handler,
        crate::api::handlers::account::create_account_handler,
        crate::api::handlers::account::retrieve_account_handler,
        crate::api::handlers::account::update_account_handler,
        crate::api::handlers::account::delete_account_handler,
        crate::api::handlers::auth::obtain_token_pair_handler,
        crate::api::handlers::auth::refresh_token_handler,
        crate::api::handlers::auth::verify_token_handler,
        crate::api::handlers::auth::logout_handler,
        crate::api::handlers::auth::logout_all_handler,
    ),
    components(schemas(
        crate::account::model::CreateAccountRequest,
        crate::account::model::UpdateAccountRequest,
        crate::account::model::PersonalAccountResponse,
        crate::account::model::AccountPreviewResponse,
        crate::auth::session::LoginRequest,
        crate::auth::session::TokenPairResponse,
        crate::auth::session::RefreshTokenRequest,
        crate::auth::session::AccessTokenResponse,
        crate::auth::session::VerifyTokenRequest,
        crate::api::handlers::meta::ApiInfoResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "api", description = "API info"),
        (name = "account", description = "Account management"),
        (name = "auth", description = "Token lifecycle")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Swagger UI router, mounted alongside the API.
pub fn docs_router() -> Router<ApiState> {
    Router::new()
        .merge(SwaggerUi::new("/swagger/ui").url("/swagger/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_contains_all_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/",
            "/account/",
            "/account/management/",
            "/account/management/create/",
            "/account/management/{id}/",
            "/account/management/{id}/update/",
            "/account/management/{id}/delete/",
            "/auth/token/",
            "/auth/token/refresh/",
            "/auth/token/verify/",
            "/auth/logout/",
            "/auth/logout_all/",
        ] {
            assert!(paths.contains_key(path), "missing path {path}");
        }
    }
}
