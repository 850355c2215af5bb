//! API info endpoint.

use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{APP_NAME, VERSION};

/// API description returned by the welcome endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiInfoResponse {
    pub api: String,
    pub version: String,
    pub description: String,
    pub message: String,
}

/// Returns API info for authenticated callers.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "API info", body = ApiInfoResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "api"
)]
pub async fn welcome_handler() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        api: APP_NAME.to_string(),
        version: VERSION.to_string(),
        description: "Account management backend with JWT session lifecycle".to_string(),
        message: "Welcome!".to_string(),
    })
}
