//! Router assembly: wires repositories, services, and the auth middleware.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::account::service::AccountService;
use crate::auth::jwt::JwtCodec;
use crate::auth::middleware::{authenticate, Authenticator};
use crate::auth::session::SessionService;
use crate::config::AuthConfig;
use crate::storage::repositories::account::{AccountRepository, SqlxAccountRepository};
use crate::storage::repositories::token::{SqlxTokenRepository, TokenRepository};
use crate::storage::DbPool;

use super::docs;
use super::handlers::{
    create_account_handler, delete_account_handler, list_accounts_handler, logout_all_handler,
    logout_handler, obtain_token_pair_handler, personal_account_handler, refresh_token_handler,
    retrieve_account_handler, update_account_handler, verify_token_handler, welcome_handler,
};

/// Shared handler state.
#[derive(Clone)]
pub struct ApiState {
    pub accounts: AccountService,
    pub sessions: SessionService,
}

/// Build the full application router over a database pool.
pub fn build_router(pool: DbPool, auth_config: &AuthConfig) -> Router {
    let account_repository: Arc<dyn AccountRepository> =
        Arc::new(SqlxAccountRepository::new(pool.clone()));
    let token_repository: Arc<dyn TokenRepository> = Arc::new(SqlxTokenRepository::new(pool));
    let codec = Arc::new(JwtCodec::new(auth_config));

    let state = ApiState {
        accounts: AccountService::new(account_repository.clone()),
        sessions: SessionService::new(
            account_repository.clone(),
            token_repository,
            codec.clone(),
        ),
    };

    let authenticator = Arc::new(Authenticator::new(account_repository, codec));

    // Login and refresh carry their own credentials; everything else sits
    // behind the bearer middleware.
    let public = Router::new()
        .route("/auth/token/", post(obtain_token_pair_handler))
        .route("/auth/token/refresh/", post(refresh_token_handler));

    let protected = Router::new()
        .route("/", get(welcome_handler))
        .route("/account/", get(personal_account_handler))
        .route("/account/management/", get(list_accounts_handler))
        .route("/account/management/create/", post(create_account_handler))
        .route("/account/management/{id}/", get(retrieve_account_handler))
        .route(
            "/account/management/{id}/update/",
            put(update_account_handler).patch(update_account_handler),
        )
        .route("/account/management/{id}/delete/", delete(delete_account_handler))
        .route("/auth/token/verify/", post(verify_token_handler))
        .route("/auth/logout/", post(logout_handler))
        .route("/auth/logout_all/", get(logout_all_handler))
        .route_layer(middleware::from_fn_with_state(authenticator, authenticate));

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(docs::docs_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
