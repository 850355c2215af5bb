//! HTTP handlers, grouped by surface.

pub mod account;
pub mod auth;
pub mod meta;

pub use account::{
    create_account_handler, delete_account_handler, list_accounts_handler,
    personal_account_handler, retrieve_account_handler, update_account_handler,
};
pub use auth::{
    logout_all_handler, logout_handler, obtain_token_pair_handler, refresh_token_handler,
    verify_token_handler,
};
pub use meta::welcome_handler;
