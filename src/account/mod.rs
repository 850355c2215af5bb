//! Account entity, validation rules, and management service.

pub mod model;
pub mod service;
pub mod validation;

pub use model::{
    Account, AccountPreviewResponse, CreateAccountRequest, NewAccount, PersonalAccountResponse,
    UpdateAccount, UpdateAccountRequest,
};
pub use service::AccountService;
