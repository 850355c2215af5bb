//! Repository traits and their SQLx implementations.

pub mod account;
pub mod token;

pub use account::{AccountRepository, SqlxAccountRepository};
pub use token::{NewOutstandingToken, OutstandingToken, SqlxTokenRepository, TokenRepository};
