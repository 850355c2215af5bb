//! Account management service.
//!
//! Business logic for account CRUD. Authorization happens at the API layer
//! before any of these methods run; this service only enforces data rules
//! (uniqueness, password strength, hashing).

use std::sync::Arc;

use tracing::{info, instrument};

use crate::account::model::{
    Account, CreateAccountRequest, NewAccount, UpdateAccount, UpdateAccountRequest,
};
use crate::account::validation::validate_password_strength;
use crate::auth::hashing;
use crate::errors::{Error, Result};
use crate::storage::repositories::account::AccountRepository;

/// Service for managing user accounts.
#[derive(Clone)]
pub struct AccountService {
    repository: Arc<dyn AccountRepository>,
}

impl AccountService {
    pub fn new(repository: Arc<dyn AccountRepository>) -> Self {
        Self { repository }
    }

    /// Create a new account from a validated request.
    ///
    /// Checks username uniqueness and password strength, then hashes the
    /// password before it reaches the store.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn create_account(&self, request: CreateAccountRequest) -> Result<Account> {
        if self.repository.get_by_username(&request.username).await?.is_some() {
            return Err(Error::conflict(format!(
                "An account with username '{}' already exists",
                request.username
            )));
        }

        validate_password_strength(&request.password)
            .map_err(|err| Error::InvalidPassword(err.to_string()))?;

        let password_hash = hashing::hash_password(&request.password)?;

        let account = self
            .repository
            .create(NewAccount {
                username: request.username,
                first_name: request.first_name,
                last_name: request.last_name,
                email: request.email,
                password_hash,
                is_active: request.is_active,
                is_staff: request.is_staff,
                is_superuser: false,
            })
            .await?;

        info!(account_id = account.id, username = %account.username, "account created");
        Ok(account)
    }

    /// Get an account by id.
    pub async fn get_account(&self, id: i64) -> Result<Option<Account>> {
        self.repository.get(id).await
    }

    /// List all accounts.
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.repository.list().await
    }

    /// Apply a partial update to an account.
    ///
    /// A present password is strength-checked and re-hashed; absent fields
    /// keep their stored values.
    #[instrument(skip(self, request), fields(account_id = id))]
    pub async fn update_account(&self, id: i64, request: UpdateAccountRequest) -> Result<Account> {
        self.repository.get(id).await?.ok_or_else(|| Error::not_found("Account", id))?;

        let password_hash = match request.password.as_deref() {
            Some(password) if !password.is_empty() => {
                validate_password_strength(password)
                    .map_err(|err| Error::InvalidPassword(err.to_string()))?;
                Some(hashing::hash_password(password)?)
            }
            _ => None,
        };

        let account = self
            .repository
            .update(
                id,
                UpdateAccount {
                    first_name: request.first_name,
                    last_name: request.last_name,
                    email: request.email,
                    password_hash,
                    is_active: request.is_active,
                    is_staff: request.is_staff,
                },
            )
            .await?;

        info!(account_id = id, "account updated");
        Ok(account)
    }

    /// Delete an account. Hard delete; refresh-token records cascade.
    #[instrument(skip(self), fields(account_id = id))]
    pub async fn delete_account(&self, id: i64) -> Result<()> {
        self.repository.get(id).await?.ok_or_else(|| Error::not_found("Account", id))?;
        self.repository.delete(id).await?;

        info!(account_id = id, "account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::repositories::account::SqlxAccountRepository;
    use crate::storage::{run_migrations, DbPool};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_service() -> (AccountService, DbPool) {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect("sqlite::memory:")
            .await
            .expect("create sqlite pool");

        run_migrations(&pool).await.expect("run migrations");

        let repository = Arc::new(SqlxAccountRepository::new(pool.clone()));
        (AccountService::new(repository), pool)
    }

    fn create_request(username: &str) -> CreateAccountRequest {
        CreateAccountRequest {
            username: username.to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: format!("{}@example.com", username),
            password: "super_secret_password".to_string(),
            is_active: true,
            is_staff: false,
        }
    }

    #[tokio::test]
    async fn create_account_assigns_sequential_ids() {
        let (service, _pool) = setup_test_service().await;

        let first = service.create_account(create_request("first")).await.expect("create");
        let second = service.create_account(create_request("second")).await.expect("create");

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(first.is_active);
        assert!(!first.is_staff);
        assert!(!first.is_superuser);
        assert!(first.last_login.is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let (service, _pool) = setup_test_service().await;

        service.create_account(create_request("johndoe")).await.expect("create");
        let result = service.create_account(create_request("johndoe")).await;

        assert!(matches!(result, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn weak_password_is_rejected_and_nothing_persists() {
        let (service, _pool) = setup_test_service().await;

        let mut request = create_request("johndoe");
        request.password = "password".to_string();

        let result = service.create_account(request).await;
        assert!(matches!(result, Err(Error::InvalidPassword(_))));

        assert!(service.list_accounts().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn update_retains_unspecified_fields() {
        let (service, _pool) = setup_test_service().await;
        let account = service.create_account(create_request("johndoe")).await.expect("create");

        let updated = service
            .update_account(
                account.id,
                UpdateAccountRequest {
                    first_name: Some("Jane".to_string()),
                    ..UpdateAccountRequest::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.first_name, "Jane");
        assert_eq!(updated.last_name, "Doe");
        assert_eq!(updated.email, account.email);
        assert_eq!(updated.username, account.username);
    }

    #[tokio::test]
    async fn update_rejects_weak_replacement_password() {
        let (service, _pool) = setup_test_service().await;
        let account = service.create_account(create_request("johndoe")).await.expect("create");

        let result = service
            .update_account(
                account.id,
                UpdateAccountRequest {
                    password: Some("12345678".to_string()),
                    ..UpdateAccountRequest::default()
                },
            )
            .await;

        assert!(matches!(result, Err(Error::InvalidPassword(_))));
    }

    #[tokio::test]
    async fn update_missing_account_is_not_found() {
        let (service, _pool) = setup_test_service().await;

        let result = service.update_account(42, UpdateAccountRequest::default()).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[tokio::test]
    async fn delete_removes_account() {
        let (service, _pool) = setup_test_service().await;
        let account = service.create_account(create_request("johndoe")).await.expect("create");

        service.delete_account(account.id).await.expect("delete");
        assert!(service.get_account(account.id).await.expect("get").is_none());

        let result = service.delete_account(account.id).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }
}
