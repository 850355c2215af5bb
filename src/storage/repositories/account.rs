//! Account repository: CRUD over the `accounts` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::instrument;

use crate::account::model::{Account, NewAccount, UpdateAccount};
use crate::errors::{Error, Result};
use crate::storage::DbPool;

#[derive(Debug, Clone, FromRow)]
struct AccountRow {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub date_joined: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> Account {
        Account {
            id: self.id,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            is_active: self.is_active,
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
            last_login: self.last_login,
            date_joined: self.date_joined,
        }
    }
}

const ACCOUNT_COLUMNS: &str = "id, username, first_name, last_name, email, password_hash, \
     is_active, is_staff, is_superuser, last_login, date_joined";

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Create a new account; the store assigns the id.
    async fn create(&self, account: NewAccount) -> Result<Account>;

    /// Get an account by id
    async fn get(&self, id: i64) -> Result<Option<Account>>;

    /// Get an account by username
    async fn get_by_username(&self, username: &str) -> Result<Option<Account>>;

    /// Get an account with its password hash for credential verification
    async fn get_with_password(&self, username: &str) -> Result<Option<(Account, String)>>;

    /// List all accounts ordered by id
    async fn list(&self) -> Result<Vec<Account>>;

    /// Apply a partial update; unset fields keep their stored values
    async fn update(&self, id: i64, update: UpdateAccount) -> Result<Account>;

    /// Stamp the last successful login time
    async fn set_last_login(&self, id: i64, at: DateTime<Utc>) -> Result<()>;

    /// Hard-delete an account
    async fn delete(&self, id: i64) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct SqlxAccountRepository {
    pool: DbPool,
}

impl SqlxAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for SqlxAccountRepository {
    #[instrument(skip(self, account), fields(username = %account.username), name = "db_create_account")]
    async fn create(&self, account: NewAccount) -> Result<Account> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO accounts (username, first_name, last_name, email, password_hash,
                                  is_active, is_staff, is_superuser, date_joined)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&account.username)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.is_active)
        .bind(account.is_staff)
        .bind(account.is_superuser)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to create account"))?;

        self.get(id)
            .await?
            .ok_or_else(|| Error::internal("Account not found after creation"))
    }

    #[instrument(skip(self), fields(account_id = id), name = "db_get_account")]
    async fn get(&self, id: i64) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to fetch account"))?;

        Ok(row.map(AccountRow::into_account))
    }

    #[instrument(skip(self), fields(username = %username), name = "db_get_account_by_username")]
    async fn get_by_username(&self, username: &str) -> Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to fetch account by username"))?;

        Ok(row.map(AccountRow::into_account))
    }

    #[instrument(skip(self), fields(username = %username), name = "db_get_account_with_password")]
    async fn get_with_password(&self, username: &str) -> Result<Option<(Account, String)>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to fetch account with password"))?;

        Ok(row.map(|row| {
            let password_hash = row.password_hash.clone();
            (row.into_account(), password_hash)
        }))
    }

    #[instrument(skip(self), name = "db_list_accounts")]
    async fn list(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to list accounts"))?;

        Ok(rows.into_iter().map(AccountRow::into_account).collect())
    }

    #[instrument(skip(self, update), fields(account_id = id), name = "db_update_account")]
    async fn update(&self, id: i64, update: UpdateAccount) -> Result<Account> {
        let current = self
            .get_with_password_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("Account", id))?;
        let (account, current_hash) = current;

        let first_name = update.first_name.unwrap_or(account.first_name);
        let last_name = update.last_name.unwrap_or(account.last_name);
        let email = update.email.unwrap_or(account.email);
        let password_hash = update.password_hash.unwrap_or(current_hash);
        let is_active = update.is_active.unwrap_or(account.is_active);
        let is_staff = update.is_staff.unwrap_or(account.is_staff);

        sqlx::query(
            r#"
            UPDATE accounts
            SET first_name = $1, last_name = $2, email = $3, password_hash = $4,
                is_active = $5, is_staff = $6
            WHERE id = $7
            "#,
        )
        .bind(&first_name)
        .bind(&last_name)
        .bind(&email)
        .bind(&password_hash)
        .bind(is_active)
        .bind(is_staff)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to update account"))?;

        self.get(id)
            .await?
            .ok_or_else(|| Error::internal("Account not found after update"))
    }

    #[instrument(skip(self), fields(account_id = id), name = "db_set_last_login")]
    async fn set_last_login(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE accounts SET last_login = $1 WHERE id = $2")
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| Error::database(err, "Failed to update last_login"))?;

        Ok(())
    }

    #[instrument(skip(self), fields(account_id = id), name = "db_delete_account")]
    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| Error::database(err, "Failed to delete account"))?;

        Ok(())
    }
}

impl SqlxAccountRepository {
    async fn get_with_password_by_id(&self, id: i64) -> Result<Option<(Account, String)>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to fetch account"))?;

        Ok(row.map(|row| {
            let password_hash = row.password_hash.clone();
            (row.into_account(), password_hash)
        }))
    }
}
