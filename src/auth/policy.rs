//! Role-gated access control for account operations.
//!
//! Roles form a single tier ladder derived from the account flags, so an
//! account carrying both flags is unambiguously a superuser and no flag
//! combination can fall through the table.

use crate::account::model::Account;
use crate::errors::{AuthErrorKind, Error, Result};

/// Caller tier derived from account flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    Anonymous,
    Regular,
    Admin,
    Superuser,
}

impl Role {
    /// Derive the role from an account's flags. Superuser wins over staff.
    pub fn for_account(account: &Account) -> Self {
        if account.is_superuser {
            Role::Superuser
        } else if account.is_staff {
            Role::Admin
        } else {
            Role::Regular
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Anonymous => "anonymous",
            Role::Regular => "regular",
            Role::Admin => "admin",
            Role::Superuser => "superuser",
        }
    }
}

/// Operations subject to the access-control table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountOperation {
    ViewOwn,
    Retrieve,
    List,
    Create,
    Update,
    Delete,
}

/// Evaluate the access-control table for a role and operation.
///
/// An anonymous caller is always rejected with `not_authenticated` before
/// any role comparison; an authenticated caller below the required tier gets
/// `permission_denied`. Lookups run only after this gate passes, so 404
/// never leaks existence to unauthorized callers.
pub fn authorize(role: Role, operation: AccountOperation) -> Result<()> {
    if role == Role::Anonymous {
        return Err(Error::auth(
            "Authentication credentials were not provided.",
            AuthErrorKind::NotAuthenticated,
        ));
    }

    let minimum = match operation {
        AccountOperation::ViewOwn => Role::Regular,
        AccountOperation::Retrieve | AccountOperation::List => Role::Admin,
        AccountOperation::Create | AccountOperation::Update | AccountOperation::Delete => {
            Role::Superuser
        }
    };

    if role < minimum {
        return Err(Error::auth(
            "You do not have permission to perform this action.",
            AuthErrorKind::PermissionDenied,
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn account(is_staff: bool, is_superuser: bool) -> Account {
        Account {
            id: 1,
            username: "user".to_string(),
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            email: "user@example.com".to_string(),
            is_active: true,
            is_staff,
            is_superuser,
            last_login: None,
            date_joined: Utc::now(),
        }
    }

    #[test]
    fn role_derivation_from_flags() {
        assert_eq!(Role::for_account(&account(false, false)), Role::Regular);
        assert_eq!(Role::for_account(&account(true, false)), Role::Admin);
        assert_eq!(Role::for_account(&account(false, true)), Role::Superuser);
        // Superuser flag dominates when both are set.
        assert_eq!(Role::for_account(&account(true, true)), Role::Superuser);
    }

    fn kind(result: Result<()>) -> Option<AuthErrorKind> {
        match result {
            Ok(()) => None,
            Err(Error::Auth { kind, .. }) => Some(kind),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn anonymous_is_always_not_authenticated() {
        for operation in [
            AccountOperation::ViewOwn,
            AccountOperation::Retrieve,
            AccountOperation::List,
            AccountOperation::Create,
            AccountOperation::Update,
            AccountOperation::Delete,
        ] {
            assert_eq!(
                kind(authorize(Role::Anonymous, operation)),
                Some(AuthErrorKind::NotAuthenticated)
            );
        }
    }

    #[test]
    fn regular_can_only_view_own_account() {
        assert!(authorize(Role::Regular, AccountOperation::ViewOwn).is_ok());
        for operation in [
            AccountOperation::Retrieve,
            AccountOperation::List,
            AccountOperation::Create,
            AccountOperation::Update,
            AccountOperation::Delete,
        ] {
            assert_eq!(
                kind(authorize(Role::Regular, operation)),
                Some(AuthErrorKind::PermissionDenied)
            );
        }
    }

    #[test]
    fn admin_reads_but_does_not_write() {
        assert!(authorize(Role::Admin, AccountOperation::ViewOwn).is_ok());
        assert!(authorize(Role::Admin, AccountOperation::Retrieve).is_ok());
        assert!(authorize(Role::Admin, AccountOperation::List).is_ok());
        for operation in
            [AccountOperation::Create, AccountOperation::Update, AccountOperation::Delete]
        {
            assert_eq!(
                kind(authorize(Role::Admin, operation)),
                Some(AuthErrorKind::PermissionDenied)
            );
        }
    }

    #[test]
    fn superuser_is_allowed_everything() {
        for operation in [
            AccountOperation::ViewOwn,
            AccountOperation::Retrieve,
            AccountOperation::List,
            AccountOperation::Create,
            AccountOperation::Update,
            AccountOperation::Delete,
        ] {
            assert!(authorize(Role::Superuser, operation).is_ok());
        }
    }
}
