//! Seams between the engine and the remote services it enumerates.
//!
//! The engine only ever talks to these traits. `keylister-aws` implements
//! them on top of STS and IAM; tests implement them with scripted pages.

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::types::{AccessKeyRecord, Page, ScopedSession};

/// IAM listing operations available inside one account.
#[async_trait]
pub trait IamDirectory: Send + Sync {
    /// One page of user names. `marker` is `None` for the first page.
    async fn list_users(&self, marker: Option<String>) -> Result<Page<String>, RemoteError>;

    /// One page of access keys belonging to `user_name`.
    async fn list_access_keys(
        &self,
        user_name: &str,
        marker: Option<String>,
    ) -> Result<Page<AccessKeyRecord>, RemoteError>;
}

/// Exchanges an (account, role) pair for a session scoped to that account.
#[async_trait]
pub trait RoleSessionProvider: Send + Sync {
    /// Assume `arn:aws:iam::{account_id}:role/{role_name}`. One remote call.
    async fn assume(&self, account_id: &str, role_name: &str)
        -> Result<ScopedSession, RemoteError>;
}
