use std::sync::Arc;

use tracing::debug;

use crate::error::{KeyListerError, Result};
use crate::paginate::{collect_pages, Pagination};
use crate::types::{ScopedSession, WorkItem};

/// Every IAM user name in the session's account, unfiltered.
pub async fn list_users(session: &ScopedSession) -> Result<Vec<String>> {
    let directory = session.directory();
    debug!(account_id = session.account_id(), "listing users");
    collect_pages(Pagination::Exhaustive, |marker| directory.list_users(marker))
        .await
        .map_err(|source| KeyListerError::ListUsers {
            account_id: session.account_id().to_string(),
            source,
        })
}

/// List the account's users and turn each one into a [`WorkItem`] sharing
/// `session`.
pub async fn work_items(session: Arc<ScopedSession>) -> Result<Vec<WorkItem>> {
    let users = list_users(&session).await?;
    Ok(users
        .into_iter()
        .map(|user_name| WorkItem {
            account_id: session.account_id().to_string(),
            user_name,
            session: Arc::clone(&session),
        })
        .collect())
}
