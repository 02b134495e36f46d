use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::cancel::CancelSignal;
use crate::client::RoleSessionProvider;
use crate::config::ListerConfig;
use crate::enumerate;
use crate::error::{KeyListerError, Result};
use crate::pool::WorkerPool;
use crate::types::{AccountRoleEntry, Report, WorkItem};

/// Users discovered in one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountUsers {
    pub account_id: String,
    pub role_name: String,
    pub users: usize,
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct Inventory {
    pub report: Report,
    /// In input order.
    pub accounts: Vec<AccountUsers>,
}

/// Drives a whole run: assume and enumerate every account in order, then
/// fan the combined users out to the worker pool.
pub struct Orchestrator<P> {
    provider: P,
    pool: WorkerPool,
    cancel: CancelSignal,
}

impl<P: RoleSessionProvider> Orchestrator<P> {
    pub fn new(provider: P, config: &ListerConfig, cancel: CancelSignal) -> Result<Self> {
        config.validate()?;
        let pool = WorkerPool::new(config.workers, cancel.clone())?;
        Ok(Self {
            provider,
            pool,
            cancel,
        })
    }

    pub fn cancel_signal(&self) -> &CancelSignal {
        &self.cancel
    }

    /// Run both phases. Any session or listing failure aborts the run;
    /// nothing is returned for accounts that already succeeded.
    pub async fn run(&self, entries: &[AccountRoleEntry]) -> Result<Inventory> {
        let mut items = Vec::new();
        let mut accounts = Vec::with_capacity(entries.len());

        for entry in entries {
            if self.cancel.is_cancelled() {
                warn!(account_id = entry.account_id(), "cancelled before account");
                return Err(KeyListerError::Cancelled);
            }
            info!(account_id = entry.account_id(), "processing account");

            let account_items = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(KeyListerError::Cancelled),
                found = self.enumerate_account(entry) => found?,
            };
            accounts.push(AccountUsers {
                account_id: entry.account_id().to_string(),
                role_name: entry.role_name().to_string(),
                users: account_items.len(),
            });
            items.extend(account_items);
        }

        info!(
            accounts = accounts.len(),
            users = items.len(),
            "enumeration complete"
        );
        let report = self.pool.run(items).await?;
        info!(
            users_with_keys = report.len(),
            access_keys = report.key_count(),
            "access key listing complete"
        );

        Ok(Inventory { report, accounts })
    }

    async fn enumerate_account(&self, entry: &AccountRoleEntry) -> Result<Vec<WorkItem>> {
        let session = self
            .provider
            .assume(entry.account_id(), entry.role_name())
            .await
            .map_err(|source| KeyListerError::Session {
                account_id: entry.account_id().to_string(),
                role_name: entry.role_name().to_string(),
                source,
            })?;
        enumerate::work_items(Arc::new(session)).await
    }
}
