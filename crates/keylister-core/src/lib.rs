//! `keylister-core`: concurrent IAM access key inventory across accounts.
//!
//! # Architecture
//!
//! ```text
//! [AccountRoleEntry]
//!     │
//!     ▼
//! Orchestrator    ← per account, in order: assume role, list users
//!     │              (RoleSessionProvider + IamDirectory::list_users)
//!     ▼
//! [WorkItem]      ← one per user, sharing the account's ScopedSession
//!     │
//!     ▼
//! WorkerPool      ← W tasks draining a closed queue, one outcome per item
//!     │              (IamDirectory::list_access_keys)
//!     ▼
//! Aggregator      ← reads exactly N outcomes, keeps `Found` rows
//!     │
//!     ▼
//! Report
//! ```
//!
//! Remote services sit behind the traits in [`client`]; `keylister-aws`
//! implements them with the AWS SDK.

pub mod aggregate;
pub mod cancel;
pub mod client;
pub mod config;
pub mod enumerate;
pub mod error;
pub mod orchestrator;
pub mod paginate;
pub mod pool;
pub mod records;
pub mod summary;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use cancel::CancelSignal;
pub use client::{IamDirectory, RoleSessionProvider};
pub use config::ListerConfig;
pub use error::{KeyListerError, RemoteError, Result};
pub use orchestrator::{AccountUsers, Inventory, Orchestrator};
pub use summary::{AccountSummary, RunSummary};
pub use types::{
    role_arn, AccessKeyRecord, AccountRoleEntry, Page, Report, ReportRow, ScopedSession,
    WorkItem, WorkOutcome,
};
