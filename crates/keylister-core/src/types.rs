use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::IamDirectory;
use crate::error::{KeyListerError, Result};

/// Length of an AWS account identifier.
pub const ACCOUNT_ID_LEN: usize = 12;

/// Timestamp layout used for `createdDate` in the report.
pub const CREATED_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

// ---------------------------------------------------------------------------
// AccountRoleEntry
// ---------------------------------------------------------------------------

/// One account to inventory and the role to assume in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAccountRole")]
pub struct AccountRoleEntry {
    account_id: String,
    role_name: String,
}

#[derive(Deserialize)]
struct RawAccountRole {
    account_id: String,
    role_name: String,
}

/// Deserialized entries carry no line number; errors report line 0.
impl TryFrom<RawAccountRole> for AccountRoleEntry {
    type Error = KeyListerError;

    fn try_from(raw: RawAccountRole) -> Result<Self> {
        Self::new(0, &raw.account_id, &raw.role_name)
    }
}

impl AccountRoleEntry {
    /// Validate and build an entry. `line` is only used for error context.
    pub fn new(line: u64, account_id: &str, role_name: &str) -> Result<Self> {
        let invalid = |reason: &str| KeyListerError::InvalidAccountRole {
            line,
            account_id: account_id.to_string(),
            reason: reason.to_string(),
        };
        if account_id.chars().count() != ACCOUNT_ID_LEN {
            return Err(invalid("the account id must be 12 characters"));
        }
        if !account_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("the account id must be numeric"));
        }
        Ok(Self {
            account_id: account_id.to_string(),
            role_name: role_name.to_string(),
        })
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn role_name(&self) -> &str {
        &self.role_name
    }

    pub fn role_arn(&self) -> String {
        role_arn(&self.account_id, &self.role_name)
    }
}

/// `arn:aws:iam::{account_id}:role/{role_name}`
pub fn role_arn(account_id: &str, role_name: &str) -> String {
    format!("arn:aws:iam::{account_id}:role/{role_name}")
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// One response from a listing operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Present when more results follow.
    pub next_marker: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_marker: None,
        }
    }

    pub fn more(items: Vec<T>, marker: impl Into<String>) -> Self {
        Self {
            items,
            next_marker: Some(marker.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// AccessKeyRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessKeyRecord {
    pub key_id: String,
    pub created_date: DateTime<Utc>,
}

impl AccessKeyRecord {
    pub fn new(key_id: impl Into<String>, created_date: DateTime<Utc>) -> Self {
        Self {
            key_id: key_id.into(),
            created_date,
        }
    }

    pub fn created_date_string(&self) -> String {
        self.created_date.format(CREATED_DATE_FORMAT).to_string()
    }
}

// ---------------------------------------------------------------------------
// ScopedSession / WorkItem
// ---------------------------------------------------------------------------

/// IAM access inside one account, obtained by assuming a role there.
pub struct ScopedSession {
    account_id: String,
    role_name: String,
    directory: Box<dyn IamDirectory>,
}

impl ScopedSession {
    pub fn new(
        account_id: impl Into<String>,
        role_name: impl Into<String>,
        directory: Box<dyn IamDirectory>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            role_name: role_name.into(),
            directory,
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn role_name(&self) -> &str {
        &self.role_name
    }

    pub fn directory(&self) -> &dyn IamDirectory {
        self.directory.as_ref()
    }
}

impl fmt::Debug for ScopedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedSession")
            .field("account_id", &self.account_id)
            .field("role_name", &self.role_name)
            .finish_non_exhaustive()
    }
}

/// One user whose access keys still need listing.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub account_id: String,
    pub user_name: String,
    pub session: Arc<ScopedSession>,
}

// ---------------------------------------------------------------------------
// WorkOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum WorkOutcome {
    Found {
        account_id: String,
        user_name: String,
        keys: Vec<AccessKeyRecord>,
    },
    /// The user has no access keys.
    Empty,
}

impl WorkOutcome {
    /// Classify a finished key listing. An empty key list is always `Empty`,
    /// so `Found` never carries zero keys.
    pub fn classify(item: &WorkItem, keys: Vec<AccessKeyRecord>) -> Self {
        if keys.is_empty() {
            WorkOutcome::Empty
        } else {
            WorkOutcome::Found {
                account_id: item.account_id.clone(),
                user_name: item.user_name.clone(),
                keys,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportRow {
    pub account_id: String,
    pub user_name: String,
    pub keys: Vec<AccessKeyRecord>,
}

impl ReportRow {
    /// Flatten to `account_id, user_name, key_id, created_date, ...`.
    pub fn to_record(&self) -> Vec<String> {
        let mut record = Vec::with_capacity(2 + self.keys.len() * 2);
        record.push(self.account_id.clone());
        record.push(self.user_name.clone());
        for key in &self.keys {
            record.push(key.key_id.clone());
            record.push(key.created_date_string());
        }
        record
    }
}

/// Rows in outcome arrival order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    rows: Vec<ReportRow>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one outcome. `Empty` outcomes leave the report unchanged.
    pub fn push(&mut self, outcome: WorkOutcome) {
        if let WorkOutcome::Found {
            account_id,
            user_name,
            keys,
        } = outcome
        {
            self.rows.push(ReportRow {
                account_id,
                user_name,
                keys,
            });
        }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn key_count(&self) -> usize {
        self.rows.iter().map(|r| r.keys.len()).sum()
    }
}
