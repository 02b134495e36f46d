use async_trait::async_trait;
use aws_sdk_iam::operation::list_access_keys::ListAccessKeysOutput;
use aws_sdk_iam::operation::list_users::ListUsersOutput;
use aws_sdk_iam::primitives::DateTime;
use aws_sdk_iam::types::AccessKeyMetadata;
use aws_sdk_iam::Client as IamClient;
use chrono::Utc;
use keylister_core::{AccessKeyRecord, IamDirectory, Page, RemoteError};

use crate::error::remote_error;

/// [`IamDirectory`] backed by an IAM client holding assumed-role credentials.
#[derive(Debug, Clone)]
pub struct IamSession {
    client: IamClient,
}

impl IamSession {
    pub fn new(client: IamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IamDirectory for IamSession {
    async fn list_users(&self, marker: Option<String>) -> Result<Page<String>, RemoteError> {
        let out = self
            .client
            .list_users()
            .set_marker(marker)
            .send()
            .await
            .map_err(|e| remote_error("ListUsers", e))?;
        Ok(user_page(&out))
    }

    async fn list_access_keys(
        &self,
        user_name: &str,
        marker: Option<String>,
    ) -> Result<Page<AccessKeyRecord>, RemoteError> {
        let out = self
            .client
            .list_access_keys()
            .user_name(user_name)
            .set_marker(marker)
            .send()
            .await
            .map_err(|e| remote_error("ListAccessKeys", e))?;
        key_page(&out)
    }
}

/// IAM keeps paging only while `IsTruncated` is set and a marker came back.
fn next_marker(is_truncated: bool, marker: Option<&str>) -> Option<String> {
    if is_truncated {
        marker.map(str::to_string)
    } else {
        None
    }
}

fn user_page(out: &ListUsersOutput) -> Page<String> {
    Page {
        items: out
            .users()
            .iter()
            .map(|u| u.user_name().to_string())
            .collect(),
        next_marker: next_marker(out.is_truncated(), out.marker()),
    }
}

fn key_page(out: &ListAccessKeysOutput) -> Result<Page<AccessKeyRecord>, RemoteError> {
    let items = out
        .access_key_metadata()
        .iter()
        .map(key_record)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Page {
        items,
        next_marker: next_marker(out.is_truncated(), out.marker()),
    })
}

fn key_record(meta: &AccessKeyMetadata) -> Result<AccessKeyRecord, RemoteError> {
    let key_id = meta.access_key_id().ok_or_else(|| {
        RemoteError::new("ListAccessKeys", "access key metadata without an access key id")
    })?;
    let created = meta.create_date().ok_or_else(|| {
        RemoteError::new(
            "ListAccessKeys",
            format!("access key {key_id} has no create date"),
        )
    })?;
    Ok(AccessKeyRecord::new(key_id, to_utc(created)?))
}

fn to_utc(date: &DateTime) -> Result<chrono::DateTime<Utc>, RemoteError> {
    chrono::DateTime::from_timestamp(date.secs(), date.subsec_nanos()).ok_or_else(|| {
        RemoteError::new(
            "ListAccessKeys",
            format!("create date {} is out of range", date.secs()),
        )
    })
}
