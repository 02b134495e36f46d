use std::time::SystemTime;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_credential_types::Credentials;
use aws_sdk_iam::Client as IamClient;
use aws_sdk_sts::types::Credentials as StsCredentials;
use aws_sdk_sts::Client as StsClient;
use keylister_core::{role_arn, RemoteError, RoleSessionProvider, ScopedSession};
use tracing::debug;

use crate::error::remote_error;
use crate::iam::IamSession;

const PROVIDER_NAME: &str = "keylister-assume-role";

/// [`RoleSessionProvider`] that calls STS `AssumeRole` with the base
/// credentials and hands back an IAM client bound to the temporary ones.
#[derive(Debug, Clone)]
pub struct StsSessionProvider {
    sts: StsClient,
    base: SdkConfig,
    session_name: String,
}

impl StsSessionProvider {
    pub fn new(base: SdkConfig, session_name: impl Into<String>) -> Self {
        Self {
            sts: StsClient::new(&base),
            base,
            session_name: session_name.into(),
        }
    }
}

#[async_trait]
impl RoleSessionProvider for StsSessionProvider {
    async fn assume(
        &self,
        account_id: &str,
        role_name: &str,
    ) -> Result<ScopedSession, RemoteError> {
        let arn = role_arn(account_id, role_name);
        debug!(role_arn = %arn, "assuming role");

        let out = self
            .sts
            .assume_role()
            .role_arn(&arn)
            .role_session_name(&self.session_name)
            .send()
            .await
            .map_err(|e| remote_error("AssumeRole", e))?;
        let temporary = out.credentials().ok_or_else(|| {
            RemoteError::new("AssumeRole", format!("no credentials returned for {arn}"))
        })?;

        let iam_config = aws_sdk_iam::config::Builder::from(&self.base)
            .credentials_provider(scoped_credentials(temporary))
            .build();
        let directory = IamSession::new(IamClient::from_conf(iam_config));
        Ok(ScopedSession::new(account_id, role_name, Box::new(directory)))
    }
}

fn scoped_credentials(temporary: &StsCredentials) -> Credentials {
    Credentials::new(
        temporary.access_key_id(),
        temporary.secret_access_key(),
        Some(temporary.session_token().to_string()),
        SystemTime::try_from(*temporary.expiration()).ok(),
        PROVIDER_NAME,
    )
}
