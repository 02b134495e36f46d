//! AWS implementations of the `keylister-core` seams.
//!
//! [`StsSessionProvider`] assumes a role per account via STS; each resulting
//! session lists users and access keys through [`IamSession`].

mod error;
pub mod iam;
pub mod sts;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use keylister_core::ListerConfig;
use tracing::debug;

pub use iam::IamSession;
pub use sts::StsSessionProvider;

/// Resolve the base SDK configuration (the credentials used to call
/// `AssumeRole`) from the configured profile and region.
pub async fn load_base_config(config: &ListerConfig) -> SdkConfig {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));
    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }
    debug!(region = %config.region, profile = ?config.profile, "loading AWS config");
    loader.load().await
}

/// Build a session provider from `config`.
pub async fn connect(config: &ListerConfig) -> StsSessionProvider {
    let base = load_base_config(config).await;
    StsSessionProvider::new(base, config.session_name.clone())
}
