use aws_sdk_iam::error::{DisplayErrorContext, ProvideErrorMetadata};
use keylister_core::RemoteError;

/// Flatten an SDK failure into a [`RemoteError`], keeping the service error
/// code and the full cause chain.
pub(crate) fn remote_error<E>(operation: &str, err: E) -> RemoteError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let remote = RemoteError::new(operation, DisplayErrorContext(&err).to_string());
    match err.code() {
        Some(code) => remote.with_code(code),
        None => remote,
    }
}
