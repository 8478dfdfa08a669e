//! Error types for the validation guard.

/// Boxed error returned by a failing validator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for update attempts through a [`ValidationGuard`].
///
/// A validator *rejecting* a value is not an error (see
/// [`UpdateOutcome::Rejected`]); this type covers the validator itself
/// failing, and updates dispatched to a guard that no longer exists.
///
/// [`ValidationGuard`]: crate::guard::ValidationGuard
/// [`UpdateOutcome::Rejected`]: crate::guard::UpdateOutcome::Rejected
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    /// The validator returned an error instead of a verdict. Draft and error
    /// state are left untouched.
    #[error("validator failed for field '{field}': {source}")]
    Validator {
        field: String,
        #[source]
        source: BoxError,
    },

    /// The guard behind a data context was dropped before the update ran.
    #[error("validation guard dropped before the update resolved")]
    Detached,
}
