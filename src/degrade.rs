//! Log-and-degrade for callers that render whatever the store gives them
//!
//! Store operations always return [`Result`]. Page loaders that prefer an
//! empty list over an error page can finish a call with one of these
//! adapters; the failure is logged at `error` with the operation name.

use crate::error::{Result, StoreError};

/// Turn a failed store call into a fallback value after logging it
pub trait Degrade<T> {
    /// The value on success, `fallback` on failure
    fn or_log(self, operation: &str, fallback: T) -> T;

    /// The value on success, `T::default()` (an empty collection) on failure
    fn or_log_empty(self, operation: &str) -> T
    where
        T: Default;

    /// `Some(value)` on success, `None` on failure
    fn ok_or_log(self, operation: &str) -> Option<T>;
}

fn log_failure(operation: &str, error: &StoreError) {
    tracing::error!(operation, error = %error, "store operation failed");
}

impl<T> Degrade<T> for Result<T> {
    fn or_log(self, operation: &str, fallback: T) -> T {
        self.unwrap_or_else(|e| {
            log_failure(operation, &e);
            fallback
        })
    }

    fn or_log_empty(self, operation: &str) -> T
    where
        T: Default,
    {
        self.or_log(operation, T::default())
    }

    fn ok_or_log(self, operation: &str) -> Option<T> {
        self.inspect_err(|e| log_failure(operation, e)).ok()
    }
}
