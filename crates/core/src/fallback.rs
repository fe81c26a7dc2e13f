//! The try-primary-then-fallback combinator.
//!
//! Every service operation runs through [`with_fallback`]: the primary
//! store is attempted first and any error it reports is logged and
//! discarded, after which the equivalent fallback operation runs. Only a
//! fallback failure reaches the caller, as
//! [`CoreError::StorageUnavailable`].
//!
//! Primary errors are not classified. A transient network blip and a
//! permanently broken primary both fall through silently, so a lasting
//! primary outage only shows up in the logs until the fallback fails too.

use std::future::Future;

use serde::Serialize;

use crate::error::CoreError;
use crate::store::StoreError;

/// Which backend served a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Primary,
    Fallback,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Fallback => "fallback",
        }
    }
}

/// A value together with the backend that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served<T> {
    pub value: T,
    pub backend: Backend,
}

/// Run `primary` (if configured), falling back to `fallback()` on error.
///
/// `fallback` is a thunk so the fallback request is only issued when the
/// primary is missing or fails.
pub async fn with_fallback<T, P, F, Fut>(
    operation: &'static str,
    primary: Option<P>,
    fallback: F,
) -> Result<Served<T>, CoreError>
where
    P: Future<Output = Result<T, StoreError>>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    match primary {
        Some(primary) => match primary.await {
            Ok(value) => {
                return Ok(Served {
                    value,
                    backend: Backend::Primary,
                })
            }
            Err(e) => {
                tracing::warn!(operation, error = %e, "Primary store failed, using fallback document");
            }
        },
        None => {
            tracing::debug!(operation, "No primary store configured, using fallback document");
        }
    }

    match fallback().await {
        Ok(value) => Ok(Served {
            value,
            backend: Backend::Fallback,
        }),
        Err(e) => {
            tracing::error!(operation, error = %e, "Fallback document failed");
            Err(CoreError::StorageUnavailable(format!("{operation}: {e}")))
        }
    }
}
