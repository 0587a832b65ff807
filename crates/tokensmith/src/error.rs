//! Structural errors that stop a whole batch.

use thiserror::Error;

use crate::graph::SortError;
use crate::store::StoreError;

/// A batch-aborting failure.
///
/// Per-item problems (bad values, unresolved aliases, rejected assignments)
/// are never reported through this type; they are recorded in the
/// [`ProcessingResult`](crate::report::ProcessingResult) and processing
/// continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BatchError {
    #[error(transparent)]
    Order(#[from] SortError),

    #[error(
        "cannot add mode '{mode}' to collection '{collection}': collections are limited to {limit} modes; \
         remove a mode from the document or split the collection"
    )]
    ModeLimit {
        collection: String,
        mode: String,
        limit: usize,
    },

    #[error("collection '{collection}' declares no modes")]
    NoModes { collection: String },

    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    #[error("failed to {action}: {source}")]
    Store {
        action: String,
        #[source]
        source: StoreError,
    },
}

impl BatchError {
    pub(crate) fn store(action: impl Into<String>) -> impl FnOnce(StoreError) -> BatchError {
        let action = action.into();
        move |source| match source {
            StoreError::ModeLimit {
                collection,
                mode,
                limit,
            } => BatchError::ModeLimit {
                collection,
                mode,
                limit,
            },
            source => BatchError::Store { action, source },
        }
    }
}
