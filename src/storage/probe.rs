//! Existence probe policy
//!
//! Classifies the outcome of a metadata-only probe. Only a not-found status
//! means the object is absent. Every other failure is indeterminate,
//! including a forbidden status: a bucket policy that hides an object must not
//! be reported as "the object does not exist".

use crate::error::{BackendError, StatusClass};
use crate::storage::adapter::ObjectMetadata;

/// Outcome of an existence probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Existence {
    /// The probe succeeded
    Present(ObjectMetadata),
    /// The backend reported that the object does not exist
    Absent,
    /// The probe failed for any reason other than not-found
    Indeterminate(BackendError),
}

impl Existence {
    /// Classify a raw probe result
    pub fn classify(outcome: Result<ObjectMetadata, BackendError>) -> Self {
        match outcome {
            Ok(metadata) => Existence::Present(metadata),
            Err(err) if err.status() == StatusClass::NotFound => Existence::Absent,
            Err(err) => Existence::Indeterminate(err),
        }
    }

    /// Whether the object is known to exist
    pub fn is_present(&self) -> bool {
        matches!(self, Existence::Present(_))
    }

    /// Whether the object is known to be absent
    pub fn is_absent(&self) -> bool {
        matches!(self, Existence::Absent)
    }

    /// Collapse into presence, surfacing indeterminate outcomes as errors
    pub fn into_result(self) -> Result<Option<ObjectMetadata>, BackendError> {
        match self {
            Existence::Present(metadata) => Ok(Some(metadata)),
            Existence::Absent => Ok(None),
            Existence::Indeterminate(err) => Err(err),
        }
    }
}

impl From<Result<ObjectMetadata, BackendError>> for Existence {
    fn from(outcome: Result<ObjectMetadata, BackendError>) -> Self {
        Existence::classify(outcome)
    }
}
