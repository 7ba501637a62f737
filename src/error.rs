use std::fmt;
use thiserror::Error;

/// Message used whenever a failure is not one of the classified business errors.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error occurred";

/// The typed failure of a single onboarding call.
#[derive(Error, Debug)]
pub enum OnboardingError {
    /// One or more field or attachment rules were violated.
    #[error("{0}")]
    ValidationFailed(String),
    /// A customer with the same national identifier or email already exists.
    #[error("{0}")]
    DuplicateCustomer(String),
    /// Anything else. The cause is kept for diagnostics but never shown to the caller.
    #[error("Unexpected error occurred")]
    Unexpected(#[source] FailureCause),
}

impl OnboardingError {
    /// Returns true when the pipeline gave up after repeated account number collisions.
    pub fn is_allocation_exhausted(&self) -> bool {
        matches!(
            self,
            OnboardingError::Unexpected(FailureCause::IdentifierAllocationExhausted { .. })
        )
    }
}

/// Causes that are surfaced to the caller as [`OnboardingError::Unexpected`].
#[derive(Error, Debug)]
pub enum FailureCause {
    #[error("failed to generate a unique account number after {attempts} attempts")]
    IdentifierAllocationExhausted { attempts: u32 },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The unique keys a customer store enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    AccountNumber,
    NationalIdentifier,
    Email,
}

impl fmt::Display for UniqueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UniqueKey::AccountNumber => "accountNumber",
            UniqueKey::NationalIdentifier => "nationalIdentifier",
            UniqueKey::Email => "email",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("uniqueness constraint violated on {0}")]
    UniquenessViolation(UniqueKey),
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDB(#[from] rocksdb::Error),
}

/// Errors raised while reading batch input.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = OnboardingError> = std::result::Result<T, E>;
