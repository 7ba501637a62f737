use super::customer::CustomerRecord;
use crate::error::StoreError;
use async_trait::async_trait;

/// Persistence for onboarded customers.
///
/// Implementations enforce uniqueness of the account number, the national
/// identifier and the email address, and must reject a conflicting insert
/// atomically with [`StoreError::UniquenessViolation`].
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Returns true if any record shares the national identifier or the email.
    async fn exists_by_uniqueness_keys(
        &self,
        national_identifier: &str,
        email: &str,
    ) -> Result<bool, StoreError>;

    /// Inserts the record in a single all-or-nothing step and returns its
    /// assigned identity.
    async fn insert(&self, record: &CustomerRecord) -> Result<u64, StoreError>;

    async fn find_by_account_number(
        &self,
        account_number: &str,
    ) -> Result<Option<CustomerRecord>, StoreError>;
}

pub type CustomerStoreBox = Box<dyn CustomerStore>;

/// Outbound customer messages.
///
/// Both calls return immediately and can never fail the caller; delivery is
/// best-effort and problems are only logged by the implementation.
pub trait Notifier: Send + Sync {
    fn notify_success(&self, email: &str, account_number: &str);
    fn notify_failure(&self, email: &str, reason: &str);
}

pub type NotifierBox = Box<dyn Notifier>;
