use crate::domain::customer::CustomerRecord;
use crate::domain::ports::CustomerStore;
use crate::error::{StoreError, UniqueKey};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    customers: HashMap<u64, CustomerRecord>,
    by_account_number: HashMap<String, u64>,
    by_national_identifier: HashMap<String, u64>,
    by_email: HashMap<String, u64>,
    last_id: u64,
}

impl Tables {
    fn conflict(&self, record: &CustomerRecord) -> Option<UniqueKey> {
        if self.by_account_number.contains_key(&record.account_number) {
            Some(UniqueKey::AccountNumber)
        } else if self
            .by_national_identifier
            .contains_key(&record.national_identifier)
        {
            Some(UniqueKey::NationalIdentifier)
        } else if self.by_email.contains_key(&record.email) {
            Some(UniqueKey::Email)
        } else {
            None
        }
    }
}

/// A thread-safe in-memory customer store.
///
/// Uses `Arc<RwLock<..>>` so clones share the same tables. Every insert checks
/// all unique indexes and writes under a single write lock, which makes it
/// atomic with respect to concurrent inserts.
#[derive(Default, Clone)]
pub struct InMemoryCustomerStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryCustomerStore {
    /// Creates a new, empty in-memory customer store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted customers.
    pub async fn count(&self) -> usize {
        self.tables.read().await.customers.len()
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn exists_by_uniqueness_keys(
        &self,
        national_identifier: &str,
        email: &str,
    ) -> Result<bool, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.by_national_identifier.contains_key(national_identifier)
            || tables.by_email.contains_key(email))
    }

    async fn insert(&self, record: &CustomerRecord) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(key) = tables.conflict(record) {
            return Err(StoreError::UniquenessViolation(key));
        }

        tables.last_id += 1;
        let id = tables.last_id;

        let mut stored = record.clone();
        stored.id = Some(id);
        tables
            .by_account_number
            .insert(stored.account_number.clone(), id);
        tables
            .by_national_identifier
            .insert(stored.national_identifier.clone(), id);
        tables.by_email.insert(stored.email.clone(), id);
        tables.customers.insert(id, stored);

        Ok(id)
    }

    async fn find_by_account_number(
        &self,
        account_number: &str,
    ) -> Result<Option<CustomerRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .by_account_number
            .get(account_number)
            .and_then(|id| tables.customers.get(id))
            .cloned())
    }
}
