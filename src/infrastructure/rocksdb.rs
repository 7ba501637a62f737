use crate::domain::customer::CustomerRecord;
use crate::domain::ports::CustomerStore;
use crate::error::{StoreError, UniqueKey};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options, WriteBatch};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Column Family for customer records, keyed by surrogate id.
pub const CF_CUSTOMERS: &str = "customers";
/// Unique index: national identifier -> id.
pub const CF_IDX_NATIONAL_IDENTIFIER: &str = "idx_national_identifier";
/// Unique index: email -> id.
pub const CF_IDX_EMAIL: &str = "idx_email";
/// Unique index: account number -> id.
pub const CF_IDX_ACCOUNT_NUMBER: &str = "idx_account_number";
/// Raw identity document bytes, keyed by surrogate id.
pub const CF_ID_PROOFS: &str = "id_proofs";
/// Raw photo bytes, keyed by surrogate id.
pub const CF_PHOTOS: &str = "photos";
/// Store metadata such as the id sequence.
pub const CF_META: &str = "meta";

const LAST_ID_KEY: &[u8] = b"last_id";

/// A persistent customer store implementation using RocksDB.
///
/// Records are stored as JSON in `customers`, without the attachments; those
/// are kept as raw bytes in `id_proofs` and `photos`. Each unique key has its
/// own index Column Family. An insert checks every index and commits the record,
/// its index entries and the advanced id sequence in one `WriteBatch`. Inserts
/// are serialized by `write_lock` so the check and the commit cannot interleave
/// with another insert.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that all required column families exist.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [
            CF_CUSTOMERS,
            CF_IDX_NATIONAL_IDENTIFIER,
            CF_IDX_EMAIL,
            CF_IDX_ACCOUNT_NUMBER,
            CF_ID_PROOFS,
            CF_PHOTOS,
            CF_META,
        ]
        .into_iter()
        .map(|name| ColumnFamilyDescriptor::new(name, Options::default()));

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily, StoreError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Backend(format!("{} column family not found", name)))
    }

    fn index_contains(&self, cf_name: &str, key: &str) -> Result<bool, StoreError> {
        let cf = self.cf(cf_name)?;
        Ok(self.db.get_pinned_cf(cf, key.as_bytes())?.is_some())
    }

    fn last_id(&self) -> Result<u64, StoreError> {
        let cf = self.cf(CF_META)?;
        match self.db.get_pinned_cf(cf, LAST_ID_KEY)? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes.as_ref().try_into().map_err(|_| {
                    StoreError::Backend("corrupt id sequence in meta column family".to_string())
                })?;
                Ok(u64::from_be_bytes(raw))
            }
            None => Ok(0),
        }
    }

    fn conflict(&self, record: &CustomerRecord) -> Result<Option<UniqueKey>, StoreError> {
        if self.index_contains(CF_IDX_ACCOUNT_NUMBER, &record.account_number)? {
            return Ok(Some(UniqueKey::AccountNumber));
        }
        if self.index_contains(CF_IDX_NATIONAL_IDENTIFIER, &record.national_identifier)? {
            return Ok(Some(UniqueKey::NationalIdentifier));
        }
        if self.index_contains(CF_IDX_EMAIL, &record.email)? {
            return Ok(Some(UniqueKey::Email));
        }
        Ok(None)
    }

    fn get_by_id(&self, id: u64) -> Result<Option<CustomerRecord>, StoreError> {
        let key = id.to_be_bytes();
        let Some(bytes) = self.db.get_pinned_cf(self.cf(CF_CUSTOMERS)?, key)? else {
            return Ok(None);
        };

        let mut record: CustomerRecord = serde_json::from_slice(&bytes)?;
        record.id_proof = self
            .db
            .get_cf(self.cf(CF_ID_PROOFS)?, key)?
            .unwrap_or_default();
        record.photo = self.db.get_cf(self.cf(CF_PHOTOS)?, key)?.unwrap_or_default();
        Ok(Some(record))
    }
}

#[async_trait]
impl CustomerStore for RocksDBStore {
    async fn exists_by_uniqueness_keys(
        &self,
        national_identifier: &str,
        email: &str,
    ) -> Result<bool, StoreError> {
        Ok(self.index_contains(CF_IDX_NATIONAL_IDENTIFIER, national_identifier)?
            || self.index_contains(CF_IDX_EMAIL, email)?)
    }

    async fn insert(&self, record: &CustomerRecord) -> Result<u64, StoreError> {
        let _guard = self.write_lock.lock().await;

        if let Some(key) = self.conflict(record)? {
            return Err(StoreError::UniquenessViolation(key));
        }

        let id = self.last_id()? + 1;
        let mut stored = record.clone();
        stored.id = Some(id);
        let id_proof = std::mem::take(&mut stored.id_proof);
        let photo = std::mem::take(&mut stored.photo);
        let value = serde_json::to_vec(&stored)?;
        let id_bytes = id.to_be_bytes();

        let mut batch = WriteBatch::default();
        batch.put_cf(self.cf(CF_CUSTOMERS)?, id_bytes, value);
        batch.put_cf(self.cf(CF_ID_PROOFS)?, id_bytes, id_proof);
        batch.put_cf(self.cf(CF_PHOTOS)?, id_bytes, photo);
        batch.put_cf(
            self.cf(CF_IDX_ACCOUNT_NUMBER)?,
            stored.account_number.as_bytes(),
            id_bytes,
        );
        batch.put_cf(
            self.cf(CF_IDX_NATIONAL_IDENTIFIER)?,
            stored.national_identifier.as_bytes(),
            id_bytes,
        );
        batch.put_cf(self.cf(CF_IDX_EMAIL)?, stored.email.as_bytes(), id_bytes);
        batch.put_cf(self.cf(CF_META)?, LAST_ID_KEY, id_bytes);
        self.db.write(batch)?;

        debug!(id, account_number = %stored.account_number, "Customer persisted");
        Ok(id)
    }

    async fn find_by_account_number(
        &self,
        account_number: &str,
    ) -> Result<Option<CustomerRecord>, StoreError> {
        let cf = self.cf(CF_IDX_ACCOUNT_NUMBER)?;
        let Some(bytes) = self.db.get_pinned_cf(cf, account_number.as_bytes())? else {
            return Ok(None);
        };
        let raw: [u8; 8] = bytes.as_ref().try_into().map_err(|_| {
            StoreError::Backend(format!("corrupt index entry for {}", account_number))
        })?;
        self.get_by_id(u64::from_be_bytes(raw))
    }
}
