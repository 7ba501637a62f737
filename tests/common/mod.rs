#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use customer_onboarding::domain::account_number::AccountNumberAllocator;
use customer_onboarding::domain::attachment::{APPLICATION_PDF, Attachment, IMAGE_JPEG};
use customer_onboarding::domain::customer::{CustomerRecord, OnboardRequest};
use customer_onboarding::domain::ports::{CustomerStore, Notifier};
use customer_onboarding::error::{StoreError, UniqueKey};
use customer_onboarding::infrastructure::in_memory::InMemoryCustomerStore;
use std::collections::VecDeque;
use std::fs::File;
use std::io::Error;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

pub const CSV_HEADER: [&str; 11] = [
    "first_name",
    "last_name",
    "gender",
    "date_of_birth",
    "phone_number",
    "email",
    "nationality_code",
    "residential_address",
    "national_identifier",
    "id_proof",
    "photo",
];

pub fn valid_request() -> OnboardRequest {
    OnboardRequest {
        first_name: "Seif".to_string(),
        last_name: "Jemli".to_string(),
        gender: "MALE".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 21),
        phone_number: "+31612345678".to_string(),
        email: "seif.jemli@example.com".to_string(),
        nationality_code: "NL".to_string(),
        residential_address: "Gustav Mahlerlaan 10, 1082 PP Amsterdam".to_string(),
        national_identifier: "123456782".to_string(),
    }
}

pub fn pdf(size: usize) -> Option<Attachment> {
    Some(Attachment::new(
        "id.pdf",
        Some(APPLICATION_PDF.to_string()),
        vec![0x25; size],
    ))
}

pub fn jpeg(size: usize) -> Option<Attachment> {
    Some(Attachment::new(
        "photo.jpg",
        Some(IMAGE_JPEG.to_string()),
        vec![0xFF; size],
    ))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Success { email: String, account_number: String },
    Failure { email: String, reason: String },
}

/// Records every notification it receives.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Sent>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn successes(&self) -> usize {
        self.sent()
            .iter()
            .filter(|s| matches!(s, Sent::Success { .. }))
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify_success(&self, email: &str, account_number: &str) {
        self.sent.lock().unwrap().push(Sent::Success {
            email: email.to_string(),
            account_number: account_number.to_string(),
        });
    }

    fn notify_failure(&self, email: &str, reason: &str) {
        self.sent.lock().unwrap().push(Sent::Failure {
            email: email.to_string(),
            reason: reason.to_string(),
        });
    }
}

/// Hands out a fixed list of account numbers, then repeats the last one.
#[derive(Clone)]
pub struct SequenceAllocator {
    numbers: Arc<Mutex<VecDeque<String>>>,
    last: Arc<Mutex<String>>,
    calls: Arc<AtomicU32>,
}

impl SequenceAllocator {
    pub fn new(numbers: &[&str]) -> Self {
        Self {
            numbers: Arc::new(Mutex::new(numbers.iter().map(|n| n.to_string()).collect())),
            last: Arc::new(Mutex::new(numbers.last().copied().unwrap_or_default().to_string())),
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AccountNumberAllocator for SequenceAllocator {
    fn allocate(&self) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.numbers.lock().unwrap().pop_front() {
            Some(next) => {
                *self.last.lock().unwrap() = next.clone();
                next
            }
            None => self.last.lock().unwrap().clone(),
        }
    }
}

/// What a `ScriptedStore` does with the next insert.
#[derive(Debug, Clone, Copy)]
pub enum InsertScript {
    Collide(UniqueKey),
    Fail,
    Delegate,
}

/// Wraps an in-memory store and overrides the first inserts with scripted failures.
#[derive(Clone)]
pub struct ScriptedStore {
    pub inner: InMemoryCustomerStore,
    script: Arc<Mutex<VecDeque<InsertScript>>>,
    inserts: Arc<AtomicU32>,
    fail_exists: bool,
}

impl ScriptedStore {
    pub fn new(script: &[InsertScript]) -> Self {
        Self {
            inner: InMemoryCustomerStore::new(),
            script: Arc::new(Mutex::new(script.iter().copied().collect())),
            inserts: Arc::new(AtomicU32::new(0)),
            fail_exists: false,
        }
    }

    pub fn failing_lookups() -> Self {
        Self {
            fail_exists: true,
            ..Self::new(&[])
        }
    }

    pub fn inserts(&self) -> u32 {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CustomerStore for ScriptedStore {
    async fn exists_by_uniqueness_keys(
        &self,
        national_identifier: &str,
        email: &str,
    ) -> Result<bool, StoreError> {
        if self.fail_exists {
            return Err(StoreError::Backend("connection reset by peer".to_string()));
        }
        self.inner
            .exists_by_uniqueness_keys(national_identifier, email)
            .await
    }

    async fn insert(&self, record: &CustomerRecord) -> Result<u64, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(InsertScript::Delegate);
        match next {
            InsertScript::Collide(key) => Err(StoreError::UniquenessViolation(key)),
            InsertScript::Fail => Err(StoreError::Backend("disk I/O error".to_string())),
            InsertScript::Delegate => self.inner.insert(record).await,
        }
    }

    async fn find_by_account_number(
        &self,
        account_number: &str,
    ) -> Result<Option<CustomerRecord>, StoreError> {
        self.inner.find_by_account_number(account_number).await
    }
}

/// Writes a small PDF-looking and JPEG-looking file into `dir`.
pub fn write_documents(dir: &Path) -> Result<(PathBuf, PathBuf), Error> {
    let id_proof = dir.join("id.pdf");
    let photo = dir.join("photo.jpg");
    std::fs::write(&id_proof, [b"%PDF-1.7\n".as_slice(), &[0u8; 491]].concat())?;
    std::fs::write(&photo, [[0xFF, 0xD8, 0xFF, 0xE0].as_slice(), &[0u8; 496]].concat())?;
    Ok((id_proof, photo))
}

/// Writes a submissions CSV with the standard header and the given rows.
pub fn write_submissions(path: &Path, rows: &[Vec<String>]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(CSV_HEADER)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// A CSV row for a valid adult customer with the given identity keys.
pub fn submission_row(
    first_name: &str,
    email: &str,
    national_identifier: &str,
    id_proof: &Path,
    photo: &Path,
) -> Vec<String> {
    vec![
        first_name.to_string(),
        "Jemli".to_string(),
        "MALE".to_string(),
        "1985-05-15".to_string(),
        "0612345678".to_string(),
        email.to_string(),
        "NL".to_string(),
        "Damrak 1, Amsterdam".to_string(),
        national_identifier.to_string(),
        id_proof.display().to_string(),
        photo.display().to_string(),
    ]
}
