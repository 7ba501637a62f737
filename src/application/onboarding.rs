use crate::domain::account_number::AccountNumberAllocatorBox;
use crate::domain::attachment::{Attachment, AttachmentValidator, ID_PROOF, PHOTO};
use crate::domain::customer::{CustomerRecord, Gender, OnboardOutcome, OnboardRequest};
use crate::domain::ports::{CustomerStoreBox, NotifierBox};
use crate::domain::validation::FieldValidator;
use crate::error::{
    FailureCause, OnboardingError, Result, StoreError, UNEXPECTED_ERROR_MESSAGE, UniqueKey,
};
use chrono::NaiveDate;
use tracing::{error, info, instrument, warn};

/// How many account numbers are tried before giving up on a submission.
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 3;

pub const DUPLICATE_CUSTOMER_MESSAGE: &str =
    "Customer with same nationalIdentifier or email already exists";

/// Runs the onboarding pipeline: validation, duplicate detection, account
/// number allocation with bounded retry, persistence and notification.
///
/// One instance can serve any number of concurrent calls. It holds no mutable
/// state of its own; the store's uniqueness constraints are what keep
/// concurrent submissions apart.
pub struct OnboardingService {
    store: CustomerStoreBox,
    allocator: AccountNumberAllocatorBox,
    notifier: NotifierBox,
    field_validator: FieldValidator,
    attachment_validator: AttachmentValidator,
}

impl OnboardingService {
    /// Creates a new `OnboardingService`.
    ///
    /// # Arguments
    ///
    /// * `store` - Where onboarded customers are persisted.
    /// * `allocator` - Source of candidate account numbers.
    /// * `notifier` - Receives the success or failure message for every call.
    pub fn new(
        store: CustomerStoreBox,
        allocator: AccountNumberAllocatorBox,
        notifier: NotifierBox,
    ) -> Self {
        Self {
            store,
            allocator,
            notifier,
            field_validator: FieldValidator::new(),
            attachment_validator: AttachmentValidator::new(),
        }
    }

    /// Onboards one customer.
    ///
    /// Every outcome, successful or not, triggers exactly one notification to
    /// the request's email address. Validation and duplicate failures are
    /// returned as-is; anything else comes back as
    /// [`OnboardingError::Unexpected`] with the original cause attached.
    #[instrument(skip_all, fields(email = %request.email))]
    pub async fn onboard(
        &self,
        request: &OnboardRequest,
        id_proof: Option<Attachment>,
        photo: Option<Attachment>,
    ) -> Result<OnboardOutcome> {
        match self.run(request, id_proof, photo).await {
            Ok(record) => {
                self.notifier
                    .notify_success(&request.email, &record.account_number);
                info!(
                    account_number = %record.account_number,
                    "Customer onboarded successfully"
                );
                Ok(OnboardOutcome::success(record.account_number))
            }
            Err(err) => Err(self.handle_failure(&request.email, err)),
        }
    }

    async fn run(
        &self,
        request: &OnboardRequest,
        id_proof: Option<Attachment>,
        photo: Option<Attachment>,
    ) -> Result<CustomerRecord> {
        let (gender, date_of_birth) = self.validate_request(request)?;
        let id_proof = self.accept_attachment(id_proof, ID_PROOF)?;
        let photo = self.accept_attachment(photo, PHOTO)?;

        self.check_duplicate(request).await?;

        let mut record = CustomerRecord::new(request, gender, date_of_birth, id_proof, photo);
        self.save_with_retry(&mut record).await?;
        Ok(record)
    }

    fn validate_request(&self, request: &OnboardRequest) -> Result<(Gender, NaiveDate)> {
        self.field_validator
            .validate(request)
            .map_err(|errors| OnboardingError::ValidationFailed(errors.to_string()))?;

        // Both are guaranteed by the rules above; re-derive them as typed values.
        let gender = request
            .gender
            .parse::<Gender>()
            .map_err(|msg| OnboardingError::ValidationFailed(format!("gender: {}", msg)))?;
        let date_of_birth = request.date_of_birth.ok_or_else(|| {
            OnboardingError::ValidationFailed("dateOfBirth: must not be null".to_string())
        })?;
        Ok((gender, date_of_birth))
    }

    fn accept_attachment(
        &self,
        attachment: Option<Attachment>,
        label: &'static str,
    ) -> Result<Vec<u8>> {
        self.attachment_validator
            .validate(attachment.as_ref(), label)
            .map_err(|violation| OnboardingError::ValidationFailed(violation.message))?;
        Ok(attachment.map(|a| a.bytes).unwrap_or_default())
    }

    async fn check_duplicate(&self, request: &OnboardRequest) -> Result<()> {
        let exists = self
            .store
            .exists_by_uniqueness_keys(&request.national_identifier, &request.email)
            .await
            .map_err(|e| OnboardingError::Unexpected(FailureCause::Store(e)))?;

        if exists {
            return Err(OnboardingError::DuplicateCustomer(
                DUPLICATE_CUSTOMER_MESSAGE.to_string(),
            ));
        }
        Ok(())
    }

    /// Allocates an account number and inserts the record, retrying only when
    /// the account number itself collides.
    ///
    /// Each insert is atomic in the store, so a failed attempt leaves nothing
    /// behind and at most one record is ever created.
    async fn save_with_retry(&self, record: &mut CustomerRecord) -> Result<()> {
        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            record.account_number = self.allocator.allocate();

            match self.store.insert(record).await {
                Ok(id) => {
                    record.id = Some(id);
                    return Ok(());
                }
                Err(StoreError::UniquenessViolation(UniqueKey::AccountNumber)) => {
                    warn!(
                        attempt,
                        account_number = %record.account_number,
                        "Account number conflict, retrying"
                    );
                }
                // Another submission with the same identifier or email won the race
                // between our duplicate check and this insert.
                Err(StoreError::UniquenessViolation(_)) => {
                    return Err(OnboardingError::DuplicateCustomer(
                        DUPLICATE_CUSTOMER_MESSAGE.to_string(),
                    ));
                }
                Err(e) => return Err(OnboardingError::Unexpected(FailureCause::Store(e))),
            }
        }

        record.account_number.clear();
        Err(OnboardingError::Unexpected(
            FailureCause::IdentifierAllocationExhausted {
                attempts: MAX_ALLOCATION_ATTEMPTS,
            },
        ))
    }

    fn handle_failure(&self, email: &str, err: OnboardingError) -> OnboardingError {
        let reason = match &err {
            OnboardingError::ValidationFailed(msg) | OnboardingError::DuplicateCustomer(msg) => {
                msg.as_str()
            }
            OnboardingError::Unexpected(_) => UNEXPECTED_ERROR_MESSAGE,
        };

        self.notifier.notify_failure(email, reason);

        match &err {
            OnboardingError::Unexpected(cause) => {
                error!(reason, cause = %cause, "Onboarding failed");
            }
            _ => {
                error!(reason, "Onboarding failed");
            }
        }
        err
    }
}
