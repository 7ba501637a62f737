use crate::domain::customer::OnboardRequest;
use crate::error::InputError;
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

/// One CSV row: the personal data plus paths to the two documents.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Submission {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: String,
    pub email: String,
    pub nationality_code: String,
    pub residential_address: String,
    pub national_identifier: String,
    pub id_proof: Option<PathBuf>,
    #[serde(default)]
    pub id_proof_type: Option<String>,
    pub photo: Option<PathBuf>,
    #[serde(default)]
    pub photo_type: Option<String>,
}

impl Submission {
    pub fn request(&self) -> OnboardRequest {
        OnboardRequest {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender.clone(),
            date_of_birth: self.date_of_birth,
            phone_number: self.phone_number.clone(),
            email: self.email.clone(),
            nationality_code: self.nationality_code.clone(),
            residential_address: self.residential_address.clone(),
            national_identifier: self.national_identifier.clone(),
        }
    }
}

/// Reads onboarding submissions from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<Submission>`.
/// It trims whitespace and tolerates rows without the optional media type columns.
pub struct SubmissionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> SubmissionReader<R> {
    /// Creates a new `SubmissionReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes submissions.
    pub fn submissions(self) -> impl Iterator<Item = Result<Submission, InputError>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(InputError::from))
    }
}
