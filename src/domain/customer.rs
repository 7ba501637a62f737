use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the three tokens in any letter case.
impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            "OTHER" => Ok(Gender::Other),
            other => Err(format!("unknown gender '{}'", other)),
        }
    }
}

/// Personal data submitted for onboarding, exactly as received from the transport.
///
/// Nothing here is trusted until `FieldValidator` has accepted it.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct OnboardRequest {
    pub first_name: String,
    pub last_name: String,
    /// Raw gender token; canonicalized into [`Gender`] once validated.
    pub gender: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: String,
    pub email: String,
    pub nationality_code: String,
    pub residential_address: String,
    pub national_identifier: String,
}

/// A customer as persisted by a `CustomerStore`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CustomerRecord {
    /// Surrogate identity, assigned by the store on insert.
    pub id: Option<u64>,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub phone_number: String,
    pub email: String,
    pub nationality_code: String,
    pub residential_address: String,
    pub national_identifier: String,
    pub id_proof: Vec<u8>,
    pub photo: Vec<u8>,
    /// Empty until an account number has been allocated.
    pub account_number: String,
}

impl CustomerRecord {
    /// Builds an unsaved record from an already validated request.
    pub fn new(
        request: &OnboardRequest,
        gender: Gender,
        date_of_birth: NaiveDate,
        id_proof: Vec<u8>,
        photo: Vec<u8>,
    ) -> Self {
        Self {
            id: None,
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            gender,
            date_of_birth,
            phone_number: request.phone_number.clone(),
            email: request.email.clone(),
            nationality_code: request.nationality_code.clone(),
            residential_address: request.residential_address.clone(),
            national_identifier: request.national_identifier.clone(),
            id_proof,
            photo,
            account_number: String::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum OnboardStatus {
    Success,
}

impl fmt::Display for OnboardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnboardStatus::Success => f.write_str("SUCCESS"),
        }
    }
}

/// Result of a successful onboarding.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OnboardOutcome {
    pub status: OnboardStatus,
    pub message: String,
    pub account_number: String,
}

impl OnboardOutcome {
    pub fn success(account_number: impl Into<String>) -> Self {
        Self {
            status: OnboardStatus::Success,
            message: "Customer onboarded successfully".to_string(),
            account_number: account_number.into(),
        }
    }
}
