//! Field-level rules for onboarding requests.
//!
//! Every rule is evaluated on every call, so a rejected request reports all of
//! its violations at once rather than only the first one.

use super::age;
use super::customer::{Gender, OnboardRequest};
use super::national_id;
use chrono::{NaiveDate, Utc};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z ]+$").expect("name pattern is valid"));

// Optional +31 or trunk 0, then a non-zero digit and eight more digits.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+31|0)[1-9]\d{8}$").expect("phone pattern is valid"));

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

static NATIONALITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").expect("nationality pattern is valid"));

/// A single broken rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All violations found on one request, in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.violations.push(Violation {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.violations.iter().map(|v| v.field)
    }
}

/// Renders as `field: message` pairs joined by ", ".
impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Stateless rule set over [`OnboardRequest`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldValidator;

impl FieldValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validates against the current UTC date.
    pub fn validate(&self, request: &OnboardRequest) -> Result<(), ValidationErrors> {
        self.validate_at(request, Utc::now().date_naive())
    }

    /// Validates with `today` as the reference date for the age rule.
    pub fn validate_at(
        &self,
        request: &OnboardRequest,
        today: NaiveDate,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        check_name(&mut errors, "firstName", &request.first_name);
        check_name(&mut errors, "lastName", &request.last_name);

        if request.gender.parse::<Gender>().is_err() {
            errors.add("gender", "must be one of MALE, FEMALE, OTHER");
        }

        if !age::is_adult_on(request.date_of_birth, today) {
            errors.add(
                "dateOfBirth",
                format!("must be at least {} years old", age::ADULT_AGE),
            );
        }

        if is_blank(&request.phone_number) {
            errors.add("phoneNumber", "must not be blank");
        } else if !PHONE_PATTERN.is_match(&request.phone_number) {
            errors.add("phoneNumber", "must be a valid Dutch phone number");
        }

        if is_blank(&request.email) {
            errors.add("email", "must not be blank");
        } else if !EMAIL_PATTERN.is_match(&request.email) {
            errors.add("email", "must be a well-formed email address");
        }

        if is_blank(&request.nationality_code) {
            errors.add("nationalityCode", "must not be blank");
        } else if !NATIONALITY_PATTERN.is_match(&request.nationality_code) {
            errors.add("nationalityCode", "must be a 2-letter uppercase ISO code");
        }

        if is_blank(&request.residential_address) {
            errors.add("residentialAddress", "must not be blank");
        }

        if is_blank(&request.national_identifier) {
            errors.add("nationalIdentifier", "must not be blank");
        } else if !national_id::is_valid(&request.national_identifier) {
            errors.add("nationalIdentifier", "must be a valid Dutch BSN");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn check_name(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if is_blank(value) {
        errors.add(field, "must not be blank");
    } else if !NAME_PATTERN.is_match(value) {
        errors.add(field, "must contain only letters and spaces");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn valid_request() -> OnboardRequest {
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

    #[test]
    fn test_valid_request_passes() {
        assert!(FieldValidator::new().validate_at(&valid_request(), today()).is_ok());
    }

    #[test]
    fn test_collects_every_violation() {
        let mut request = valid_request();
        request.first_name = "".to_string();
        request.email = "not-an-email".to_string();

        let errors = FieldValidator::new()
            .validate_at(&request, today())
            .unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, vec!["firstName", "email"]);

        let message = errors.to_string();
        assert!(message.contains("firstName: must not be blank"));
        assert!(message.contains(", email: "));
    }

    #[test]
    fn test_name_rejects_digits() {
        let mut request = valid_request();
        request.last_name = "J3mli".to_string();
        let errors = FieldValidator::new()
            .validate_at(&request, today())
            .unwrap_err();
        assert_eq!(
            errors.violations(),
            &[Violation {
                field: "lastName",
                message: "must contain only letters and spaces".to_string()
            }]
        );
    }

    #[test]
    fn test_gender_case_insensitive() {
        let mut request = valid_request();
        request.gender = "female".to_string();
        assert!(FieldValidator::new().validate_at(&request, today()).is_ok());

        request.gender = "robot".to_string();
        let errors = FieldValidator::new()
            .validate_at(&request, today())
            .unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["gender"]);
    }

    #[test]
    fn test_phone_shapes() {
        let validator = FieldValidator::new();
        let mut request = valid_request();
        for ok in ["+31612345678", "0612345678", "0201234567"] {
            request.phone_number = ok.to_string();
            assert!(validator.validate_at(&request, today()).is_ok(), "{ok}");
        }
        for bad in ["", "+3161234567", "0012345678", "061234567a", "+32612345678", "612345678"] {
            request.phone_number = bad.to_string();
            assert!(validator.validate_at(&request, today()).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_nationality_must_be_uppercase() {
        let mut request = valid_request();
        request.nationality_code = "nl".to_string();
        assert!(FieldValidator::new().validate_at(&request, today()).is_err());
        request.nationality_code = "NLD".to_string();
        assert!(FieldValidator::new().validate_at(&request, today()).is_err());
    }

    #[test]
    fn test_minor_and_missing_birth_date() {
        let mut request = valid_request();
        request.date_of_birth = NaiveDate::from_ymd_opt(2008, 10, 17);
        let errors = FieldValidator::new()
            .validate_at(&request, today())
            .unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["dateOfBirth"]);

        request.date_of_birth = None;
        assert!(FieldValidator::new().validate_at(&request, today()).is_err());
    }

    #[test]
    fn test_national_identifier_checksum() {
        let mut request = valid_request();
        request.national_identifier = "123456789".to_string();
        let errors = FieldValidator::new()
            .validate_at(&request, today())
            .unwrap_err();
        assert_eq!(errors.to_string(), "nationalIdentifier: must be a valid Dutch BSN");
    }

    #[test]
    fn test_blank_address() {
        let mut request = valid_request();
        request.residential_address = "   ".to_string();
        let errors = FieldValidator::new()
            .validate_at(&request, today())
            .unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["residentialAddress"]);
    }

    proptest! {
        #[test]
        fn prop_validation_is_idempotent(
            first_name in "[a-zA-Z0-9 ]{0,8}",
            email in "[a-z@.]{0,12}",
            national_identifier in "[0-9]{8,10}",
        ) {
            let mut request = valid_request();
            request.first_name = first_name;
            request.email = email;
            request.national_identifier = national_identifier;

            let validator = FieldValidator::new();
            let first = validator.validate_at(&request, today());
            let second = validator.validate_at(&request, today());
            prop_assert_eq!(first, second);
        }
    }
}
