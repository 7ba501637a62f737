//! Legal age checks on dates of birth.

use chrono::NaiveDate;

/// Minimum age, in full years, for opening an account.
pub const ADULT_AGE: u32 = 18;

/// Full elapsed years between `date_of_birth` and `today`.
///
/// Partial years round down. Returns `None` when the birth date lies after `today`.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    today.years_since(date_of_birth)
}

/// Returns true when the person is at least [`ADULT_AGE`] on `today`.
///
/// An absent date of birth is never adult.
pub fn is_adult_on(date_of_birth: Option<NaiveDate>, today: NaiveDate) -> bool {
    date_of_birth
        .and_then(|dob| age_on(dob, today))
        .is_some_and(|age| age >= ADULT_AGE)
}
