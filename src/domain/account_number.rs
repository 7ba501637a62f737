//! Account number generation.
//!
//! Numbers follow a Dutch IBAN-like layout: country code, two check digits,
//! bank code and a ten digit account body, e.g. `NL83ABC1234567890`.

use rand::Rng;

pub const COUNTRY_CODE: &str = "NL";
pub const BANK_CODE: &str = "ABC";
pub const CHECK_DIGITS: usize = 2;
pub const BODY_DIGITS: usize = 10;
/// Total length of a generated account number.
pub const LENGTH: usize = COUNTRY_CODE.len() + CHECK_DIGITS + BANK_CODE.len() + BODY_DIGITS;

/// Produces candidate account numbers.
///
/// Allocators make no uniqueness promise; the store rejects collisions and the
/// caller asks for another candidate.
pub trait AccountNumberAllocator: Send + Sync {
    fn allocate(&self) -> String;
}

pub type AccountNumberAllocatorBox = Box<dyn AccountNumberAllocator>;

/// Draws every digit from the thread-local RNG, which is a ChaCha-based CSPRNG
/// seeded from the operating system.
#[derive(Default, Clone, Debug)]
pub struct SecureAccountNumberAllocator;

impl SecureAccountNumberAllocator {
    pub fn new() -> Self {
        Self
    }
}

impl AccountNumberAllocator for SecureAccountNumberAllocator {
    fn allocate(&self) -> String {
        let mut rng = rand::rng();
        let mut digits = |count: usize| -> String {
            (0..count)
                .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
                .collect()
        };

        let check = digits(CHECK_DIGITS);
        let body = digits(BODY_DIGITS);
        format!("{}{}{}{}", COUNTRY_CODE, check, BANK_CODE, body)
    }
}

/// Returns true when `candidate` has the `NL\d{2}ABC\d{10}` shape.
pub fn is_well_formed(candidate: &str) -> bool {
    let bytes = candidate.as_bytes();
    if bytes.len() != LENGTH {
        return false;
    }

    let (country, rest) = bytes.split_at(COUNTRY_CODE.len());
    let (check, rest) = rest.split_at(CHECK_DIGITS);
    let (bank, body) = rest.split_at(BANK_CODE.len());

    country == COUNTRY_CODE.as_bytes()
        && check.iter().all(u8::is_ascii_digit)
        && bank == BANK_CODE.as_bytes()
        && body.iter().all(u8::is_ascii_digit)
}
