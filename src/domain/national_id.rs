//! Dutch national identifier (BSN) checks.

/// Number of digits in a national identifier.
pub const LENGTH: usize = 9;

/// Returns true when `candidate` is nine digits and passes the 11-proof.
///
/// The first eight digits are weighted 9 down to 2 and summed; the ninth digit
/// is subtracted. The identifier is valid when that sum is divisible by 11.
pub fn is_valid(candidate: &str) -> bool {
    let bytes = candidate.as_bytes();
    if bytes.len() != LENGTH {
        return false;
    }

    let mut sum: i32 = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if !b.is_ascii_digit() {
            return false;
        }
        let digit = i32::from(b - b'0');
        if i < LENGTH - 1 {
            sum += (9 - i as i32) * digit;
        } else {
            sum -= digit;
        }
    }

    sum % 11 == 0
}
