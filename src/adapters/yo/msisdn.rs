//! Phone number normalization for the Yo! API.
//!
//! Yo! expects national dialing format: a leading zero followed by nine
//! digits (`0772123456`). Input arrives in whatever shape a user typed.

/// Normalize a phone number to Yo!'s national dialing format.
///
/// Non-digit characters are stripped first, then:
/// - `256XXXXXXXXX` (12 digits) has the country code replaced by `0`
/// - `XXXXXXXXX` (9 digits, no leading zero) gains a leading `0`
/// - `0XXXXXXXXX` (10 digits) passes through
///
/// Anything else is returned digits-only but otherwise untouched; truly
/// malformed numbers are left for the provider to reject.
pub fn normalize(input: &str) -> String {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 12 && digits.starts_with("256") {
        format!("0{}", &digits[3..])
    } else if digits.len() == 9 && !digits.starts_with('0') {
        format!("0{digits}")
    } else {
        digits
    }
}
