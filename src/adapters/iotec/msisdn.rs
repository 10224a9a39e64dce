//! Phone number normalization for the IoTec API.
//!
//! IoTec expects international format without a plus sign: `256` followed
//! by nine digits (`256772123456`).

/// Normalize a phone number to IoTec's international dialing format.
///
/// Non-digit characters are stripped first, then:
/// - `256XXXXXXXXX` (12 digits) passes through
/// - `0XXXXXXXXX` (10 digits) has the leading zero replaced by `256`
/// - `XXXXXXXXX` (9 digits) is prefixed with `256`
///
/// Anything else is returned digits-only but otherwise untouched.
pub fn normalize(input: &str) -> String {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 12 && digits.starts_with("256") {
        digits
    } else if digits.len() == 10 && digits.starts_with('0') {
        format!("256{}", &digits[1..])
    } else if digits.len() == 9 && !digits.starts_with('0') {
        format!("256{digits}")
    } else {
        digits
    }
}
