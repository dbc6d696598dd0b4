//! Phone Number Module
//!
//! Canonicalizes phone numbers into the form used as deduplication keys.
//!
//! The canonical form is E.164 (`+` followed by up to 15 digits, no leading
//! zero in the country code). Numbers without an international prefix are
//! rejected: no regional default is assumed.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{OtpError, Result};

static E164_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[1-9][0-9]{1,14}$").expect("valid E.164 pattern"));

/// Formatting characters stripped before validation.
const SEPARATORS: &[char] = &[' ', '-', '.', '(', ')', '/', '\t'];

// == Normalize ==
/// Returns the canonical E.164 form of `raw`.
///
/// Two textual variants of the same number normalize to the same string,
/// e.g. `"+237 6 00-00-00-01"`, `"00237600000001"` and `"+237600000001"`.
pub fn normalize_phone_number(raw: &str) -> Result<String> {
    let stripped: String = raw.trim().chars().filter(|c| !SEPARATORS.contains(c)).collect();

    let candidate = match stripped.strip_prefix("00") {
        Some(rest) => format!("+{}", rest),
        None => stripped,
    };

    if E164_REGEX.is_match(&candidate) {
        Ok(candidate)
    } else {
        Err(OtpError::InvalidPhoneNumber(mask_phone_number(raw)))
    }
}

// == Mask ==
/// Masks a phone number for logging, keeping the first four and last four
/// characters (e.g. `+237*****0001`).
pub fn mask_phone_number(phone: &str) -> String {
    let chars: Vec<char> = phone.trim().chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
}
