//! Phone number extraction and normalization to the `+233` key format.

use crate::error::CheckError;
use serde_json::Value;
use std::fmt;

/// Ghana's country calling code.
pub const COUNTRY_CODE: &str = "233";

const CANONICAL_PREFIX: &str = "+233";

/// Payload field carrying the phone number.
pub const PHONE_FIELD: &str = "phoneNumber";

/// A phone number normalized into the admin key format.
///
/// Always starts with `+233`. The remainder is whatever the caller supplied
/// after prefix rewriting; digit count is not checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalPhone(String);

impl CanonicalPhone {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The same key without its leading `+`, as stored by older records.
    pub fn unprefixed(&self) -> &str {
        &self.0[1..]
    }
}

impl fmt::Display for CanonicalPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pull the phone number out of a callable payload.
///
/// The payload must be an object whose `phoneNumber` is a non-empty string.
pub fn extract_phone(data: &Value) -> Result<&str, CheckError> {
    let phone = data
        .as_object()
        .and_then(|fields| fields.get(PHONE_FIELD))
        .and_then(Value::as_str)
        .ok_or(CheckError::InvalidArgument)?;

    if phone.is_empty() {
        return Err(CheckError::InvalidArgument);
    }

    Ok(phone)
}

/// Whitespace as ECMAScript `String.prototype.trim` defines it: Unicode
/// `White_Space` plus the byte order mark, minus NEL (U+0085).
fn is_js_whitespace(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{0085}')
}

/// Normalize caller-supplied phone text into a `+233` key.
pub fn normalize(raw: &str) -> CanonicalPhone {
    let trimmed = raw.trim_matches(is_js_whitespace);

    let prefixed = if trimmed.starts_with('+') {
        trimmed.to_string()
    } else {
        format!("+{}", trimmed)
    };

    if prefixed.starts_with(CANONICAL_PREFIX) {
        return CanonicalPhone(prefixed);
    }

    if let Some(local) = prefixed.strip_prefix("+0") {
        return CanonicalPhone(format!("{}{}", CANONICAL_PREFIX, local));
    }

    let digits = &prefixed[1..];
    let canonical = if digits.starts_with(COUNTRY_CODE) {
        format!("+{}", digits)
    } else if let Some(local) = digits.strip_prefix('0') {
        format!("{}{}", CANONICAL_PREFIX, local)
    } else {
        format!("{}{}", CANONICAL_PREFIX, digits)
    };

    CanonicalPhone(canonical)
}

/// Extract and normalize in one step.
pub fn normalize_payload(data: &Value) -> Result<CanonicalPhone, CheckError> {
    extract_phone(data).map(normalize)
}
