//! Phone number normalization and display formatting.
//!
//! Dispatch always uses [`digits_only`]. The formatted variants are for
//! screens and forms and never end up in a deep link.

/// Longest WhatsApp number accepted by the admin form (country + area + 9 digits).
pub const MAX_WHATSAPP_DIGITS: usize = 13;

/// Strip every non-digit character.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Format a customer phone as `(DD) NNNNN-NNNN`.
///
/// Works on partial input so it can run on every keystroke; digits past
/// the eleventh are dropped.
pub fn format_customer_phone(input: &str) -> String {
    let digits = digits_only(input);
    let d = digits.as_str();
    match d.len() {
        0..=2 => d.to_string(),
        3..=7 => format!("({}) {}", &d[..2], &d[2..]),
        _ => format!("({}) {}-{}", &d[..2], &d[2..7], &d[7..d.len().min(11)]),
    }
}

/// Format a WhatsApp number as `+CC (DD) NNNNN-NNNN`.
///
/// Partial input renders progressively, matching what the admin form shows
/// while the operator types.
pub fn format_whatsapp_display(input: &str) -> String {
    let digits = limit_whatsapp_digits(input);
    let d = digits.as_str();
    match d.len() {
        0..=1 => d.to_string(),
        2..=4 => format!("+{} ({}", &d[..2], &d[2..]),
        5..=9 => format!("+{} ({}) {}", &d[..2], &d[2..4], &d[4..]),
        _ => format!("+{} ({}) {}-{}", &d[..2], &d[2..4], &d[4..9], &d[9..]),
    }
}

/// Digits of a WhatsApp number, truncated to [`MAX_WHATSAPP_DIGITS`].
pub fn limit_whatsapp_digits(input: &str) -> String {
    let mut digits = digits_only(input);
    digits.truncate(MAX_WHATSAPP_DIGITS);
    digits
}
