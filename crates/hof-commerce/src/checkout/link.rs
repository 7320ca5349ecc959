//! WhatsApp deep links.

use super::phone::digits_only;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Host used when none is configured.
pub const DEFAULT_MESSAGING_HOST: &str = "wa.me";

/// Percent-encode a query component.
///
/// Leaves `A-Z a-z 0-9 - _ . ! ~ * ' ( )` alone and encodes every other
/// UTF-8 byte as `%XX`. Spaces become `%20`, never `+`.
pub fn encode_component(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 3);
    for c in s.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '('
            | ')' => result.push(c),
            _ => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).as_bytes() {
                    result.push_str(&format!("%{:02X}", byte));
                }
            }
        }
    }
    result
}

/// A link that opens a chat with a prefilled message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeepLink {
    host: String,
    phone_digits: String,
    encoded_text: String,
}

impl DeepLink {
    /// Build a link; the phone is reduced to digits and the text is encoded.
    pub fn new(host: &str, phone: &str, text: &str) -> Self {
        Self::from_encoded(host, phone, encode_component(text))
    }

    /// Build a link from text that is already encoded.
    pub fn from_encoded(host: &str, phone: &str, encoded_text: impl Into<String>) -> Self {
        let host = host.trim().trim_end_matches('/');
        Self {
            host: if host.is_empty() {
                DEFAULT_MESSAGING_HOST.to_string()
            } else {
                host.to_string()
            },
            phone_digits: digits_only(phone),
            encoded_text: encoded_text.into(),
        }
    }

    pub fn phone_digits(&self) -> &str {
        &self.phone_digits
    }

    /// Full `https://<host>/<digits>?text=<encoded>` URL.
    pub fn url(&self) -> String {
        format!(
            "https://{}/{}?text={}",
            self.host, self.phone_digits, self.encoded_text
        )
    }
}

impl fmt::Display for DeepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}
