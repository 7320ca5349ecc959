//! Credential comparison.

use hof_commerce::settings::StoreSettings;

/// Constant-time comparison to prevent timing attacks.
///
/// Length differences still return early.
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Exact match of both fields against the stored admin credentials.
pub fn credentials_match(settings: &StoreSettings, username: &str, password: &str) -> bool {
    // evaluate both so a wrong username costs the same as a wrong password
    let user_ok = constant_time_compare(username.as_bytes(), settings.admin_username.as_bytes());
    let pass_ok = constant_time_compare(password.as_bytes(), settings.admin_password.as_bytes());
    user_ok & pass_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare(b"admin123", b"admin123"));
        assert!(!constant_time_compare(b"admin123", b"admin124"));
        assert!(!constant_time_compare(b"admin", b"admin123"));
        assert!(constant_time_compare(b"", b""));
    }

    #[test]
    fn test_credentials_match_is_exact() {
        let settings = StoreSettings::default();
        assert!(credentials_match(&settings, "admin", "admin123"));
        assert!(!credentials_match(&settings, "Admin", "admin123"));
        assert!(!credentials_match(&settings, " admin", "admin123"));
        assert!(!credentials_match(&settings, "admin", ""));
    }
}
