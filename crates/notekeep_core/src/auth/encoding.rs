//! Reversible password encoding for local accounts.
//!
//! This is obfuscation, not protection: anyone with access to the storage
//! area can decode the stored value.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Encodes `password` as standard base64 of its UTF-8 bytes.
pub fn encode_password(password: &str) -> String {
    BASE64.encode(password.as_bytes())
}

/// Returns whether `input` encodes to `stored`.
pub fn verify_password(input: &str, stored: &str) -> bool {
    encode_password(input) == stored
}

#[cfg(test)]
mod tests {
    use super::{encode_password, verify_password};

    #[test]
    fn encoding_is_standard_base64() {
        assert_eq!(encode_password("secret"), "c2VjcmV0");
        assert_eq!(encode_password("ab"), "YWI=");
    }

    #[test]
    fn verify_matches_only_same_input() {
        let stored = encode_password("pässword");
        assert!(verify_password("pässword", &stored));
        assert!(!verify_password("password", &stored));
    }
}
