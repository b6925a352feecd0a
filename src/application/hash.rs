//! Short URL identifiers
//!
//! Names and hex digests are read as big-endian integers and written in
//! base62 (`0-9A-Za-z`), then truncated to a fixed width.

use sha2::{Digest, Sha256};

use crate::domain::DomainError;

const BASE62_CHARSET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Characters kept from a manifest name hash.
pub const MANIFEST_HASH_LEN: usize = 4;

/// Characters kept from a game digest hash.
pub const GAME_HASH_LEN: usize = 8;

/// Encode a big-endian unsigned integer in base62, most significant digit first.
///
/// Zero (including an empty slice) encodes as the empty string.
pub fn base62_encode(bytes: &[u8]) -> String {
    let mut number: Vec<u8> = bytes.iter().copied().skip_while(|&b| b == 0).collect();
    let mut digits = Vec::new();

    // Schoolbook long division by 62 over base-256 digits
    while !number.is_empty() {
        let mut quotient = Vec::with_capacity(number.len());
        let mut remainder: u32 = 0;
        for &byte in &number {
            let acc = (remainder << 8) | u32::from(byte);
            let q = acc / 62;
            remainder = acc % 62;
            if !quotient.is_empty() || q != 0 {
                quotient.push(q as u8);
            }
        }
        digits.push(BASE62_CHARSET[remainder as usize]);
        number = quotient;
    }

    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Identifier for a board list or game list page: base62 of SHA-256(name), 4 chars.
pub fn manifest_url_hash(name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();
    truncate(base62_encode(&digest), MANIFEST_HASH_LEN)
}

/// Identifier for a game page: base62 of the decoded hex digest, 8 chars.
pub fn game_url_hash(hexdigest: &str) -> Result<String, DomainError> {
    let bytes = hex::decode(hexdigest).map_err(|e| DomainError::InvalidDigest {
        digest: hexdigest.to_string(),
        reason: e.to_string(),
    })?;
    Ok(truncate(base62_encode(&bytes), GAME_HASH_LEN))
}

fn truncate(mut encoded: String, len: usize) -> String {
    // base62 output is ASCII, so byte length equals char count
    encoded.truncate(len);
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[], "")]
    #[case(&[0x00], "")]
    #[case(&[0x01], "1")]
    #[case(&[0x3d], "z")]
    #[case(&[0x3e], "10")]
    #[case(&[0xff], "47")]
    #[case(&[0x01, 0x00], "48")]
    #[case(&[0x00, 0x00, 0x3e], "10")]
    fn given_bytes_when_base62_encoding_then_expected(#[case] bytes: &[u8], #[case] expected: &str) {
        assert_eq!(base62_encode(bytes), expected);
    }

    #[test]
    fn given_u64_when_base62_encoding_then_matches_repeated_division() {
        let value: u64 = 0x0123_4567_89ab_cdef;
        let mut expected = Vec::new();
        let mut n = value;
        while n > 0 {
            expected.push(BASE62_CHARSET[(n % 62) as usize]);
            n /= 62;
        }
        expected.reverse();
        assert_eq!(
            base62_encode(&value.to_be_bytes()),
            String::from_utf8(expected).unwrap()
        );
    }

    #[test]
    fn given_name_when_hashing_then_four_alphanumeric_chars_and_deterministic() {
        let hash = manifest_url_hash("Super Famicom");
        assert_eq!(hash.len(), MANIFEST_HASH_LEN);
        assert!(hash.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(hash, manifest_url_hash("Super Famicom"));
        assert_ne!(hash, manifest_url_hash("Famicom"));
        assert_eq!(hash, "mlnz");
    }

    #[test]
    fn given_sha256_digest_when_hashing_game_then_eight_chars() {
        let digest = "c1a0b2b2e8a4fbc4d0f79f7c6c3b9e4e0b2f8d2b5d4f6c3a9e8d7c6b5a4f3e2d";
        let hash = game_url_hash(digest).unwrap();
        assert_eq!(hash.len(), GAME_HASH_LEN);
        assert_eq!(hash, "jujdOYoN");
    }

    #[test]
    fn given_short_digest_when_hashing_game_then_untruncated() {
        assert_eq!(game_url_hash("ff").unwrap(), "47");
        assert_eq!(game_url_hash("").unwrap(), "");
    }

    #[test]
    fn given_non_hex_digest_when_hashing_game_then_invalid_digest() {
        assert!(matches!(
            game_url_hash("xyz"),
            Err(DomainError::InvalidDigest { .. })
        ));
    }
}
