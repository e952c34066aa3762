/// Shared-secret comparison
///
/// Both sides are reduced to SHA-256 digests first, so the comparison always
/// runs over 32 bytes and its timing reveals neither the matching prefix nor
/// the length of the expected secret.

use sha2::{Digest, Sha256};

/// Constant-time equality of two secrets
///
/// ```
/// use taskboard_shared::auth::secret::secrets_match;
///
/// assert!(secrets_match("callback-secret", "callback-secret"));
/// assert!(!secrets_match("callback-secret", "callback-secreT"));
/// ```
pub fn secrets_match(presented: &str, expected: &str) -> bool {
    let presented = Sha256::digest(presented.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());

    presented
        .iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
