use std::fmt;

use anyhow::{ensure, Context, Result};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// SHA-256 digest of the one credential allowed to restart or stop the service.
///
/// Only the digest is ever held in memory; the credential itself is never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretDigest([u8; 32]);

impl SecretDigest {
    /// Parse a hex-encoded digest (64 hex characters, case-insensitive).
    pub fn from_hex(value: &str) -> Result<Self> {
        let bytes = hex::decode(value.trim()).context("digest is not valid hex")?;
        ensure!(
            bytes.len() == 32,
            "digest must be 32 bytes (64 hex chars), got {} bytes",
            bytes.len()
        );
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&bytes);
        Ok(Self(digest))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for SecretDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretDigest(<redacted>)")
    }
}

/// Hash a credential the way the gate does: SHA-256 over its UTF-8 bytes.
pub fn digest_credential(credential: &str) -> SecretDigest {
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&Sha256::digest(credential.as_bytes()));
    SecretDigest(digest)
}

/// Shared-secret check guarding the restart and shutdown routes.
#[derive(Debug, Clone)]
pub struct AdminGate {
    secret: SecretDigest,
}

impl AdminGate {
    pub fn new(secret: SecretDigest) -> Self {
        Self { secret }
    }

    /// Returns true only when the credential hashes to the configured digest.
    ///
    /// A mismatch is a normal negative answer, not an error. The comparison
    /// always visits all 32 bytes.
    pub fn verify(&self, credential: &str) -> bool {
        let candidate = digest_credential(credential);
        bool::from(candidate.0[..].ct_eq(&self.secret.0[..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // sha256("hunter2")
    const HUNTER2: &str = "f52fbd32b2b3b86ff88ef6c490628285f482af15ddcb29541f94bcf526a3f6c7";

    fn gate() -> AdminGate {
        AdminGate::new(SecretDigest::from_hex(HUNTER2).unwrap())
    }

    #[test]
    fn test_accepts_authorized_credential() {
        assert!(gate().verify("hunter2"));
    }

    #[test]
    fn test_rejects_empty_credential() {
        assert!(!gate().verify(""));
    }

    #[test]
    fn test_rejects_single_character_change() {
        assert!(!gate().verify("hunter3"));
        assert!(!gate().verify("Hunter2"));
        assert!(!gate().verify("hunter2 "));
        assert!(!gate().verify("hunter"));
    }

    #[test]
    fn test_rejects_digest_differing_only_in_last_byte() {
        let mut near = digest_credential("hunter2");
        near.0[31] ^= 0x01;
        let gate = AdminGate::new(near);
        assert!(!gate.verify("hunter2"));
    }

    #[test]
    fn test_digest_matches_known_vector() {
        assert_eq!(digest_credential("hunter2").to_hex(), HUNTER2);
        assert_eq!(
            digest_credential("").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hex_parsing_is_case_insensitive() {
        let upper = SecretDigest::from_hex(&HUNTER2.to_uppercase()).unwrap();
        assert_eq!(upper, digest_credential("hunter2"));
    }

    #[test]
    fn test_rejects_malformed_digest() {
        assert!(SecretDigest::from_hex("not_hex_zzzz").is_err());
        assert!(SecretDigest::from_hex("deadbeef").is_err());
        assert!(SecretDigest::from_hex(&format!("{HUNTER2}00")).is_err());
    }

    #[test]
    fn test_debug_does_not_leak_digest() {
        let rendered = format!("{:?}", gate());
        assert!(!rendered.contains(HUNTER2));
        assert!(rendered.contains("redacted"));
    }
}
