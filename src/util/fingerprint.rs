//! Device fingerprint derivation.
//!
//! The commerce API keys anonymous sign-in on a stable device fingerprint.
//! We derive it from an identity file the user already has (an SSH public
//! key by default) so the same machine maps to the same storefront account.

use std::fmt::Write;
use std::path::Path;

use anyhow::Context;
use sha2::{Digest, Sha256};

/// Hash the identity file into a hex fingerprint.
pub fn device_fingerprint(identity: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(identity)
        .with_context(|| format!("reading identity file {}", identity.display()))?;

    let digest = Sha256::digest(&bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        // infallible for String
        let _ = write!(out, "{byte:02x}");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_fingerprint_is_stable_hex() {
        let dir = std::env::temp_dir().join("kiosk-fingerprint-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("id.pub");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"ssh-ed25519 AAAA test@host").unwrap();

        let a = device_fingerprint(&path).unwrap();
        let b = device_fingerprint(&path).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_missing_identity_is_an_error() {
        let missing = Path::new("/definitely/not/here/id.pub");
        assert!(device_fingerprint(missing).is_err());
    }
}
