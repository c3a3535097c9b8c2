use crate::core::crypto::{derive_key, seal};
use crate::utils::error::{CrystallineError, Result};
use ed25519_dalek::{Signer, Verifier};
use k256::ecdsa as secp;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Signature scheme backing an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ProtocolMode {
    /// ECDSA over secp256k1, compressed SEC1 public keys.
    Secp256k1,
    Ed25519,
}

impl ProtocolMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Secp256k1 => "secp256k1",
            Self::Ed25519 => "ed25519",
        }
    }
}

impl fmt::Display for ProtocolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProtocolMode {
    type Err = CrystallineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "secp256k1" => Ok(Self::Secp256k1),
            "ed25519" => Ok(Self::Ed25519),
            other => Err(CrystallineError::validation(
                "identity.mode",
                format!("Unknown protocol mode '{}'", other),
            )),
        }
    }
}

/// Security operations every Crystalline participant supports.
pub trait CrystallineSecure {
    fn sign_data(&self, data: &[u8]) -> Vec<u8>;
    fn verify_data(&self, data: &[u8], signature: &[u8]) -> bool;
    fn encrypt_for_ecosystem(&self, data: &[u8], recipient_key: &[u8]) -> Result<Vec<u8>>;
}

enum IdentityKey {
    Secp256k1(secp::SigningKey),
    Ed25519(ed25519_dalek::SigningKey),
}

pub struct CrystallineIdentity {
    key: IdentityKey,
}

impl CrystallineIdentity {
    pub fn generate(mode: ProtocolMode) -> Self {
        let key = match mode {
            ProtocolMode::Secp256k1 => IdentityKey::Secp256k1(secp::SigningKey::random(&mut OsRng)),
            ProtocolMode::Ed25519 => {
                IdentityKey::Ed25519(ed25519_dalek::SigningKey::generate(&mut OsRng))
            }
        };
        Self { key }
    }

    /// Restores an identity from a 32-byte hex secret.
    pub fn from_secret_hex(mode: ProtocolMode, secret_hex: &str) -> Result<Self> {
        let bytes = hex::decode(secret_hex.trim())
            .map_err(|e| CrystallineError::validation("identity.secret", e.to_string()))?;
        let secret: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            CrystallineError::validation("identity.secret", "Secret key must be 32 bytes")
        })?;

        let key = match mode {
            ProtocolMode::Secp256k1 => {
                let key = secp::SigningKey::from_slice(&secret).map_err(|_| {
                    CrystallineError::validation(
                        "identity.secret",
                        "Secret is not a valid secp256k1 scalar",
                    )
                })?;
                IdentityKey::Secp256k1(key)
            }
            ProtocolMode::Ed25519 => {
                IdentityKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(&secret))
            }
        };
        Ok(Self { key })
    }

    pub fn mode(&self) -> ProtocolMode {
        match self.key {
            IdentityKey::Secp256k1(_) => ProtocolMode::Secp256k1,
            IdentityKey::Ed25519(_) => ProtocolMode::Ed25519,
        }
    }

    pub fn private_key_hex(&self) -> String {
        match &self.key {
            IdentityKey::Secp256k1(key) => hex::encode(key.to_bytes()),
            IdentityKey::Ed25519(key) => hex::encode(key.to_bytes()),
        }
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        match &self.key {
            IdentityKey::Secp256k1(key) => {
                key.verifying_key().to_encoded_point(true).as_bytes().to_vec()
            }
            IdentityKey::Ed25519(key) => key.verifying_key().to_bytes().to_vec(),
        }
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key_bytes())
    }

    /// First 8 bytes of SHA-256 over the public key.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.public_key_bytes());
        hex::encode(&digest[..8])
    }

    pub fn verify_with_public_key(
        mode: ProtocolMode,
        public_key_hex: &str,
        data: &[u8],
        signature: &[u8],
    ) -> bool {
        let Ok(bytes) = hex::decode(public_key_hex) else {
            return false;
        };
        match mode {
            ProtocolMode::Secp256k1 => secp::VerifyingKey::from_sec1_bytes(&bytes)
                .map(|key| verify_secp256k1(&key, data, signature))
                .unwrap_or(false),
            ProtocolMode::Ed25519 => {
                let Ok(key_bytes) = <[u8; 32]>::try_from(bytes.as_slice()) else {
                    return false;
                };
                ed25519_dalek::VerifyingKey::from_bytes(&key_bytes)
                    .map(|key| verify_ed25519(&key, data, signature))
                    .unwrap_or(false)
            }
        }
    }
}

fn verify_secp256k1(key: &secp::VerifyingKey, data: &[u8], signature: &[u8]) -> bool {
    let Ok(signature) = secp::Signature::from_slice(signature) else {
        return false;
    };
    secp::signature::Verifier::verify(key, data, &signature).is_ok()
}

fn verify_ed25519(key: &ed25519_dalek::VerifyingKey, data: &[u8], signature: &[u8]) -> bool {
    let Ok(signature) = ed25519_dalek::Signature::from_slice(signature) else {
        return false;
    };
    key.verify(data, &signature).is_ok()
}

impl CrystallineSecure for CrystallineIdentity {
    fn sign_data(&self, data: &[u8]) -> Vec<u8> {
        match &self.key {
            IdentityKey::Secp256k1(key) => {
                let signature: secp::Signature = secp::signature::Signer::sign(key, data);
                signature.to_bytes().to_vec()
            }
            IdentityKey::Ed25519(key) => key.sign(data).to_bytes().to_vec(),
        }
    }

    fn verify_data(&self, data: &[u8], signature: &[u8]) -> bool {
        match &self.key {
            IdentityKey::Secp256k1(key) => verify_secp256k1(key.verifying_key(), data, signature),
            IdentityKey::Ed25519(key) => verify_ed25519(&key.verifying_key(), data, signature),
        }
    }

    fn encrypt_for_ecosystem(&self, data: &[u8], recipient_key: &[u8]) -> Result<Vec<u8>> {
        if recipient_key.is_empty() {
            return Err(CrystallineError::validation(
                "recipient_key",
                "Recipient key cannot be empty",
            ));
        }
        let packet = seal(data, &derive_key(recipient_key))?;
        Ok(packet.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::crypto::{open, SealedPacket};

    #[test]
    fn test_sign_and_verify() {
        let identity = CrystallineIdentity::generate(ProtocolMode::Ed25519);
        let signature = identity.sign_data(b"state root");
        assert_eq!(signature.len(), 64);
        assert!(identity.verify_data(b"state root", &signature));
        assert!(!identity.verify_data(b"other root", &signature));
        assert!(!identity.verify_data(b"state root", b"short"));
        assert!(CrystallineIdentity::verify_with_public_key(
            ProtocolMode::Ed25519,
            &identity.public_key_hex(),
            b"state root",
            &signature
        ));
    }

    #[test]
    fn test_secp256k1_sign_and_verify() {
        let identity = CrystallineIdentity::generate(ProtocolMode::Secp256k1);
        assert_eq!(identity.mode(), ProtocolMode::Secp256k1);
        // compressed SEC1 point
        assert_eq!(identity.public_key_hex().len(), 66);

        let signature = identity.sign_data(b"state root");
        assert_eq!(signature.len(), 64);
        assert!(identity.verify_data(b"state root", &signature));
        assert!(!identity.verify_data(b"other root", &signature));
        assert!(CrystallineIdentity::verify_with_public_key(
            ProtocolMode::Secp256k1,
            &identity.public_key_hex(),
            b"state root",
            &signature
        ));
        assert!(!CrystallineIdentity::verify_with_public_key(
            ProtocolMode::Ed25519,
            &identity.public_key_hex(),
            b"state root",
            &signature
        ));
    }

    #[test]
    fn test_secret_hex_roundtrip_keeps_public_key() {
        for mode in [ProtocolMode::Ed25519, ProtocolMode::Secp256k1] {
            let identity = CrystallineIdentity::generate(mode);
            let restored =
                CrystallineIdentity::from_secret_hex(mode, &identity.private_key_hex()).unwrap();
            assert_eq!(restored.mode(), mode);
            assert_eq!(restored.public_key_hex(), identity.public_key_hex());
            assert_eq!(restored.fingerprint(), identity.fingerprint());
            assert_eq!(identity.fingerprint().len(), 16);
        }
        assert!(CrystallineIdentity::from_secret_hex(ProtocolMode::Ed25519, "abcd").is_err());
        assert!(CrystallineIdentity::from_secret_hex(ProtocolMode::Ed25519, "zz").is_err());
        let zero = "00".repeat(32);
        assert!(CrystallineIdentity::from_secret_hex(ProtocolMode::Secp256k1, &zero).is_err());
    }

    #[test]
    fn test_protocol_mode_parsing() {
        assert_eq!("SECP256K1".parse::<ProtocolMode>().unwrap(), ProtocolMode::Secp256k1);
        assert_eq!(ProtocolMode::Ed25519.to_string(), "ed25519");
        assert!("rsa".parse::<ProtocolMode>().is_err());
    }

    #[test]
    fn test_encrypt_for_ecosystem_opens_with_recipient_key() {
        let identity = CrystallineIdentity::generate(ProtocolMode::Secp256k1);
        let sealed = identity
            .encrypt_for_ecosystem(b"for bob", b"bob-public-key")
            .unwrap();
        let packet = SealedPacket::from_bytes(&sealed).unwrap();
        assert_eq!(open(&packet, &derive_key(b"bob-public-key")).unwrap(), b"for bob");
        assert!(identity.encrypt_for_ecosystem(b"x", b"").is_err());
    }
}
