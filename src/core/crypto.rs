use crate::utils::error::{CrystallineError, Result};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

pub const NONCE_LEN: usize = 12;

/// AES-256-GCM ciphertext together with the nonce it was sealed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedPacket {
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
}

impl SealedPacket {
    /// nonce ‖ ciphertext
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(NONCE_LEN + self.ciphertext.len());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < NONCE_LEN {
            return Err(CrystallineError::crypto(
                "Sealed packet too short (missing nonce)",
            ));
        }
        let (nonce_bytes, ciphertext) = data.split_at(NONCE_LEN);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(nonce_bytes);
        Ok(Self {
            nonce,
            ciphertext: ciphertext.to_vec(),
        })
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CrystallineError::crypto(format!("Invalid base64 packet: {e}")))?;
        Self::from_bytes(&bytes)
    }
}

/// Binds arbitrary key material (a recipient proof, a public key) to an AES key.
pub fn derive_key(material: &[u8]) -> [u8; 32] {
    Sha256::digest(material).into()
}

pub fn seal(data: &[u8], key: &[u8; 32]) -> Result<SealedPacket> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CrystallineError::crypto(format!("AES init failed: {e}")))?;

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), data)
        .map_err(|e| CrystallineError::crypto(format!("Encryption failed: {e}")))?;

    Ok(SealedPacket { nonce, ciphertext })
}

pub fn open(packet: &SealedPacket, key: &[u8; 32]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CrystallineError::crypto(format!("AES init failed: {e}")))?;

    cipher
        .decrypt(Nonce::from_slice(&packet.nonce), packet.ciphertext.as_slice())
        .map_err(|e| CrystallineError::crypto(format!("Decryption failed (wrong key?): {e}")))
}
