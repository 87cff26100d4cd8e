use std::{fmt, path::Path, sync::Arc};

use rsa::{
    pkcs1::DecodeRsaPrivateKey,
    pkcs1v15::{SigningKey, VerifyingKey},
    pkcs8::DecodePrivateKey,
    signature::{Keypair, SignatureEncoding, Signer},
    traits::PublicKeyParts,
    RsaPrivateKey,
};
use sha2::Sha256;

use super::error::Error;

/// Smallest modulus, in bytes, that can hold a PKCS#1 v1.5 encoded SHA-256 digest.
const MIN_MODULUS_BYTES: usize = 62;

/// Something that can produce a signature over canonical request bytes.
pub trait RequestSigner {
    /// The algorithm that will be used to sign.
    fn alg(&self) -> &str;
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, Error>;
}

/// An RSA private key used to sign requests with RSASSA-PKCS1-v1_5 over SHA-256.
///
/// The key is validated when loaded and is read-only afterwards, so a single instance can sign
/// from many threads at once.
#[derive(Clone)]
pub struct KeyMaterial {
    key: SigningKey<Sha256>,
}

impl KeyMaterial {
    pub fn new(key: RsaPrivateKey) -> Result<Self, Error> {
        key.validate()
            .map_err(|e| Error::InvalidCredential(format!("RSA key failed validation: {e}")))?;
        if key.size() < MIN_MODULUS_BYTES {
            return Err(Error::InvalidCredential(format!(
                "RSA modulus of {} bits is too small for SHA-256 signatures",
                key.size() * 8
            )));
        }
        Ok(Self {
            key: SigningKey::new(key),
        })
    }

    /// Parse a PEM encoded private key, either PKCS#8 (`BEGIN PRIVATE KEY`) or PKCS#1
    /// (`BEGIN RSA PRIVATE KEY`).
    pub fn from_pem(pem: &str) -> Result<Self, Error> {
        let pem = pem.trim();
        if pem.is_empty() {
            return Err(Error::InvalidCredential("PEM key is empty".into()));
        }
        let key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|pkcs8| {
                RsaPrivateKey::from_pkcs1_pem(pem).map_err(|pkcs1| {
                    Error::InvalidCredential(format!(
                        "unable to parse PEM key (pkcs8: {pkcs8}, pkcs1: {pkcs1})"
                    ))
                })
            })?;
        Self::new(key)
    }

    pub fn verifying_key(&self) -> VerifyingKey<Sha256> {
        self.key.verifying_key()
    }
}

impl RequestSigner for KeyMaterial {
    fn alg(&self) -> &str {
        "RS256"
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, Error> {
        let modulus = self.key.as_ref().size();
        if modulus < MIN_MODULUS_BYTES {
            return Err(Error::Signing(format!(
                "RSA modulus of {} bits is too small for SHA-256 signatures",
                modulus * 8
            )));
        }
        self.key
            .try_sign(payload)
            .map(|signature| signature.to_vec())
            .map_err(|e| Error::Signing(e.to_string()))
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("alg", &self.alg())
            .field("bits", &(self.key.as_ref().size() * 8))
            .finish_non_exhaustive()
    }
}

/// The SDK identifier assigned to an application together with its signing key.
#[derive(Debug, Clone)]
pub struct Credential {
    sdk_id: String,
    key: Arc<KeyMaterial>,
}

impl Credential {
    pub fn new(sdk_id: impl Into<String>, key: KeyMaterial) -> Result<Self, Error> {
        let sdk_id = sdk_id.into();
        if sdk_id.trim().is_empty() {
            return Err(Error::empty("SDK ID"));
        }
        Ok(Self {
            sdk_id,
            key: Arc::new(key),
        })
    }

    /// Build a credential from a PEM encoded private key.
    pub fn from_pem(sdk_id: impl Into<String>, pem: &str) -> Result<Self, Error> {
        Self::new(sdk_id, KeyMaterial::from_pem(pem)?)
    }

    /// Build a credential from a PEM file on disk.
    pub fn from_pem_file(sdk_id: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let pem = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidCredential(format!("unable to read {}: {e}", path.display()))
        })?;
        Self::from_pem(sdk_id, &pem)
    }

    pub fn sdk_id(&self) -> &str {
        &self.sdk_id
    }

    pub fn key(&self) -> &KeyMaterial {
        &self.key
    }
}

impl RequestSigner for Credential {
    fn alg(&self) -> &str {
        self.key.alg()
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, Error> {
        self.key.sign(payload)
    }
}
