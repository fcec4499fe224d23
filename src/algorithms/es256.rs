use ct_codecs::{Decoder, Encoder, Hex};
use p256::ecdsa::{self, signature::DigestVerifier as _, signature::RandomizedDigestSigner as _};
use zeroize::Zeroizing;

use crate::error::*;

/// A P-256 public key, parsed from its hex-encoded SEC1 form.
#[derive(Debug, Clone)]
pub struct P256PublicKey(ecdsa::VerifyingKey);

impl AsRef<ecdsa::VerifyingKey> for P256PublicKey {
    fn as_ref(&self) -> &ecdsa::VerifyingKey {
        &self.0
    }
}

impl P256PublicKey {
    /// Accepts compressed and uncompressed points.
    pub fn from_hex(public_key_hex: &str) -> Option<Self> {
        let raw = Hex::decode_to_vec(public_key_hex, None).ok()?;
        ecdsa::VerifyingKey::from_sec1_bytes(&raw)
            .ok()
            .map(P256PublicKey)
    }

    /// Uncompressed SEC1 encoding, as hex.
    pub fn to_hex(&self) -> String {
        Hex::encode_to_string(self.0.to_encoded_point(false).as_bytes()).unwrap_or_default()
    }
}

/// A P-256 signing key, parsed from a hex-encoded private scalar.
pub struct P256KeyPair(ecdsa::SigningKey);

impl AsRef<ecdsa::SigningKey> for P256KeyPair {
    fn as_ref(&self) -> &ecdsa::SigningKey {
        &self.0
    }
}

impl P256KeyPair {
    pub fn from_hex(private_key_hex: &str) -> Result<Self, Error> {
        let raw = Zeroizing::new(
            Hex::decode_to_vec(private_key_hex, None).map_err(|_| JWTError::SigningError)?,
        );
        let p256_sk = ecdsa::SigningKey::from_slice(&raw).map_err(|_| JWTError::SigningError)?;
        Ok(P256KeyPair(p256_sk))
    }

    pub fn public_key(&self) -> P256PublicKey {
        P256PublicKey(self.0.verifying_key().clone())
    }
}

/// ECDSA over P-256, with the message hashed with SHA-256.
///
/// Signatures are DER-encoded.
#[derive(Debug, Clone, Copy)]
pub struct ES256;

impl ES256 {
    pub fn jwt_alg_name() -> &'static str {
        "ES256"
    }

    /// Sign `authenticated` with a hex-encoded private key.
    pub fn sign(authenticated: &[u8], private_key_hex: &str) -> Result<Vec<u8>, Error> {
        let key_pair = P256KeyPair::from_hex(private_key_hex)?;
        let mut digest = hmac_sha256::Hash::new();
        digest.update(authenticated);
        let mut rng = rand::thread_rng();
        let signature: ecdsa::Signature = key_pair
            .as_ref()
            .try_sign_digest_with_rng(&mut rng, digest)
            .map_err(|_| JWTError::SigningError)?;
        Ok(signature.to_der().as_bytes().to_vec())
    }

    /// Verify a DER signature with a hex-encoded public key.
    pub fn verify(authenticated: &[u8], public_key_hex: &str, signature: &[u8]) -> bool {
        let public_key = match P256PublicKey::from_hex(public_key_hex) {
            Some(public_key) => public_key,
            None => return false,
        };
        let ecdsa_signature = match ecdsa::Signature::from_der(signature) {
            Ok(ecdsa_signature) => ecdsa_signature,
            Err(_) => return false,
        };
        let mut digest = hmac_sha256::Hash::new();
        digest.update(authenticated);
        public_key
            .as_ref()
            .verify_digest(digest, &ecdsa_signature)
            .is_ok()
    }
}
