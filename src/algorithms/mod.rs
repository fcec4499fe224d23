mod es256;
mod hmac;

pub use self::es256::*;
pub use self::hmac::*;

use std::{fmt, str::FromStr};

use crate::error::*;

/// Name of the unsigned pseudo-algorithm. Matched exactly, never case-folded.
pub const UNSIGNED_ALG_NAME: &str = "none";

/// The closed set of algorithms a token can declare in its `alg` header.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// HMAC-SHA-256
    HS256,
    /// HMAC-SHA-384
    HS384,
    /// HMAC-SHA-512
    HS512,
    /// ECDSA over P-256 with SHA-256
    ES256,
    /// Unsigned token; the signature segment is empty
    None,
}

/// Algorithms that produce a signature, in registry order.
pub const SIGNING_ALGORITHMS: [Algorithm; 4] = [
    Algorithm::HS256,
    Algorithm::HS384,
    Algorithm::HS512,
    Algorithm::ES256,
];

impl Algorithm {
    pub fn jwt_alg_name(self) -> &'static str {
        match self {
            Algorithm::HS256 => HS256::jwt_alg_name(),
            Algorithm::HS384 => HS384::jwt_alg_name(),
            Algorithm::HS512 => HS512::jwt_alg_name(),
            Algorithm::ES256 => ES256::jwt_alg_name(),
            Algorithm::None => UNSIGNED_ALG_NAME,
        }
    }

    /// Look up an `alg` header value.
    ///
    /// `"none"` resolves to [`Algorithm::None`]; anything else outside the registry
    /// fails with `AlgorithmNotSupported`.
    pub fn resolve(id: &str) -> Result<Algorithm, Error> {
        if id == UNSIGNED_ALG_NAME {
            return Ok(Algorithm::None);
        }
        SIGNING_ALGORITHMS
            .iter()
            .copied()
            .find(|alg| alg.jwt_alg_name() == id)
            .ok_or_else(|| JWTError::AlgorithmNotSupported.into())
    }

    /// Identifiers of every signing algorithm.
    pub fn supported_ids() -> impl Iterator<Item = &'static str> {
        SIGNING_ALGORITHMS.iter().map(|alg| alg.jwt_alg_name())
    }

    pub fn is_signed(self) -> bool {
        self != Algorithm::None
    }

    /// Sign `authenticated` with `key`.
    ///
    /// HMAC algorithms use the key's bytes as the secret; ES256 expects a
    /// hex-encoded private scalar. `none` yields an empty signature.
    pub fn sign(self, authenticated: &[u8], key: &str) -> Result<Vec<u8>, Error> {
        match self {
            Algorithm::HS256 => Ok(HS256::sign(authenticated, key.as_bytes())),
            Algorithm::HS384 => Ok(HS384::sign(authenticated, key.as_bytes())),
            Algorithm::HS512 => Ok(HS512::sign(authenticated, key.as_bytes())),
            Algorithm::ES256 => ES256::sign(authenticated, key),
            Algorithm::None => Ok(Vec::new()),
        }
    }

    /// Check `signature` over `authenticated`.
    ///
    /// ES256 expects a hex-encoded SEC1 public key. Malformed keys or signatures
    /// simply don't verify.
    pub fn verify(self, authenticated: &[u8], key: &str, signature: &[u8]) -> bool {
        match self {
            Algorithm::HS256 => HS256::verify(authenticated, key.as_bytes(), signature),
            Algorithm::HS384 => HS384::verify(authenticated, key.as_bytes(), signature),
            Algorithm::HS512 => HS512::verify(authenticated, key.as_bytes(), signature),
            Algorithm::ES256 => ES256::verify(authenticated, key, signature),
            Algorithm::None => signature.is_empty(),
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        Algorithm::resolve(id)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.jwt_alg_name())
    }
}
