#![forbid(unsafe_code)]

//! Encode and verify compact JSON Web Tokens.
//!
//! ```
//! use jwt_pipeline::prelude::*;
//! use serde_json::json;
//!
//! let options = EncodingOptions::new(Algorithm::HS256);
//! let token = encode(&json!({"sub": "alice"}), "secret", &options).unwrap();
//!
//! let options = DecodingOptions {
//!     algorithm: Some(Algorithm::HS256),
//!     ..Default::default()
//! };
//! let body: serde_json::Value = decode(&token, Some("secret"), Some(options)).unwrap();
//! assert_eq!(body["sub"], "alice");
//! ```

pub mod algorithms;
pub mod claims;
pub mod codec;
pub mod common;
pub mod error;
pub mod token;

mod jwt_header;
mod serde_additions;

pub use coarsetime;
pub use serde;

use serde::{de::DeserializeOwned, Serialize};

use crate::common::{DecodingOptions, EncodingOptions};
use crate::error::Error;
use crate::token::Token;

/// Serialize `body` and sign it with `key`, using `options.algorithm`.
///
/// HMAC keys are used as raw bytes; ES256 keys are hex-encoded P-256 private scalars.
/// The key is ignored for unsigned (`none`) tokens.
pub fn encode<Body: Serialize + ?Sized>(
    body: &Body,
    key: &str,
    options: &EncodingOptions,
) -> Result<String, Error> {
    Token::build(body, key, options)
}

/// Decode `token`, verify its signature and validate its time claims.
///
/// `key` is the HMAC secret, or a hex-encoded SEC1 public key for ES256.
/// Passing `None` skips signature verification; time claims are still checked.
pub fn decode<Body: DeserializeOwned>(
    token: &str,
    key: Option<&str>,
    options: Option<DecodingOptions>,
) -> Result<Body, Error> {
    Token::verify(token, key, options)
}

pub mod prelude {
    pub use crate::algorithms::*;
    pub use crate::claims::*;
    pub use crate::common::*;
    pub use crate::error::{Error, JWTError};
    pub use crate::token::*;
    pub use crate::{decode, encode};
    pub use coarsetime::{self, Clock, Duration, UnixTimeStamp};
    pub use serde::{Deserialize, Serialize};
}
