use coarsetime::{Duration, UnixTimeStamp};
use serde_json::{Map, Value};

use crate::algorithms::Algorithm;

/// Header parameters used when building a token
#[derive(Clone, Debug)]
pub struct EncodingOptions {
    /// Algorithm used to sign the token ("alg")
    pub algorithm: Algorithm,

    /// Key identifier to advertise ("kid")
    pub key_id: Option<String>,

    /// Content type ("cty")
    pub content_type: Option<String>,

    /// Additional header parameters.
    ///
    /// Entries named `alg`, `typ`, `kid` or `cty` are ignored; use the dedicated fields.
    pub extra_header: Map<String, Value>,
}

impl Default for EncodingOptions {
    fn default() -> Self {
        EncodingOptions {
            algorithm: Algorithm::HS256,
            key_id: None,
            content_type: None,
            extra_header: Map::new(),
        }
    }
}

impl EncodingOptions {
    pub fn new(algorithm: Algorithm) -> Self {
        EncodingOptions {
            algorithm,
            ..Default::default()
        }
    }

    pub fn with_key_id(mut self, key_id: impl ToString) -> Self {
        self.key_id = Some(key_id.to_string());
        self
    }

    pub fn with_content_type(mut self, content_type: impl ToString) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    pub fn with_header(mut self, name: impl ToString, value: impl Into<Value>) -> Self {
        self.extra_header.insert(name.to_string(), value.into());
        self
    }
}

/// Additional checks to perform while decoding
#[derive(Clone, Debug, Default)]
pub struct DecodingOptions {
    /// Require the header to declare exactly this algorithm
    ///
    /// Setting it to a signed algorithm also forbids unsigned (`none`) tokens.
    pub algorithm: Option<Algorithm>,

    /// Slack applied to `exp`, `nbf` and `max_age` comparisons (default: none)
    pub clock_tolerance: Option<Duration>,

    /// Skip the `exp` check
    pub ignore_expiration: bool,

    /// Skip the `nbf` check
    pub ignore_not_before: bool,

    /// Reject tokens issued (`iat`) more than `max_age` ago
    ///
    /// Tokens without an `iat` claim are rejected when this is set.
    pub max_age: Option<Duration>,

    /// Validate time-based claims against this time instead of the system clock
    pub artificial_time: Option<UnixTimeStamp>,

    /// Maximum length of the encoded header segment
    pub max_header_length: Option<usize>,

    /// Maximum length of the whole token
    pub max_token_length: Option<usize>,
}
