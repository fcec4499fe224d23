use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::algorithms::Algorithm;
use crate::claims::*;
use crate::codec::*;
use crate::common::*;
use crate::error::*;
use crate::jwt_header::*;

pub const MAX_HEADER_LENGTH: usize = 8192;

/// Last stage a decode call reached before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    Start,
    HeaderParsed,
    BodyParsed,
    AlgorithmResolved,
    SignatureVerified,
    ClaimsValidated,
    Done,
}

/// Build, decode and inspect compact tokens
pub struct Token;

/// JWT token information useful before signature/tag verification
#[derive(Debug, Clone, Default)]
pub struct TokenMetadata {
    pub(crate) jwt_header: JWTHeader,
}

impl TokenMetadata {
    /// The JWT algorithm for this token ("alg")
    /// This information should not be trusted: it is unprotected and can be
    /// freely modified by a third party.
    pub fn algorithm(&self) -> Option<&str> {
        self.jwt_header.algorithm.as_deref()
    }

    /// The signature type for this token ("typ")
    pub fn signature_type(&self) -> Option<&str> {
        self.jwt_header.signature_type.as_deref()
    }

    /// The key, or public key identifier for this token ("kid")
    pub fn key_id(&self) -> Option<&str> {
        self.jwt_header.key_id.as_deref()
    }

    /// The content type for this token ("cty")
    pub fn content_type(&self) -> Option<&str> {
        self.jwt_header.content_type.as_deref()
    }

    /// Any other header parameter
    pub fn extension(&self, name: &str) -> Option<&Value> {
        self.jwt_header.extensions.get(name)
    }
}

/// The three segments of a compact token.
struct Segments<'t> {
    header_b64: &'t str,
    body_b64: &'t str,
    signature_b64: &'t str,
    /// `header_b64.body_b64`, as it appears in the token
    authenticated: &'t str,
}

impl<'t> Segments<'t> {
    fn split(token: &'t str) -> Result<Self, Error> {
        let mut parts = token.split('.');
        let header_b64 = parts.next().ok_or(JWTError::InvalidStructure)?;
        let body_b64 = parts.next().ok_or(JWTError::InvalidStructure)?;
        let signature_b64 = parts.next().unwrap_or("");
        ensure!(parts.next().is_none(), JWTError::InvalidStructure);
        ensure!(
            !header_b64.is_empty() && !body_b64.is_empty(),
            JWTError::InvalidStructure
        );
        let authenticated = &token[..header_b64.len() + 1 + body_b64.len()];
        Ok(Segments {
            header_b64,
            body_b64,
            signature_b64,
            authenticated,
        })
    }
}

impl Token {
    /// Serialize `body`, sign it and return the compact token.
    ///
    /// The body must serialize to a JSON object. It is written as-is: no claim is
    /// added or modified.
    pub fn build<Body: Serialize + ?Sized>(
        body: &Body,
        key: &str,
        options: &EncodingOptions,
    ) -> Result<String, Error> {
        let body = serde_json::to_value(body).map_err(|_| JWTError::InvalidBody)?;
        ensure!(body.is_object(), JWTError::InvalidBody);
        let jwt_header = JWTHeader::new(options);
        let authenticated = format!(
            "{}.{}",
            encode_json_segment(&jwt_header).map_err(|_| JWTError::InvalidHeader)?,
            encode_json_segment(&body).map_err(|_| JWTError::InvalidBody)?
        );
        let signature = options.algorithm.sign(authenticated.as_bytes(), key)?;
        let mut token = authenticated;
        token.push('.');
        token.push_str(&encode_segment(signature));
        trace!(alg = %options.algorithm, "token built");
        Ok(token)
    }

    /// Decode a token, check its signature with `key` and validate its time claims.
    ///
    /// With `key = None` the signature is not checked, and unsigned (`none`) tokens
    /// are accepted. With a key, `none` is always rejected.
    pub fn verify<Body: DeserializeOwned>(
        token: &str,
        key: Option<&str>,
        options: Option<DecodingOptions>,
    ) -> Result<Body, Error> {
        let options = options.unwrap_or_default();
        let mut stage = Stage::Start;
        let res = Self::run_verification(token, key, &options, &mut stage);
        match &res {
            Ok(_) => trace!(?stage, "token accepted"),
            Err(err) => debug!(?stage, error = %err, "token rejected"),
        }
        res
    }

    fn run_verification<Body: DeserializeOwned>(
        token: &str,
        key: Option<&str>,
        options: &DecodingOptions,
        stage: &mut Stage,
    ) -> Result<Body, Error> {
        if let Some(max_token_length) = options.max_token_length {
            ensure!(token.len() <= max_token_length, JWTError::InvalidStructure);
        }
        let segments = Segments::split(token)?;

        ensure!(
            segments.header_b64.len() <= options.max_header_length.unwrap_or(MAX_HEADER_LENGTH),
            JWTError::InvalidHeader
        );
        let jwt_header: JWTHeader =
            decode_json_segment(segments.header_b64).map_err(|_| JWTError::InvalidHeader)?;
        ensure!(jwt_header.has_jwt_type(), JWTError::InvalidHeader);
        *stage = Stage::HeaderParsed;

        let body: Value =
            decode_json_segment(segments.body_b64).map_err(|_| JWTError::InvalidBody)?;
        ensure!(body.is_object(), JWTError::InvalidBody);
        let time_claims = TimeClaims::deserialize(&body).map_err(|_| JWTError::InvalidBody)?;
        *stage = Stage::BodyParsed;

        let alg_name = jwt_header
            .algorithm
            .as_deref()
            .ok_or(JWTError::AlgorithmMissing)?;
        let algorithm = Algorithm::resolve(alg_name)?;
        if let Some(expected) = options.algorithm {
            ensure!(algorithm == expected, JWTError::AlgorithmNotSupported);
        }
        *stage = Stage::AlgorithmResolved;

        match (algorithm.is_signed(), key) {
            (false, Some(_)) => bail!(JWTError::AlgorithmNotSupported),
            (false, None) => {
                ensure!(
                    segments.signature_b64.is_empty(),
                    JWTError::SignatureInvalid
                );
            }
            (true, Some(key)) => {
                let signature = decode_segment(segments.signature_b64)
                    .map_err(|_| JWTError::SignatureInvalid)?;
                ensure!(
                    algorithm.verify(segments.authenticated.as_bytes(), key, &signature),
                    JWTError::SignatureInvalid
                );
            }
            (true, None) => warn!(alg = %algorithm, "signature not verified: no key supplied"),
        }
        *stage = Stage::SignatureVerified;

        time_claims.validate(options)?;
        *stage = Stage::ClaimsValidated;

        let body = serde_json::from_value(body).map_err(|_| JWTError::InvalidBody)?;
        *stage = Stage::Done;
        Ok(body)
    }

    /// Decode token information that can be useful prior to signature
    /// verification
    pub fn decode_metadata(token: &str) -> Result<TokenMetadata, Error> {
        let segments = Segments::split(token)?;
        ensure!(
            segments.header_b64.len() <= MAX_HEADER_LENGTH,
            JWTError::InvalidHeader
        );
        let jwt_header: JWTHeader =
            decode_json_segment(segments.header_b64).map_err(|_| JWTError::InvalidHeader)?;
        Ok(TokenMetadata { jwt_header })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const KEY: &str = "your-256-bit-secret";

    fn kind<T: std::fmt::Debug>(res: Result<T, Error>) -> JWTError {
        JWTError::of(&res.unwrap_err()).unwrap()
    }

    fn with_header(header: Value, body: Value, signature: &str) -> String {
        format!(
            "{}.{}.{}",
            encode_json_segment(&header).unwrap(),
            encode_json_segment(&body).unwrap(),
            signature
        )
    }

    #[test]
    fn known_hs256_token() {
        // jwt.io's default example
        let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
                     eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IkpvaG4gRG9lIiwiaWF0IjoxNTE2MjM5MDIyfQ.\
                     SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";
        let body: Value = Token::verify(token, Some(KEY), None).unwrap();
        assert_eq!(body["name"], "John Doe");
        assert_eq!(body["iat"], 1516239022);

        let res = Token::verify::<Value>(token, Some("another-secret"), None);
        assert_eq!(kind(res), JWTError::SignatureInvalid);
    }

    #[test]
    fn header_shape() {
        let options = EncodingOptions::new(Algorithm::HS384)
            .with_key_id("key-1")
            .with_header("x5u", "https://example.com")
            .with_header("alg", "none");
        let token = Token::build(&json!({"a": 1}), KEY, &options).unwrap();
        let metadata = Token::decode_metadata(&token).unwrap();
        assert_eq!(metadata.algorithm(), Some("HS384"));
        assert_eq!(metadata.signature_type(), Some("JWT"));
        assert_eq!(metadata.key_id(), Some("key-1"));
        assert_eq!(metadata.content_type(), None);
        assert_eq!(metadata.extension("x5u"), Some(&json!("https://example.com")));
        assert_eq!(metadata.extension("alg"), None);
    }

    #[test]
    fn body_is_not_modified() {
        let body = json!({"sub": "alice", "nested": {"list": [1, 2, 3]}});
        let token = Token::build(&body, KEY, &Default::default()).unwrap();
        let body_b64 = token.split('.').nth(1).unwrap();
        let decoded: Value = decode_json_segment(body_b64).unwrap();
        assert_eq!(decoded, body);
    }

    #[test]
    fn body_must_be_an_object() {
        for body in [json!([1, 2]), json!("claims"), json!(null)] {
            let res = Token::build(&body, KEY, &Default::default());
            assert_eq!(kind(res), JWTError::InvalidBody);

            let token = with_header(json!({"alg": "none"}), body, "");
            assert_eq!(
                kind(Token::verify::<Value>(&token, None, None)),
                JWTError::InvalidBody
            );
        }
    }

    #[test]
    fn structure() {
        for token in ["abc", "", ".", "abc.", ".abc", "a.b.c.d", "..", "a..c"] {
            assert_eq!(
                kind(Token::verify::<Value>(token, Some(KEY), None)),
                JWTError::InvalidStructure,
                "{:?}",
                token
            );
        }
    }

    #[test]
    fn two_segment_unsigned_token() {
        let token = with_header(json!({"alg": "none"}), json!({"a": 1}), "");
        let token = token.trim_end_matches('.');
        let body: Value = Token::verify(token, None, None).unwrap();
        assert_eq!(body["a"], 1);
    }

    #[test]
    fn malformed_header_and_body() {
        let token = Token::build(&json!({"a": 1}), KEY, &Default::default()).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let bad_header = format!("{}.{}.{}", "e30+", parts[1], parts[2]);
        assert_eq!(
            kind(Token::verify::<Value>(&bad_header, Some(KEY), None)),
            JWTError::InvalidHeader
        );

        let not_json = encode_segment(b"{\"alg\"");
        let bad_header = format!("{}.{}.{}", not_json, parts[1], parts[2]);
        assert_eq!(
            kind(Token::verify::<Value>(&bad_header, Some(KEY), None)),
            JWTError::InvalidHeader
        );

        let bad_body = format!("{}.{}.{}", parts[0], "%%%", parts[2]);
        assert_eq!(
            kind(Token::verify::<Value>(&bad_body, Some(KEY), None)),
            JWTError::InvalidBody
        );
    }

    #[test]
    fn header_checks() {
        let token = with_header(json!({"typ": "JWT"}), json!({}), "");
        assert_eq!(
            kind(Token::verify::<Value>(&token, Some(KEY), None)),
            JWTError::AlgorithmMissing
        );

        let token = with_header(json!({"alg": 256}), json!({}), "");
        assert_eq!(
            kind(Token::verify::<Value>(&token, Some(KEY), None)),
            JWTError::InvalidHeader
        );

        let token = with_header(json!({"alg": "none", "typ": "JWE"}), json!({}), "");
        assert_eq!(
            kind(Token::verify::<Value>(&token, None, None)),
            JWTError::InvalidHeader
        );

        let token = with_header(json!({"alg": "none", "typ": "at+jwt"}), json!({}), "");
        assert!(Token::verify::<Value>(&token, None, None).is_ok());
    }

    #[test]
    fn header_length_limit() {
        let padding = "x".repeat(MAX_HEADER_LENGTH);
        let token = with_header(json!({"alg": "none", "pad": padding}), json!({}), "");
        assert_eq!(
            kind(Token::verify::<Value>(&token, None, None)),
            JWTError::InvalidHeader
        );
        assert_eq!(
            kind(Token::decode_metadata(&token)),
            JWTError::InvalidHeader
        );

        let token = Token::build(&json!({}), KEY, &Default::default()).unwrap();
        let options = DecodingOptions {
            max_token_length: Some(token.len() - 1),
            ..Default::default()
        };
        assert_eq!(
            kind(Token::verify::<Value>(&token, Some(KEY), Some(options))),
            JWTError::InvalidStructure
        );
    }

    #[test]
    fn unsigned_token_with_signature_segment() {
        let token = with_header(json!({"alg": "none"}), json!({}), "c2ln");
        assert_eq!(
            kind(Token::verify::<Value>(&token, None, None)),
            JWTError::SignatureInvalid
        );
    }

    #[test]
    fn undecodable_signature_segment() {
        let token = Token::build(&json!({}), KEY, &Default::default()).unwrap();
        let token = format!("{}*", token);
        assert_eq!(
            kind(Token::verify::<Value>(&token, Some(KEY), None)),
            JWTError::SignatureInvalid
        );
    }

    #[test]
    fn unknown_algorithm_stops_before_signature_check() {
        let token = with_header(json!({"alg": "XX999"}), json!({"a": 1}), "c2lnbmF0dXJl");
        let mut stage = Stage::Start;
        let res: Result<Value, _> =
            Token::run_verification(&token, Some(KEY), &Default::default(), &mut stage);
        assert_eq!(kind(res), JWTError::AlgorithmNotSupported);
        assert_eq!(stage, Stage::BodyParsed);

        let mut stage = Stage::Start;
        let res: Result<Value, _> =
            Token::run_verification(&token, None, &Default::default(), &mut stage);
        assert_eq!(kind(res), JWTError::AlgorithmNotSupported);
        assert_eq!(stage, Stage::BodyParsed);
    }

    #[test]
    fn stage_reached() {
        let token = Token::build(&json!({"a": 1}), KEY, &Default::default()).unwrap();
        let mut stage = Stage::Start;
        let _: Value =
            Token::run_verification(&token, Some(KEY), &Default::default(), &mut stage).unwrap();
        assert_eq!(stage, Stage::Done);

        let mut stage = Stage::Start;
        let res: Result<Value, _> =
            Token::run_verification(&token, Some("wrong"), &Default::default(), &mut stage);
        assert!(res.is_err());
        assert_eq!(stage, Stage::AlgorithmResolved);

        let expired = Token::build(&json!({"exp": 1}), KEY, &Default::default()).unwrap();
        let mut stage = Stage::Start;
        let res: Result<Value, _> =
            Token::run_verification(&expired, Some(KEY), &Default::default(), &mut stage);
        assert!(res.is_err());
        assert_eq!(stage, Stage::SignatureVerified);
    }
}
