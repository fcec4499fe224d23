use hmac_sha512::sha384 as hmac_sha384;

pub trait MACLike {
    fn jwt_alg_name() -> &'static str;
    fn authentication_tag(authenticated: &[u8], key: &[u8]) -> Vec<u8>;

    /// Compute the authentication tag of `authenticated`.
    fn sign(authenticated: &[u8], key: &[u8]) -> Vec<u8> {
        Self::authentication_tag(authenticated, key)
    }

    /// Recompute the tag and compare it to `authentication_tag` in constant time.
    fn verify(authenticated: &[u8], key: &[u8], authentication_tag: &[u8]) -> bool {
        let expected = Self::authentication_tag(authenticated, key);
        expected.len() == authentication_tag.len()
            && ct_codecs::verify(&expected, authentication_tag)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HS256;

impl MACLike for HS256 {
    fn jwt_alg_name() -> &'static str {
        "HS256"
    }

    fn authentication_tag(authenticated: &[u8], key: &[u8]) -> Vec<u8> {
        hmac_sha256::HMAC::mac(authenticated, key).to_vec()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HS384;

impl MACLike for HS384 {
    fn jwt_alg_name() -> &'static str {
        "HS384"
    }

    fn authentication_tag(authenticated: &[u8], key: &[u8]) -> Vec<u8> {
        hmac_sha384::HMAC::mac(authenticated, key).to_vec()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HS512;

impl MACLike for HS512 {
    fn jwt_alg_name() -> &'static str {
        "HS512"
    }

    fn authentication_tag(authenticated: &[u8], key: &[u8]) -> Vec<u8> {
        hmac_sha512::HMAC::mac(authenticated, key).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_codecs::{Decoder, Hex};

    // RFC 4231, test case 2
    const KEY: &[u8] = b"Jefe";
    const DATA: &[u8] = b"what do ya want for nothing?";

    fn hex(s: &str) -> Vec<u8> {
        Hex::decode_to_vec(s, None).unwrap()
    }

    #[test]
    fn rfc4231_vectors() {
        assert_eq!(
            HS256::sign(DATA, KEY),
            hex("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843")
        );
        assert_eq!(
            HS384::sign(DATA, KEY),
            hex("af45d2e376484031617f78d2b58a6b1b9c7ef464f5a01b47e42ec3736322445e\
                 8e2240ca5e69e2c78b3239ecfab21649")
        );
        assert_eq!(
            HS512::sign(DATA, KEY),
            hex("164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554\
                 9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737")
        );
    }

    #[test]
    fn tag_lengths() {
        assert_eq!(HS256::sign(DATA, KEY).len(), 32);
        assert_eq!(HS384::sign(DATA, KEY).len(), 48);
        assert_eq!(HS512::sign(DATA, KEY).len(), 64);
    }

    #[test]
    fn verify_rejects_mismatches() {
        let tag = HS256::sign(DATA, KEY);
        assert!(HS256::verify(DATA, KEY, &tag));
        assert!(!HS256::verify(DATA, b"jefe", &tag));
        assert!(!HS256::verify(b"what do ya want for nothing!", KEY, &tag));
        assert!(!HS256::verify(DATA, KEY, &tag[..31]));
        assert!(!HS256::verify(DATA, KEY, b""));
        assert!(!HS512::verify(DATA, KEY, &tag));
    }
}
