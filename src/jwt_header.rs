use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::EncodingOptions;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct JWTHeader {
    #[serde(rename = "alg", default, skip_serializing_if = "Option::is_none")]
    pub(crate) algorithm: Option<String>,

    #[serde(rename = "typ", default, skip_serializing_if = "Option::is_none")]
    pub(crate) signature_type: Option<String>,

    #[serde(rename = "kid", default, skip_serializing_if = "Option::is_none")]
    pub(crate) key_id: Option<String>,

    #[serde(rename = "cty", default, skip_serializing_if = "Option::is_none")]
    pub(crate) content_type: Option<String>,

    #[serde(flatten)]
    pub(crate) extensions: Map<String, Value>,
}

impl Default for JWTHeader {
    fn default() -> Self {
        JWTHeader {
            algorithm: None,
            signature_type: Some("JWT".to_string()),
            key_id: None,
            content_type: None,
            extensions: Map::new(),
        }
    }
}

impl JWTHeader {
    pub(crate) fn new(options: &EncodingOptions) -> Self {
        let mut extensions = options.extra_header.clone();
        for reserved in ["alg", "typ", "kid", "cty"] {
            extensions.remove(reserved);
        }
        JWTHeader {
            algorithm: Some(options.algorithm.jwt_alg_name().to_string()),
            key_id: options.key_id.clone(),
            content_type: options.content_type.clone(),
            extensions,
            ..Default::default()
        }
    }

    /// `typ` is optional, but when present it has to describe a JWT.
    pub(crate) fn has_jwt_type(&self) -> bool {
        match &self.signature_type {
            None => true,
            Some(signature_type) => {
                let signature_type_uc = signature_type.to_uppercase();
                signature_type_uc == "JWT" || signature_type_uc.ends_with("+JWT")
            }
        }
    }
}
