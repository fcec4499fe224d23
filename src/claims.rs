use coarsetime::{Clock, Duration, UnixTimeStamp};
use serde::{Deserialize, Serialize};

use crate::common::DecodingOptions;
use crate::error::*;
use crate::serde_additions;

/// The registered time-based claims of a token body.
///
/// Every other member of the body is left to the caller's own type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeClaims {
    /// Time the claims were created at
    ///
    /// Informational unless `max_age` is set, so a malformed value is read as absent.
    #[serde(
        rename = "iat",
        default,
        skip_serializing_if = "Option::is_none",
        with = "self::serde_additions::lenient_unix_timestamp"
    )]
    pub issued_at: Option<UnixTimeStamp>,

    /// Time the claims expire at
    #[serde(
        rename = "exp",
        default,
        skip_serializing_if = "Option::is_none",
        with = "self::serde_additions::unix_timestamp"
    )]
    pub expires_at: Option<UnixTimeStamp>,

    /// Time the claims will be invalid until
    #[serde(
        rename = "nbf",
        default,
        skip_serializing_if = "Option::is_none",
        with = "self::serde_additions::unix_timestamp"
    )]
    pub invalid_before: Option<UnixTimeStamp>,
}

impl TimeClaims {
    /// Check `nbf`, then `exp`, then (if requested) the token age.
    ///
    /// `now` is sampled once; the first failing check is reported.
    pub fn validate(&self, options: &DecodingOptions) -> Result<(), Error> {
        let now = options
            .artificial_time
            .unwrap_or_else(Clock::now_since_epoch);
        self.validate_at(now, options)
    }

    pub(crate) fn validate_at(
        &self,
        now: UnixTimeStamp,
        options: &DecodingOptions,
    ) -> Result<(), Error> {
        let time_tolerance = options.clock_tolerance.unwrap_or(Duration::from_secs(0));
        let (now, time_tolerance) = (now.as_secs(), time_tolerance.as_secs());

        if !options.ignore_not_before {
            if let Some(invalid_before) = self.invalid_before {
                ensure!(
                    now.saturating_add(time_tolerance) >= invalid_before.as_secs(),
                    JWTError::TokenNotYetValid
                );
            }
        }
        if !options.ignore_expiration {
            if let Some(expires_at) = self.expires_at {
                ensure!(
                    now <= expires_at.as_secs().saturating_add(time_tolerance),
                    JWTError::TokenExpired
                );
            }
        }
        if let Some(max_age) = options.max_age {
            let issued_at = self.issued_at.ok_or(JWTError::InvalidBody)?;
            ensure!(
                now <= issued_at
                    .as_secs()
                    .saturating_add(max_age.as_secs())
                    .saturating_add(time_tolerance),
                JWTError::TokenExpired
            );
        }
        Ok(())
    }
}
