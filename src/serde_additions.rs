pub mod unix_timestamp {
    use serde::{
        de::{Error as DeError, Visitor},
        Deserializer, Serializer,
    };

    use coarsetime::UnixTimeStamp;
    use std::fmt;

    struct TimestampVisitor;

    impl<'de> Visitor<'de> for TimestampVisitor {
        type Value = UnixTimeStamp;

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: DeError,
        {
            Ok(UnixTimeStamp::from_secs(value.max(0) as u64))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: DeError,
        {
            Ok(UnixTimeStamp::from_secs(value))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: DeError,
        {
            if !value.is_finite() || value < 0.0 {
                return Err(E::custom("timestamp out of range"));
            }
            Ok(UnixTimeStamp::from_secs(value as u64))
        }

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("Unix timestamp")
        }
    }

    pub fn serialize<S: Serializer>(
        time: &Option<UnixTimeStamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => serializer.serialize_u64(time.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<UnixTimeStamp>, D::Error> {
        deserializer.deserialize_any(TimestampVisitor).map(Some)
    }
}

/// Like `unix_timestamp`, but anything that isn't a usable timestamp reads as absent.
pub mod lenient_unix_timestamp {
    use coarsetime::UnixTimeStamp;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub use super::unix_timestamp::serialize;

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<UnixTimeStamp>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let secs = match value {
            Value::Number(n) => n.as_u64().or_else(|| match n.as_f64() {
                Some(f) if f.is_finite() && f >= 0.0 => Some(f as u64),
                _ => None,
            }),
            _ => None,
        };
        Ok(secs.map(UnixTimeStamp::from_secs))
    }
}
