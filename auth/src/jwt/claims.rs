use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by an access token.
///
/// A fixed record rather than an open map: subject, issue time and expiry. The
/// timestamps keep millisecond precision and travel as RFC 7519 NumericDates,
/// fractional when they do not fall on a whole second.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account identifier)
    pub sub: String,

    /// Issued at
    #[serde(with = "numeric_date")]
    pub iat: DateTime<Utc>,

    /// Expiration time
    #[serde(with = "numeric_date")]
    pub exp: DateTime<Utc>,
}

impl Claims {
    /// Build claims for a subject issued at `issued_at` and valid for `duration`.
    ///
    /// Both inputs are truncated to the millisecond; `exp` is always `iat + duration`.
    pub fn new(subject: impl ToString, issued_at: DateTime<Utc>, duration: Duration) -> Self {
        let iat = truncate_to_millis(issued_at);

        Self {
            sub: subject.to_string(),
            iat,
            exp: iat + Duration::milliseconds(duration.num_milliseconds()),
        }
    }

    pub fn subject(&self) -> &str {
        &self.sub
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.iat
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.exp
    }

    /// Validity period between issue and expiry
    pub fn lifetime(&self) -> Duration {
        self.exp - self.iat
    }

    /// Check if the token is expired at `now`.
    ///
    /// The boundary is exclusive: a token is already expired at exactly `exp`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.exp
    }
}

fn truncate_to_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    let sub_millis = i64::from(instant.timestamp_subsec_nanos() % 1_000_000);
    instant - Duration::nanoseconds(sub_millis)
}

/// NumericDate encoding: integer seconds when whole, fractional seconds otherwise.
mod numeric_date {
    use chrono::DateTime;
    use chrono::Utc;
    use serde::de::Error;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = value.timestamp_millis();
        if millis % 1000 == 0 {
            serializer.serialize_i64(millis / 1000)
        } else {
            serializer.serialize_f64(millis as f64 / 1000.0)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = f64::deserialize(deserializer)?;
        if !seconds.is_finite() {
            return Err(D::Error::custom("NumericDate must be a finite number"));
        }

        DateTime::from_timestamp_millis((seconds * 1000.0).round() as i64)
            .ok_or_else(|| D::Error::custom("NumericDate out of range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(seconds: i64, millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).unwrap() + Duration::milliseconds(millis)
    }

    #[test]
    fn test_new_claims() {
        let claims = Claims::new("user123", at(1_000, 0), Duration::hours(24));

        assert_eq!(claims.subject(), "user123");
        assert_eq!(claims.issued_at(), at(1_000, 0));
        assert_eq!(claims.lifetime(), Duration::hours(24));
    }

    #[test]
    fn test_fractional_issue_time_kept() {
        let claims = Claims::new("user123", at(1_000, 700), Duration::milliseconds(1_500));

        assert_eq!(claims.issued_at(), at(1_000, 700));
        assert_eq!(claims.expires_at(), at(1_002, 200));
        assert_eq!(claims.lifetime(), Duration::milliseconds(1_500));
    }

    #[test]
    fn test_sub_millisecond_precision_dropped() {
        let issued_at = at(1_000, 700) + Duration::microseconds(450);
        let claims = Claims::new("user123", issued_at, Duration::seconds(1));

        assert_eq!(claims.issued_at(), at(1_000, 700));
        assert_eq!(claims.expires_at(), at(1_001, 700));
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims::new("user123", at(1_000, 700), Duration::seconds(1));

        assert!(!claims.is_expired(at(999, 0)));
        assert!(!claims.is_expired(at(1_001, 200)));
        assert!(!claims.is_expired(at(1_001, 699)));
        assert!(claims.is_expired(at(1_001, 700))); // Exactly at expiration
        assert!(claims.is_expired(at(1_002, 0)));
    }

    #[test]
    fn test_serialized_field_names() {
        let claims = Claims::new("user123", at(1_000, 0), Duration::seconds(60));
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "sub": "user123", "iat": 1_000, "exp": 1_060 })
        );
    }

    #[test]
    fn test_fractional_numeric_dates() {
        let claims = Claims::new("user123", at(1_000, 250), Duration::seconds(60));
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "sub": "user123", "iat": 1_000.25, "exp": 1_060.25 })
        );

        let decoded: Claims = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_non_numeric_date_rejected() {
        let json = serde_json::json!({ "sub": "user123", "iat": "yesterday", "exp": 1_060 });

        assert!(serde_json::from_value::<Claims>(json).is_err());
    }
}
