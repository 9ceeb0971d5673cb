//! Temporal column types
//!
//! DATE, TIME(p) and TIMESTAMP(p) with or without time zone, backed by
//! chrono. Storage encoding is ISO-8601 text; fractional seconds are
//! truncated to the declared precision (0..=6, default 6). `sql_type` hides
//! the default precision.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::errors::{ValidationError, ValidationResult};
use crate::types::value::{SqlValue, StorageValue};

/// Default fractional-second precision
pub const DEFAULT_PRECISION: u32 = 6;

/// Mock window: midnight 2000-01-01 through the end of 2030, in days
const MOCK_DAY_SPAN: i64 = 11_322;

/// Temporal column kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TemporalKind {
    Date,
    Time { precision: u32 },
    Timestamp { precision: u32, with_timezone: bool },
}

/// Temporal column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalType {
    pub kind: TemporalKind,
}

impl TemporalType {
    pub fn new(kind: TemporalKind) -> ValidationResult<Self> {
        let precision = match kind {
            TemporalKind::Date => None,
            TemporalKind::Time { precision } => Some(precision),
            TemporalKind::Timestamp { precision, .. } => Some(precision),
        };
        if let Some(p) = precision {
            if p > DEFAULT_PRECISION {
                return Err(ValidationError::impossible(format!(
                    "fractional precision {} exceeds the maximum {}",
                    p, DEFAULT_PRECISION
                )));
            }
        }
        Ok(Self { kind })
    }

    pub fn date() -> Self {
        Self {
            kind: TemporalKind::Date,
        }
    }

    pub fn time(precision: Option<u32>) -> ValidationResult<Self> {
        Self::new(TemporalKind::Time {
            precision: precision.unwrap_or(DEFAULT_PRECISION),
        })
    }

    pub fn timestamp(precision: Option<u32>, with_timezone: bool) -> ValidationResult<Self> {
        Self::new(TemporalKind::Timestamp {
            precision: precision.unwrap_or(DEFAULT_PRECISION),
            with_timezone,
        })
    }

    /// DATETIME: a timestamp without time zone
    pub fn datetime(precision: Option<u32>) -> ValidationResult<Self> {
        Self::timestamp(precision, false)
    }

    /// Validates and normalizes a candidate; fractional seconds beyond the
    /// declared precision are truncated.
    pub fn validate(&self, value: &SqlValue) -> ValidationResult<SqlValue> {
        match self.kind {
            TemporalKind::Date => {
                let d = match value {
                    SqlValue::Date(d) => *d,
                    SqlValue::Text(s) => s
                        .trim()
                        .parse::<NaiveDate>()
                        .map_err(|_| ValidationError::type_mismatch("date", value))?,
                    other => {
                        return Err(ValidationError::type_mismatch("date", other.type_name()))
                    }
                };
                Ok(SqlValue::Date(d))
            }
            TemporalKind::Time { precision } => {
                let t = match value {
                    SqlValue::Time(t) => *t,
                    SqlValue::Text(s) => s
                        .trim()
                        .parse::<NaiveTime>()
                        .map_err(|_| ValidationError::type_mismatch("time", value))?,
                    other => {
                        return Err(ValidationError::type_mismatch("time", other.type_name()))
                    }
                };
                Ok(SqlValue::Time(truncate_time(t, precision)))
            }
            TemporalKind::Timestamp {
                precision,
                with_timezone: true,
            } => {
                let ts = match value {
                    SqlValue::Timestamp(ts) => *ts,
                    SqlValue::DateTime(dt) => Utc.from_utc_datetime(dt),
                    SqlValue::Text(s) => parse_timestamp(s.trim())
                        .ok_or_else(|| ValidationError::type_mismatch("timestamp", value))?,
                    other => {
                        return Err(ValidationError::type_mismatch(
                            "timestamp",
                            other.type_name(),
                        ))
                    }
                };
                let naive = truncate_datetime(ts.naive_utc(), precision);
                Ok(SqlValue::Timestamp(Utc.from_utc_datetime(&naive)))
            }
            TemporalKind::Timestamp {
                precision,
                with_timezone: false,
            } => {
                let dt = match value {
                    SqlValue::DateTime(dt) => *dt,
                    SqlValue::Timestamp(ts) => ts.naive_utc(),
                    SqlValue::Text(s) => parse_naive_datetime(s.trim())
                        .ok_or_else(|| ValidationError::type_mismatch("datetime", value))?,
                    other => {
                        return Err(ValidationError::type_mismatch(
                            "datetime",
                            other.type_name(),
                        ))
                    }
                };
                Ok(SqlValue::DateTime(truncate_datetime(dt, precision)))
            }
        }
    }

    /// Serializes to ISO-8601 text
    pub fn serialize(&self, value: &SqlValue) -> ValidationResult<StorageValue> {
        let s = match self.validate(value)? {
            SqlValue::Date(d) => d.to_string(),
            SqlValue::Time(t) => t.to_string(),
            SqlValue::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            SqlValue::Timestamp(ts) => ts.to_rfc3339(),
            other => return Err(ValidationError::type_mismatch("temporal", other.type_name())),
        };
        Ok(StorageValue::Text(s))
    }

    /// Decodes a stored ISO-8601 string
    pub fn deserialize(&self, storage: &StorageValue) -> ValidationResult<SqlValue> {
        match storage {
            StorageValue::Text(s) => self.validate(&SqlValue::Text(s.clone())),
            other => Err(ValidationError::type_mismatch("temporal", other.type_name())),
        }
    }

    /// Random value in the 2000..=2030 window at the declared precision
    pub fn mock<R: Rng + ?Sized>(&self, rng: &mut R) -> ValidationResult<SqlValue> {
        let base = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
        match self.kind {
            TemporalKind::Date => {
                let d = base + Duration::days(rng.gen_range(0..MOCK_DAY_SPAN));
                Ok(SqlValue::Date(d))
            }
            TemporalKind::Time { precision } => {
                let t = random_time(rng, precision);
                Ok(SqlValue::Time(t))
            }
            TemporalKind::Timestamp {
                precision,
                with_timezone,
            } => {
                let d = base + Duration::days(rng.gen_range(0..MOCK_DAY_SPAN));
                let dt = d.and_time(random_time(rng, precision));
                if with_timezone {
                    Ok(SqlValue::Timestamp(Utc.from_utc_datetime(&dt)))
                } else {
                    Ok(SqlValue::DateTime(dt))
                }
            }
        }
    }

    /// SQL rendering: the default precision is hidden, e.g. `TIME(3)` but
    /// plain `TIME` at precision 6; `TIMESTAMP WITH TIME ZONE`.
    pub fn sql_type(&self) -> String {
        match self.kind {
            TemporalKind::Date => "DATE".to_string(),
            TemporalKind::Time { precision } => {
                if precision == DEFAULT_PRECISION {
                    "TIME".to_string()
                } else {
                    format!("TIME({})", precision)
                }
            }
            TemporalKind::Timestamp {
                precision,
                with_timezone,
            } => {
                let base = if precision == DEFAULT_PRECISION {
                    "TIMESTAMP".to_string()
                } else {
                    format!("TIMESTAMP({})", precision)
                };
                if with_timezone {
                    format!("{} WITH TIME ZONE", base)
                } else {
                    base
                }
            }
        }
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    // Naive strings are taken as UTC.
    parse_naive_datetime(s).map(|dt| Utc.from_utc_datetime(&dt))
}

fn parse_naive_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = s.parse::<NaiveDateTime>() {
        return Some(dt);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").ok()
}

fn truncate_nanos(nanos: u32, precision: u32) -> u32 {
    let factor = 10u32.pow(9 - precision);
    nanos / factor * factor
}

fn truncate_time(t: NaiveTime, precision: u32) -> NaiveTime {
    t.with_nanosecond(truncate_nanos(t.nanosecond(), precision))
        .unwrap_or(t)
}

fn truncate_datetime(dt: NaiveDateTime, precision: u32) -> NaiveDateTime {
    dt.with_nanosecond(truncate_nanos(dt.nanosecond(), precision))
        .unwrap_or(dt)
}

fn random_time<R: Rng + ?Sized>(rng: &mut R, precision: u32) -> NaiveTime {
    let secs = rng.gen_range(0..86_400);
    let nanos = truncate_nanos(rng.gen_range(0..1_000_000_000), precision);
    NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::errors::ErrorKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_date_parsing() {
        let ty = TemporalType::date();
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            ty.validate(&SqlValue::Text("2024-02-29".into())),
            Ok(SqlValue::Date(d))
        );
        assert_eq!(
            ty.validate(&SqlValue::Text("2023-02-29".into())).unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_time_precision_truncation() {
        let ty = TemporalType::time(Some(3)).unwrap();
        let SqlValue::Time(t) = ty
            .validate(&SqlValue::Text("12:34:56.123456".into()))
            .unwrap()
        else {
            panic!("time validate must produce Time");
        };
        assert_eq!(t.nanosecond(), 123_000_000);
    }

    #[test]
    fn test_timestamp_with_timezone() {
        let ty = TemporalType::timestamp(None, true).unwrap();
        let v = ty
            .validate(&SqlValue::Text("2024-06-01T10:00:00+02:00".into()))
            .unwrap();
        let SqlValue::Timestamp(ts) = v else {
            panic!("timestamp validate must produce Timestamp");
        };
        assert_eq!(ts.to_rfc3339(), "2024-06-01T08:00:00+00:00");
    }

    #[test]
    fn test_datetime_accepts_space_separator() {
        let ty = TemporalType::datetime(None).unwrap();
        assert!(ty
            .validate(&SqlValue::Text("2024-06-01 10:00:00".into()))
            .is_ok());
        assert!(ty
            .validate(&SqlValue::Text("2024-06-01T10:00:00.5".into()))
            .is_ok());
        assert_eq!(
            ty.validate(&SqlValue::Text("not a date".into())).unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
    }

    #[test]
    fn test_round_trip() {
        let ty = TemporalType::timestamp(None, true).unwrap();
        let mut rng = StdRng::seed_from_u64(83);
        for _ in 0..100 {
            let v = ty.mock(&mut rng).unwrap();
            let stored = ty.serialize(&v).unwrap();
            assert_eq!(ty.deserialize(&stored).unwrap(), v);
        }
    }

    #[test]
    fn test_mock_window() {
        let ty = TemporalType::date();
        let mut rng = StdRng::seed_from_u64(89);
        let lo = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let hi = NaiveDate::from_ymd_opt(2030, 12, 31).unwrap();
        for _ in 0..500 {
            let SqlValue::Date(d) = ty.mock(&mut rng).unwrap() else {
                panic!("date mock must produce Date");
            };
            assert!(d >= lo && d <= hi);
        }
    }

    #[test]
    fn test_sql_type_rendering() {
        assert_eq!(TemporalType::date().sql_type(), "DATE");
        assert_eq!(TemporalType::time(None).unwrap().sql_type(), "TIME");
        assert_eq!(TemporalType::time(Some(3)).unwrap().sql_type(), "TIME(3)");
        assert_eq!(
            TemporalType::timestamp(None, false).unwrap().sql_type(),
            "TIMESTAMP"
        );
        assert_eq!(
            TemporalType::timestamp(None, true).unwrap().sql_type(),
            "TIMESTAMP WITH TIME ZONE"
        );
        assert_eq!(
            TemporalType::timestamp(Some(0), true).unwrap().sql_type(),
            "TIMESTAMP(0) WITH TIME ZONE"
        );
    }

    #[test]
    fn test_invalid_precision() {
        assert_eq!(
            TemporalType::time(Some(9)).unwrap_err().kind(),
            ErrorKind::ImpossibleConstraintSet
        );
    }
}
