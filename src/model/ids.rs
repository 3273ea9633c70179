//! Typed record identifiers
//!
//! Ids are millisecond timestamps (courses use small seeded integers).
//! Stored data written by older front-ends holds references as strings
//! (`"courseId": "1"`), so decoding accepts a number or a numeric string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// Largest integer a JavaScript number holds exactly (`Number.MAX_SAFE_INTEGER`)
pub const MAX_ID: i64 = (1 << 53) - 1;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Float(f64),
    Text(String),
}

fn check_range(v: i64) -> Option<i64> {
    (-MAX_ID..=MAX_ID).contains(&v).then_some(v)
}

fn parse_id(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok().and_then(check_range)
}

fn raw_to_id<E: serde::de::Error>(raw: RawId) -> Result<i64, E> {
    match raw {
        RawId::Int(v) => check_range(v).ok_or_else(|| E::custom(format!("id {v} out of range"))),
        RawId::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() <= MAX_ID as f64 => {
            Ok(v as i64)
        }
        RawId::Float(v) => Err(E::custom(format!("invalid id {v}"))),
        RawId::Text(s) => parse_id(&s).ok_or_else(|| E::custom(format!("invalid id {s:?}"))),
    }
}

fn deserialize_raw_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    raw_to_id(RawId::deserialize(deserializer)?)
}

/// Decode a loose reference: `null`, a missing field or a blank string is `None`
pub(crate) fn deserialize_optional_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<i64>,
{
    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(raw) => raw_to_id(raw).map(|v| Some(T::from(v))),
    }
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn value(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(v: i64) -> Self {
                $name(v)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_id(s)
                    .map($name)
                    .ok_or_else(|| ValidationError::InvalidId(s.to_string()))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserialize_raw_id(deserializer).map($name)
            }
        }
    };
}

record_id!(
    /// Identifies a [`Student`](super::Student)
    StudentId
);
record_id!(
    /// Identifies a [`Course`](super::Course)
    CourseId
);
record_id!(
    /// Identifies a [`FeeRecord`](super::FeeRecord)
    FeeId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_decodes_number_or_string() {
        let a: StudentId = serde_json::from_str("1697000000000").unwrap();
        let b: StudentId = serde_json::from_str("\"1697000000000\"").unwrap();
        assert_eq!(a, b);

        let c: CourseId = serde_json::from_str("2.0").unwrap();
        assert_eq!(c, CourseId(2));
    }

    #[test]
    fn test_id_rejects_garbage() {
        assert!(serde_json::from_str::<FeeId>("\"abc\"").is_err());
        assert!(serde_json::from_str::<FeeId>("1.5").is_err());
        assert_eq!(
            "x1".parse::<StudentId>(),
            Err(ValidationError::InvalidId("x1".to_string()))
        );
    }

    #[test]
    fn test_id_outside_js_number_range_rejected() {
        assert!(serde_json::from_str::<StudentId>("1e19").is_err());
        assert!(serde_json::from_str::<StudentId>("10000000000000000000").is_err());
        assert!(serde_json::from_str::<StudentId>("9007199254740992").is_err());
        assert_eq!(
            serde_json::from_str::<StudentId>("9007199254740991").unwrap(),
            StudentId(MAX_ID)
        );
        assert!("9223372036854775807".parse::<StudentId>().is_err());
    }

    #[derive(serde::Deserialize)]
    struct Ref {
        #[serde(default, deserialize_with = "deserialize_optional_id")]
        course_id: Option<CourseId>,
    }

    #[test]
    fn test_optional_id_treats_blank_as_none() {
        let decode = |json: &str| serde_json::from_str::<Ref>(json).unwrap().course_id;
        assert_eq!(decode(r#"{"course_id":null}"#), None);
        assert_eq!(decode(r#"{"course_id":""}"#), None);
        assert_eq!(decode("{}"), None);
        assert_eq!(decode(r#"{"course_id":"2"}"#), Some(CourseId(2)));
        assert!(serde_json::from_str::<Ref>(r#"{"course_id":"x"}"#).is_err());
    }

    #[test]
    fn test_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&CourseId(1)).unwrap(), "1");
        assert_eq!(" 42 ".parse::<StudentId>(), Ok(StudentId(42)));
        assert_eq!(StudentId(42).to_string(), "42");
    }
}
