//! Fee payments

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::ids::deserialize_optional_id;
use super::{FeeId, StudentId};
use crate::error::ValidationError;

/// How a fee was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Online,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 2] = [PaymentMethod::Cash, PaymentMethod::Online];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Online => "Online",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Some(PaymentMethod::Cash),
            "online" => Some(PaymentMethod::Online),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billing month token, `YYYY-MM`
///
/// Validated when built from input; stored values are taken as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Month(String);

impl Month {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        let well_formed = s.len() == 7
            && s.as_bytes()[4] == b'-'
            && NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").is_ok();
        if well_formed {
            Ok(Month(s.to_string()))
        } else {
            Err(ValidationError::InvalidMonth(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A recorded payment. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeRecord {
    pub id: FeeId,
    /// Loose reference; may be unset or name a student that does not exist
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub student_id: Option<StudentId>,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    pub month: Month,
    pub method: PaymentMethod,
    /// Local calendar date the payment was recorded
    pub date: String,
}

/// Validated input for a new fee record
#[derive(Debug, Clone, PartialEq)]
pub struct NewFee {
    pub student_id: StudentId,
    pub amount: f64,
    pub month: Month,
    pub method: PaymentMethod,
}

impl NewFee {
    pub fn new(student_id: StudentId, amount: f64, month: Month, method: PaymentMethod) -> Self {
        Self {
            student_id,
            amount,
            month,
            method,
        }
    }
}

/// Raw text as submitted by the "Collect Fee" form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeForm {
    pub student_id: String,
    pub amount: String,
    pub month: String,
    pub method: String,
}

impl FeeForm {
    pub fn parse(&self) -> Result<NewFee, ValidationError> {
        if self.student_id.trim().is_empty() {
            return Err(ValidationError::MissingStudent);
        }
        let method = PaymentMethod::parse(&self.method)
            .ok_or_else(|| ValidationError::UnknownMethod(self.method.clone()))?;
        Ok(NewFee {
            student_id: self.student_id.parse()?,
            amount: parse_amount(&self.amount)?,
            month: Month::parse(&self.month)?,
            method,
        })
    }
}

/// Coerce user-entered text to an amount
pub fn parse_amount(s: &str) -> Result<f64, ValidationError> {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ValidationError::InvalidAmount(s.to_string())),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
    Missing(Option<()>),
}

/// Stored amounts may be numbers or the raw form text; anything
/// unparseable counts as zero so totals stay finite.
pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(v) => v,
        RawAmount::Text(s) => parse_amount(&s).unwrap_or(0.0),
        RawAmount::Missing(_) => 0.0,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!(PaymentMethod::parse("Cash"), Some(PaymentMethod::Cash));
        assert_eq!(PaymentMethod::parse("online"), Some(PaymentMethod::Online));
        assert_eq!(PaymentMethod::parse("cheque"), None);
        assert_eq!(PaymentMethod::Online.as_str(), "Online");
    }

    #[test]
    fn test_month_parse() {
        assert_eq!(Month::parse("2023-10").unwrap().as_str(), "2023-10");
        assert_eq!(Month::parse(" 2024-01 ").unwrap().as_str(), "2024-01");
        assert!(Month::parse("2023-13").is_err());
        assert!(Month::parse("2023-1").is_err());
        assert!(Month::parse("October").is_err());
        assert!(Month::parse("").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("500"), Ok(500.0));
        assert_eq!(parse_amount(" 12.5 "), Ok(12.5));
        assert!(parse_amount("").is_err());
        assert!(parse_amount("ten").is_err());
        assert!(parse_amount("NaN").is_err());
    }

    #[test]
    fn test_form_parse() {
        let form = FeeForm {
            student_id: "1697000000000".to_string(),
            amount: "500".to_string(),
            month: "2023-10".to_string(),
            method: "Cash".to_string(),
        };
        let fee = form.parse().unwrap();
        assert_eq!(fee.student_id, StudentId(1697000000000));
        assert_eq!(fee.amount, 500.0);
        assert_eq!(fee.month.as_str(), "2023-10");
        assert_eq!(fee.method, PaymentMethod::Cash);

        let no_student = FeeForm {
            student_id: String::new(),
            ..form.clone()
        };
        assert_eq!(no_student.parse(), Err(ValidationError::MissingStudent));

        let bad_method = FeeForm {
            method: "Card".to_string(),
            ..form
        };
        assert_eq!(
            bad_method.parse(),
            Err(ValidationError::UnknownMethod("Card".to_string()))
        );
    }

    #[test]
    fn test_decode_legacy_fee() {
        let json = r#"{"id":1697000000001,"studentId":"1697000000000","amount":"500","month":"2023-10","method":"Cash","date":"10/11/2023"}"#;
        let fee: FeeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(fee.student_id, Some(StudentId(1697000000000)));
        assert_eq!(fee.amount, 500.0);
        assert_eq!(fee.method, PaymentMethod::Cash);
    }

    #[test]
    fn test_decode_fee_without_student() {
        let json = r#"{"id":1,"studentId":null,"amount":5,"month":"2023-10","method":"Cash","date":""}"#;
        let fee: FeeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(fee.student_id, None);

        let json = r#"{"id":1,"amount":5,"month":"2023-10","method":"Cash","date":""}"#;
        let fee: FeeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(fee.student_id, None);
    }

    #[test]
    fn test_decode_unparseable_amount_as_zero() {
        let json = r#"{"id":1,"studentId":1,"amount":"abc","month":"2023-10","method":"Online","date":""}"#;
        let fee: FeeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(fee.amount, 0.0);

        let json = r#"{"id":1,"studentId":1,"amount":null,"month":"2023-10","method":"Online","date":""}"#;
        let fee: FeeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(fee.amount, 0.0);
    }
}
