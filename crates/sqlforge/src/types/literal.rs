use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A literal SQL value, used for column defaults and raw input defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Json(serde_json::Value),
    #[cfg(feature = "rust_decimal")]
    Decimal(rust_decimal::Decimal),
}

impl Literal {
    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("NULL"),
            Literal::Bool(true) => f.write_str("TRUE"),
            Literal::Bool(false) => f.write_str("FALSE"),
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Float(v) => write!(f, "{v}"),
            Literal::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Date(d) => write!(f, "'{}'", d.format("%Y-%m-%d")),
            Literal::Time(t) => write!(f, "'{}'", t.format("%H:%M:%S")),
            Literal::DateTime(dt) => write!(f, "'{}'", dt.format("%Y-%m-%d %H:%M:%S")),
            Literal::Json(v) => write!(f, "'{}'", v.to_string().replace('\'', "''")),
            #[cfg(feature = "rust_decimal")]
            Literal::Decimal(d) => write!(f, "{d}"),
        }
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Bool(v)
    }
}

impl From<i32> for Literal {
    fn from(v: i32) -> Self {
        Literal::Int(i64::from(v))
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Int(v)
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::Text(v.to_string())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::Text(v)
    }
}

impl From<NaiveDate> for Literal {
    fn from(v: NaiveDate) -> Self {
        Literal::Date(v)
    }
}

impl From<NaiveTime> for Literal {
    fn from(v: NaiveTime) -> Self {
        Literal::Time(v)
    }
}

impl From<NaiveDateTime> for Literal {
    fn from(v: NaiveDateTime) -> Self {
        Literal::DateTime(v)
    }
}

impl From<serde_json::Value> for Literal {
    fn from(v: serde_json::Value) -> Self {
        Literal::Json(v)
    }
}

#[cfg(feature = "rust_decimal")]
impl From<rust_decimal::Decimal> for Literal {
    fn from(v: rust_decimal::Decimal) -> Self {
        Literal::Decimal(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_quoted_and_escaped() {
        assert_eq!(Literal::from("it's").to_string(), "'it''s'");
    }

    #[test]
    fn scalars_render_plainly() {
        assert_eq!(Literal::Null.to_string(), "NULL");
        assert_eq!(Literal::from(true).to_string(), "TRUE");
        assert_eq!(Literal::from(42).to_string(), "42");
    }

    #[test]
    fn dates_render_iso() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(Literal::from(d).to_string(), "'2024-02-29'");
    }

    #[test]
    fn json_round_trips_through_serde() {
        let lit = Literal::from(serde_json::json!({"a": 1}));
        let encoded = serde_json::to_string(&lit).unwrap();
        let decoded: Literal = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, lit);
    }
}
