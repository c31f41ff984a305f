//! SQL data types and column type descriptors.
//!
//! [`DataType`] is the process-wide registry of primitive SQL types together
//! with their classification sets. [`ColumnType`] is what a column actually
//! owns: a data type plus length/scale, signedness and constraint flags.

mod literal;

pub use literal::Literal;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Primitive SQL types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Decimal,
    Float,
    Double,
    Char,
    VarChar,
    Text,
    Bool,
    Date,
    Time,
    DateTime,
    Timestamp,
    Json,
    Blob,
}

/// Integer types.
pub const INTEGER_TYPES: &[DataType] = &[
    DataType::TinyInt,
    DataType::SmallInt,
    DataType::Int,
    DataType::BigInt,
];

/// Integer and fractional types.
pub const NUMERIC_TYPES: &[DataType] = &[
    DataType::TinyInt,
    DataType::SmallInt,
    DataType::Int,
    DataType::BigInt,
    DataType::Decimal,
    DataType::Float,
    DataType::Double,
];

/// Date and time types.
pub const TIME_TYPES: &[DataType] = &[
    DataType::Date,
    DataType::Time,
    DataType::DateTime,
    DataType::Timestamp,
];

/// Character types.
pub const TEXT_TYPES: &[DataType] = &[DataType::Char, DataType::VarChar, DataType::Text];

impl DataType {
    /// The SQL spelling of this type.
    pub const fn sql_name(self) -> &'static str {
        match self {
            DataType::TinyInt => "TINYINT",
            DataType::SmallInt => "SMALLINT",
            DataType::Int => "INT",
            DataType::BigInt => "BIGINT",
            DataType::Decimal => "DECIMAL",
            DataType::Float => "FLOAT",
            DataType::Double => "DOUBLE",
            DataType::Char => "CHAR",
            DataType::VarChar => "VARCHAR",
            DataType::Text => "TEXT",
            DataType::Bool => "BOOL",
            DataType::Date => "DATE",
            DataType::Time => "TIME",
            DataType::DateTime => "DATETIME",
            DataType::Timestamp => "TIMESTAMP",
            DataType::Json => "JSON",
            DataType::Blob => "BLOB",
        }
    }

    pub fn is_integer(self) -> bool {
        INTEGER_TYPES.contains(&self)
    }

    pub fn is_numeric(self) -> bool {
        NUMERIC_TYPES.contains(&self)
    }

    pub fn is_time(self) -> bool {
        TIME_TYPES.contains(&self)
    }

    pub fn is_text(self) -> bool {
        TEXT_TYPES.contains(&self)
    }

    /// Types whose values a column of this type accepts without conversion.
    ///
    /// Used as the default accepted-tag set of a [`ColumnType`].
    pub fn compatible_types(self) -> &'static [DataType] {
        match self {
            t if t.is_integer() => INTEGER_TYPES,
            DataType::Decimal | DataType::Float | DataType::Double => NUMERIC_TYPES,
            t if t.is_text() => TEXT_TYPES,
            DataType::DateTime | DataType::Timestamp => &[DataType::DateTime, DataType::Timestamp],
            DataType::Date => &[DataType::Date],
            DataType::Time => &[DataType::Time],
            DataType::Bool => &[DataType::Bool, DataType::TinyInt],
            DataType::Json => &[DataType::Json],
            _ => &[DataType::Blob],
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

/// The full type descriptor of a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnType {
    /// The primitive type.
    pub data_type: DataType,
    /// Data types this column is compatible with (FK / joined-column checks).
    pub accepted: BTreeSet<DataType>,
    /// Length for character types, precision for DECIMAL.
    pub length: Option<u32>,
    /// Scale for DECIMAL.
    pub scale: Option<u32>,
    /// Whether numeric values are signed.
    pub signed: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub nullable: bool,
    pub auto_increment: bool,
}

impl ColumnType {
    /// Create a NOT NULL, non-key type descriptor.
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            accepted: data_type.compatible_types().iter().copied().collect(),
            length: None,
            scale: None,
            signed: data_type.is_numeric(),
            primary_key: false,
            unique: false,
            nullable: false,
            auto_increment: false,
        }
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Returns `true` if values of `other` can be stored in / compared with this type.
    pub fn accepts(&self, other: &ColumnType) -> bool {
        self.accepted.contains(&other.data_type)
    }

    /// Copy used for foreign columns: same storage, no key/identity flags.
    pub fn to_foreign(&self) -> Self {
        Self {
            primary_key: false,
            auto_increment: false,
            ..self.clone()
        }
    }
}

impl From<DataType> for ColumnType {
    fn from(data_type: DataType) -> Self {
        Self::new(data_type)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.data_type.sql_name())?;
        match (self.length, self.scale) {
            (Some(len), Some(scale)) => write!(f, "({len},{scale})")?,
            (Some(len), None) => write!(f, "({len})")?,
            _ => {}
        }
        if self.data_type.is_numeric() && !self.signed {
            f.write_str(" UNSIGNED")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_sets() {
        assert!(DataType::BigInt.is_integer());
        assert!(DataType::BigInt.is_numeric());
        assert!(!DataType::Decimal.is_integer());
        assert!(DataType::Decimal.is_numeric());
        assert!(DataType::DateTime.is_time());
        assert!(!DataType::Text.is_time());
        assert!(DataType::VarChar.is_text());
    }

    #[test]
    fn display_includes_length_and_sign() {
        assert_eq!(ColumnType::new(DataType::Int).to_string(), "INT");
        assert_eq!(
            ColumnType::new(DataType::VarChar).with_length(100).to_string(),
            "VARCHAR(100)"
        );
        assert_eq!(
            ColumnType::new(DataType::Decimal)
                .with_length(10)
                .with_scale(2)
                .to_string(),
            "DECIMAL(10,2)"
        );
        let mut t = ColumnType::new(DataType::Int);
        t.signed = false;
        assert_eq!(t.to_string(), "INT UNSIGNED");
    }

    #[test]
    fn integer_types_accept_each_other() {
        let int = ColumnType::new(DataType::Int);
        let big = ColumnType::new(DataType::BigInt);
        let text = ColumnType::new(DataType::Text);
        assert!(int.accepts(&big));
        assert!(big.accepts(&int));
        assert!(!int.accepts(&text));
    }

    #[test]
    fn foreign_copy_drops_key_flags_and_owns_its_tags() {
        let mut pk = ColumnType::new(DataType::Int);
        pk.primary_key = true;
        pk.auto_increment = true;

        let mut fk = pk.to_foreign();
        assert!(!fk.primary_key);
        assert!(!fk.auto_increment);

        fk.accepted.insert(DataType::Text);
        assert!(!pk.accepted.contains(&DataType::Text));
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&DataType::VarChar).unwrap();
        assert_eq!(json, "\"VAR_CHAR\"");
        let back: DataType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DataType::VarChar);
    }
}
