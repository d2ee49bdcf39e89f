//! Typed property values.
//!
//! Channels store one of a fixed set of value types. [`ValueType`] lists them
//! in the order the property editor offers them; [`PropertyValue`] carries an
//! actual value.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BlsettingsError, Result};

/// The value types a property can hold, in editor order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Empty,
    String,
    Bool,
    Int,
    Double,
    Uint,
    Int64,
    Uint64,
}

impl ValueType {
    /// Every type, in the order shown by the type selector.
    pub const ALL: [ValueType; 8] = [
        ValueType::Empty,
        ValueType::String,
        ValueType::Bool,
        ValueType::Int,
        ValueType::Double,
        ValueType::Uint,
        ValueType::Int64,
        ValueType::Uint64,
    ];

    /// Label shown in the type selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::String => "String",
            Self::Bool => "Boolean",
            Self::Int => "Int",
            Self::Double => "Double",
            Self::Uint => "Unsigned Int",
            Self::Int64 => "Int64",
            Self::Uint64 => "Unsigned Int64",
        }
    }

    /// Short machine name, as used on the command line and in JSON.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Double => "double",
            Self::Uint => "uint",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
        }
    }

    /// Parse a [`keyword`](Self::keyword) (a few aliases are accepted).
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "empty" | "none" => Some(Self::Empty),
            "string" | "str" => Some(Self::String),
            "bool" | "boolean" => Some(Self::Bool),
            "int" | "int32" => Some(Self::Int),
            "double" | "float" => Some(Self::Double),
            "uint" | "uint32" => Some(Self::Uint),
            "int64" => Some(Self::Int64),
            "uint64" => Some(Self::Uint64),
            _ => None,
        }
    }

    /// Position in [`ValueType::ALL`].
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Int | Self::Double | Self::Uint | Self::Int64 | Self::Uint64
        )
    }

    /// Range of the numeric entry for this type, or `None` when the type is
    /// not edited as a number.
    pub fn numeric_range(self) -> Option<(f64, f64)> {
        match self {
            Self::Int => Some((i32::MIN as f64, i32::MAX as f64)),
            Self::Double => Some((f64::MIN, f64::MAX)),
            Self::Uint => Some((0.0, u32::MAX as f64)),
            Self::Int64 => Some((i64::MIN as f64, i64::MAX as f64)),
            Self::Uint64 => Some((0.0, u64::MAX as f64)),
            Self::Empty | Self::String | Self::Bool => None,
        }
    }

    /// Decimal digits shown by the numeric entry.
    pub fn digits(self) -> u32 {
        if self == Self::Double { 4 } else { 0 }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A typed property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PropertyValue {
    String(String),
    Bool(bool),
    Int(i32),
    Double(f64),
    Uint(u32),
    Int64(i64),
    Uint64(u64),
}

impl PropertyValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::String(_) => ValueType::String,
            Self::Bool(_) => ValueType::Bool,
            Self::Int(_) => ValueType::Int,
            Self::Double(_) => ValueType::Double,
            Self::Uint(_) => ValueType::Uint,
            Self::Int64(_) => ValueType::Int64,
            Self::Uint64(_) => ValueType::Uint64,
        }
    }

    /// Build a numeric value from the numeric entry's `f64`.
    ///
    /// Integer types saturate at their bounds and truncate toward zero.
    /// Returns `None` for non-numeric types.
    pub fn from_number(ty: ValueType, number: f64) -> Option<Self> {
        match ty {
            ValueType::Int => Some(Self::Int(number as i32)),
            ValueType::Double => Some(Self::Double(number)),
            ValueType::Uint => Some(Self::Uint(number as u32)),
            ValueType::Int64 => Some(Self::Int64(number as i64)),
            ValueType::Uint64 => Some(Self::Uint64(number as u64)),
            ValueType::Empty | ValueType::String | ValueType::Bool => None,
        }
    }

    /// Parse command-line text as a value of type `ty`.
    ///
    /// `Ok(None)` means the type is [`ValueType::Empty`].
    pub fn parse(ty: ValueType, text: &str) -> Result<Option<Self>> {
        let value = match ty {
            ValueType::Empty => return Ok(None),
            ValueType::String => Self::String(text.to_string()),
            ValueType::Bool => match text.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Self::Bool(true),
                "false" | "0" | "no" | "off" => Self::Bool(false),
                _ => return Err(invalid(ty, text, "expected true or false")),
            },
            ValueType::Int => Self::Int(text.trim().parse().map_err(|e| invalid(ty, text, e))?),
            ValueType::Double => Self::Double(text.trim().parse().map_err(|e| invalid(ty, text, e))?),
            ValueType::Uint => Self::Uint(text.trim().parse().map_err(|e| invalid(ty, text, e))?),
            ValueType::Int64 => Self::Int64(text.trim().parse().map_err(|e| invalid(ty, text, e))?),
            ValueType::Uint64 => Self::Uint64(text.trim().parse().map_err(|e| invalid(ty, text, e))?),
        };
        Ok(Some(value))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Any integer variant whose value fits in an `i32`.
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Self::Int(v) => Some(v),
            Self::Uint(v) => i32::try_from(v).ok(),
            Self::Int64(v) => i32::try_from(v).ok(),
            Self::Uint64(v) => i32::try_from(v).ok(),
            _ => None,
        }
    }

    /// The value as an `f64` for the numeric entry.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Int(v) => Some(v as f64),
            Self::Double(v) => Some(v),
            Self::Uint(v) => Some(v as f64),
            Self::Int64(v) => Some(v as f64),
            Self::Uint64(v) => Some(v as f64),
            Self::String(_) | Self::Bool(_) => None,
        }
    }
}

fn invalid(ty: ValueType, text: &str, reason: impl fmt::Display) -> BlsettingsError {
    BlsettingsError::InvalidValue(format!("'{text}' is not a valid {ty}: {reason}"))
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            Self::Int(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Uint64(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_order_and_labels() {
        let labels: Vec<_> = ValueType::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Empty",
                "String",
                "Boolean",
                "Int",
                "Double",
                "Unsigned Int",
                "Int64",
                "Unsigned Int64"
            ]
        );
        assert_eq!(ValueType::Double.index(), 4);
    }

    #[test]
    fn keywords_roundtrip() {
        for ty in ValueType::ALL {
            assert_eq!(ValueType::from_keyword(ty.keyword()), Some(ty));
        }
        assert_eq!(ValueType::from_keyword("Boolean"), Some(ValueType::Bool));
        assert_eq!(ValueType::from_keyword("pixel"), None);
    }

    #[test]
    fn numeric_ranges() {
        assert_eq!(
            ValueType::Uint.numeric_range(),
            Some((0.0, u32::MAX as f64))
        );
        assert_eq!(ValueType::String.numeric_range(), None);
        assert_eq!(ValueType::Double.digits(), 4);
        assert_eq!(ValueType::Int.digits(), 0);
    }

    #[test]
    fn from_number_saturates() {
        assert_eq!(
            PropertyValue::from_number(ValueType::Uint, -5.0),
            Some(PropertyValue::Uint(0))
        );
        assert_eq!(
            PropertyValue::from_number(ValueType::Int, 1e12),
            Some(PropertyValue::Int(i32::MAX))
        );
        assert_eq!(
            PropertyValue::from_number(ValueType::Int, 2.9),
            Some(PropertyValue::Int(2))
        );
        assert_eq!(PropertyValue::from_number(ValueType::Bool, 1.0), None);
    }

    #[test]
    fn parse_text() {
        assert_eq!(
            PropertyValue::parse(ValueType::Int, " 96 ").unwrap(),
            Some(PropertyValue::Int(96))
        );
        assert_eq!(
            PropertyValue::parse(ValueType::Bool, "TRUE").unwrap(),
            Some(PropertyValue::Bool(true))
        );
        assert_eq!(PropertyValue::parse(ValueType::Empty, "x").unwrap(), None);
        assert!(PropertyValue::parse(ValueType::Uint, "-1").is_err());
        assert!(PropertyValue::parse(ValueType::Bool, "maybe").is_err());
    }

    #[test]
    fn accessors() {
        assert_eq!(PropertyValue::Uint(7).as_i32(), Some(7));
        assert_eq!(PropertyValue::Uint64(u64::MAX).as_i32(), None);
        assert_eq!(PropertyValue::Bool(true).as_i32(), None);
        assert_eq!(PropertyValue::String("x".into()).as_str(), Some("x"));
        assert_eq!(PropertyValue::Int64(-3).as_f64(), Some(-3.0));
    }

    #[test]
    fn json_shape() {
        let v = PropertyValue::Int(96);
        assert_eq!(
            serde_json::to_string(&v).unwrap(),
            r#"{"type":"int","value":96}"#
        );
        let back: PropertyValue =
            serde_json::from_str(r#"{"type":"string","value":"Adwaita"}"#).unwrap();
        assert_eq!(back, PropertyValue::String("Adwaita".into()));
    }

    #[test]
    fn display() {
        assert_eq!(PropertyValue::Bool(false).to_string(), "FALSE");
        assert_eq!(PropertyValue::Double(1.5).to_string(), "1.5");
    }
}
