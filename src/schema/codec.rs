//! Column codecs: native scalar values to and from JSON leaves
//!
//! An unset value (`None`) always maps to `null` and back. Strings holding a
//! double quote are rejected on encode: the parser reads a string up to the
//! next quote, so such a value could not be read back.

use std::fmt;

use super::errors::ValidationDetails;
use super::types::ColumnType;
use crate::json::Value;

/// Native value of one record field
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i32),
    Text(String),
    Bool(bool),
    Decimal(f64),
}

impl Scalar {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Scalar::Int(_) => ColumnType::Int,
            Scalar::Text(_) => ColumnType::String,
            Scalar::Bool(_) => ColumnType::Boolean,
            Scalar::Decimal(_) => ColumnType::Decimal,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Scalar::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Scalar::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a decimal, widening integers
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Scalar::Decimal(v) => Some(*v),
            Scalar::Int(v) => Some(f64::from(*v)),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Text(v) => write!(f, "{}", v),
            Scalar::Bool(v) => write!(f, "{}", v),
            Scalar::Decimal(v) => write!(f, "{}", v),
        }
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v)
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Decimal(v)
    }
}

/// Bidirectional converter for one column type.
///
/// Errors carry only the expected/actual pair; callers add the column name.
pub trait ColumnCodec: Send + Sync {
    fn column_type(&self) -> ColumnType;

    fn encode(&self, value: Option<&Scalar>) -> Result<Value, ValidationDetails>;

    fn decode(&self, value: &Value) -> Result<Option<Scalar>, ValidationDetails>;
}

fn mismatch(expected: ColumnType, actual: impl fmt::Display) -> ValidationDetails {
    ValidationDetails::type_mismatch("", expected.tag(), actual.to_string())
}

pub struct IntCodec;

impl ColumnCodec for IntCodec {
    fn column_type(&self) -> ColumnType {
        ColumnType::Int
    }

    fn encode(&self, value: Option<&Scalar>) -> Result<Value, ValidationDetails> {
        match value {
            None => Ok(Value::Null),
            Some(Scalar::Int(v)) => Ok(Value::Int(*v)),
            Some(other) => Err(mismatch(ColumnType::Int, other.column_type())),
        }
    }

    fn decode(&self, value: &Value) -> Result<Option<Scalar>, ValidationDetails> {
        match value {
            Value::Null => Ok(None),
            Value::Int(v) => Ok(Some(Scalar::Int(*v))),
            other => Err(mismatch(ColumnType::Int, other.kind())),
        }
    }
}

pub struct StringCodec;

impl ColumnCodec for StringCodec {
    fn column_type(&self) -> ColumnType {
        ColumnType::String
    }

    fn encode(&self, value: Option<&Scalar>) -> Result<Value, ValidationDetails> {
        match value {
            None => Ok(Value::Null),
            Some(Scalar::Text(v)) if v.contains('"') => Err(ValidationDetails::new(
                "",
                "string without double quotes",
                v.as_str(),
            )),
            Some(Scalar::Text(v)) => Ok(Value::String(v.clone())),
            Some(other) => Err(mismatch(ColumnType::String, other.column_type())),
        }
    }

    fn decode(&self, value: &Value) -> Result<Option<Scalar>, ValidationDetails> {
        match value {
            Value::Null => Ok(None),
            Value::String(v) => Ok(Some(Scalar::Text(v.clone()))),
            other => Err(mismatch(ColumnType::String, other.kind())),
        }
    }
}

pub struct BooleanCodec;

impl ColumnCodec for BooleanCodec {
    fn column_type(&self) -> ColumnType {
        ColumnType::Boolean
    }

    fn encode(&self, value: Option<&Scalar>) -> Result<Value, ValidationDetails> {
        match value {
            None => Ok(Value::Null),
            Some(Scalar::Bool(v)) => Ok(Value::Bool(*v)),
            Some(other) => Err(mismatch(ColumnType::Boolean, other.column_type())),
        }
    }

    fn decode(&self, value: &Value) -> Result<Option<Scalar>, ValidationDetails> {
        match value {
            Value::Null => Ok(None),
            Value::Bool(v) => Ok(Some(Scalar::Bool(*v))),
            other => Err(mismatch(ColumnType::Boolean, other.kind())),
        }
    }
}

/// Decimal columns accept integer input on both sides and widen it.
pub struct DecimalCodec;

impl ColumnCodec for DecimalCodec {
    fn column_type(&self) -> ColumnType {
        ColumnType::Decimal
    }

    fn encode(&self, value: Option<&Scalar>) -> Result<Value, ValidationDetails> {
        match value {
            None => Ok(Value::Null),
            Some(scalar) => scalar
                .as_decimal()
                .map(Value::Double)
                .ok_or_else(|| mismatch(ColumnType::Decimal, scalar.column_type())),
        }
    }

    fn decode(&self, value: &Value) -> Result<Option<Scalar>, ValidationDetails> {
        match value {
            Value::Null => Ok(None),
            Value::Double(_) | Value::Int(_) => Ok(value.as_f64().map(Scalar::Decimal)),
            other => Err(mismatch(ColumnType::Decimal, other.kind())),
        }
    }
}

static INT_CODEC: IntCodec = IntCodec;
static STRING_CODEC: StringCodec = StringCodec;
static BOOLEAN_CODEC: BooleanCodec = BooleanCodec;
static DECIMAL_CODEC: DecimalCodec = DecimalCodec;

/// Returns the codec for a column type
pub fn codec_for(column_type: ColumnType) -> &'static dyn ColumnCodec {
    match column_type {
        ColumnType::Int => &INT_CODEC,
        ColumnType::String => &STRING_CODEC,
        ColumnType::Boolean => &BOOLEAN_CODEC,
        ColumnType::Decimal => &DECIMAL_CODEC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_is_symmetric_for_every_codec() {
        for column_type in [
            ColumnType::Int,
            ColumnType::String,
            ColumnType::Boolean,
            ColumnType::Decimal,
        ] {
            let codec = codec_for(column_type);
            assert_eq!(codec.encode(None).unwrap(), Value::Null);
            assert_eq!(codec.decode(&Value::Null).unwrap(), None);
        }
    }

    #[test]
    fn test_decimal_widens_int_leaf() {
        let decoded = DecimalCodec.decode(&Value::Int(123)).unwrap();
        assert_eq!(decoded, Some(Scalar::Decimal(123.0)));
    }

    #[test]
    fn test_decimal_encodes_int_scalar_as_double() {
        let encoded = DecimalCodec.encode(Some(&Scalar::Int(7))).unwrap();
        assert_eq!(encoded, Value::Double(7.0));
    }

    #[test]
    fn test_int_rejects_double_leaf() {
        let err = IntCodec.decode(&Value::Double(1.5)).unwrap_err();
        assert_eq!(err.expected, "int");
        assert_eq!(err.actual, "double");
    }

    #[test]
    fn test_string_rejects_bool_scalar() {
        let err = StringCodec.encode(Some(&Scalar::Bool(true))).unwrap_err();
        assert_eq!(err.expected, "string");
        assert_eq!(err.actual, "boolean");
    }

    #[test]
    fn test_string_rejects_embedded_quote() {
        let err = StringCodec
            .encode(Some(&Scalar::Text("O\"Neil".to_string())))
            .unwrap_err();
        assert_eq!(err.expected, "string without double quotes");
        assert_eq!(err.actual, "O\"Neil");

        let backslash = StringCodec.encode(Some(&Scalar::Text(r"a\b".to_string())));
        assert_eq!(backslash.unwrap(), Value::String(r"a\b".to_string()));
    }

    #[test]
    fn test_boolean_round_values() {
        assert_eq!(
            BooleanCodec.encode(Some(&Scalar::Bool(false))).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            BooleanCodec.decode(&Value::Bool(true)).unwrap(),
            Some(Scalar::Bool(true))
        );
    }
}
