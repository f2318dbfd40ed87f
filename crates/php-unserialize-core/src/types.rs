//! Dynamically-typed values produced by the decoder.

use std::cmp::Ordering;
use std::fmt;

use bstr::{BStr, BString, ByteSlice};

use crate::error::{Result, UnserializeError};

/// A decoded PHP value.
///
/// Variant order matters: [`Value::kind`] ordering follows declaration
/// order, and [`PartialOrd`] compares the kind tag first.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// PHP null value.
    #[default]
    Null,

    /// PHP string value. Raw bytes, may contain embedded NULs or non-UTF8
    /// data; the decoder never re-encodes or unescapes string payloads.
    String(BString),

    /// PHP integer value.
    Int(i32),

    /// PHP boolean value.
    Bool(bool),

    /// PHP float/double value.
    Float(f64),

    /// PHP array value, materialized as either a sequence or a mapping.
    Array(ArrayValue),
}

/// The active kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Kind {
    /// Null value.
    Null,
    /// Byte string.
    String,
    /// Signed integer.
    Int,
    /// Boolean.
    Bool,
    /// Double-precision float.
    Float,
    /// Sequence or mapping.
    Array,
}

/// A decoded PHP array.
///
/// The wire format does not distinguish the two shapes; the decoder picks
/// one after parsing the whole construct. Keys that were exactly
/// `0, 1, .., n-1` in encounter order collapse into a [`Sequence`]; anything
/// else stays a [`Mapping`] with keys preserved in insertion order.
///
/// [`Sequence`]: ArrayValue::Sequence
/// [`Mapping`]: ArrayValue::Mapping
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValue {
    /// Ordered list of values with implicit `0..n` integer keys.
    Sequence(Vec<Value>),

    /// Insertion-ordered key/value pairs with unique keys.
    Mapping(Vec<(Value, Value)>),
}

/// The active kind of an [`ArrayValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    /// Ordered list.
    Sequence,
    /// Ordered associative collection.
    Mapping,
}

impl Value {
    /// Return the active kind of this value.
    #[inline]
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::String(_) => Kind::String,
            Value::Int(_) => Kind::Int,
            Value::Bool(_) => Kind::Bool,
            Value::Float(_) => Kind::Float,
            Value::Array(_) => Kind::Array,
        }
    }

    /// Check if the value is null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if the value is a string.
    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Check if the value is an integer.
    #[inline]
    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    /// Check if the value is a boolean.
    #[inline]
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Check if the value is a float.
    #[inline]
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Check if the value is an array.
    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Get the value as a byte string.
    #[inline]
    pub fn as_bytes(&self) -> Result<&BStr> {
        match self {
            Value::String(s) => Ok(s.as_bstr()),
            other => Err(UnserializeError::type_mismatch("string", other.type_name())),
        }
    }

    /// Get the value as a UTF-8 string slice.
    ///
    /// Fails with a type mismatch for non-string values and for string
    /// payloads that are not valid UTF-8; use [`Self::as_bytes`] for raw
    /// access.
    #[inline]
    pub fn as_str(&self) -> Result<&str> {
        let bytes = self.as_bytes()?;
        bytes
            .to_str()
            .map_err(|_| UnserializeError::type_mismatch("utf-8 string", "binary string"))
    }

    /// Get the value as an integer.
    #[inline]
    pub fn as_int(&self) -> Result<i32> {
        match self {
            Value::Int(i) => Ok(*i),
            other => Err(UnserializeError::type_mismatch("integer", other.type_name())),
        }
    }

    /// Get the value as a boolean.
    #[inline]
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(UnserializeError::type_mismatch("boolean", other.type_name())),
        }
    }

    /// Get the value as a float.
    #[inline]
    pub fn as_float(&self) -> Result<f64> {
        match self {
            Value::Float(f) => Ok(*f),
            other => Err(UnserializeError::type_mismatch("float", other.type_name())),
        }
    }

    /// Get the value as an array.
    #[inline]
    pub fn as_array(&self) -> Result<&ArrayValue> {
        match self {
            Value::Array(a) => Ok(a),
            other => Err(UnserializeError::type_mismatch("array", other.type_name())),
        }
    }

    /// Get a type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::String(_) => "string",
            Value::Int(_) => "integer",
            Value::Bool(_) => "boolean",
            Value::Float(_) => "float",
            Value::Array(_) => "array",
        }
    }
}

impl PartialOrd for Value {
    /// Order values by kind tag first, then by payload within equal kinds.
    ///
    /// Null-vs-null and array-vs-array rank equal; for arrays this means
    /// two distinct arrays used as mapping keys are indistinguishable to
    /// the ordering, though not to equality.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.kind().cmp(&other.kind()) {
            Ordering::Equal => {}
            ord => return Some(ord),
        }
        Some(match (self, other) {
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        })
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(BString::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(BString::from(v))
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::String(BString::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<ArrayValue> for Value {
    fn from(v: ArrayValue) -> Self {
        Value::Array(v)
    }
}

impl ArrayValue {
    /// Return the active kind of this array.
    #[inline]
    pub fn kind(&self) -> ArrayKind {
        match self {
            ArrayValue::Sequence(_) => ArrayKind::Sequence,
            ArrayValue::Mapping(_) => ArrayKind::Mapping,
        }
    }

    /// Check if the array is a sequence.
    #[inline]
    pub fn is_sequence(&self) -> bool {
        matches!(self, ArrayValue::Sequence(_))
    }

    /// Check if the array is a mapping.
    #[inline]
    pub fn is_mapping(&self) -> bool {
        matches!(self, ArrayValue::Mapping(_))
    }

    /// Get the array as a sequence of values.
    #[inline]
    pub fn as_sequence(&self) -> Result<&[Value]> {
        match self {
            ArrayValue::Sequence(v) => Ok(v.as_slice()),
            ArrayValue::Mapping(_) => Err(UnserializeError::type_mismatch("sequence", "mapping")),
        }
    }

    /// Get the array as insertion-ordered key/value pairs.
    #[inline]
    pub fn as_mapping(&self) -> Result<&[(Value, Value)]> {
        match self {
            ArrayValue::Mapping(v) => Ok(v.as_slice()),
            ArrayValue::Sequence(_) => Err(UnserializeError::type_mismatch("mapping", "sequence")),
        }
    }

    /// Look up a mapping entry by key.
    ///
    /// Returns `None` both when the key is absent and when the array is a
    /// sequence; sequences are indexed through [`Self::as_sequence`].
    pub fn get(&self, key: &Value) -> Option<&Value> {
        match self {
            ArrayValue::Mapping(pairs) => {
                pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
            }
            ArrayValue::Sequence(_) => None,
        }
    }

    /// Number of elements (sequence) or entries (mapping).
    pub fn len(&self) -> usize {
        match self {
            ArrayValue::Sequence(v) => v.len(),
            ArrayValue::Mapping(v) => v.len(),
        }
    }

    /// Check if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::String(s) => match s.to_str() {
                Ok(s) => write!(f, "\"{}\"", s),
                Err(_) => write!(f, "<binary {} bytes>", s.len()),
            },
            Value::Int(i) => write!(f, "{}", i),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Array(a) => write!(f, "{}", a),
        }
    }
}

impl fmt::Display for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        match self {
            ArrayValue::Sequence(values) => {
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
            }
            ArrayValue::Mapping(pairs) => {
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", k, v)?;
                }
            }
        }
        write!(f, "]")
    }
}
