//! Runtime value representation.
//!
//! Values are what live on the operand stack and in a prototype's constant
//! table. Strings are immutable byte buffers shared by reference count, so
//! cloning a value never copies string contents.

use std::fmt;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::number;
use crate::type_tag::TypeTag;

/// A runtime value.
///
/// The absent value (a lookup past the top of the stack) is not a variant;
/// lookups return `Option<&Value>` and report it as `None`.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Boolean(bool),
    /// 64-bit signed integer subtype of number.
    Integer(i64),
    /// IEEE-754 double subtype of number.
    Float(f64),
    /// Immutable byte string.
    String(Rc<[u8]>),
}

// Structural equality: same variant, same payload, floats compared by bit
// pattern. Language-level equality, which lets `2` equal `2.0`, is
// `Value::equals`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl Value {
    /// Create a string value from any byte-like input.
    pub fn string(bytes: impl AsRef<[u8]>) -> Self {
        Value::String(Rc::from(bytes.as_ref()))
    }

    /// Returns the type tag for this value.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Nil => TypeTag::Nil,
            Value::Boolean(_) => TypeTag::Boolean,
            Value::Integer(_) | Value::Float(_) => TypeTag::Number,
            Value::String(_) => TypeTag::String,
        }
    }

    /// Returns the user-facing name of this value's type.
    pub fn type_name(&self) -> &'static str {
        self.type_tag().name()
    }

    /// Truthiness: only `nil` and `false` are false.
    pub fn to_boolean(&self) -> bool {
        !matches!(self, Value::Nil | Value::Boolean(false))
    }

    /// Coerce to a float. Strings are parsed as float literals.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            Value::String(s) => number::parse_float(s),
            _ => None,
        }
    }

    /// Coerce to an integer without losing information.
    ///
    /// Floats narrow only when exact. Strings are tried as integer literals
    /// first, then as float literals narrowed by the same rule.
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Float(f) => number::float_to_integer(*f),
            Value::String(s) => number::parse_integer(s)
                .or_else(|| number::parse_float(s).and_then(number::float_to_integer)),
            _ => None,
        }
    }

    /// Coerce to a string. Numbers render in canonical text form.
    pub fn to_text(&self) -> Option<Rc<[u8]>> {
        match self {
            Value::String(s) => Some(Rc::clone(s)),
            Value::Integer(i) => Some(Rc::from(number::integer_to_text(*i).as_bytes())),
            Value::Float(f) => Some(Rc::from(number::float_to_text(*f).as_bytes())),
            _ => None,
        }
    }

    /// True if this is a number with the integer subtype.
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    /// True for numbers and strings convertible to numbers.
    pub fn is_number(&self) -> bool {
        self.to_number().is_some()
    }

    /// Language-level equality.
    ///
    /// Integers and floats compare numerically after widening the integer;
    /// every other pair must share a variant.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(a), Value::Float(b)) => *a as f64 == *b,
            (Value::Float(a), Value::Integer(b)) => *a == *b as f64,
            _ => false,
        }
    }

    /// `self < other` for number/number and string/string pairs.
    pub fn less_than(&self, other: &Value) -> Result<bool, RuntimeError> {
        match (self, other) {
            (Value::String(a), Value::String(b)) => Ok(a < b),
            (Value::Integer(a), Value::Integer(b)) => Ok(a < b),
            (Value::Integer(a), Value::Float(b)) => Ok((*a as f64) < *b),
            (Value::Float(a), Value::Integer(b)) => Ok(*a < *b as f64),
            (Value::Float(a), Value::Float(b)) => Ok(a < b),
            _ => Err(self.order_error(other)),
        }
    }

    /// `self <= other` for number/number and string/string pairs.
    pub fn less_equal(&self, other: &Value) -> Result<bool, RuntimeError> {
        match (self, other) {
            (Value::String(a), Value::String(b)) => Ok(a <= b),
            (Value::Integer(a), Value::Integer(b)) => Ok(a <= b),
            (Value::Integer(a), Value::Float(b)) => Ok((*a as f64) <= *b),
            (Value::Float(a), Value::Integer(b)) => Ok(*a <= *b as f64),
            (Value::Float(a), Value::Float(b)) => Ok(a <= b),
            _ => Err(self.order_error(other)),
        }
    }

    fn order_error(&self, other: &Value) -> RuntimeError {
        RuntimeError::Order {
            left: self.type_name(),
            right: other.type_name(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => f.write_str(&number::integer_to_text(*i)),
            Value::Float(x) => f.write_str(&number::float_to_text(*x)),
            Value::String(s) => f.write_str(&String::from_utf8_lossy(s)),
        }
    }
}
