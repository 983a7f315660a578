//! Runtime values flowing through conversion routines.

mod field_set;
pub use field_set::FieldSet;

mod record_value;
pub use record_value::RecordValue;

use crate::schema::Type;
use crate::{Error, Result};

#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Signed 64-bit integer
    I64(i64),

    /// 64-bit floating point
    F64(f64),

    /// String value
    String(String),

    /// An instance of a described record
    Record(Box<RecordValue>),

    /// A list of values of the same type
    List(Vec<Value>),

    /// Null value
    #[default]
    Null,
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordValue> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn to_record(self) -> Result<RecordValue> {
        match self {
            Self::Record(record) => Ok(*record),
            _ => Err(Error::evaluation_failed("expected a record value")),
        }
    }

    pub fn to_list(self) -> Result<Vec<Value>> {
        match self {
            Self::List(items) => Ok(items),
            _ => Err(Error::evaluation_failed("expected a list value")),
        }
    }

    /// Returns true if the value inhabits the given type.
    ///
    /// Null inhabits every type; whether null is *allowed* is the field's
    /// nullability, checked separately.
    pub fn is_a(&self, ty: &Type) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(_) => matches!(ty, Type::Bool),
            Self::I64(_) => matches!(ty, Type::I64),
            Self::F64(_) => matches!(ty, Type::F64),
            Self::String(_) => matches!(ty, Type::String),
            Self::Record(value) => matches!(ty, Type::Record(id) if value.record == *id),
            Self::List(items) => match ty {
                Type::List(item_ty) => items.iter().all(|item| item.is_a(item_ty)),
                _ => false,
            },
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<RecordValue> for Value {
    fn from(src: RecordValue) -> Self {
        Self::Record(Box::new(src))
    }
}

impl From<Vec<Value>> for Value {
    fn from(src: Vec<Value>) -> Self {
        Self::List(src)
    }
}
