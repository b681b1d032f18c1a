//! # Native conversions
//!
//! `Wire` is how a native Rust type declares its representation on the relay.
//! Implementations must round-trip: `T::from_value(x.to_value()) == Ok(x)`.

use crate::Error;
use crate::Result;
use crate::Value;

/// Conversion between a native type and its `Value` representation.
pub trait Wire: Sized {
    fn to_value(&self) -> Value;
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch<T>(expected: &'static str, found: &Value) -> Result<T> {
    Err(Error::TypeMismatch { expected, found: found.kind() })
}

impl Wire for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl Wire for () {
    fn to_value(&self) -> Value {
        Value::Unit
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Unit => Ok(()),
            other => mismatch("unit", &other),
        }
    }
}

impl Wire for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => mismatch("bool", &other),
        }
    }
}

impl Wire for f64 {
    fn to_value(&self) -> Value {
        Value::F64(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::F64(v) => Ok(v),
            other => mismatch("f64", &other),
        }
    }
}

impl Wire for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Str(s) => Ok(s),
            other => mismatch("string", &other),
        }
    }
}

macro_rules! wire_unsigned {
    ($($ty:ty),*) => {$(
        impl Wire for $ty {
            fn to_value(&self) -> Value {
                Value::U64(u64::from(*self))
            }

            fn from_value(value: Value) -> Result<Self> {
                match value {
                    Value::U64(v) => <$ty>::try_from(v).map_err(|_| Error::OutOfRange {
                        ty: stringify!($ty),
                        value: v.to_string(),
                    }),
                    other => mismatch("u64", &other),
                }
            }
        }
    )*};
}

macro_rules! wire_signed {
    ($($ty:ty),*) => {$(
        impl Wire for $ty {
            fn to_value(&self) -> Value {
                Value::S64(i64::from(*self))
            }

            fn from_value(value: Value) -> Result<Self> {
                match value {
                    Value::S64(v) => <$ty>::try_from(v).map_err(|_| Error::OutOfRange {
                        ty: stringify!($ty),
                        value: v.to_string(),
                    }),
                    other => mismatch("s64", &other),
                }
            }
        }
    )*};
}

wire_unsigned!(u8, u16, u32, u64);
wire_signed!(i8, i16, i32, i64);

impl<T: Wire> Wire for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(Wire::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => mismatch("list", &other),
        }
    }
}

impl<T: Wire> Wire for Option<T> {
    fn to_value(&self) -> Value {
        Value::Option(self.as_ref().map(|v| Box::new(v.to_value())))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Option(None) => Ok(None),
            Value::Option(Some(inner)) => T::from_value(*inner).map(Some),
            other => mismatch("option", &other),
        }
    }
}

/// Builds a `Value::Record` field by field.
///
/// ```
/// use twinpack::{Record, Value};
/// let v = Record::new().field("message", &"hi".to_string()).build();
/// assert_eq!(v.field("message"), Some(&Value::str("hi")));
/// ```
#[derive(Debug, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field<T: Wire>(mut self, name: &str, value: &T) -> Self {
        self.fields.push((name.to_string(), value.to_value()));
        self
    }

    pub fn build(self) -> Value {
        Value::Record(self.fields)
    }
}

/// Reads a `Value::Record` field by field.
///
/// Fields the reader never asks for are ignored, so senders may add fields
/// without breaking older readers.
#[derive(Debug)]
pub struct Fields {
    fields: Vec<(String, Value)>,
}

impl Fields {
    pub fn new(value: Value) -> Result<Self> {
        match value {
            Value::Record(fields) => Ok(Self { fields }),
            other => mismatch("record", &other),
        }
    }

    /// Removes and converts the named field.
    pub fn take<T: Wire>(&mut self, name: &str) -> Result<T> {
        let pos = self
            .fields
            .iter()
            .position(|(k, _)| k == name)
            .ok_or_else(|| Error::MissingField(name.to_string()))?;
        let (_, value) = self.fields.swap_remove(pos);
        T::from_value(value)
    }

    /// Like `take`, but a missing field yields `None`.
    pub fn take_opt<T: Wire>(&mut self, name: &str) -> Result<Option<T>> {
        match self.fields.iter().position(|(k, _)| k == name) {
            Some(pos) => {
                let (_, value) = self.fields.swap_remove(pos);
                T::from_value(value).map(Some)
            }
            None => Ok(None),
        }
    }
}
