//! The untyped JSON tree.
//!
//! [`Value`] is what the parser produces when no declared type directs the
//! decode: for weakly-typed deserialization targets, and for members of the
//! input that match nothing in the target's shape (those are still parsed
//! in full so the cursor stays in sync, then dropped).

use crate::cell::NonGenericTypeInfoCell;
use crate::info::{ScalarInfo, TypeInfo, Typed};
use crate::{Reflect, ReflectKind, ReflectMut, ReflectRef};

/// A JSON number, kept as an integer when the token had no fraction or
/// exponent so integer inputs survive a round trip exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_i64(&self) -> i64 {
        match *self {
            Self::Int(n) => n,
            Self::Float(n) => n as i64,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Int(n) => n as f64,
            Self::Float(n) => n,
        }
    }
}

/// Any JSON value, untyped.
///
/// Objects keep their members in input order as a pair list; member lookup
/// is a linear scan, which matches how the tree is used (small, transient).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Looks up an object member by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Object(members) => members
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(n.as_i64()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl Typed for Value {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Dynamic(ScalarInfo::new::<Value>()))
    }
}

impl Reflect for Value {
    fn reflect_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }

    #[inline]
    fn reflect_kind(&self) -> ReflectKind {
        ReflectKind::Dynamic
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Dynamic(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Dynamic(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{Number, Value};

    #[test]
    fn object_lookup_is_by_name() {
        let value = Value::Object(vec![
            ("id".to_owned(), Value::Number(Number::Int(1))),
            ("name".to_owned(), Value::String("gucci".to_owned())),
        ]);
        assert_eq!(value.get("id").and_then(Value::as_i64), Some(1));
        assert_eq!(value.get("name").and_then(Value::as_str), Some("gucci"));
        assert!(value.get("missing").is_none());
    }

    #[test]
    fn numbers_coerce_both_ways() {
        assert_eq!(Number::Int(3).as_f64(), 3.0);
        assert_eq!(Number::Float(3.9).as_i64(), 3);
    }
}
