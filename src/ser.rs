//! The JSON writer.
//!
//! [`JsonSerializer`] walks a `&dyn Reflect` by kind and emits compact
//! JSON (no insertion of whitespace). Output goes through a [`Sink`] so a
//! string buffer and an `io::Write` stream produce byte-identical
//! documents.

use std::io::Write;

use crate::convert::{self, ScalarToken};
use crate::error::JsonError;
use crate::ops::Struct;
use crate::options::SerializationOptions;
use crate::value::{Number, Value};
use crate::{Reflect, ReflectRef};

/// Where serialized text lands.
pub(crate) trait Sink {
    fn write_str(&mut self, text: &str) -> Result<(), JsonError>;
}

impl Sink for String {
    fn write_str(&mut self, text: &str) -> Result<(), JsonError> {
        self.push_str(text);
        Ok(())
    }
}

/// Adapts an `io::Write` into a [`Sink`].
pub(crate) struct IoSink<W: Write> {
    writer: W,
}

impl<W: Write> IoSink<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self { writer }
    }

    pub(crate) fn flush(&mut self) -> Result<(), JsonError> {
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> Sink for IoSink<W> {
    fn write_str(&mut self, text: &str) -> Result<(), JsonError> {
        self.writer.write_all(text.as_bytes())?;
        Ok(())
    }
}

pub(crate) struct JsonSerializer<'s, 'o> {
    sink: &'s mut dyn Sink,
    options: &'o SerializationOptions,
}

impl<'s, 'o> JsonSerializer<'s, 'o> {
    pub(crate) fn new(sink: &'s mut dyn Sink, options: &'o SerializationOptions) -> Self {
        Self { sink, options }
    }

    /// Emits one value. Rule order: absent optionals as `null`, then
    /// registered converters on the exact runtime type, then the built-in
    /// kind rules.
    pub(crate) fn write_value(&mut self, value: &dyn Reflect) -> Result<(), JsonError> {
        if let ReflectRef::Optional(optional) = value.reflect_ref() {
            return match optional.value() {
                Some(inner) => self.write_value(inner),
                None => self.sink.write_str("null"),
            };
        }

        if let Some(converter) = self.options.converter_for(value.ty_id()) {
            let text = converter.encode(value).ok_or_else(|| {
                JsonError::UnsupportedType(value.reflect_type_info().type_name())
            })?;
            return self.write_string(&text);
        }

        match value.reflect_ref() {
            ReflectRef::Scalar(scalar) => self.write_scalar(scalar),
            ReflectRef::Enum(value) => {
                self.sink.write_str(&value.discriminant().to_string())
            }
            ReflectRef::Struct(value) => self.write_struct(value),
            ReflectRef::List(value) => {
                self.sink.write_str("[")?;
                for index in 0..value.len() {
                    if index > 0 {
                        self.sink.write_str(",")?;
                    }
                    match value.get(index) {
                        Some(item) => self.write_value(item)?,
                        None => self.sink.write_str("null")?,
                    }
                }
                self.sink.write_str("]")
            }
            ReflectRef::Map(value) => {
                self.sink.write_str("{")?;
                for (index, (key, entry)) in value.iter().enumerate() {
                    if index > 0 {
                        self.sink.write_str(",")?;
                    }
                    self.write_map_key(key)?;
                    self.sink.write_str(":")?;
                    self.write_value(entry)?;
                }
                self.sink.write_str("}")
            }
            ReflectRef::Dynamic(value) => self.write_dynamic(value),
            ReflectRef::Optional(_) => unreachable!("handled above"),
        }
    }

    fn write_scalar(&mut self, scalar: &dyn Reflect) -> Result<(), JsonError> {
        match convert::scalar_token(scalar) {
            Some(ScalarToken::Raw(text)) => self.sink.write_str(&text),
            Some(ScalarToken::Text(text)) => self.write_string(&text),
            None => Err(JsonError::UnsupportedType(
                scalar.reflect_type_info().type_name(),
            )),
        }
    }

    fn write_struct(&mut self, value: &dyn Struct) -> Result<(), JsonError> {
        let info = value.reflect_type_info();
        let info = info
            .as_struct()
            .ok_or(JsonError::UnsupportedType(info.type_name()))?;

        self.sink.write_str("{")?;
        for (index, member) in info.iter().enumerate() {
            if index > 0 {
                self.sink.write_str(",")?;
            }
            self.write_string(&self.options.wire_name(member.name()))?;
            self.sink.write_str(":")?;
            match value.field_at(index) {
                Some(member) => self.write_value(member)?,
                None => self.sink.write_str("null")?,
            }
        }
        self.sink.write_str("}")
    }

    /// Map keys are always strings on the wire, whatever their Rust type.
    fn write_map_key(&mut self, key: &dyn Reflect) -> Result<(), JsonError> {
        if let Some(converter) = self.options.converter_for(key.ty_id()) {
            if let Some(text) = converter.encode(key) {
                return self.write_string(&text);
            }
        }
        if let ReflectRef::Enum(key) = key.reflect_ref() {
            return self.write_string(&key.discriminant().to_string());
        }
        match convert::scalar_token(key) {
            Some(ScalarToken::Raw(text) | ScalarToken::Text(text)) => self.write_string(&text),
            None => Err(JsonError::UnsupportedType(
                key.reflect_type_info().type_name(),
            )),
        }
    }

    fn write_dynamic(&mut self, value: &Value) -> Result<(), JsonError> {
        match value {
            Value::Null => self.sink.write_str("null"),
            Value::Bool(true) => self.sink.write_str("true"),
            Value::Bool(false) => self.sink.write_str("false"),
            Value::Number(Number::Int(n)) => self.sink.write_str(&n.to_string()),
            Value::Number(Number::Float(n)) => self.sink.write_str(&n.to_string()),
            Value::String(text) => self.write_string(text),
            Value::Array(items) => {
                self.sink.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        self.sink.write_str(",")?;
                    }
                    self.write_dynamic(item)?;
                }
                self.sink.write_str("]")
            }
            Value::Object(members) => {
                self.sink.write_str("{")?;
                for (index, (name, member)) in members.iter().enumerate() {
                    if index > 0 {
                        self.sink.write_str(",")?;
                    }
                    self.write_string(name)?;
                    self.sink.write_str(":")?;
                    self.write_dynamic(member)?;
                }
                self.sink.write_str("}")
            }
        }
    }

    /// Quotes and escapes one string token.
    fn write_string(&mut self, text: &str) -> Result<(), JsonError> {
        let mut quoted = String::with_capacity(text.len() + 2);
        quoted.push('"');
        for c in text.chars() {
            match c {
                '"' => quoted.push_str("\\\""),
                '\\' => quoted.push_str("\\\\"),
                '/' => quoted.push_str("\\/"),
                '\u{0008}' => quoted.push_str("\\b"),
                '\u{000C}' => quoted.push_str("\\f"),
                '\n' => quoted.push_str("\\n"),
                '\r' => quoted.push_str("\\r"),
                '\t' => quoted.push_str("\\t"),
                c => quoted.push(c),
            }
        }
        quoted.push('"');
        self.sink.write_str(&quoted)
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonSerializer, Sink};
    use crate::cell::NonGenericTypeInfoCell;
    use crate::error::JsonError;
    use crate::info::{ScalarInfo, TypeInfo, Typed};
    use crate::options::SerializationOptions;
    use crate::{Reflect, ReflectKind, ReflectMut, ReflectRef};

    fn to_json(value: &dyn Reflect) -> Result<String, JsonError> {
        let options = SerializationOptions::new();
        let mut out = String::new();
        JsonSerializer::new(&mut out as &mut dyn Sink, &options).write_value(value)?;
        Ok(out)
    }

    #[test]
    fn scalars_take_their_token_forms() {
        assert_eq!(to_json(&3_i32).unwrap(), "3");
        assert_eq!(to_json(&3.0_f64).unwrap(), "3");
        assert_eq!(to_json(&true).unwrap(), "true");
        assert_eq!(to_json(&"hi".to_owned()).unwrap(), "\"hi\"");
    }

    #[test]
    fn every_listed_control_character_is_escaped() {
        let text = "\"\\/\u{0008}\u{000C}\n\r\t".to_owned();
        assert_eq!(
            to_json(&text).unwrap(),
            r#""\"\\\/\b\f\n\r\t""#
        );
    }

    #[test]
    fn optionals_write_null_or_the_inner_value() {
        let none: Option<i32> = None;
        assert_eq!(to_json(&none).unwrap(), "null");
        assert_eq!(to_json(&Some(5_i32)).unwrap(), "5");
    }

    struct Opaque;

    impl Typed for Opaque {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| TypeInfo::Scalar(ScalarInfo::new::<Opaque>()))
        }
    }

    impl Reflect for Opaque {
        fn reflect_type_info(&self) -> &'static TypeInfo {
            <Self as Typed>::type_info()
        }
        fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
            *self = value.take::<Self>()?;
            Ok(())
        }
        fn reflect_kind(&self) -> ReflectKind {
            ReflectKind::Scalar
        }
        fn reflect_ref(&self) -> ReflectRef<'_> {
            ReflectRef::Scalar(self)
        }
        fn reflect_mut(&mut self) -> ReflectMut<'_> {
            ReflectMut::Scalar(self)
        }
    }

    #[test]
    fn unrecognized_scalar_types_are_fatal() {
        assert!(matches!(
            to_json(&Opaque),
            Err(JsonError::UnsupportedType(_))
        ));
    }
}
