//! Custom string converters and the shared scalar/text coercions.
//!
//! Everything that turns a scalar into text (serializer leaves, map keys)
//! or text into a scalar (string tokens, map keys) funnels through this
//! module, so the two directions cannot drift apart.

use core::any::TypeId;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::error::JsonError;
use crate::options::SerializationOptions;
use crate::{Reflect, ReflectMut};

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A custom string form for one concrete type.
///
/// A converter owns both directions: it renders values of its type as JSON
/// strings and re-parses those strings on the way back in. Registered
/// converters take precedence over every built-in rule for that type.
///
/// # Example
///
/// ```
/// use jsonbind::{JsonConverter, SerializationOptions};
///
/// let options = SerializationOptions::new().with_converter(
///     JsonConverter::new::<i32, _, _>(
///         |value| format!("#{value}"),
///         |text| text.strip_prefix('#')?.parse().ok(),
///     ),
/// );
/// ```
pub struct JsonConverter {
    ty: TypeId,
    to_text: Box<dyn Fn(&dyn Reflect) -> Option<String> + Send + Sync>,
    from_text: Box<dyn Fn(&str) -> Option<Box<dyn Reflect>> + Send + Sync>,
}

impl JsonConverter {
    pub fn new<T, S, D>(to_text: S, from_text: D) -> Self
    where
        T: Reflect,
        S: Fn(&T) -> String + Send + Sync + 'static,
        D: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        Self {
            ty: TypeId::of::<T>(),
            to_text: Box::new(move |value| value.downcast_ref::<T>().map(&to_text)),
            from_text: Box::new(move |text| {
                from_text(text).map(|value| Box::new(value) as Box<dyn Reflect>)
            }),
        }
    }

    #[inline]
    pub(crate) fn ty(&self) -> TypeId {
        self.ty
    }

    pub(crate) fn encode(&self, value: &dyn Reflect) -> Option<String> {
        (self.to_text)(value)
    }

    pub(crate) fn decode(&self, text: &str) -> Option<Box<dyn Reflect>> {
        (self.from_text)(text)
    }
}

/// A scalar rendered as text, tagged with whether it needs quoting.
pub(crate) enum ScalarToken {
    /// Emitted bare: numbers, booleans.
    Raw(String),
    /// Emitted as a JSON string: strings, identifiers, times.
    Text(String),
}

macro_rules! raw_display {
    ($value:ident, $($ty:ty),* $(,)?) => {$(
        if let Some(v) = $value.downcast_ref::<$ty>() {
            return Some(ScalarToken::Raw(v.to_string()));
        }
    )*};
}

/// Renders a recognized scalar as text, or `None` for foreign scalar types.
pub(crate) fn scalar_token(value: &dyn Reflect) -> Option<ScalarToken> {
    if let Some(b) = value.downcast_ref::<bool>() {
        return Some(ScalarToken::Raw(
            if *b { "true" } else { "false" }.to_owned(),
        ));
    }
    if let Some(text) = value.downcast_ref::<String>() {
        return Some(ScalarToken::Text(text.clone()));
    }
    raw_display!(
        value, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    );
    if let Some(id) = value.downcast_ref::<Uuid>() {
        return Some(ScalarToken::Text(id.to_string()));
    }
    if let Some(moment) = value.downcast_ref::<DateTime<Utc>>() {
        return Some(ScalarToken::Text(moment.to_rfc3339()));
    }
    if let Some(moment) = value.downcast_ref::<DateTime<FixedOffset>>() {
        return Some(ScalarToken::Text(moment.to_rfc3339()));
    }
    if let Some(moment) = value.downcast_ref::<NaiveDateTime>() {
        return Some(ScalarToken::Text(moment.format(NAIVE_FORMAT).to_string()));
    }
    if let Some(span) = value.downcast_ref::<Duration>() {
        return Some(ScalarToken::Text(format!(
            "{}.{:09}",
            span.as_secs(),
            span.subsec_nanos()
        )));
    }
    None
}

fn parse_duration(text: &str) -> Option<Duration> {
    let (secs, nanos) = match text.split_once('.') {
        Some((secs, nanos)) => (secs, nanos),
        None => (text, ""),
    };
    let secs: u64 = secs.parse().ok()?;
    if nanos.is_empty() {
        return Some(Duration::new(secs, 0));
    }
    if nanos.len() > 9 || !nanos.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Right-pad to nanosecond precision: ".5" means half a second.
    let mut padded = [b'0'; 9];
    padded[..nanos.len()].copy_from_slice(nanos.as_bytes());
    let nanos: u32 = std::str::from_utf8(&padded).ok()?.parse().ok()?;
    Some(Duration::new(secs, nanos))
}

macro_rules! text_parse {
    ($target:ident, $text:ident, $($ty:ty),* $(,)?) => {$(
        if let Some(slot) = $target.downcast_mut::<$ty>() {
            *slot = match $text.parse::<$ty>() {
                Ok(value) => value,
                Err(_) => return Err(unconvertible($text, stringify!($ty))),
            };
            return Ok(());
        }
    )*};
}

fn unconvertible(text: &str, target: &'static str) -> JsonError {
    JsonError::Unconvertible {
        text: text.to_owned(),
        target,
    }
}

/// Coerces a JSON string token into the target scalar.
///
/// Converter first, then the built-in text forms, then enum variant names
/// (with a numeric-text fallback).
pub(crate) fn assign_text(
    target: &mut dyn Reflect,
    text: &str,
    options: &SerializationOptions,
) -> Result<(), JsonError> {
    let target_name = target.reflect_type_info().type_name();

    if let Some(converter) = options.converter_for(target.ty_id()) {
        let value = converter
            .decode(text)
            .ok_or_else(|| unconvertible(text, target_name))?;
        return target
            .set(value)
            .map_err(|_| unconvertible(text, target_name));
    }

    if let Some(slot) = target.downcast_mut::<String>() {
        *slot = text.to_owned();
        return Ok(());
    }
    if let Some(slot) = target.downcast_mut::<bool>() {
        *slot = match text {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => return Err(unconvertible(text, "bool")),
        };
        return Ok(());
    }

    text_parse!(
        target, text, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    );

    if let Some(slot) = target.downcast_mut::<Uuid>() {
        *slot = Uuid::parse_str(text).map_err(|_| unconvertible(text, "Uuid"))?;
        return Ok(());
    }
    if let Some(slot) = target.downcast_mut::<DateTime<Utc>>() {
        let parsed = DateTime::parse_from_rfc3339(text)
            .map_err(|_| unconvertible(text, "DateTime<Utc>"))?;
        *slot = parsed.with_timezone(&Utc);
        return Ok(());
    }
    if let Some(slot) = target.downcast_mut::<DateTime<FixedOffset>>() {
        *slot = DateTime::parse_from_rfc3339(text)
            .map_err(|_| unconvertible(text, "DateTime<FixedOffset>"))?;
        return Ok(());
    }
    if let Some(slot) = target.downcast_mut::<NaiveDateTime>() {
        *slot = NaiveDateTime::parse_from_str(text, NAIVE_FORMAT)
            .map_err(|_| unconvertible(text, "NaiveDateTime"))?;
        return Ok(());
    }
    if let Some(slot) = target.downcast_mut::<Duration>() {
        *slot = parse_duration(text).ok_or_else(|| unconvertible(text, "Duration"))?;
        return Ok(());
    }

    if let ReflectMut::Enum(target) = target.reflect_mut() {
        let named = target
            .reflect_type_info()
            .as_enum()
            .and_then(|info| info.iter().find(|variant| variant.name() == text));
        if let Some(variant) = named {
            if target.set_by_discriminant(variant.discriminant()) {
                return Ok(());
            }
        }
        if let Ok(discriminant) = text.parse::<i64>() {
            if target.set_by_discriminant(discriminant) {
                return Ok(());
            }
        }
        return Err(unconvertible(text, target_name));
    }

    Err(unconvertible(text, target_name))
}

macro_rules! lexeme_parse_int {
    ($target:ident, $lexeme:ident, $($ty:ty),* $(,)?) => {$(
        if let Some(slot) = $target.downcast_mut::<$ty>() {
            *slot = match $lexeme.parse::<$ty>() {
                Ok(value) => value,
                // Fractional or exponent form aimed at an integer slot.
                Err(_) => $lexeme
                    .parse::<f64>()
                    .map_err(|_| unconvertible($lexeme, stringify!($ty)))?
                    as $ty,
            };
            return Ok(());
        }
    )*};
}

/// Coerces a JSON number token into the target.
pub(crate) fn assign_number(target: &mut dyn Reflect, lexeme: &str) -> Result<(), JsonError> {
    let target_name = target.reflect_type_info().type_name();

    lexeme_parse_int!(
        target, lexeme, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
    );
    text_parse!(target, lexeme, f32, f64);

    if let Some(slot) = target.downcast_mut::<bool>() {
        let value = lexeme
            .parse::<f64>()
            .map_err(|_| unconvertible(lexeme, "bool"))?;
        *slot = match value {
            v if v == 0.0 => false,
            v if v == 1.0 => true,
            _ => return Err(unconvertible(lexeme, "bool")),
        };
        return Ok(());
    }

    if let ReflectMut::Enum(target) = target.reflect_mut() {
        let discriminant = match lexeme.parse::<i64>() {
            Ok(value) => value,
            Err(_) => lexeme
                .parse::<f64>()
                .map_err(|_| unconvertible(lexeme, target_name))? as i64,
        };
        if target.set_by_discriminant(discriminant) {
            return Ok(());
        }
        return Err(unconvertible(lexeme, target_name));
    }

    Err(JsonError::MismatchedTarget {
        token: "number",
        target: target_name,
    })
}

/// Coerces a JSON boolean token into the target.
pub(crate) fn assign_bool(target: &mut dyn Reflect, value: bool) -> Result<(), JsonError> {
    if let Some(slot) = target.downcast_mut::<bool>() {
        *slot = value;
        return Ok(());
    }
    Err(JsonError::MismatchedTarget {
        token: "boolean",
        target: target.reflect_type_info().type_name(),
    })
}
