//! Per-call configuration: converters, member-name transforms and matching
//! flags.
//!
//! Options are read-only during an operation, so one instance can be
//! shared freely across threads and calls.

use std::borrow::Cow;
use std::fmt;

use core::any::TypeId;

use crate::convert::JsonConverter;

/// Rewrites declared member names into their wire form.
///
/// A transform applies on both sides of the codec: names are transformed
/// before writing and before matching, so any transform round-trips.
pub trait NameTransform: Send + Sync {
    fn transform(&self, declared: &str) -> String;
}

/// Lowercases the first character: `Name` becomes `name`.
pub struct CamelCase;

impl NameTransform for CamelCase {
    fn transform(&self, declared: &str) -> String {
        let mut chars = declared.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Configuration for one serialize or deserialize call.
#[derive(Default)]
pub struct SerializationOptions {
    converters: Vec<JsonConverter>,
    name_transform: Option<Box<dyn NameTransform>>,
    case_insensitive_names: bool,
}

impl SerializationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a custom string form for one concrete type.
    ///
    /// Converters win over every built-in rule; with several converters for
    /// the same type, the first registered wins.
    pub fn with_converter(mut self, converter: JsonConverter) -> Self {
        self.converters.push(converter);
        self
    }

    /// Installs a member-name transform, e.g. [`CamelCase`].
    pub fn with_name_transform(mut self, transform: impl NameTransform + 'static) -> Self {
        self.name_transform = Some(Box::new(transform));
        self
    }

    /// Also accept member names that differ from the (transformed)
    /// declared name only by ASCII case. Exact matches still win.
    pub fn with_case_insensitive_names(mut self, enabled: bool) -> Self {
        self.case_insensitive_names = enabled;
        self
    }

    pub(crate) fn converter_for(&self, ty: TypeId) -> Option<&JsonConverter> {
        self.converters.iter().find(|converter| converter.ty() == ty)
    }

    pub(crate) fn case_insensitive_names(&self) -> bool {
        self.case_insensitive_names
    }

    /// The wire form of a declared member name.
    pub(crate) fn wire_name<'a>(&self, declared: &'a str) -> Cow<'a, str> {
        match &self.name_transform {
            Some(transform) => Cow::Owned(transform.transform(declared)),
            None => Cow::Borrowed(declared),
        }
    }
}

impl fmt::Debug for SerializationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializationOptions")
            .field("converters", &self.converters.len())
            .field("name_transform", &self.name_transform.is_some())
            .field("case_insensitive_names", &self.case_insensitive_names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{CamelCase, NameTransform, SerializationOptions};

    #[test]
    fn camel_case_lowercases_the_first_letter() {
        assert_eq!(CamelCase.transform("Name"), "name");
        assert_eq!(CamelCase.transform("ID"), "iD");
        assert_eq!(CamelCase.transform("already"), "already");
        assert_eq!(CamelCase.transform(""), "");
    }

    #[test]
    fn wire_name_defaults_to_the_declared_name() {
        let options = SerializationOptions::new();
        assert_eq!(options.wire_name("Name"), "Name");
        let options = options.with_name_transform(CamelCase);
        assert_eq!(options.wire_name("Name"), "name");
    }
}
