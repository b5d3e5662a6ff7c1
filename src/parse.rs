//! The recursive-descent JSON reader.
//!
//! [`JsonParser`] dispatches on the single lookahead character and on the
//! declared kind of the decode target, coercing tokens directly into a
//! `&mut dyn Reflect` that the caller has default-constructed. Members of
//! the input that match nothing in the target's shape are still parsed in
//! full (into a discarded [`Value`]) so the cursor stays in sync.
//!
//! Trailing content after the first complete value is not inspected, and a
//! blank document leaves the target untouched.

use crate::convert;
use crate::error::JsonError;
use crate::info::StructInfo;
use crate::options::SerializationOptions;
use crate::source::CharSource;
use crate::value::{Number, Value};
use crate::{Reflect, ReflectMut};

pub struct JsonParser<'src, 'opt> {
    source: CharSource<'src>,
    options: &'opt SerializationOptions,
}

impl<'src, 'opt> JsonParser<'src, 'opt> {
    pub fn new(source: CharSource<'src>, options: &'opt SerializationOptions) -> Self {
        Self { source, options }
    }

    /// Decodes one document into `target`.
    ///
    /// A document that is empty or all whitespace is a no-op.
    pub fn parse_document(&mut self, target: &mut dyn Reflect) -> Result<(), JsonError> {
        self.skip_white()?;
        if self.source.at_end() {
            return Ok(());
        }
        self.parse_into(target)
    }

    /// Decodes the value at the cursor into `target`.
    pub fn parse_into(&mut self, target: &mut dyn Reflect) -> Result<(), JsonError> {
        self.skip_white()?;

        // Untyped targets swallow whatever comes.
        if let Some(slot) = target.downcast_mut::<Value>() {
            *slot = self.parse_value()?;
            return Ok(());
        }

        // Optionals absorb `null` themselves and delegate everything else
        // to a freshly installed inner value.
        if let ReflectMut::Optional(optional) = target.reflect_mut() {
            return if self.source.current() == Some('n') {
                self.match_literal("null")?;
                optional.set_none();
                Ok(())
            } else {
                self.parse_into(optional.insert_default())
            };
        }

        match self.source.current() {
            Some('{') => self.parse_object_into(target),
            Some('[') => self.parse_array_into(target),
            Some('"') => {
                let text = self.read_string()?;
                convert::assign_text(target, &text, self.options)
            }
            Some('t') => {
                self.match_literal("true")?;
                convert::assign_bool(target, true)
            }
            Some('f') => {
                self.match_literal("false")?;
                convert::assign_bool(target, false)
            }
            Some('n') => {
                self.match_literal("null")?;
                Err(JsonError::InvalidNull(
                    target.reflect_type_info().type_name(),
                ))
            }
            Some(c) if c == '-' || c.is_ascii_digit() => {
                let lexeme = self.read_number()?;
                convert::assign_number(target, &lexeme)
            }
            Some(c) => Err(JsonError::UnexpectedCharacter(c)),
            None => Err(JsonError::UnexpectedEnd),
        }
    }

    /// Reads the value at the cursor into an untyped tree.
    pub fn parse_value(&mut self) -> Result<Value, JsonError> {
        self.skip_white()?;
        match self.source.current() {
            Some('{') => {
                self.source.advance()?;
                let mut members = Vec::new();
                if self.try_match('}')? {
                    return Ok(Value::Object(members));
                }
                loop {
                    let name = self.expect_string()?;
                    self.match_char(':')?;
                    let value = self.parse_value()?;
                    members.push((name, value));
                    if !self.try_match(',')? {
                        break;
                    }
                }
                self.match_char('}')?;
                Ok(Value::Object(members))
            }
            Some('[') => {
                self.source.advance()?;
                let mut items = Vec::new();
                if self.try_match(']')? {
                    return Ok(Value::Array(items));
                }
                loop {
                    items.push(self.parse_value()?);
                    if !self.try_match(',')? {
                        break;
                    }
                }
                self.match_char(']')?;
                Ok(Value::Array(items))
            }
            Some('"') => Ok(Value::String(self.read_string()?)),
            Some('t') => {
                self.match_literal("true")?;
                Ok(Value::Bool(true))
            }
            Some('f') => {
                self.match_literal("false")?;
                Ok(Value::Bool(false))
            }
            Some('n') => {
                self.match_literal("null")?;
                Ok(Value::Null)
            }
            Some(c) if c == '-' || c.is_ascii_digit() => {
                let lexeme = self.read_number()?;
                if lexeme.contains(['.', 'e']) {
                    Ok(Value::Number(Number::Float(parse_f64(&lexeme)?)))
                } else {
                    match lexeme.parse::<i64>() {
                        Ok(value) => Ok(Value::Number(Number::Int(value))),
                        Err(_) => Ok(Value::Number(Number::Float(parse_f64(&lexeme)?))),
                    }
                }
            }
            Some(c) => Err(JsonError::UnexpectedCharacter(c)),
            None => Err(JsonError::UnexpectedEnd),
        }
    }

    fn parse_object_into(&mut self, target: &mut dyn Reflect) -> Result<(), JsonError> {
        let info = target.reflect_type_info();
        let type_name = info.type_name();

        self.match_char('{')?;
        let empty = self.try_match('}')?;

        match target.reflect_mut() {
            ReflectMut::Struct(target) => {
                let info = info
                    .as_struct()
                    .ok_or(JsonError::UnsupportedType(type_name))?;
                if empty {
                    return Ok(());
                }
                loop {
                    let name = self.expect_string()?;
                    self.match_char(':')?;
                    match self.resolve_member(info, &name) {
                        Some(index) => match target.field_at_mut(index) {
                            Some(member) => self.parse_into(member)?,
                            None => {
                                self.parse_value()?;
                            }
                        },
                        // Unmatched members are parsed in full, then
                        // dropped, so the cursor lands on the delimiter.
                        None => {
                            self.parse_value()?;
                        }
                    }
                    if !self.try_match(',')? {
                        break;
                    }
                }
            }
            ReflectMut::Map(target) => {
                let info = info.as_map().ok_or(JsonError::UnsupportedType(type_name))?;
                if empty {
                    return Ok(());
                }
                loop {
                    let key_text = self.expect_string()?;
                    self.match_char(':')?;
                    let mut key = info.make_key();
                    convert::assign_text(key.as_mut(), &key_text, self.options)?;
                    let mut value = info.make_value();
                    self.parse_into(value.as_mut())?;
                    if target.insert_boxed(key, value).is_err() {
                        return Err(JsonError::MismatchedTarget {
                            token: "object",
                            target: type_name,
                        });
                    }
                    if !self.try_match(',')? {
                        break;
                    }
                }
            }
            _ => {
                return Err(JsonError::MismatchedTarget {
                    token: "object",
                    target: type_name,
                });
            }
        }
        self.match_char('}')
    }

    fn parse_array_into(&mut self, target: &mut dyn Reflect) -> Result<(), JsonError> {
        let info = target.reflect_type_info();
        let type_name = info.type_name();

        self.match_char('[')?;
        let empty = self.try_match(']')?;

        match target.reflect_mut() {
            ReflectMut::List(target) => {
                let info = info.as_list().ok_or(JsonError::UnsupportedType(type_name))?;
                if empty {
                    return Ok(());
                }
                loop {
                    let mut item = info.make_item();
                    self.parse_into(item.as_mut())?;
                    if target.push_boxed(item).is_err() {
                        return Err(JsonError::MismatchedTarget {
                            token: "array",
                            target: type_name,
                        });
                    }
                    if !self.try_match(',')? {
                        break;
                    }
                }
            }
            _ => {
                return Err(JsonError::MismatchedTarget {
                    token: "array",
                    target: type_name,
                });
            }
        }
        self.match_char(']')
    }

    /// Exact match first, case-insensitive second when enabled.
    fn resolve_member(&self, info: &StructInfo, key: &str) -> Option<usize> {
        for (index, member) in info.iter().enumerate() {
            if self.options.wire_name(member.name()) == key {
                return Some(index);
            }
        }
        if self.options.case_insensitive_names() {
            for (index, member) in info.iter().enumerate() {
                if self
                    .options
                    .wire_name(member.name())
                    .eq_ignore_ascii_case(key)
                {
                    return Some(index);
                }
            }
        }
        None
    }

    fn expect_string(&mut self) -> Result<String, JsonError> {
        self.skip_white()?;
        if self.source.current() == Some('"') {
            self.read_string()
        } else {
            Err(JsonError::Expected('"'))
        }
    }

    /// Reads a string token; the cursor sits on the opening quote.
    fn read_string(&mut self) -> Result<String, JsonError> {
        self.source.advance()?;
        let mut text = String::new();
        loop {
            match self.source.current() {
                None => return Err(JsonError::UnexpectedEnd),
                Some('"') => {
                    self.source.advance()?;
                    return Ok(text);
                }
                Some('\\') => {
                    self.source.advance()?;
                    let escaped = self.source.current().ok_or(JsonError::UnexpectedEnd)?;
                    match escaped {
                        '"' => text.push('"'),
                        '\\' => text.push('\\'),
                        '/' => text.push('/'),
                        'b' => text.push('\u{0008}'),
                        'f' => text.push('\u{000C}'),
                        'n' => text.push('\n'),
                        'r' => text.push('\r'),
                        't' => text.push('\t'),
                        'u' => {
                            text.push(self.read_unicode_escape()?);
                            // The cursor is already past the escape.
                            continue;
                        }
                        other => return Err(JsonError::InvalidEscape(other)),
                    }
                    self.source.advance()?;
                }
                Some(c) => {
                    text.push(c);
                    self.source.advance()?;
                }
            }
        }
    }

    /// Reads a `\uXXXX` escape; the cursor sits on the `u`. A high
    /// surrogate half must be followed by an escaped low half.
    fn read_unicode_escape(&mut self) -> Result<char, JsonError> {
        let first = self.read_hex4()?;
        if (0xD800..=0xDBFF).contains(&first) {
            if self.source.current() != Some('\\') {
                return Err(JsonError::InvalidUnicodeEscape);
            }
            self.source.advance()?;
            if self.source.current() != Some('u') {
                return Err(JsonError::InvalidUnicodeEscape);
            }
            let second = self.read_hex4()?;
            if !(0xDC00..=0xDFFF).contains(&second) {
                return Err(JsonError::InvalidUnicodeEscape);
            }
            let combined = 0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00);
            return char::from_u32(combined).ok_or(JsonError::InvalidUnicodeEscape);
        }
        char::from_u32(first).ok_or(JsonError::InvalidUnicodeEscape)
    }

    fn read_hex4(&mut self) -> Result<u32, JsonError> {
        self.source.advance()?;
        let mut code = 0_u32;
        for _ in 0..4 {
            let digit = self
                .source
                .current()
                .and_then(|c| c.to_digit(16))
                .ok_or(JsonError::InvalidUnicodeEscape)?;
            code = code * 16 + digit;
            self.source.advance()?;
        }
        Ok(code)
    }

    /// Reads a number lexeme per the JSON grammar, exponent marker
    /// normalized to `e` and a `+` sign dropped.
    fn read_number(&mut self) -> Result<String, JsonError> {
        let mut lexeme = String::new();
        if self.source.current() == Some('-') {
            lexeme.push('-');
            self.source.advance()?;
        }
        match self.source.current() {
            Some('0') => {
                lexeme.push('0');
                self.source.advance()?;
            }
            Some(c @ '1'..='9') => {
                lexeme.push(c);
                self.source.advance()?;
                while let Some(c @ '0'..='9') = self.source.current() {
                    lexeme.push(c);
                    self.source.advance()?;
                }
            }
            _ => return Err(JsonError::DigitExpected),
        }
        if self.source.current() == Some('.') {
            lexeme.push('.');
            self.source.advance()?;
            let mut digits = 0;
            while let Some(c @ '0'..='9') = self.source.current() {
                lexeme.push(c);
                self.source.advance()?;
                digits += 1;
            }
            if digits == 0 {
                return Err(JsonError::DigitExpected);
            }
        }
        if matches!(self.source.current(), Some('e' | 'E')) {
            lexeme.push('e');
            self.source.advance()?;
            if matches!(self.source.current(), Some('+' | '-')) {
                if self.source.current() == Some('-') {
                    lexeme.push('-');
                }
                self.source.advance()?;
            }
            let mut digits = 0;
            while let Some(c @ '0'..='9') = self.source.current() {
                lexeme.push(c);
                self.source.advance()?;
                digits += 1;
            }
            if digits == 0 {
                return Err(JsonError::DigitExpected);
            }
        }
        Ok(lexeme)
    }

    fn skip_white(&mut self) -> Result<(), JsonError> {
        while matches!(self.source.current(), Some(c) if c.is_whitespace()) {
            self.source.advance()?;
        }
        Ok(())
    }

    /// Skips whitespace, then consumes `expected` if it is next.
    fn try_match(&mut self, expected: char) -> Result<bool, JsonError> {
        self.skip_white()?;
        if self.source.current() == Some(expected) {
            self.source.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn match_char(&mut self, expected: char) -> Result<(), JsonError> {
        if self.try_match(expected)? {
            Ok(())
        } else {
            Err(JsonError::Expected(expected))
        }
    }

    fn match_literal(&mut self, literal: &str) -> Result<(), JsonError> {
        for expected in literal.chars() {
            if self.source.current() != Some(expected) {
                return Err(match self.source.current() {
                    Some(found) => JsonError::UnexpectedCharacter(found),
                    None => JsonError::UnexpectedEnd,
                });
            }
            self.source.advance()?;
        }
        Ok(())
    }
}

fn parse_f64(lexeme: &str) -> Result<f64, JsonError> {
    lexeme.parse::<f64>().map_err(|_| JsonError::Unconvertible {
        text: lexeme.to_owned(),
        target: "f64",
    })
}

#[cfg(test)]
mod tests {
    use super::JsonParser;
    use crate::error::JsonError;
    use crate::options::SerializationOptions;
    use crate::source::CharSource;
    use crate::value::{Number, Value};
    use crate::Reflect;

    fn parser<'a>(text: &'a str, options: &'a SerializationOptions) -> JsonParser<'a, 'a> {
        JsonParser::new(CharSource::from_str(text), options)
    }

    #[test]
    fn untyped_tree_covers_every_token() {
        let options = SerializationOptions::new();
        let mut p = parser(r#" {"a": [1, 2.5, null, true, "x"] , "b": {} } "#, &options);
        let value = p.parse_value().unwrap();
        let items = value.get("a").and_then(Value::as_array).unwrap();
        assert_eq!(items[0], Value::Number(Number::Int(1)));
        assert_eq!(items[1], Value::Number(Number::Float(2.5)));
        assert_eq!(items[2], Value::Null);
        assert_eq!(items[3], Value::Bool(true));
        assert_eq!(items[4], Value::String("x".to_owned()));
        assert_eq!(value.get("b"), Some(&Value::Object(Vec::new())));
    }

    #[test]
    fn escapes_decode_to_their_characters() {
        let options = SerializationOptions::new();
        let mut p = parser(r#""a\"b\\c\/d\b\f\n\r\t""#, &options);
        let mut target = String::new();
        p.parse_into(target.as_reflect_mut()).unwrap();
        assert_eq!(target, "a\"b\\c/d\u{0008}\u{000C}\n\r\t");
    }

    #[test]
    fn unicode_escapes_and_surrogate_pairs() {
        let options = SerializationOptions::new();
        let mut p = parser("\"A\\uD83D\\uDE00\"", &options);
        let mut target = String::new();
        p.parse_into(target.as_reflect_mut()).unwrap();
        assert_eq!(target, "A\u{1F600}");

        let mut p = parser(r#""\uD83D x""#, &options);
        let mut target = String::new();
        assert!(matches!(
            p.parse_into(target.as_reflect_mut()),
            Err(JsonError::InvalidUnicodeEscape)
        ));
    }

    #[test]
    fn unknown_escape_is_rejected() {
        let options = SerializationOptions::new();
        let mut p = parser(r#""\q""#, &options);
        let mut target = String::new();
        assert!(matches!(
            p.parse_into(target.as_reflect_mut()),
            Err(JsonError::InvalidEscape('q'))
        ));
    }

    #[test]
    fn number_grammar_violations() {
        let options = SerializationOptions::new();
        let mut n = 0_i32;

        let mut p = parser("-x", &options);
        assert!(matches!(
            p.parse_into(n.as_reflect_mut()),
            Err(JsonError::DigitExpected)
        ));

        let mut p = parser("1.e5", &options);
        assert!(matches!(
            p.parse_into(n.as_reflect_mut()),
            Err(JsonError::DigitExpected)
        ));

        let mut p = parser("2e", &options);
        assert!(matches!(
            p.parse_into(n.as_reflect_mut()),
            Err(JsonError::DigitExpected)
        ));
    }

    #[test]
    fn null_into_a_plain_scalar_is_fatal() {
        let options = SerializationOptions::new();
        let mut n = 0_i32;
        let mut p = parser("null", &options);
        assert!(matches!(
            p.parse_into(n.as_reflect_mut()),
            Err(JsonError::InvalidNull("i32"))
        ));
    }

    #[test]
    fn structural_token_into_scalar_is_mismatched() {
        let options = SerializationOptions::new();
        let mut n = 0_i32;
        let mut p = parser("{}", &options);
        assert!(matches!(
            p.parse_into(n.as_reflect_mut()),
            Err(JsonError::MismatchedTarget { token: "object", .. })
        ));
    }

    #[test]
    fn blank_documents_are_no_ops() {
        let options = SerializationOptions::new();
        let mut n = 7_i32;
        parser("", &options).parse_document(n.as_reflect_mut()).unwrap();
        parser("   \n\t ", &options)
            .parse_document(n.as_reflect_mut())
            .unwrap();
        assert_eq!(n, 7);
    }
}
