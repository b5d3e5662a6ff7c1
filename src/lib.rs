#![doc = include_str!("../README.md")]

// The derive macro emits `jsonbind::` paths; this makes them resolve in
// this crate's own tests as well.
extern crate self as jsonbind;

pub mod cell;
mod convert;
mod error;
mod impls;
pub mod info;
pub mod ops;
mod options;
mod parse;
mod reflect;
mod registry;
mod ser;
mod source;
mod value;

pub use jsonbind_derive as derive;

pub use convert::JsonConverter;
pub use error::JsonError;
pub use options::{CamelCase, NameTransform, SerializationOptions};
pub use parse::JsonParser;
pub use reflect::{Reflect, ReflectKind, ReflectMut, ReflectRef};
pub use source::CharSource;
pub use value::{Number, Value};

use std::io;

use crate::info::Typed;
use crate::ser::{IoSink, JsonSerializer};

/// Encodes a value with default options.
pub fn serialize(value: &dyn Reflect) -> Result<String, JsonError> {
    serialize_with(value, &SerializationOptions::new())
}

/// Encodes a value into a string.
pub fn serialize_with(
    value: &dyn Reflect,
    options: &SerializationOptions,
) -> Result<String, JsonError> {
    registry::warm(value.reflect_type_info());
    let mut out = String::with_capacity(128);
    JsonSerializer::new(&mut out, options).write_value(value)?;
    Ok(out)
}

/// Encodes a value into a writer with default options.
pub fn serialize_to<W: io::Write>(value: &dyn Reflect, writer: W) -> Result<(), JsonError> {
    serialize_to_with(value, writer, &SerializationOptions::new())
}

/// Encodes a value into a writer.
///
/// The bytes written are identical to what [`serialize_with`] returns.
pub fn serialize_to_with<W: io::Write>(
    value: &dyn Reflect,
    writer: W,
    options: &SerializationOptions,
) -> Result<(), JsonError> {
    registry::warm(value.reflect_type_info());
    let mut sink = IoSink::new(writer);
    JsonSerializer::new(&mut sink, options).write_value(value)?;
    sink.flush()
}

/// Decodes a value from a string with default options.
pub fn deserialize<T>(json: &str) -> Result<T, JsonError>
where
    T: Reflect + Typed + Default,
{
    deserialize_with(json, &SerializationOptions::new())
}

/// Decodes a value from a string.
///
/// The target starts as `T::default()` and is filled in place; an empty or
/// all-whitespace document therefore yields the default value. Content
/// after the first complete value is not inspected.
pub fn deserialize_with<T>(json: &str, options: &SerializationOptions) -> Result<T, JsonError>
where
    T: Reflect + Typed + Default,
{
    registry::warm(T::type_info());
    let mut value = T::default();
    let mut parser = JsonParser::new(CharSource::from_str(json), options);
    parser.parse_document(value.as_reflect_mut())?;
    Ok(value)
}

/// Decodes a value from a reader with default options.
pub fn deserialize_from<T, R>(reader: R) -> Result<T, JsonError>
where
    T: Reflect + Typed + Default,
    R: io::Read,
{
    deserialize_from_with(reader, &SerializationOptions::new())
}

/// Decodes a value from a reader, pulling input in chunks.
pub fn deserialize_from_with<T, R>(
    reader: R,
    options: &SerializationOptions,
) -> Result<T, JsonError>
where
    T: Reflect + Typed + Default,
    R: io::Read,
{
    registry::warm(T::type_info());
    let mut value = T::default();
    let mut parser = JsonParser::new(CharSource::from_reader(reader)?, options);
    parser.parse_document(value.as_reflect_mut())?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};
    use std::time::Duration;

    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    use crate::derive::Reflect;
    use crate::{
        deserialize, deserialize_from, deserialize_with, serialize, serialize_to,
        serialize_with, CamelCase, JsonConverter, JsonError, SerializationOptions, Value,
    };

    #[derive(Reflect, Default, Debug, PartialEq)]
    struct Pet {
        id: i32,
        name: String,
        alive: bool,
        tags: HashMap<String, String>,
        nums: Vec<i64>,
    }

    fn gucci() -> Pet {
        Pet {
            id: 1,
            name: "gucci".to_owned(),
            alive: true,
            tags: HashMap::from([("Key1".to_owned(), "Value1".to_owned())]),
            nums: vec![1, 2, 3],
        }
    }

    #[test]
    fn pet_encodes_in_declaration_order() {
        let json = serialize(&gucci()).unwrap();
        assert_eq!(
            json,
            r#"{"id":1,"name":"gucci","alive":true,"tags":{"Key1":"Value1"},"nums":[1,2,3]}"#
        );
    }

    #[test]
    fn pet_round_trips() {
        let pet = gucci();
        let json = serialize(&pet).unwrap();
        let back: Pet = deserialize(&json).unwrap();
        assert_eq!(back, pet);
    }

    #[test]
    fn round_trip_holds_under_a_name_transform() {
        #[derive(Reflect, Default, Debug, PartialEq)]
        #[allow(non_snake_case)]
        struct Titled {
            Id: i32,
            Name: String,
        }

        let options = || SerializationOptions::new().with_name_transform(CamelCase);
        let value = Titled {
            Id: 81,
            Name: "x".to_owned(),
        };
        let json = serialize_with(&value, &options()).unwrap();
        assert_eq!(json, r#"{"id":81,"name":"x"}"#);

        let back: Titled = deserialize_with(&json, &options()).unwrap();
        assert_eq!(back, value);

        // Without the transform the lowercased members match nothing, so
        // the target keeps its defaults.
        let untouched: Titled = deserialize(&json).unwrap();
        assert_eq!(untouched, Titled::default());
    }

    #[test]
    fn ignored_members_never_appear_and_unknown_members_skip_cleanly() {
        #[derive(Reflect, Default, Debug, PartialEq)]
        struct Guarded {
            id: i32,
            #[json(ignore)]
            secret: String,
            name: String,
        }

        let value = Guarded {
            id: 7,
            secret: "hidden".to_owned(),
            name: "ok".to_owned(),
        };
        let json = serialize(&value).unwrap();
        assert_eq!(json, r#"{"id":7,"name":"ok"}"#);

        // An incoming member for the ignored field, plus a completely
        // unknown nested member; later members must still land.
        let input = r#"{"id":9,"secret":"nope","junk":{"deep":[1,{"a":null}]},"name":"kept"}"#;
        let back: Guarded = deserialize(input).unwrap();
        assert_eq!(back.id, 9);
        assert_eq!(back.secret, "");
        assert_eq!(back.name, "kept");
    }

    #[test]
    fn case_insensitive_matching_is_opt_in() {
        #[derive(Reflect, Default, Debug, PartialEq)]
        struct Row {
            id: i32,
        }

        let input = r#"{"ID":4}"#;
        let strict: Row = deserialize(input).unwrap();
        assert_eq!(strict.id, 0);

        let options = SerializationOptions::new().with_case_insensitive_names(true);
        let lax: Row = deserialize_with(input, &options).unwrap();
        assert_eq!(lax.id, 4);
    }

    #[test]
    fn numeric_fidelity() {
        assert_eq!(serialize(&3_i32).unwrap(), "3");
        assert_eq!(serialize(&3.0_f64).unwrap(), "3");
        assert_eq!(serialize(&-0.0015_f64).unwrap(), "-0.0015");

        let n: i64 = deserialize("3.0").unwrap();
        assert_eq!(n, 3);
        let f: f64 = deserialize("-1.5e-3").unwrap();
        assert_eq!(f, -0.0015);
    }

    #[derive(Reflect, Default, Debug, PartialEq)]
    enum Gender {
        #[default]
        None,
        Female,
        Male,
    }

    #[test]
    fn enums_are_integers_on_the_wire() {
        assert_eq!(serialize(&Gender::Male).unwrap(), "2");
        let g: Gender = deserialize("1").unwrap();
        assert_eq!(g, Gender::Female);
        // Symbolic names are accepted for string tokens.
        let g: Gender = deserialize(r#""Male""#).unwrap();
        assert_eq!(g, Gender::Male);
        assert!(deserialize::<Gender>("9").is_err());
    }

    #[test]
    fn explicit_discriminants_are_honored() {
        #[derive(Reflect, Default, Debug, PartialEq)]
        enum Status {
            #[default]
            Unknown = -1,
            Live = 10,
            Done,
        }

        assert_eq!(serialize(&Status::Unknown).unwrap(), "-1");
        assert_eq!(serialize(&Status::Done).unwrap(), "11");
        let s: Status = deserialize("10").unwrap();
        assert_eq!(s, Status::Live);
    }

    #[test]
    fn null_fills_optionals_and_rejects_plain_targets() {
        #[derive(Reflect, Default, Debug, PartialEq)]
        struct Bag {
            items: Option<Vec<i32>>,
        }

        let bag: Bag = deserialize(r#"{"items":null}"#).unwrap();
        assert_eq!(bag.items, None);
        let bag: Bag = deserialize(r#"{"items":[1,2]}"#).unwrap();
        assert_eq!(bag.items, Some(vec![1, 2]));
        assert_eq!(serialize(&Bag { items: None }).unwrap(), r#"{"items":null}"#);

        assert!(matches!(
            deserialize::<i32>("null"),
            Err(JsonError::InvalidNull(_))
        ));
    }

    #[test]
    fn empty_arrays_and_objects_round_trip() {
        let pet: Pet = deserialize(r#"{"nums":[],"tags":{}}"#).unwrap();
        assert!(pet.nums.is_empty());
        assert!(pet.tags.is_empty());
    }

    #[test]
    fn integer_keyed_maps_round_trip() {
        let mut map: BTreeMap<i32, String> = BTreeMap::new();
        map.insert(1, "one".to_owned());
        map.insert(2, "two".to_owned());
        let json = serialize(&map).unwrap();
        assert_eq!(json, r#"{"1":"one","2":"two"}"#);
        let back: BTreeMap<i32, String> = deserialize(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn stream_and_string_surfaces_agree() {
        let pet = gucci();
        let json = serialize(&pet).unwrap();

        let mut bytes = Vec::new();
        serialize_to(&pet, &mut bytes).unwrap();
        assert_eq!(bytes, json.as_bytes());

        let from_stream: Pet = deserialize_from(json.as_bytes()).unwrap();
        assert_eq!(from_stream, pet);
    }

    #[test]
    fn blank_input_yields_the_default() {
        let pet: Pet = deserialize("").unwrap();
        assert_eq!(pet, Pet::default());
        let pet: Pet = deserialize("   \n ").unwrap();
        assert_eq!(pet, Pet::default());
    }

    #[test]
    fn untyped_targets_accept_anything() {
        let value: Value = deserialize(r#"{"a":[1,true,"x"],"b":null}"#).unwrap();
        let items = value.get("a").and_then(Value::as_array).unwrap();
        assert_eq!(items.len(), 3);
        assert!(value.get("b").unwrap().is_null());
    }

    #[test]
    fn converters_override_the_built_in_rules() {
        let options = || {
            SerializationOptions::new().with_converter(JsonConverter::new::<u64, _, _>(
                |value| format!("id-{value}"),
                |text| text.strip_prefix("id-")?.parse().ok(),
            ))
        };

        let json = serialize_with(&9_u64, &options()).unwrap();
        assert_eq!(json, r#""id-9""#);
        let back: u64 = deserialize_with(&json, &options()).unwrap();
        assert_eq!(back, 9);

        // A converter string that fails to decode is a conversion error.
        assert!(deserialize_with::<u64>(r#""bogus""#, &options()).is_err());
    }

    #[test]
    fn converters_apply_to_struct_members() {
        #[derive(Reflect, Default, Debug, PartialEq)]
        struct Endpoint {
            addr: u32,
            port: u16,
        }

        // Addresses travel as dotted quads instead of bare integers.
        let options = || {
            SerializationOptions::new().with_converter(JsonConverter::new::<u32, _, _>(
                |value| {
                    let o = value.to_be_bytes();
                    format!("{}.{}.{}.{}", o[0], o[1], o[2], o[3])
                },
                |text| {
                    let mut octets = [0_u8; 4];
                    let mut parts = text.split('.');
                    for slot in &mut octets {
                        *slot = parts.next()?.parse().ok()?;
                    }
                    if parts.next().is_some() {
                        return None;
                    }
                    Some(u32::from_be_bytes(octets))
                },
            ))
        };

        let value = Endpoint {
            addr: u32::from_be_bytes([127, 0, 0, 1]),
            port: 10001,
        };
        let json = serialize_with(&value, &options()).unwrap();
        assert_eq!(json, r#"{"addr":"127.0.0.1","port":10001}"#);
        let back: Endpoint = deserialize_with(&json, &options()).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn time_and_identifier_scalars_round_trip() {
        #[derive(Reflect, Default, Debug, PartialEq)]
        struct Stamped {
            id: Option<Uuid>,
            at: Option<DateTime<Utc>>,
            took: Duration,
        }

        let value = Stamped {
            id: Some(Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap()),
            at: Some("2024-05-01T10:30:00Z".parse::<DateTime<Utc>>().unwrap()),
            took: Duration::new(90, 5_000_000),
        };
        let json = serialize(&value).unwrap();
        assert!(json.contains("67e55044-10b1-426f-9247-bb680e5fe0c8"));
        assert!(json.contains("90.005000000"));
        let back: Stamped = deserialize(&json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn nested_structs_and_optional_structs() {
        #[derive(Reflect, Default, Debug, PartialEq)]
        struct Engine {
            power: i32,
        }

        #[derive(Reflect, Default, Debug, PartialEq)]
        struct Car {
            name: String,
            engine: Option<Engine>,
        }

        let car = Car {
            name: "brum".to_owned(),
            engine: Some(Engine { power: 95 }),
        };
        let json = serialize(&car).unwrap();
        assert_eq!(json, r#"{"name":"brum","engine":{"power":95}}"#);
        let back: Car = deserialize(&json).unwrap();
        assert_eq!(back, car);
    }

    #[test]
    fn generic_structs_share_one_derive() {
        #[derive(Reflect, Default, Debug, PartialEq)]
        struct Pair<T> {
            first: T,
            second: T,
        }

        let ints = Pair {
            first: 1_i32,
            second: 2,
        };
        let json = serialize(&ints).unwrap();
        assert_eq!(json, r#"{"first":1,"second":2}"#);
        let back: Pair<i32> = deserialize(&json).unwrap();
        assert_eq!(back, ints);

        let texts: Pair<String> = deserialize(r#"{"first":"a","second":"b"}"#).unwrap();
        assert_eq!(texts.first, "a");
        assert_eq!(texts.second, "b");
    }
}
