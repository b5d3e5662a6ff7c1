//! `Reflect`/`Typed` implementations for the built-in type vocabulary:
//! scalars, strings, sequences, maps, optionals, durations, date-times and
//! unique identifiers.

mod collections;
mod option;
mod scalar;
mod time;
mod uuid;

pub(crate) use scalar::impl_scalar;
