//! Kind-specific accessor traits.
//!
//! The codec never touches concrete aggregates directly; it goes through
//! these object-safe traits after resolving a value's kind via
//! [`Reflect::reflect_ref`](crate::Reflect::reflect_ref) or
//! [`Reflect::reflect_mut`](crate::Reflect::reflect_mut).

use crate::Reflect;

/// A named-field aggregate.
///
/// Indices refer to the member table of the type's
/// [`StructInfo`](crate::info::StructInfo), which lists serializable
/// members in declaration order with ignored members already excluded.
pub trait Struct: Reflect {
    /// The member at `index`, if the table has one.
    fn field_at(&self, index: usize) -> Option<&dyn Reflect>;

    /// The member at `index`, mutably.
    fn field_at_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;
}

/// An ordered growable sequence.
pub trait List: Reflect {
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The item at `index`.
    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    /// Appends a boxed item, rejecting it when its runtime type is not the
    /// element type.
    fn push_boxed(&mut self, item: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;
}

/// A keyed collection.
pub trait Map: Reflect {
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates entries as reflected key/value pairs.
    ///
    /// Iteration order follows the underlying collection.
    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_>;

    /// Inserts a boxed entry, rejecting whichever side has the wrong
    /// runtime type.
    fn insert_boxed(
        &mut self,
        key: Box<dyn Reflect>,
        value: Box<dyn Reflect>,
    ) -> Result<(), Box<dyn Reflect>>;
}

/// A fieldless enumeration.
///
/// Variant names are not part of the vocabulary here; symbolic lookups go
/// through the type's [`EnumInfo`](crate::info::EnumInfo) variant table.
pub trait Enum: Reflect {
    /// The integer discriminant of the current variant.
    fn discriminant(&self) -> i64;

    /// Switches to the variant with the given discriminant.
    ///
    /// Returns `false` when no variant carries it.
    fn set_by_discriminant(&mut self, discriminant: i64) -> bool;
}

/// A maybe-absent value.
pub trait Optional: Reflect {
    fn is_some(&self) -> bool;

    /// The contained value, when present.
    fn value(&self) -> Option<&dyn Reflect>;

    /// Clears the value.
    fn set_none(&mut self);

    /// Installs a default-constructed value and returns it for in-place
    /// decoding.
    fn insert_default(&mut self) -> &mut dyn Reflect;
}
