//! The foundational trait for runtime type-directed access.

use core::any::{Any, TypeId};
use core::fmt;

use crate::info::TypeInfo;
use crate::ops::{Enum, List, Map, Optional, Struct};
use crate::value::Value;

/// A pure enumeration of the "kinds" a reflected value can have.
///
/// The codec dispatches on kinds, never on concrete types, except at the
/// scalar leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    /// A leaf value with a single-token JSON rendering.
    Scalar,
    /// A named-field aggregate, encoded as a JSON object.
    Struct,
    /// A fieldless enumeration, encoded as its integer discriminant.
    Enum,
    /// An ordered growable sequence, encoded as a JSON array.
    List,
    /// A keyed collection, encoded as a JSON object with stringified keys.
    Map,
    /// A maybe-absent value; absence is encoded as `null`.
    Optional,
    /// An untyped JSON tree ([`Value`]).
    Dynamic,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scalar => "scalar",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::List => "list",
            Self::Map => "map",
            Self::Optional => "optional",
            Self::Dynamic => "dynamic",
        };
        f.write_str(name)
    }
}

/// An immutable view of a reflected value, resolved to its kind.
pub enum ReflectRef<'a> {
    Scalar(&'a dyn Reflect),
    Struct(&'a dyn Struct),
    Enum(&'a dyn Enum),
    List(&'a dyn List),
    Map(&'a dyn Map),
    Optional(&'a dyn Optional),
    Dynamic(&'a Value),
}

/// A mutable view of a reflected value, resolved to its kind.
pub enum ReflectMut<'a> {
    Scalar(&'a mut dyn Reflect),
    Struct(&'a mut dyn Struct),
    Enum(&'a mut dyn Enum),
    List(&'a mut dyn List),
    Map(&'a mut dyn Map),
    Optional(&'a mut dyn Optional),
    Dynamic(&'a mut Value),
}

/// The object-safe access trait the codec walks values through.
///
/// Implemented for the built-in scalars and collections in [`crate::impls`],
/// and for user types via [the derive macro](crate::derive::Reflect).
///
/// # Example
///
/// ```
/// use jsonbind::Reflect;
///
/// let x = 32_i32;
/// let r: &dyn Reflect = &x;
/// assert!(r.is::<i32>());
/// ```
pub trait Reflect: Any + Send + Sync {
    /// Casts this type to a fully-reflected value.
    #[inline(always)]
    fn as_reflect(&self) -> &dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    /// Casts this type to a mutable, fully-reflected value.
    #[inline(always)]
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    /// Casts this type to a boxed, fully-reflected value.
    #[inline(always)]
    fn into_boxed_reflect(self) -> Box<dyn Reflect>
    where
        Self: Sized,
    {
        Box::new(self)
    }

    /// Returns the [`TypeId`] of the underlying type.
    ///
    /// Calling [`Any::type_id`] on a `Box<dyn Reflect>` returns the
    /// container's type ID instead of the inner value's; this method
    /// always answers for the value.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Returns the cached shape descriptor of this value's type.
    fn reflect_type_info(&self) -> &'static TypeInfo;

    /// Performs a type-checked assignment of a reflected value to this value.
    ///
    /// Returns the input untouched when its runtime type differs from `Self`.
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    /// Returns the pure [kind](ReflectKind) of this type.
    fn reflect_kind(&self) -> ReflectKind;

    /// Resolves this value to an immutable kind view.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Resolves this value to a mutable kind view.
    fn reflect_mut(&mut self) -> ReflectMut<'_>;
}

impl dyn Reflect {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    ///
    /// If the underlying value is not of type `T`, returns `None`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Downcasts the value to type `T` by mutable reference.
    ///
    /// If the underlying value is not of type `T`, returns `None`.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts the value to type `T`, unboxing and consuming the trait
    /// object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        if self.is::<T>() {
            let any: Box<dyn Any> = self;
            // The type check above makes this downcast infallible.
            match any.downcast::<T>() {
                Ok(value) => Ok(*value),
                Err(_) => unreachable!(),
            }
        } else {
            Err(self)
        }
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reflect({})",
            self.reflect_type_info().type_name()
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::Reflect;

    #[test]
    fn downcast_ref_and_mut() {
        let mut x = 10_i32;
        let r: &mut dyn Reflect = &mut x;
        assert!(r.is::<i32>());
        assert!(!r.is::<u32>());
        assert_eq!(r.downcast_ref::<i32>(), Some(&10));
        *r.downcast_mut::<i32>().unwrap() += 2;
        assert_eq!(x, 12);
    }

    #[test]
    fn take_preserves_value_on_mismatch() {
        let boxed: Box<dyn Reflect> = Box::new(7_u8);
        let boxed = boxed.take::<i64>().unwrap_err();
        assert_eq!(boxed.take::<u8>().unwrap(), 7);
    }

    #[test]
    fn set_rejects_foreign_types() {
        let mut target = 0_i32;
        assert!(target.set(Box::new(41_i32)).is_ok());
        assert_eq!(target, 41);
        assert!(target.set(Box::new("no".to_owned())).is_err());
        assert_eq!(target, 41);
    }
}
