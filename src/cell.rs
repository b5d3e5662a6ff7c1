//! Containers for static storage of shape descriptors.
//!
//! These back every [`Typed`](crate::info::Typed) implementation:
//!
//! - [`NonGenericTypeInfoCell`] for concrete types. Internally an
//!   [`OnceLock`], almost no additional expense.
//! - [`GenericTypeInfoCell`] for generic types, where the `static CELL`
//!   inside the function is shared by every instantiation. The inner is a
//!   [`BTreeMap`] keyed by [`TypeId`] behind an [`RwLock`], and descriptors
//!   are published by leaking, so callers always hand out `&'static`
//!   references and a descriptor is never observed half-built.

use core::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::info::TypeInfo;

/// Container for static storage of a non-generic type's descriptor.
///
/// ## Example
///
/// ```ignore
/// impl Typed for Pet {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Struct(
///             StructInfo::new::<Pet>(&[NamedField::new::<u32>("id")])
///         ))
///     }
/// }
/// ```
pub struct NonGenericTypeInfoCell(OnceLock<TypeInfo>);

impl NonGenericTypeInfoCell {
    /// Create an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns a reference to the descriptor stored in the cell,
    /// generating it from the given function on the first call.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &TypeInfo
    where
        F: FnOnce() -> TypeInfo,
    {
        self.0.get_or_init(f)
    }
}

/// Container for static storage of descriptors of a generic type.
///
/// ## Example
///
/// ```ignore
/// impl<T: Reflect + Typed + Default> Typed for Vec<T> {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///         CELL.get_or_insert::<Self>(|| TypeInfo::List(ListInfo::new::<Self, T>()))
///     }
/// }
/// ```
pub struct GenericTypeInfoCell(RwLock<BTreeMap<TypeId, &'static TypeInfo>>);

impl GenericTypeInfoCell {
    /// Create an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(BTreeMap::new()))
    }

    /// Returns the descriptor stored for the instantiation `G`,
    /// generating it from the given function on the first call.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(
        &self,
        f: impl FnOnce() -> TypeInfo,
    ) -> &'static TypeInfo {
        // Separate to reduce code compilation times
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(
        &self,
        type_id: TypeId,
        f: impl FnOnce() -> TypeInfo,
    ) -> &'static TypeInfo {
        match self.get_by_type_id(type_id) {
            Some(info) => info,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: TypeInfo) -> &'static TypeInfo {
        let mut map = self.0.write().unwrap_or_else(PoisonError::into_inner);
        // A racing thread may have published between our read and write
        // locks; keep the first descriptor so references stay stable.
        *map.entry(type_id)
            .or_insert_with(|| Box::leak(Box::new(value)))
    }
}

#[cfg(test)]
mod tests {
    use crate::info::Typed;

    #[test]
    fn descriptors_are_pointer_stable() {
        let a = <Vec<i32> as Typed>::type_info();
        let b = <Vec<i32> as Typed>::type_info();
        assert!(core::ptr::eq(a, b));
    }

    #[test]
    fn instantiations_do_not_collide() {
        let ints = <Vec<i32> as Typed>::type_info();
        let strings = <Vec<String> as Typed>::type_info();
        assert!(ints.type_is::<Vec<i32>>());
        assert!(strings.type_is::<Vec<String>>());
        assert!(!core::ptr::eq(ints, strings));
    }

    #[test]
    fn first_use_from_many_threads_agrees() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    <Vec<u64> as Typed>::type_info() as *const _ as usize
                })
            })
            .collect();
        let mut seen = std::collections::HashSet::new();
        for handle in handles {
            seen.insert(handle.join().unwrap());
        }
        assert_eq!(seen.len(), 1);
    }
}
