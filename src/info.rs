//! Shape descriptors: the per-type metadata the codec walks instead of a
//! schema.
//!
//! Every supported type exposes one `&'static TypeInfo` through [`Typed`],
//! computed on first use and cached for the life of the process (see
//! [`crate::cell`]). A descriptor records everything the parser and the
//! serializer need about a type: its kind, its member table for structs,
//! its variant table for enums, and element factories for collections.

use core::any::TypeId;

use crate::Reflect;

/// A static accessor to a type's cached shape descriptor.
///
/// Implemented by [the derive macro](crate::derive::Reflect) for user types
/// and by [`crate::impls`] for the built-ins.
pub trait Typed: 'static {
    /// Returns the compile-time shape of this type.
    ///
    /// The first call per type computes the descriptor; every later call,
    /// from any thread, returns the same `&'static` reference.
    fn type_info() -> &'static TypeInfo;
}

/// Identity of a Rust type: its [`TypeId`] plus a display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ty {
    id: TypeId,
    name: &'static str,
}

impl Ty {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: core::any::type_name::<T>(),
        }
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// The shape of a type, resolved to its kind.
#[derive(Debug)]
pub enum TypeInfo {
    Scalar(ScalarInfo),
    Struct(StructInfo),
    Enum(EnumInfo),
    List(ListInfo),
    Map(MapInfo),
    Optional(OptionInfo),
    /// The untyped [`Value`](crate::Value) tree; shape-less by definition,
    /// so a [`ScalarInfo`] carries its identity.
    Dynamic(ScalarInfo),
}

impl TypeInfo {
    fn ty(&self) -> &Ty {
        match self {
            Self::Scalar(info) | Self::Dynamic(info) => &info.ty,
            Self::Struct(info) => &info.ty,
            Self::Enum(info) => &info.ty,
            Self::List(info) => &info.ty,
            Self::Map(info) => &info.ty,
            Self::Optional(info) => &info.ty,
        }
    }

    /// The [`TypeId`] of the described type.
    #[inline]
    pub fn ty_id(&self) -> TypeId {
        self.ty().id()
    }

    /// The display name of the described type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty().name()
    }

    /// Whether this descriptor describes type `T`.
    #[inline]
    pub fn type_is<T: 'static>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    pub fn as_struct(&self) -> Option<&StructInfo> {
        match self {
            Self::Struct(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumInfo> {
        match self {
            Self::Enum(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListInfo> {
        match self {
            Self::List(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapInfo> {
        match self {
            Self::Map(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_optional(&self) -> Option<&OptionInfo> {
        match self {
            Self::Optional(info) => Some(info),
            _ => None,
        }
    }
}

/// Shape of a leaf type with a single-token JSON rendering.
#[derive(Debug)]
pub struct ScalarInfo {
    ty: Ty,
}

impl ScalarInfo {
    pub fn new<T: ?Sized + 'static>() -> Self {
        Self { ty: Ty::of::<T>() }
    }
}

/// One serializable member of a struct.
///
/// Only the declared name and a lazy pointer to the member type's own shape
/// are stored; actual access goes through [`crate::ops::Struct`] by the
/// member's index in this table.
#[derive(Debug, Clone)]
pub struct NamedField {
    name: &'static str,
    type_info: fn() -> &'static TypeInfo,
}

impl NamedField {
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            type_info: T::type_info,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The shape of the member's type.
    ///
    /// Lazy so that self-referential types can describe themselves.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }
}

/// Shape of a named-field aggregate: its member table in declaration order,
/// ignored members already excluded.
#[derive(Debug)]
pub struct StructInfo {
    ty: Ty,
    members: Box<[NamedField]>,
}

impl StructInfo {
    pub fn new<T: ?Sized + 'static>(members: &[NamedField]) -> Self {
        Self {
            ty: Ty::of::<T>(),
            members: members.to_vec().into_boxed_slice(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn member_at(&self, index: usize) -> Option<&NamedField> {
        self.members.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, NamedField> {
        self.members.iter()
    }
}

/// One variant of a fieldless enum.
#[derive(Debug, Clone, Copy)]
pub struct VariantInfo {
    name: &'static str,
    discriminant: i64,
}

impl VariantInfo {
    pub const fn new(name: &'static str, discriminant: i64) -> Self {
        Self { name, discriminant }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn discriminant(&self) -> i64 {
        self.discriminant
    }
}

/// Shape of a fieldless enum: its variant table in declaration order.
#[derive(Debug)]
pub struct EnumInfo {
    ty: Ty,
    variants: Box<[VariantInfo]>,
}

impl EnumInfo {
    pub fn new<T: ?Sized + 'static>(variants: &[VariantInfo]) -> Self {
        Self {
            ty: Ty::of::<T>(),
            variants: variants.to_vec().into_boxed_slice(),
        }
    }

    pub fn iter(&self) -> core::slice::Iter<'_, VariantInfo> {
        self.variants.iter()
    }
}

/// Shape of an ordered sequence, with a factory for default-constructed
/// items so the parser can decode into them in place.
#[derive(Debug)]
pub struct ListInfo {
    ty: Ty,
    item: fn() -> &'static TypeInfo,
    make_item: fn() -> Box<dyn Reflect>,
}

impl ListInfo {
    pub fn new<L, T>() -> Self
    where
        L: ?Sized + 'static,
        T: Reflect + Typed + Default,
    {
        Self {
            ty: Ty::of::<L>(),
            item: T::type_info,
            make_item: || Box::new(T::default()),
        }
    }

    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item)()
    }

    /// A fresh, default-valued item of the element type.
    #[inline]
    pub fn make_item(&self) -> Box<dyn Reflect> {
        (self.make_item)()
    }
}

/// Shape of a keyed collection, with factories for default-constructed keys
/// and values.
#[derive(Debug)]
pub struct MapInfo {
    ty: Ty,
    key: fn() -> &'static TypeInfo,
    value: fn() -> &'static TypeInfo,
    make_key: fn() -> Box<dyn Reflect>,
    make_value: fn() -> Box<dyn Reflect>,
}

impl MapInfo {
    pub fn new<M, K, V>() -> Self
    where
        M: ?Sized + 'static,
        K: Reflect + Typed + Default,
        V: Reflect + Typed + Default,
    {
        Self {
            ty: Ty::of::<M>(),
            key: K::type_info,
            value: V::type_info,
            make_key: || Box::new(K::default()),
            make_value: || Box::new(V::default()),
        }
    }

    #[inline]
    pub fn key_info(&self) -> &'static TypeInfo {
        (self.key)()
    }

    #[inline]
    pub fn value_info(&self) -> &'static TypeInfo {
        (self.value)()
    }

    #[inline]
    pub fn make_key(&self) -> Box<dyn Reflect> {
        (self.make_key)()
    }

    #[inline]
    pub fn make_value(&self) -> Box<dyn Reflect> {
        (self.make_value)()
    }
}

/// Shape of a maybe-absent value.
#[derive(Debug)]
pub struct OptionInfo {
    ty: Ty,
    inner: fn() -> &'static TypeInfo,
}

impl OptionInfo {
    pub fn new<O, T>() -> Self
    where
        O: ?Sized + 'static,
        T: Typed,
    {
        Self {
            ty: Ty::of::<O>(),
            inner: T::type_info,
        }
    }

    #[inline]
    pub fn inner_info(&self) -> &'static TypeInfo {
        (self.inner)()
    }
}
