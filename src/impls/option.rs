//! `Option<T>`: the only type with a `null` encoding.

use crate::cell::GenericTypeInfoCell;
use crate::info::{OptionInfo, TypeInfo, Typed};
use crate::ops::Optional;
use crate::{Reflect, ReflectKind, ReflectMut, ReflectRef};

impl<T> Typed for Option<T>
where
    T: Reflect + Typed + Default,
{
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Optional(OptionInfo::new::<Self, T>()))
    }
}

impl<T> Reflect for Option<T>
where
    T: Reflect + Typed + Default,
{
    fn reflect_type_info(&self) -> &'static TypeInfo {
        <Self as Typed>::type_info()
    }

    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }

    #[inline]
    fn reflect_kind(&self) -> ReflectKind {
        ReflectKind::Optional
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Optional(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Optional(self)
    }
}

impl<T> Optional for Option<T>
where
    T: Reflect + Typed + Default,
{
    fn is_some(&self) -> bool {
        Option::is_some(self)
    }

    fn value(&self) -> Option<&dyn Reflect> {
        self.as_ref().map(|value| value as &dyn Reflect)
    }

    fn set_none(&mut self) {
        *self = None;
    }

    fn insert_default(&mut self) -> &mut dyn Reflect {
        self.insert(T::default())
    }
}
