//! Scalar leaves: the numeric primitives, `bool` and `String`.

/// Implements `Typed` and `Reflect` for a leaf type with a single-token
/// JSON rendering.
macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl $crate::info::Typed for $ty {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::cell::NonGenericTypeInfoCell =
                    $crate::cell::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| $crate::info::TypeInfo::Scalar(
                    $crate::info::ScalarInfo::new::<$ty>(),
                ))
            }
        }

        impl $crate::Reflect for $ty {
            fn reflect_type_info(&self) -> &'static $crate::info::TypeInfo {
                <Self as $crate::info::Typed>::type_info()
            }

            fn set(
                &mut self,
                value: ::std::boxed::Box<dyn $crate::Reflect>,
            ) -> ::std::result::Result<(), ::std::boxed::Box<dyn $crate::Reflect>> {
                *self = value.take::<Self>()?;
                Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> $crate::ReflectKind {
                $crate::ReflectKind::Scalar
            }

            #[inline]
            fn reflect_ref(&self) -> $crate::ReflectRef<'_> {
                $crate::ReflectRef::Scalar(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> $crate::ReflectMut<'_> {
                $crate::ReflectMut::Scalar(self)
            }
        }
    )*};
}

pub(crate) use impl_scalar;

impl_scalar!(
    bool, String,
    i8, i16, i32, i64, i128, isize,
    u8, u16, u32, u64, u128, usize,
    f32, f64,
);

#[cfg(test)]
mod tests {
    use crate::info::Typed;
    use crate::{Reflect, ReflectKind};

    #[test]
    fn scalars_resolve_to_scalar_kind() {
        assert_eq!(1_i32.reflect_kind(), ReflectKind::Scalar);
        assert_eq!(true.reflect_kind(), ReflectKind::Scalar);
        assert_eq!(String::new().reflect_kind(), ReflectKind::Scalar);
    }

    #[test]
    fn info_matches_type() {
        assert!(<u64 as Typed>::type_info().type_is::<u64>());
        assert!(<String as Typed>::type_info().type_is::<String>());
    }
}
