//! Sequence and map implementations: `Vec`, `HashMap`, `BTreeMap`.

use core::hash::Hash;
use std::collections::{BTreeMap, HashMap};

use crate::cell::GenericTypeInfoCell;
use crate::info::{ListInfo, MapInfo, TypeInfo, Typed};
use crate::ops::{List, Map};
use crate::{Reflect, ReflectKind, ReflectMut, ReflectRef};

impl<T> Typed for Vec<T>
where
    T: Reflect + Typed + Default,
{
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::List(ListInfo::new::<Self, T>()))
    }
}

impl<T> Reflect for Vec<T>
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
        ReflectKind::List
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::List(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::List(self)
    }
}

impl<T> List for Vec<T>
where
    T: Reflect + Typed + Default,
{
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        self.as_slice().get(index).map(|item| item as &dyn Reflect)
    }

    fn push_boxed(&mut self, item: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        self.push(item.take::<T>()?);
        Ok(())
    }
}

/// Implements the map vocabulary for a concrete map type.
macro_rules! impl_map {
    ($name:ident <K: $($kbound:path),*>) => {
        impl<K, V> Typed for $name<K, V>
        where
            K: Reflect + Typed + Default $(+ $kbound)*,
            V: Reflect + Typed + Default,
        {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Map(MapInfo::new::<Self, K, V>())
                })
            }
        }

        impl<K, V> Reflect for $name<K, V>
        where
            K: Reflect + Typed + Default $(+ $kbound)*,
            V: Reflect + Typed + Default,
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
                ReflectKind::Map
            }

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Map(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Map(self)
            }
        }

        impl<K, V> Map for $name<K, V>
        where
            K: Reflect + Typed + Default $(+ $kbound)*,
            V: Reflect + Typed + Default,
        {
            fn len(&self) -> usize {
                $name::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
                Box::new(
                    $name::iter(self)
                        .map(|(key, value)| (key as &dyn Reflect, value as &dyn Reflect)),
                )
            }

            fn insert_boxed(
                &mut self,
                key: Box<dyn Reflect>,
                value: Box<dyn Reflect>,
            ) -> Result<(), Box<dyn Reflect>> {
                let key = key.take::<K>()?;
                let value = value.take::<V>()?;
                self.insert(key, value);
                Ok(())
            }
        }
    };
}

impl_map!(HashMap<K: Eq, Hash>);
impl_map!(BTreeMap<K: Ord>);

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::ops::{List, Map};
    use crate::{Reflect, ReflectMut};

    #[test]
    fn list_push_through_reflection() {
        let mut items: Vec<i32> = Vec::new();
        let reflected: &mut dyn Reflect = &mut items;
        let ReflectMut::List(list) = reflected.reflect_mut() else {
            panic!("expected a list");
        };
        list.push_boxed(Box::new(5_i32)).unwrap();
        assert!(list.push_boxed(Box::new("nope".to_owned())).is_err());
        assert_eq!(List::len(list), 1);
        assert_eq!(items, [5]);
    }

    #[test]
    fn map_insert_through_reflection() {
        let mut tags: HashMap<String, String> = HashMap::new();
        let reflected: &mut dyn Reflect = &mut tags;
        let ReflectMut::Map(map) = reflected.reflect_mut() else {
            panic!("expected a map");
        };
        map.insert_boxed(Box::new("Key1".to_owned()), Box::new("Value1".to_owned()))
            .unwrap();
        assert_eq!(Map::len(map), 1);
        assert_eq!(tags["Key1"], "Value1");
    }
}
