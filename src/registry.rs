//! Process-wide shape warming.
//!
//! Before an encode or decode starts, the root type's whole reachable shape
//! graph is walked once so every nested descriptor is computed up front.
//! The warmed set only ever grows; a type warmed by one operation is free
//! for every later operation on any thread.

use core::any::TypeId;
use std::collections::HashSet;
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::info::TypeInfo;

static WARMED: OnceLock<RwLock<HashSet<TypeId>>> = OnceLock::new();

fn warmed() -> &'static RwLock<HashSet<TypeId>> {
    WARMED.get_or_init(|| RwLock::new(HashSet::new()))
}

/// Ensures every descriptor reachable from `root` has been computed.
///
/// Cheap after the first call per root type: one read-locked set probe.
pub fn warm(root: &'static TypeInfo) {
    if warmed()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains(&root.ty_id())
    {
        return;
    }

    // The per-walk visited set terminates self-referential shapes.
    let mut visited = HashSet::new();
    walk(root, &mut visited);

    warmed()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .extend(visited);
}

fn walk(info: &'static TypeInfo, visited: &mut HashSet<TypeId>) {
    if !visited.insert(info.ty_id()) {
        return;
    }
    match info {
        TypeInfo::Struct(info) => {
            for member in info.iter() {
                walk(member.type_info(), visited);
            }
        }
        TypeInfo::List(info) => walk(info.item_info(), visited),
        TypeInfo::Map(info) => {
            walk(info.key_info(), visited);
            walk(info.value_info(), visited);
        }
        TypeInfo::Optional(info) => walk(info.inner_info(), visited),
        TypeInfo::Scalar(_) | TypeInfo::Enum(_) | TypeInfo::Dynamic(_) => {}
    }
}
