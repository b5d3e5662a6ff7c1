//! `Uuid` as a string scalar, lowercase hyphenated on output.

use uuid::Uuid;

use super::impl_scalar;

impl_scalar!(Uuid);

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::{Reflect, ReflectKind};

    #[test]
    fn uuid_is_a_scalar() {
        assert_eq!(Uuid::nil().reflect_kind(), ReflectKind::Scalar);
    }
}
