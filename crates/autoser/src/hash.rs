use std::hash::{Hash, Hasher};

/// Hashing for the field types generated `Hash` impls visit.
///
/// Covers the same types as [`Serializable`](crate::Serializable), including
/// `f32`/`f64`, which have no `Hash` impl. Floats hash their bit pattern with
/// `-0.0` folded into `0.0`, so values that compare equal hash equal.
///
/// Generated structs with equality implement this themselves. Hand-written
/// `Serializable` types that already implement `Hash` can opt in with
/// [`hash_field_via_hash!`](crate::hash_field_via_hash).
pub trait HashField {
  fn hash_field<H: Hasher>(&self, state: &mut H);
}

/// Implements [`HashField`] by delegating to `Hash`.
///
/// ```
/// #[derive(Hash)]
/// enum Mode {
///   Fast,
///   Slow,
/// }
///
/// autoser::hash_field_via_hash!(Mode);
/// ```
#[macro_export]
macro_rules! hash_field_via_hash {
  ($($ty:ty),+ $(,)?) => {
    $(
      impl $crate::HashField for $ty {
        fn hash_field<H: ::core::hash::Hasher>(&self, state: &mut H) {
          ::core::hash::Hash::hash(self, state);
        }
      }
    )+
  };
}

hash_field_via_hash!(
  u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, bool, char, String, (),
);

macro_rules! impl_float {
  ($($ty:ty),* $(,)?) => {
    $(
      impl HashField for $ty {
        fn hash_field<H: Hasher>(&self, state: &mut H) {
          let value = if *self == 0.0 { 0.0 } else { *self };
          value.to_bits().hash(state);
        }
      }
    )*
  };
}

impl_float!(f32, f64);

impl<T: HashField> HashField for Vec<T> {
  fn hash_field<H: Hasher>(&self, state: &mut H) {
    state.write_usize(self.len());
    for item in self {
      item.hash_field(state);
    }
  }
}

impl<T: HashField> HashField for Option<T> {
  fn hash_field<H: Hasher>(&self, state: &mut H) {
    match self {
      None => state.write_u8(0),
      Some(value) => {
        state.write_u8(1);
        value.hash_field(state);
      }
    }
  }
}

impl<T: HashField + ?Sized> HashField for Box<T> {
  fn hash_field<H: Hasher>(&self, state: &mut H) {
    (**self).hash_field(state);
  }
}

impl<T: HashField, const N: usize> HashField for [T; N] {
  fn hash_field<H: Hasher>(&self, state: &mut H) {
    for item in self {
      item.hash_field(state);
    }
  }
}

macro_rules! impl_tuple {
  ($(($($name:ident . $idx:tt),+)),* $(,)?) => {
    $(
      impl<$($name: HashField),+> HashField for ($($name,)+) {
        fn hash_field<H: Hasher>(&self, state: &mut H) {
          $(self.$idx.hash_field(state);)+
        }
      }
    )*
  };
}

impl_tuple!(
  (A.0),
  (A.0, B.1),
  (A.0, B.1, C.2),
  (A.0, B.1, C.2, D.3),
  (A.0, B.1, C.2, D.3, E.4),
  (A.0, B.1, C.2, D.3, E.4, F.5),
);
