use crate::{Serializable, Serializer};

const CHUNK: usize = 256;

macro_rules! impl_le_bytes {
  ($($ty:ty),* $(,)?) => {
    $(
      impl Serializable for $ty {
        fn serialize<S: Serializer>(&mut self, serializer: &mut S) -> Result<(), S::Error> {
          let mut buf = self.to_le_bytes();
          serializer.bytes(&mut buf)?;
          if serializer.is_reading() {
            *self = <$ty>::from_le_bytes(buf);
          }
          Ok(())
        }
      }
    )*
  };
}

impl_le_bytes!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);

macro_rules! impl_widened {
  ($($ty:ty => $wire:ty),* $(,)?) => {
    $(
      impl Serializable for $ty {
        fn serialize<S: Serializer>(&mut self, serializer: &mut S) -> Result<(), S::Error> {
          let mut wire = <$wire>::try_from(*self).map_err(|_| serializer.invalid_data("value out of range"))?;
          serializer.serialize(&mut wire)?;
          *self = <$ty>::try_from(wire).map_err(|_| serializer.invalid_data("value out of range"))?;
          Ok(())
        }
      }
    )*
  };
}

impl_widened!(usize => u64, isize => i64);

impl Serializable for bool {
  fn serialize<S: Serializer>(&mut self, serializer: &mut S) -> Result<(), S::Error> {
    let mut raw = u8::from(*self);
    serializer.serialize(&mut raw)?;
    *self = match raw {
      0 => false,
      1 => true,
      _ => return Err(serializer.invalid_data("bool must be 0 or 1")),
    };
    Ok(())
  }
}

impl Serializable for char {
  fn serialize<S: Serializer>(&mut self, serializer: &mut S) -> Result<(), S::Error> {
    let mut raw = u32::from(*self);
    serializer.serialize(&mut raw)?;
    *self = char::from_u32(raw).ok_or_else(|| serializer.invalid_data("invalid char scalar"))?;
    Ok(())
  }
}

/// Length prefix shared by all variable-size values.
fn serialize_len<S: Serializer>(serializer: &mut S, len: usize) -> Result<usize, S::Error> {
  let mut raw = u32::try_from(len).map_err(|_| serializer.invalid_data("length exceeds u32::MAX"))?;
  serializer.serialize(&mut raw)?;
  usize::try_from(raw).map_err(|_| serializer.invalid_data("length exceeds usize::MAX"))
}

impl Serializable for String {
  fn serialize<S: Serializer>(&mut self, serializer: &mut S) -> Result<(), S::Error> {
    let len = serialize_len(serializer, self.len())?;
    if !serializer.is_reading() {
      let mut bytes = self.as_bytes().to_vec();
      return serializer.bytes(&mut bytes);
    }

    let mut bytes = Vec::new();
    let mut chunk = [0u8; CHUNK];
    let mut left = len;
    while left > 0 {
      let n = left.min(CHUNK);
      serializer.bytes(&mut chunk[..n])?;
      bytes.extend_from_slice(&chunk[..n]);
      left -= n;
    }
    *self = String::from_utf8(bytes).map_err(|_| serializer.invalid_data("string is not valid UTF-8"))?;
    Ok(())
  }
}

impl<T: Serializable + Default> Serializable for Vec<T> {
  fn serialize<S: Serializer>(&mut self, serializer: &mut S) -> Result<(), S::Error> {
    let len = serialize_len(serializer, self.len())?;
    if !serializer.is_reading() {
      for item in self.iter_mut() {
        serializer.serialize(item)?;
      }
      return Ok(());
    }

    self.clear();
    for _ in 0..len {
      let mut item = T::default();
      serializer.serialize(&mut item)?;
      self.push(item);
    }
    Ok(())
  }
}

impl<T: Serializable + Default> Serializable for Option<T> {
  fn serialize<S: Serializer>(&mut self, serializer: &mut S) -> Result<(), S::Error> {
    let mut present = self.is_some();
    serializer.serialize(&mut present)?;
    match (present, serializer.is_reading()) {
      (false, _) => *self = None,
      (true, true) => {
        let mut value = T::default();
        serializer.serialize(&mut value)?;
        *self = Some(value);
      }
      (true, false) => {
        if let Some(value) = self.as_mut() {
          serializer.serialize(value)?;
        }
      }
    }
    Ok(())
  }
}

impl<T: Serializable> Serializable for Box<T> {
  fn serialize<S: Serializer>(&mut self, serializer: &mut S) -> Result<(), S::Error> {
    serializer.serialize(&mut **self)
  }
}

impl<T: Serializable, const N: usize> Serializable for [T; N] {
  fn serialize<S: Serializer>(&mut self, serializer: &mut S) -> Result<(), S::Error> {
    for item in self.iter_mut() {
      serializer.serialize(item)?;
    }
    Ok(())
  }
}

impl Serializable for () {
  fn serialize<S: Serializer>(&mut self, _serializer: &mut S) -> Result<(), S::Error> {
    Ok(())
  }
}

macro_rules! impl_tuple {
  ($(($($name:ident . $idx:tt),+)),* $(,)?) => {
    $(
      impl<$($name: Serializable),+> Serializable for ($($name,)+) {
        fn serialize<S: Serializer>(&mut self, serializer: &mut S) -> Result<(), S::Error> {
          $(serializer.serialize(&mut self.$idx)?;)+
          Ok(())
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
