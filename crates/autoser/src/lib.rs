//! Runtime half of `autoser`.
//!
//! Structs annotated with [`auto_serialize`] get their [`Serializable`] impl
//! (and optionally `PartialEq`, [`DynEq`], `Hash` and [`HashField`]) from
//! `autoser-gen` at build time. This crate only provides the capability those
//! impls call into: a bidirectional [`Serializer`], field hashing, and the
//! impls for primitives and std containers.
//!
//! ```
//! use autoser::{Serializable, Serializer};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Pair {
//!   left: u16,
//!   right: String,
//! }
//!
//! impl Serializable for Pair {
//!   fn serialize<S: Serializer>(&mut self, serializer: &mut S) -> Result<(), S::Error> {
//!     serializer.serialize(&mut self.left)?;
//!     serializer.serialize(&mut self.right)?;
//!     Ok(())
//!   }
//! }
//!
//! let mut pair = Pair { left: 7, right: "seven".to_string() };
//! let bytes = autoser::to_bytes(&mut pair).unwrap();
//! let decoded: Pair = autoser::from_bytes(&bytes).unwrap();
//! assert_eq!(decoded, pair);
//! ```

use std::any::Any;

pub use autoser_macros::{auto_serialize, non_serialized};

mod binary;
mod error;
mod hash;
mod impls;

pub use binary::{BinaryReader, BinaryWriter};
pub use error::Error;
pub use hash::HashField;

/// A reader or a writer, depending on [`Serializer::is_reading`].
///
/// The same `serialize` body drives both directions: when writing, values are
/// copied out of the fields; when reading, fields are overwritten in place.
pub trait Serializer {
  type Error;

  fn is_reading(&self) -> bool;

  /// Moves raw bytes: fills `bytes` when reading, emits them when writing.
  fn bytes(&mut self, bytes: &mut [u8]) -> Result<(), Self::Error>;

  /// Builds the error reported for malformed input.
  fn invalid_data(&self, reason: &'static str) -> Self::Error;

  /// Serializes one value by mutable reference.
  fn serialize<T: Serializable>(&mut self, value: &mut T) -> Result<(), Self::Error>
  where
    Self: Sized,
  {
    value.serialize(self)
  }
}

pub trait Serializable {
  fn serialize<S: Serializer>(&mut self, serializer: &mut S) -> Result<(), S::Error>;
}

/// Equality against a value of unknown type.
///
/// Generated impls downcast `other` to `Self` and defer to `PartialEq`; a value
/// of any other type is never equal.
pub trait DynEq {
  fn dyn_eq(&self, other: &dyn Any) -> bool;
}

/// Writes `value` into a fresh buffer.
pub fn to_bytes<T: Serializable>(value: &mut T) -> Result<Vec<u8>, Error> {
  let mut writer = BinaryWriter::new();
  writer.serialize(value)?;
  Ok(writer.into_inner())
}

/// Reads a `T` from `bytes`, rejecting input with leftover bytes.
pub fn from_bytes<T: Serializable + Default>(bytes: &[u8]) -> Result<T, Error> {
  let mut reader = BinaryReader::new(bytes);
  let mut value = T::default();
  reader.serialize(&mut value)?;
  match reader.remaining() {
    0 => Ok(value),
    remaining => Err(Error::TrailingBytes { remaining }),
  }
}
