use crate::{Error, Serializer};

/// Little-endian writer backed by a `Vec<u8>`.
#[derive(Debug, Default, Clone)]
pub struct BinaryWriter {
  buf: Vec<u8>,
}

impl BinaryWriter {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn as_bytes(&self) -> &[u8] {
    &self.buf
  }

  #[must_use]
  pub fn into_inner(self) -> Vec<u8> {
    self.buf
  }
}

impl Serializer for BinaryWriter {
  type Error = Error;

  fn is_reading(&self) -> bool {
    false
  }

  fn bytes(&mut self, bytes: &mut [u8]) -> Result<(), Error> {
    self.buf.extend_from_slice(bytes);
    Ok(())
  }

  fn invalid_data(&self, reason: &'static str) -> Error {
    Error::InvalidData(reason)
  }
}

/// Reader over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
  data: &'a [u8],
  pos: usize,
}

impl<'a> BinaryReader<'a> {
  #[must_use]
  pub fn new(data: &'a [u8]) -> Self {
    Self { data, pos: 0 }
  }

  #[must_use]
  pub fn remaining(&self) -> usize {
    self.data.len() - self.pos
  }
}

impl Serializer for BinaryReader<'_> {
  type Error = Error;

  fn is_reading(&self) -> bool {
    true
  }

  fn bytes(&mut self, bytes: &mut [u8]) -> Result<(), Error> {
    let remaining = self.remaining();
    if bytes.len() > remaining {
      return Err(Error::UnexpectedEof {
        needed: bytes.len(),
        remaining,
      });
    }
    let end = self.pos + bytes.len();
    bytes.copy_from_slice(&self.data[self.pos..end]);
    self.pos = end;
    Ok(())
  }

  fn invalid_data(&self, reason: &'static str) -> Error {
    Error::InvalidData(reason)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_writer_appends_bytes() {
    let mut writer = BinaryWriter::new();
    writer.bytes(&mut [1, 2]).unwrap();
    writer.bytes(&mut [3]).unwrap();
    assert_eq!(writer.as_bytes(), &[1, 2, 3]);
    assert!(!writer.is_reading());
  }

  #[test]
  fn test_reader_fills_buffer_and_advances() {
    let data = [9, 8, 7];
    let mut reader = BinaryReader::new(&data);
    let mut buf = [0u8; 2];
    reader.bytes(&mut buf).unwrap();
    assert_eq!(buf, [9, 8]);
    assert_eq!(reader.remaining(), 1);
    assert!(reader.is_reading());
  }

  #[test]
  fn test_reader_reports_eof() {
    let mut reader = BinaryReader::new(&[1]);
    let mut buf = [0u8; 4];
    let err = reader.bytes(&mut buf).unwrap_err();
    assert_eq!(err, Error::UnexpectedEof { needed: 4, remaining: 1 });
  }
}
