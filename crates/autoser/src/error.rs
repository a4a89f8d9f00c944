use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
  UnexpectedEof { needed: usize, remaining: usize },
  #[error("invalid data: {0}")]
  InvalidData(&'static str),
  #[error("{remaining} trailing bytes after value")]
  TrailingBytes { remaining: usize },
}
