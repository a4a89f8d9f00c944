//! Structs covering each shape `autoser-gen` emits. The build script
//! generates their impls; the tests under `tests/` drive them through the
//! runtime.

/// Root-level, equality on, with float fields.
#[autoser::auto_serialize]
#[derive(Debug, Default, Clone)]
pub struct Sample {
  pub value: f64,
  pub history: Vec<f32>,
  pub peak: Option<f64>,
  pub label: String,
}

/// Root-level tuple struct with equality off.
#[autoser::auto_serialize(equality = false)]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Reading(pub u16);

/// Generic over its payload.
#[autoser::auto_serialize]
#[derive(Debug, Default, Clone)]
pub struct Wrapper<T> {
  pub inner: T,
  pub tag: u8,
}

pub mod shapes {
  #[autoser::auto_serialize]
  #[derive(Debug, Default, Clone)]
  pub struct Point {
    pub x: i32,
    pub y: i32,
    #[autoser::non_serialized]
    pub cached_norm: u64,
  }

  pub mod planar {
    use super::Point;

    /// Nests another generated struct.
    #[autoser::auto_serialize]
    #[derive(Debug, Default, Clone)]
    pub struct Segment {
      pub start: Point,
      pub end: Point,
      pub weight: f32,
    }
  }
}

include!(env!("AUTOSER_INDEX"));
