use super::semantic::{SemanticModel, SymbolId};

/// Package name of the runtime crate that defines both markers.
pub const MARKER_CRATE: &str = "autoser";
pub const OPT_IN_MARKER: &str = "auto_serialize";
pub const EXCLUSION_MARKER: &str = "non_serialized";

/// Root-level items of the runtime crate.
pub const RUNTIME_EXPORTS: &[&str] = &[
  OPT_IN_MARKER,
  EXCLUSION_MARKER,
  "BinaryReader",
  "BinaryWriter",
  "DynEq",
  "Error",
  "HashField",
  "Serializable",
  "Serializer",
  "from_bytes",
  "hash_field_via_hash",
  "to_bytes",
];

/// Resolved identities of the two marker attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Markers {
  pub opt_in: SymbolId,
  pub exclusion: SymbolId,
}

impl Markers {
  /// `None` when the compilation cannot name the runtime crate, which makes
  /// the whole pipeline a no-op.
  pub fn resolve(model: &impl SemanticModel) -> Option<Self> {
    Some(Self {
      opt_in: model.symbol_by_metadata_name(&format!("{MARKER_CRATE}::{OPT_IN_MARKER}"))?,
      exclusion: model.symbol_by_metadata_name(&format!("{MARKER_CRATE}::{EXCLUSION_MARKER}"))?,
    })
  }
}
