use std::{
  fmt::{Display, Formatter},
  path::{Path, PathBuf},
};

use proc_macro2::Span;
use serde::Serialize;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize)]
pub enum DiagnosticCode {
  #[strum(to_string = "AS001")]
  #[serde(rename = "AS001")]
  NotExtensible,
  #[strum(to_string = "AS002")]
  #[serde(rename = "AS002")]
  ManualSerializeConflict,
  #[strum(to_string = "AS003")]
  #[serde(rename = "AS003")]
  UnsupportedReferenceField,
  #[strum(to_string = "AS004")]
  #[serde(rename = "AS004")]
  RenamedExclusionMarker,
}

impl DiagnosticCode {
  pub const fn title(self) -> &'static str {
    match self {
      Self::NotExtensible => "struct must be extensible",
      Self::ManualSerializeConflict => "serialization method already exists",
      Self::UnsupportedReferenceField => "reference types are not supported",
      Self::RenamedExclusionMarker => "field marker must be spelled `non_serialized`",
    }
  }

  /// `AS003` only drops the offending field. `AS004` keeps the struct but
  /// fails the build, since rustc rejects the attribute anyway.
  pub const fn severity(self) -> Severity {
    match self {
      Self::NotExtensible | Self::ManualSerializeConflict | Self::RenamedExclusionMarker => Severity::Error,
      Self::UnsupportedReferenceField => Severity::Warning,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Error,
  Warning,
}

/// 1-based line and column of a syntax element.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Location {
  pub file: PathBuf,
  pub line: usize,
  pub column: usize,
}

impl Location {
  pub fn new(file: &Path, span: Span) -> Self {
    let start = span.start();
    Self {
      file: file.to_path_buf(),
      line: start.line,
      column: start.column + 1,
    }
  }
}

impl Display for Location {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Diagnostic {
  pub code: DiagnosticCode,
  pub severity: Severity,
  pub message: String,
  pub location: Location,
}

impl Diagnostic {
  pub fn new(code: DiagnosticCode, message: String, location: Location) -> Self {
    Self {
      code,
      severity: code.severity(),
      message,
      location,
    }
  }

  pub fn not_extensible(type_name: &str, location: Location) -> Self {
    Self::new(
      DiagnosticCode::NotExtensible,
      format!("struct `{type_name}` must be extensible: declare it `pub(crate)` or `pub` so generated code can reach it"),
      location,
    )
  }

  pub fn private_module(type_name: &str, module: &str, location: Location) -> Self {
    Self::new(
      DiagnosticCode::NotExtensible,
      format!(
        "struct `{type_name}` must be extensible: module `{module}` is not visible from the crate root, so generated code cannot reach it"
      ),
      location,
    )
  }

  pub fn manual_serialize(type_name: &str, method: &str, location: Location) -> Self {
    Self::new(
      DiagnosticCode::ManualSerializeConflict,
      format!("struct `{type_name}` already defines a `{method}` method"),
      location,
    )
  }

  pub fn reference_field(type_name: &str, field: &str, location: Location) -> Self {
    Self::new(
      DiagnosticCode::UnsupportedReferenceField,
      format!("field `{field}` of `{type_name}` has a reference type and is not serialized"),
      location,
    )
  }

  pub fn renamed_exclusion_marker(type_name: &str, field: &str, spelling: &str, location: Location) -> Self {
    Self::new(
      DiagnosticCode::RenamedExclusionMarker,
      format!(
        "field `{field}` of `{type_name}` uses the exclusion marker as `{spelling}`; `auto_serialize` only strips it when spelled `non_serialized`"
      ),
      location,
    )
  }

  pub fn is_error(&self) -> bool {
    self.severity == Severity::Error
  }
}

impl Display for Diagnostic {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{}[{}]: {}\n  --> {}",
      self.severity, self.code, self.message, self.location
    )
  }
}
