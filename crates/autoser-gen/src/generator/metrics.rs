use super::{
  diagnostics::{Diagnostic, Severity},
  fields::{FieldDescriptor, FieldVerdict},
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub candidates_scanned: usize,
  pub structs_generated: usize,
  pub equality_impls_generated: usize,
  pub fields_serialized: usize,
  pub fields_excluded: usize,
  pub reference_fields: usize,
  pub unresolved_fields: usize,
  pub candidates_unmarked: usize,
  pub candidates_rejected: usize,
  pub candidates_empty: usize,
  pub errors: usize,
  pub warnings: usize,
  pub cache_hits: usize,
}

impl GenerationStats {
  pub fn record_candidates(&mut self, count: usize) {
    self.candidates_scanned += count;
  }

  pub fn record_struct(&mut self, equality: bool) {
    self.structs_generated += 1;
    if equality {
      self.equality_impls_generated += 1;
    }
  }

  pub fn record_field(&mut self, field: &FieldDescriptor) {
    match field.verdict {
      FieldVerdict::Included => self.fields_serialized += 1,
      FieldVerdict::Reference => {
        self.reference_fields += 1;
        self.fields_excluded += 1;
      }
      FieldVerdict::Unresolved => {
        self.unresolved_fields += 1;
        self.fields_excluded += 1;
      }
      FieldVerdict::ZeroSized | FieldVerdict::Excluded => self.fields_excluded += 1,
    }
  }

  pub fn record_fields<'a>(&mut self, fields: impl IntoIterator<Item = &'a FieldDescriptor>) {
    for field in fields {
      self.record_field(field);
    }
  }

  pub fn record_unmarked(&mut self) {
    self.candidates_unmarked += 1;
  }

  pub fn record_rejected(&mut self) {
    self.candidates_rejected += 1;
  }

  pub fn record_empty(&mut self) {
    self.candidates_empty += 1;
  }

  pub fn record_diagnostic(&mut self, diagnostic: &Diagnostic) {
    match diagnostic.severity {
      Severity::Error => self.errors += 1,
      Severity::Warning => self.warnings += 1,
    }
  }

  pub fn record_cache_hit(&mut self) {
    self.cache_hits += 1;
  }

  pub fn has_errors(&self) -> bool {
    self.errors > 0
  }
}
