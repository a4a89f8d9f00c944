//! Memoization across generation passes.
//!
//! Validation reads the whole compilation and is re-run every pass. What is
//! cached are the two pure steps keyed by their complete inputs: marker
//! resolution (keyed by the extern crates a compilation can name) and
//! emission (keyed by the generation context).

use std::collections::{HashMap, HashSet};

use quote::ToTokens;

use super::{
  codegen::{self, GeneratedSource, GenerationContext},
  compilation::Compilation,
  markers::Markers,
};

/// BLAKE3 digest of a cache entry's inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(blake3::Hash);

impl Fingerprint {
  pub fn of_context(context: &GenerationContext) -> Self {
    let mut hasher = FingerprintHasher::default();
    hasher.list(context.namespace.iter().map(String::as_str));
    hasher.text(&context.type_name.to_string());
    hasher.text(&context.generics.to_token_stream().to_string());
    hasher.text(&context.generics.where_clause.to_token_stream().to_string());
    hasher.list(context.fields.iter().map(|field| field.to_token_stream().to_string()));
    hasher.flag(context.equality);
    hasher.finish()
  }

  pub fn of_dependencies(compilation: &Compilation) -> Self {
    let mut hasher = FingerprintHasher::default();
    for krate in compilation.extern_crates() {
      hasher.text(&krate.local_name);
      hasher.text(&krate.crate_name);
      match &krate.exports {
        Some(exports) => {
          hasher.flag(true);
          hasher.list(exports.iter().map(String::as_str));
        }
        None => hasher.flag(false),
      }
    }
    hasher.finish()
  }
}

/// Length-prefixes every input so adjacent strings cannot run together.
#[derive(Default)]
struct FingerprintHasher(blake3::Hasher);

impl FingerprintHasher {
  fn text(&mut self, value: &str) {
    self.0.update(&(value.len() as u64).to_le_bytes());
    self.0.update(value.as_bytes());
  }

  fn list<S: AsRef<str>>(&mut self, values: impl IntoIterator<Item = S>) {
    let values = values.into_iter().collect::<Vec<_>>();
    self.0.update(&(values.len() as u64).to_le_bytes());
    for value in values {
      self.text(value.as_ref());
    }
  }

  fn flag(&mut self, value: bool) {
    self.0.update(&[u8::from(value)]);
  }

  fn finish(self) -> Fingerprint {
    Fingerprint(self.0.finalize())
  }
}

#[derive(Debug, Clone)]
pub struct Emitted {
  pub source: GeneratedSource,
  pub fingerprint: Fingerprint,
  /// `true` when the source came from the cache.
  pub cached: bool,
}

#[derive(Debug, Default)]
pub struct GenerationCache {
  markers: Option<(Fingerprint, Option<Markers>)>,
  sources: HashMap<Fingerprint, GeneratedSource>,
}

impl GenerationCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn markers(&mut self, compilation: &Compilation) -> Option<Markers> {
    let key = Fingerprint::of_dependencies(compilation);
    if let Some((cached_key, markers)) = &self.markers
      && *cached_key == key
    {
      return markers.clone();
    }

    let markers = Markers::resolve(compilation);
    self.markers = Some((key, markers.clone()));
    markers
  }

  pub fn emit(&mut self, context: &GenerationContext) -> anyhow::Result<Emitted> {
    let fingerprint = Fingerprint::of_context(context);
    if let Some(source) = self.sources.get(&fingerprint) {
      return Ok(Emitted {
        source: source.clone(),
        fingerprint,
        cached: true,
      });
    }

    let source = codegen::generate(context)?;
    self.sources.insert(fingerprint, source.clone());
    Ok(Emitted {
      source,
      fingerprint,
      cached: false,
    })
  }

  /// Drops every emitted source not in `live`.
  pub fn retain(&mut self, live: &HashSet<Fingerprint>) {
    self.sources.retain(|fingerprint, _| live.contains(fingerprint));
  }

  pub fn len(&self) -> usize {
    self.sources.len()
  }

  pub fn is_empty(&self) -> bool {
    self.sources.is_empty()
  }
}
