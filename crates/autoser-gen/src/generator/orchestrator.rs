//! Drives the generation pipeline over every candidate of a compilation.
//!
//! ```no_run
//! use autoser_gen::generator::{
//!   compilation::{Compilation, ExternCrate, SourceUnit},
//!   orchestrator::Orchestrator,
//! };
//!
//! # fn example() -> anyhow::Result<()> {
//! let unit = SourceUnit::parse("src/lib.rs", "", std::fs::read_to_string("src/lib.rs")?)?;
//! let compilation = Compilation::builder()
//!   .units(vec![unit])
//!   .extern_crates(vec![ExternCrate::runtime("autoser")])
//!   .build();
//!
//! let output = Orchestrator::new(compilation).generate()?;
//! for diagnostic in &output.diagnostics {
//!   eprintln!("{diagnostic}");
//! }
//! # Ok(())
//! # }
//! ```

use std::{collections::HashSet, path::Path};

use strum::Display;

use super::{
  cache::GenerationCache,
  candidates::{self, Candidate},
  codegen::{GeneratedSource, GenerationContext, generate_index},
  compilation::Compilation,
  diagnostics::{Diagnostic, DiagnosticCode, Location},
  fields::FieldDescriptor,
  markers::Markers,
  metrics::GenerationStats,
  policy::Policy,
  validator::{Validation, validate},
};
use crate::utils::{manifest::Manifest, source::load_crate};

pub struct Orchestrator {
  compilation: Compilation,
  missing_modules: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CandidateStatus {
  #[strum(to_string = "generated")]
  Generated,
  #[strum(to_string = "not marked")]
  Unmarked,
  #[strum(to_string = "rejected ({code})")]
  Rejected { code: DiagnosticCode },
  #[strum(to_string = "no serializable fields")]
  Empty,
  #[strum(to_string = "inert (no autoser dependency)")]
  Inert,
}

/// What happened to one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateReport {
  pub type_path: String,
  pub location: Location,
  pub status: CandidateStatus,
  pub fields_serialized: usize,
  pub equality: Option<bool>,
}

impl CandidateReport {
  fn new(candidate: &Candidate<'_>, status: CandidateStatus) -> Self {
    Self {
      type_path: candidate.type_path(),
      location: Location::new(candidate.file, candidate.item.ident.span()),
      status,
      fields_serialized: 0,
      equality: None,
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct GeneratedOutput {
  /// One fragment per generated struct, sorted by file name.
  pub files: Vec<GeneratedSource>,
  pub index: GeneratedSource,
  /// In candidate order.
  pub diagnostics: Vec<Diagnostic>,
  pub reports: Vec<CandidateReport>,
  pub stats: GenerationStats,
}

impl GeneratedOutput {
  pub fn has_errors(&self) -> bool {
    self.diagnostics.iter().any(Diagnostic::is_error)
  }

  /// Fragments followed by the index file.
  pub fn all_files(&self) -> impl Iterator<Item = &GeneratedSource> {
    self.files.iter().chain(std::iter::once(&self.index))
  }
}

enum Analysis {
  Unmarked,
  Rejected(Diagnostic),
  Empty {
    diagnostics: Vec<Diagnostic>,
  },
  Ready {
    context: GenerationContext,
    fields: Vec<FieldDescriptor>,
    diagnostics: Vec<Diagnostic>,
  },
}

impl Orchestrator {
  pub fn new(compilation: Compilation) -> Self {
    Self {
      compilation,
      missing_modules: Vec::new(),
    }
  }

  /// Loads the crate rooted at `root_file`, with dependencies read from
  /// `manifest_path`.
  pub async fn load(manifest_path: &Path, root_file: &Path) -> anyhow::Result<Self> {
    let manifest = Manifest::open(manifest_path).await?;
    let loaded = load_crate(root_file).await?;
    let compilation = Compilation::builder()
      .units(loaded.units)
      .extern_crates(manifest.extern_crates())
      .build();
    Ok(Self {
      compilation,
      missing_modules: loaded.missing_modules,
    })
  }

  pub fn compilation(&self) -> &Compilation {
    &self.compilation
  }

  /// Declared modules whose file was not found while loading. Their structs
  /// are not scanned.
  pub fn missing_modules(&self) -> &[String] {
    &self.missing_modules
  }

  pub fn generate(&self) -> anyhow::Result<GeneratedOutput> {
    self.generate_incremental(&mut GenerationCache::new())
  }

  /// Like [`Orchestrator::generate`], reusing results memoized in `cache` by
  /// earlier passes. Entries for structs that no longer generate are evicted.
  pub fn generate_incremental(&self, cache: &mut GenerationCache) -> anyhow::Result<GeneratedOutput> {
    let candidates = candidates::select(&self.compilation);
    let mut output = GeneratedOutput::default();
    output.stats.record_candidates(candidates.len());

    let Some(markers) = cache.markers(&self.compilation) else {
      output.reports = candidates
        .iter()
        .map(|candidate| CandidateReport::new(candidate, CandidateStatus::Inert))
        .collect();
      output.index = generate_index(&[])?;
      return Ok(output);
    };

    let analyses = candidates
      .iter()
      .map(|candidate| self.analyze(&markers, candidate))
      .collect::<Vec<_>>();

    let mut live = HashSet::new();
    for (candidate, analysis) in candidates.iter().zip(analyses) {
      let mut report = CandidateReport::new(candidate, CandidateStatus::Unmarked);
      match analysis {
        Analysis::Unmarked => output.stats.record_unmarked(),
        Analysis::Rejected(diagnostic) => {
          output.stats.record_rejected();
          report.status = CandidateStatus::Rejected { code: diagnostic.code };
          output.push_diagnostics([diagnostic]);
        }
        Analysis::Empty { diagnostics } => {
          output.stats.record_empty();
          report.status = CandidateStatus::Empty;
          output.push_diagnostics(diagnostics);
        }
        Analysis::Ready {
          context,
          fields,
          diagnostics,
        } => {
          output.stats.record_fields(&fields);
          output.push_diagnostics(diagnostics);

          let emitted = cache.emit(&context)?;
          if emitted.cached {
            output.stats.record_cache_hit();
          }
          live.insert(emitted.fingerprint);
          output.stats.record_struct(context.equality);
          output.files.push(emitted.source);

          report.status = CandidateStatus::Generated;
          report.fields_serialized = context.fields.len();
          report.equality = Some(context.equality);
        }
      }
      output.reports.push(report);
    }

    cache.retain(&live);
    output.files.sort();
    output.index = generate_index(&output.files)?;
    Ok(output)
  }

  /// Validation, then policy extraction. Reads only shared state.
  fn analyze(&self, markers: &Markers, candidate: &Candidate<'_>) -> Analysis {
    match validate(&self.compilation, markers, candidate) {
      Validation::Unmarked => Analysis::Unmarked,
      Validation::Rejected(diagnostic) => Analysis::Rejected(diagnostic),
      Validation::Empty { diagnostics } => Analysis::Empty { diagnostics },
      Validation::Accepted(validated) => {
        let policy = Policy::extract(&self.compilation, candidate.scope, validated.marker);
        let context = GenerationContext {
          namespace: candidate.module.clone(),
          type_name: candidate.item.ident.clone(),
          generics: candidate.item.generics.clone(),
          fields: validated.included().map(|field| field.member.clone()).collect(),
          equality: policy.equality,
        };
        Analysis::Ready {
          context,
          fields: validated.fields,
          diagnostics: validated.diagnostics,
        }
      }
    }
  }
}

impl GeneratedOutput {
  fn push_diagnostics(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
    for diagnostic in diagnostics {
      self.stats.record_diagnostic(&diagnostic);
      self.diagnostics.push(diagnostic);
    }
  }
}
