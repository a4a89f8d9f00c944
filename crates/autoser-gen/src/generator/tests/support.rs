use crate::generator::{
  compilation::{Compilation, ExternCrate, SourceUnit},
  diagnostics::DiagnosticCode,
  orchestrator::{CandidateReport, GeneratedOutput, Orchestrator},
};

/// `(module, source)` pairs; module `""` is `src/lib.rs`, `"a::b"` is
/// `src/a/b.rs`.
pub(crate) fn compilation(files: &[(&str, &str)], extern_crates: Vec<ExternCrate>) -> Compilation {
  let units = files
    .iter()
    .map(|(module, source)| {
      let path = if module.is_empty() {
        "src/lib.rs".to_string()
      } else {
        format!("src/{}.rs", module.replace("::", "/"))
      };
      SourceUnit::parse(path, module, *source).unwrap()
    })
    .collect();

  Compilation::builder().units(units).extern_crates(extern_crates).build()
}

/// Runs the pipeline over a crate that depends on `autoser`.
pub(crate) fn generate(files: &[(&str, &str)]) -> GeneratedOutput {
  Orchestrator::new(compilation(files, vec![ExternCrate::runtime("autoser")]))
    .generate()
    .unwrap()
}

pub(crate) fn generate_root(source: &str) -> GeneratedOutput {
  generate(&[("", source)])
}

pub(crate) fn fragment<'a>(output: &'a GeneratedOutput, file_name: &str) -> &'a str {
  output
    .files
    .iter()
    .find(|file| file.file_name == file_name)
    .map(|file| file.code.as_str())
    .unwrap_or_else(|| panic!("no `{file_name}` among {:?}", file_names(output)))
}

pub(crate) fn file_names(output: &GeneratedOutput) -> Vec<&str> {
  output.files.iter().map(|file| file.file_name.as_str()).collect()
}

pub(crate) fn codes(output: &GeneratedOutput) -> Vec<DiagnosticCode> {
  output.diagnostics.iter().map(|diagnostic| diagnostic.code).collect()
}

pub(crate) fn report<'a>(output: &'a GeneratedOutput, type_path: &str) -> &'a CandidateReport {
  output
    .reports
    .iter()
    .find(|report| report.type_path == type_path)
    .unwrap_or_else(|| panic!("no report for `{type_path}`"))
}

/// Members passed to the serializer by `code`, in emission order.
pub(crate) fn serialized_fields(code: &str) -> Vec<String> {
  code
    .lines()
    .filter_map(|line| {
      line
        .trim()
        .strip_prefix("serializer.serialize(&mut self.")
        .and_then(|rest| rest.strip_suffix(")?;"))
        .map(str::to_owned)
    })
    .collect()
}
