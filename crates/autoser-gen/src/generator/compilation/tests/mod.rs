mod constant_tests;
mod resolution_tests;

use super::{Compilation, ExternCrate, SourceUnit};
use crate::generator::semantic::{Namespace, ScopeId, SemanticModel, TypeKind};

/// Builds a compilation from `(module, source)` pairs, with `autoser` and an
/// opaque `serde` as dependencies.
pub(super) fn compile(files: &[(&str, &str)]) -> Compilation {
  compile_with(files, vec![ExternCrate::runtime("autoser"), ExternCrate::opaque("serde", "serde")])
}

pub(super) fn compile_with(files: &[(&str, &str)], extern_crates: Vec<ExternCrate>) -> Compilation {
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

pub(super) fn scope(compilation: &Compilation, module: &str) -> ScopeId {
  let path = module
    .split("::")
    .filter(|segment| !segment.is_empty())
    .map(str::to_owned)
    .collect::<Vec<_>>();
  compilation.scope_of(&path).unwrap()
}

/// Id of whatever `path` names in `module`.
pub(super) fn resolve(compilation: &Compilation, module: &str, path: &str, namespace: Namespace) -> Option<String> {
  let path = syn::parse_str::<syn::Path>(path).unwrap();
  compilation
    .resolve_path(scope(compilation, module), &path, namespace)
    .map(|symbol| symbol.id.to_string())
}

pub(super) fn kind_of(compilation: &Compilation, module: &str, ty: &str) -> Option<TypeKind> {
  let ty = syn::parse_str::<syn::Type>(ty).unwrap();
  compilation.resolve_type(scope(compilation, module), &ty, &[])
}

pub(super) fn evaluate(compilation: &Compilation, module: &str, expr: &str) -> Option<bool> {
  let expr = syn::parse_str::<syn::Expr>(expr).unwrap();
  compilation.constant_bool(scope(compilation, module), &expr)
}
