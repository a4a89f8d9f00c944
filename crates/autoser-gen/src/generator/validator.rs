use syn::{Attribute, Path, Visibility};

use super::{
  candidates::Candidate,
  diagnostics::{Diagnostic, Location},
  fields::{FieldClassifier, FieldDescriptor},
  markers::Markers,
  semantic::{Namespace, SemanticModel},
};

/// Method name a hand-written serialization would use.
pub const SERIALIZE_METHOD: &str = "serialize";

/// Result of validating one candidate.
#[derive(Debug, Clone)]
pub enum Validation<'a> {
  /// No attribute resolves to the opt-in marker.
  Unmarked,
  /// A structural check failed; the candidate is dropped.
  Rejected(Diagnostic),
  /// Marked and well-formed, but no field survived classification.
  Empty { diagnostics: Vec<Diagnostic> },
  Accepted(ValidatedStruct<'a>),
}

#[derive(Debug, Clone)]
pub struct ValidatedStruct<'a> {
  /// First attribute resolving to the opt-in marker; later ones are ignored.
  pub marker: &'a Attribute,
  pub fields: Vec<FieldDescriptor>,
  pub diagnostics: Vec<Diagnostic>,
}

impl ValidatedStruct<'_> {
  pub fn included(&self) -> impl Iterator<Item = &FieldDescriptor> {
    self.fields.iter().filter(|field| field.is_included())
  }
}

/// Runs the checks in order; the first failing check short-circuits.
pub fn validate<'a>(model: &impl SemanticModel, markers: &Markers, candidate: &Candidate<'a>) -> Validation<'a> {
  let Some(marker) = candidate.item.attrs.iter().find(|attr| {
    model
      .resolve_path(candidate.scope, attr.path(), Namespace::Macro)
      .is_some_and(|symbol| symbol.id == markers.opt_in)
  }) else {
    return Validation::Unmarked;
  };

  if let Some(blocker) = extensibility_blocker(model, candidate) {
    let location = Location::new(candidate.file, candidate.item.ident.span());
    return Validation::Rejected(match blocker {
      Blocker::Struct => Diagnostic::not_extensible(&candidate.type_name(), location),
      Blocker::Module(module) => Diagnostic::private_module(&candidate.type_name(), &module, location),
    });
  }

  let symbol = model.declared_symbol(candidate.scope, &candidate.item.ident);
  if let Some(method) = model
    .methods_of(&symbol)
    .into_iter()
    .find(|method| *method.name == SERIALIZE_METHOD)
  {
    return Validation::Rejected(Diagnostic::manual_serialize(
      &candidate.type_name(),
      SERIALIZE_METHOD,
      Location::new(method.file, method.name.span()),
    ));
  }

  let (fields, diagnostics) = FieldClassifier::new(model, markers, candidate).classify(&candidate.item.fields);
  if !fields.iter().any(FieldDescriptor::is_included) {
    return Validation::Empty { diagnostics };
  }

  Validation::Accepted(ValidatedStruct {
    marker,
    fields,
    diagnostics,
  })
}

/// What keeps a candidate from being named at the crate root.
enum Blocker {
  Struct,
  /// `a::b` when module `b` is not visible from the crate root.
  Module(String),
}

/// Generated code lives at the crate root, so the struct and every module
/// on its path must be nameable from there.
fn extensibility_blocker(model: &impl SemanticModel, candidate: &Candidate<'_>) -> Option<Blocker> {
  let module = &candidate.module;
  if module.is_empty() {
    return None;
  }

  for depth in 1..=module.len() {
    let (path, parent) = (&module[..depth], &module[..depth - 1]);
    let visible = model
      .module_visibility(path)
      .is_some_and(|visibility| reaches_crate_root(visibility, parent));
    if !visible {
      return Some(Blocker::Module(path.join("::")));
    }
  }

  (!reaches_crate_root(&candidate.item.vis, module)).then_some(Blocker::Struct)
}

/// Whether an item declared in `declared_in` with `visibility` can be named
/// from the crate root.
fn reaches_crate_root(visibility: &Visibility, declared_in: &[String]) -> bool {
  match visibility {
    Visibility::Public(_) => true,
    Visibility::Inherited => declared_in.is_empty(),
    Visibility::Restricted(restricted) => {
      restricted_to(&restricted.path, declared_in).is_some_and(|scope| scope.is_empty())
    }
  }
}

/// Module a `pub(in path)` restriction opens an item to.
fn restricted_to(path: &Path, declared_in: &[String]) -> Option<Vec<String>> {
  let mut scope = declared_in.to_vec();
  for (index, segment) in path.segments.iter().enumerate() {
    match segment.ident.to_string().as_str() {
      "crate" if index == 0 => scope.clear(),
      "self" if index == 0 => {}
      "super" => {
        scope.pop()?;
      }
      name => scope.push(name.to_owned()),
    }
  }
  Some(scope)
}
