use quote::ToTokens;
use syn::{Attribute, Field, Fields, Ident, Member, Meta, Token, Type, punctuated::Punctuated, spanned::Spanned};

use super::{
  candidates::Candidate,
  diagnostics::{Diagnostic, Location},
  markers::{EXCLUSION_MARKER, Markers},
  semantic::{Namespace, SemanticModel, TypeKind},
};

/// Zero-sized field types that carry no per-instance value.
const ZERO_SIZED_MARKERS: [&str; 2] = ["PhantomData", "PhantomPinned"];

/// `serde` flags that mean "not part of the serialized form".
const SERDE_SKIP_FLAGS: [&str; 2] = ["skip", "skip_serializing"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldVerdict {
  Included,
  ZeroSized,
  Unresolved,
  Reference,
  Excluded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
  pub member: Member,
  pub verdict: FieldVerdict,
}

impl FieldDescriptor {
  pub fn is_included(&self) -> bool {
    self.verdict == FieldVerdict::Included
  }
}

/// Decides, field by field and in declaration order, what gets serialized.
pub struct FieldClassifier<'a, M> {
  model: &'a M,
  markers: &'a Markers,
  candidate: &'a Candidate<'a>,
  type_params: Vec<Ident>,
}

impl<'a, M: SemanticModel> FieldClassifier<'a, M> {
  pub fn new(model: &'a M, markers: &'a Markers, candidate: &'a Candidate<'a>) -> Self {
    let type_params = candidate
      .item
      .generics
      .type_params()
      .map(|param| param.ident.clone())
      .collect();

    Self {
      model,
      markers,
      candidate,
      type_params,
    }
  }

  pub fn classify(&self, fields: &Fields) -> (Vec<FieldDescriptor>, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let descriptors = fields
      .iter()
      .enumerate()
      .map(|(index, field)| {
        let member = field.ident.clone().map_or_else(|| Member::Unnamed(index.into()), Member::Named);
        let verdict = self.verdict(field);
        if verdict == FieldVerdict::Reference {
          diagnostics.push(self.reference_diagnostic(field, &member));
        }
        diagnostics.extend(self.renamed_markers(field, &member));
        FieldDescriptor { member, verdict }
      })
      .collect();

    (descriptors, diagnostics)
  }

  fn verdict(&self, field: &Field) -> FieldVerdict {
    if is_zero_sized_marker(&field.ty) {
      return FieldVerdict::ZeroSized;
    }

    match self.model.resolve_type(self.candidate.scope, &field.ty, &self.type_params) {
      None => return FieldVerdict::Unresolved,
      Some(TypeKind::Reference) => return FieldVerdict::Reference,
      Some(TypeKind::Value) => {}
    }

    if field.attrs.iter().any(|attr| self.is_exclusion(attr)) {
      FieldVerdict::Excluded
    } else {
      FieldVerdict::Included
    }
  }

  fn is_exclusion(&self, attr: &Attribute) -> bool {
    is_serde_skip(attr) || self.is_exclusion_marker(attr)
  }

  fn is_exclusion_marker(&self, attr: &Attribute) -> bool {
    self
      .model
      .resolve_path(self.candidate.scope, attr.path(), Namespace::Macro)
      .is_some_and(|symbol| symbol.id == self.markers.exclusion)
  }

  /// The opt-in macro strips field markers by their last path segment, so an
  /// alias such as `#[skip]` would reach rustc.
  fn renamed_markers(&self, field: &Field, member: &Member) -> Vec<Diagnostic> {
    field
      .attrs
      .iter()
      .filter(|attr| {
        attr.path().segments.last().is_some_and(|segment| segment.ident != EXCLUSION_MARKER)
          && self.is_exclusion_marker(attr)
      })
      .map(|attr| {
        let spelling = attr.path().to_token_stream().to_string().replace(' ', "");
        Diagnostic::renamed_exclusion_marker(
          &self.candidate.type_name(),
          &member_name(member),
          &spelling,
          Location::new(self.candidate.file, attr.path().span()),
        )
      })
      .collect()
  }

  fn reference_diagnostic(&self, field: &Field, member: &Member) -> Diagnostic {
    let span = field.ident.as_ref().map_or_else(|| field.ty.span(), Ident::span);
    Diagnostic::reference_field(
      &self.candidate.type_name(),
      &member_name(member),
      Location::new(self.candidate.file, span),
    )
  }
}

fn member_name(member: &Member) -> String {
  match member {
    Member::Named(ident) => ident.to_string(),
    Member::Unnamed(index) => index.index.to_string(),
  }
}

fn is_zero_sized_marker(ty: &Type) -> bool {
  let Type::Path(path) = ty else {
    return false;
  };
  path
    .path
    .segments
    .last()
    .is_some_and(|segment| ZERO_SIZED_MARKERS.iter().any(|marker| segment.ident == marker))
}

fn is_serde_skip(attr: &Attribute) -> bool {
  if !attr.path().is_ident("serde") {
    return false;
  }
  attr
    .parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
    .is_ok_and(|metas| {
      metas.iter().any(|meta| {
        matches!(meta, Meta::Path(path) if SERDE_SKIP_FLAGS.iter().any(|flag| path.is_ident(flag)))
      })
    })
}
