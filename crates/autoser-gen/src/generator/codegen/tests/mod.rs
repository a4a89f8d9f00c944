
use proc_macro2::Span;
use syn::{Generics, Ident, Member};

use super::{GenerationContext, generate};

pub(super) fn context(namespace: &[&str], type_name: &str, fields: &[&str], equality: bool) -> GenerationContext {
  GenerationContext {
    namespace: namespace.iter().map(|segment| (*segment).to_string()).collect(),
    type_name: Ident::new(type_name, Span::call_site()),
    generics: Generics::default(),
    fields: fields
      .iter()
      .map(|field| syn::parse_str::<Member>(field).unwrap())
      .collect(),
    equality,
  }
}

pub(super) fn generated_code(context: &GenerationContext) -> String {
  generate(context).unwrap().code
}

pub(super) fn has_line(code: &str, expected: &str) -> bool {
  code.lines().any(|line| line.trim() == expected)
}

pub(super) fn position(code: &str, needle: &str) -> usize {
  code
    .find(needle)
    .unwrap_or_else(|| panic!("`{needle}` not found in:\n{code}"))
}
