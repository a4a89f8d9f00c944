//! Source synthesis for validated structs.
//!
//! Everything here is a pure function of a [`GenerationContext`]; the same
//! context always produces byte-identical text.

use anyhow::Context;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Generics, Ident, Member, TypeParamBound, ext::IdentExt};

mod equality;
mod serialize;

#[cfg(test)]
mod tests;

pub const GENERATED_HEADER: &str = "// @generated by autoser-gen. DO NOT EDIT.";
pub const FILE_SUFFIX: &str = ".autoser.rs";
pub const INDEX_FILE: &str = "autoser.rs";

/// Everything the emitter needs to know about one struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationContext {
  /// Module chain from the crate root, outermost first.
  pub namespace: Vec<String>,
  pub type_name: Ident,
  pub generics: Generics,
  /// Included fields in declaration order.
  pub fields: Vec<Member>,
  pub equality: bool,
}

impl GenerationContext {
  /// `x.y.Point.autoser.rs`, or `Point.autoser.rs` at the crate root.
  pub fn file_name(&self) -> String {
    let type_name = self.type_name.unraw().to_string();
    self
      .namespace
      .iter()
      .map(String::as_str)
      .chain(std::iter::once(type_name.as_str()))
      .collect::<Vec<_>>()
      .join(".")
      + FILE_SUFFIX
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeneratedSource {
  pub file_name: String,
  pub code: String,
}

pub fn generate(context: &GenerationContext) -> anyhow::Result<GeneratedSource> {
  let serialize = serialize::generate(context);
  let equality = context.equality.then(|| equality::generate(context));
  let tokens = wrap_in_namespace(context, quote! { #serialize #equality });

  Ok(GeneratedSource {
    file_name: context.file_name(),
    code: format_file(tokens).with_context(|| format!("Invalid code generated for `{}`", context.type_name))?,
  })
}

/// The file a crate `include!`s to pull in every fragment.
pub fn generate_index(sources: &[GeneratedSource]) -> anyhow::Result<GeneratedSource> {
  let mut file_names = sources.iter().map(|source| source.file_name.as_str()).collect::<Vec<_>>();
  file_names.sort_unstable();
  file_names.dedup();

  let tokens = quote! {
    #(include!(#file_names);)*
  };

  Ok(GeneratedSource {
    file_name: INDEX_FILE.to_owned(),
    code: format_file(tokens).context("Invalid index file generated")?,
  })
}

fn format_file(tokens: TokenStream) -> anyhow::Result<String> {
  let syntax_tree = syn::parse2(tokens)?;
  let formatted = prettyplease::unparse(&syntax_tree);
  Ok(format!("{GENERATED_HEADER}\n{formatted}"))
}

/// Types outside the crate root are brought into scope inside an anonymous
/// const block, since the fragment itself is included at the root.
fn wrap_in_namespace(context: &GenerationContext, impls: TokenStream) -> TokenStream {
  if context.namespace.is_empty() {
    return impls;
  }

  let segments = context.namespace.iter().map(|segment| module_ident(segment));
  let type_name = &context.type_name;
  quote! {
    const _: () = {
      use crate::#(#segments)::*::#type_name;
      #impls
    };
  }
}

fn module_ident(name: &str) -> Ident {
  syn::parse_str::<Ident>(name).unwrap_or_else(|_| Ident::new_raw(name, Span::call_site()))
}

/// `generics` with `bound` added to every type parameter.
fn bounded(generics: &Generics, bound: &TypeParamBound) -> Generics {
  let mut generics = generics.clone();
  for param in generics.type_params_mut() {
    param.bounds.push(bound.clone());
  }
  generics
}
