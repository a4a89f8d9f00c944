//! Marker attributes for `autoser-gen`.
//!
//! Both attributes are inert: `autoser-gen` reads them from source at build
//! time. `auto_serialize` only checks that it sits on a struct, appears once,
//! carries a well-formed argument list, and strips the field markers so rustc
//! never sees them.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::ToTokens;
use syn::{
  Attribute, Expr, Fields, Item, ItemStruct, Token, parse::Parser, parse_macro_input, punctuated::Punctuated,
  spanned::Spanned,
};

const OPT_IN: &str = "auto_serialize";
const EXCLUSION: &str = "non_serialized";
const EQUALITY_ARGUMENT: &str = "equality";

/// Opts a struct into generated `Serializable` (and, unless
/// `equality = false`, `PartialEq`/`DynEq`/`Hash`) impls.
///
/// Accepted forms: `#[auto_serialize]`, `#[auto_serialize(false)]`,
/// `#[auto_serialize(equality = false)]`.
#[proc_macro_attribute]
pub fn auto_serialize(args: TokenStream, input: TokenStream) -> TokenStream {
  if let Err(err) = check_arguments(args.into()) {
    return err.to_compile_error().into();
  }

  let item = parse_macro_input!(input as Item);
  match expand(item) {
    Ok(item) => item.into_token_stream().into(),
    Err(err) => err.to_compile_error().into(),
  }
}

/// Excludes a field of an `#[auto_serialize]` struct from the generated impls.
#[proc_macro_attribute]
pub fn non_serialized(_args: TokenStream, input: TokenStream) -> TokenStream {
  let input = proc_macro2::TokenStream::from(input);
  let err = syn::Error::new(
    input.span(),
    "`non_serialized` marks fields of an `#[auto_serialize]` struct and cannot be used on items",
  );
  err.to_compile_error().into()
}

fn check_arguments(args: proc_macro2::TokenStream) -> syn::Result<()> {
  let args = Punctuated::<Expr, Token![,]>::parse_terminated.parse2(args)?;
  if args.len() > 1 {
    return Err(syn::Error::new(
      args.span(),
      "`auto_serialize` takes at most one argument",
    ));
  }

  match args.first() {
    Some(Expr::Assign(assign)) => match assign.left.as_ref() {
      Expr::Path(path) if path.path.is_ident(EQUALITY_ARGUMENT) => Ok(()),
      other => Err(syn::Error::new(
        other.span(),
        format!("unknown argument, expected `{EQUALITY_ARGUMENT}`"),
      )),
    },
    _ => Ok(()),
  }
}

fn expand(item: Item) -> syn::Result<ItemStruct> {
  let Item::Struct(mut item) = item else {
    return Err(syn::Error::new(
      Span::call_site(),
      "`auto_serialize` can only be applied to structs",
    ));
  };

  if let Some(duplicate) = item.attrs.iter().find(|attr| is_named(attr, OPT_IN)) {
    return Err(syn::Error::new(
      duplicate.span(),
      "`auto_serialize` may only be applied once",
    ));
  }

  strip_field_markers(&mut item.fields)?;
  Ok(item)
}

fn strip_field_markers(fields: &mut Fields) -> syn::Result<()> {
  for field in fields.iter_mut() {
    if let Some(marker) = field.attrs.iter().find(|attr| is_named(attr, EXCLUSION))
      && !matches!(marker.meta, syn::Meta::Path(_))
    {
      return Err(syn::Error::new(marker.span(), "`non_serialized` takes no arguments"));
    }
    field.attrs.retain(|attr| !is_named(attr, EXCLUSION));
  }
  Ok(())
}

fn is_named(attr: &Attribute, name: &str) -> bool {
  attr.path().segments.last().is_some_and(|segment| segment.ident == name)
}
