use proc_macro2::TokenStream;
use quote::quote;
use syn::parse_quote;

use super::{GenerationContext, bounded};

/// Typed equality, untyped equality and a hash over the included fields.
///
/// Fields are hashed through `HashField`, which also covers floats. The
/// struct gets a `HashField` impl of its own so it can nest in other
/// generated structs.
pub(super) fn generate(context: &GenerationContext) -> TokenStream {
  let partial_eq = partial_eq(context);
  let dyn_eq = dyn_eq(context);
  let hash = hash(context);

  quote! {
    #partial_eq
    #dyn_eq
    #hash
  }
}

fn partial_eq(context: &GenerationContext) -> TokenStream {
  let type_name = &context.type_name;
  let generics = bounded(&context.generics, &parse_quote!(::core::cmp::PartialEq));
  let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
  let comparisons = context.fields.iter().map(|field| quote! { self.#field == other.#field });

  quote! {
    impl #impl_generics ::core::cmp::PartialEq<#type_name #ty_generics> for #type_name #ty_generics #where_clause {
      fn eq(&self, other: &#type_name #ty_generics) -> bool {
        #(#comparisons)&&*
      }
    }
  }
}

fn dyn_eq(context: &GenerationContext) -> TokenStream {
  let type_name = &context.type_name;
  let mut generics = bounded(&context.generics, &parse_quote!(::core::cmp::PartialEq));
  generics.make_where_clause().predicates.push(parse_quote!(Self: 'static));
  let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

  quote! {
    impl #impl_generics ::autoser::DynEq for #type_name #ty_generics #where_clause {
      fn dyn_eq(&self, other: &dyn ::core::any::Any) -> bool {
        other
          .downcast_ref::<Self>()
          .is_some_and(|other| ::core::cmp::PartialEq::eq(self, other))
      }
    }
  }
}

fn hash(context: &GenerationContext) -> TokenStream {
  let type_name = &context.type_name;
  let generics = bounded(&context.generics, &parse_quote!(::autoser::HashField));
  let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
  let fields = &context.fields;

  quote! {
    impl #impl_generics ::core::hash::Hash for #type_name #ty_generics #where_clause {
      fn hash<__H: ::core::hash::Hasher>(&self, state: &mut __H) {
        #(::autoser::HashField::hash_field(&self.#fields, state);)*
      }
    }
    impl #impl_generics ::autoser::HashField for #type_name #ty_generics #where_clause {
      fn hash_field<__H: ::core::hash::Hasher>(&self, state: &mut __H) {
        ::core::hash::Hash::hash(self, state);
      }
    }
  }
}
