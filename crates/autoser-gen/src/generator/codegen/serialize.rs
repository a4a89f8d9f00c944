use proc_macro2::TokenStream;
use quote::quote;
use syn::parse_quote;

use super::{GenerationContext, bounded};

/// `Serializable` impl: one bidirectional call per included field, no framing.
pub(super) fn generate(context: &GenerationContext) -> TokenStream {
  let type_name = &context.type_name;
  let generics = bounded(&context.generics, &parse_quote!(::autoser::Serializable));
  let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
  let fields = &context.fields;

  quote! {
    impl #impl_generics ::autoser::Serializable for #type_name #ty_generics #where_clause {
      fn serialize<__S: ::autoser::Serializer>(
        &mut self,
        serializer: &mut __S,
      ) -> ::core::result::Result<(), __S::Error> {
        #(serializer.serialize(&mut self.#fields)?;)*
        ::core::result::Result::Ok(())
      }
    }
  }
}
