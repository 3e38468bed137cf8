use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input, parse_quote};

pub fn derive_event(input: TokenStream) -> TokenStream {
    let mut ast = parse_macro_input!(input as DeriveInput);

    let name = &ast.ident;

    // Event keys are built from `TypeId`, so every type parameter must be 'static.
    for param in ast.generics.type_params_mut() {
        param.bounds.push(parse_quote!('static));
    }
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    // `::event_aggregator` resolves inside the crate through `extern crate self as event_aggregator;`.
    TokenStream::from(quote! {
        impl #impl_generics ::event_aggregator::Event for #name #ty_generics #where_clause {
        }
    })
}
