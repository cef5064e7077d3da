use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, Type};

#[derive(Clone, Copy)]
pub enum Kind {
    Command,
    Query,
}

impl Kind {
    fn attr(self) -> &'static str {
        match self {
            Kind::Command => "command",
            Kind::Query => "query",
        }
    }

    fn trait_path(self) -> TokenStream2 {
        match self {
            Kind::Command => quote!(::cqrs_dispatch::Command),
            Kind::Query => quote!(::cqrs_dispatch::Query),
        }
    }
}

pub fn derive_message(input: TokenStream, kind: Kind) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input, kind) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput, kind: Kind) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let trait_path = kind.trait_path();
    let results = extract_results(input, kind.attr())?;

    if results.is_empty() {
        return match kind {
            // No result declared: a fire-and-forget command.
            Kind::Command => Ok(quote! {
                impl #impl_generics #trait_path for #name #ty_generics #where_clause {}
            }),
            Kind::Query => Err(syn::Error::new_spanned(
                name,
                "Query derive: missing #[query(result = Type)]; every query produces a result",
            )),
        };
    }

    if let Kind::Query = kind {
        if let Some(unit) = results.iter().find(|result| is_unit(result)) {
            return Err(syn::Error::new_spanned(
                unit,
                "Query derive: `result = ()` is not allowed; use a command for fire-and-forget",
            ));
        }
    }

    let impls = results.iter().map(|result| {
        quote! {
            impl #impl_generics #trait_path<#result> for #name #ty_generics #where_clause {}
        }
    });

    Ok(quote! { #(#impls)* })
}

fn is_unit(ty: &Type) -> bool {
    match ty {
        Type::Tuple(tuple) => tuple.elems.is_empty(),
        Type::Paren(inner) => is_unit(&inner.elem),
        Type::Group(inner) => is_unit(&inner.elem),
        _ => false,
    }
}

/// Collect every `result = Type` from `#[command(...)]` / `#[query(...)]`.
fn extract_results(input: &DeriveInput, attr_name: &str) -> syn::Result<Vec<Type>> {
    let mut results = Vec::new();

    for attr in &input.attrs {
        if !attr.path().is_ident(attr_name) {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("result") {
                let ty: Type = meta.value()?.parse()?;
                results.push(ty);
                Ok(())
            } else {
                Err(meta.error("expected `result = Type`"))
            }
        })?;
    }

    Ok(results)
}
