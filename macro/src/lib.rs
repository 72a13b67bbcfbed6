extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{punctuated::Punctuated, parse::Parser};

#[derive(Debug, Default)]
struct DtoFlags {
    pub clone: bool,
    pub request: bool,
    pub response: bool,
}

/// Marks a wire type shared by both sides of an actuator.
///
/// `#[dto(chat, request)]` derives `Deserialize` when the receiving side
/// (`chat-in`) is compiled and `Serialize` when the sending side
/// (`chat-out`) is compiled. `response` flips the directions. With both
/// flags the type gets both derives unconditionally.
#[proc_macro_attribute]
pub fn dto(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match Punctuated::<syn::Ident, syn::Token![,]>::parse_separated_nonempty.parse(attr) {
        Ok(args) => args,
        Err(error) => return error.to_compile_error().into(),
    };
    let mut args = args.into_iter();

    // The first argument is the actuator name, the rest are flags
    let Some(actuator) = args.next() else {
        return syn::Error::new(proc_macro2::Span::call_site(), "Expected actuator name as first argument")
            .to_compile_error()
            .into();
    };

    let mut flags = DtoFlags::default();
    for flag in args {
        match flag.to_string().as_str() {
            "clone" => flags.clone = true,
            "request" => flags.request = true,
            "response" => flags.response = true,
            other => {
                return syn::Error::new(flag.span(), format!("Unknown flag: {}", other))
                    .to_compile_error()
                    .into();
            }
        }
    }

    let mut item: syn::Item = syn::parse_macro_input!(item as syn::Item);
    let feature_in = format!("{}-in", actuator);
    let feature_out = format!("{}-out", actuator);

    let item_attrs = match &mut item {
        syn::Item::Struct(s) => &mut s.attrs,
        syn::Item::Enum(e) => &mut e.attrs,
        _ => {
            return syn::Error::new(proc_macro2::Span::call_site(), "dto macro only supports structs and enums")
                .to_compile_error()
                .into();
        }
    };

    let mut universal_derives: Vec<syn::Path> = vec![syn::parse_quote!(Debug)];
    if flags.clone {
        universal_derives.push(syn::parse_quote!(Clone));
    }

    if flags.request && flags.response {
        universal_derives.push(syn::parse_quote!(Serialize));
        universal_derives.push(syn::parse_quote!(Deserialize));
    } else if flags.request {
        item_attrs.push(syn::parse_quote! {
            #[cfg_attr(feature = #feature_in, derive(Deserialize))]
        });
        item_attrs.push(syn::parse_quote! {
            #[cfg_attr(feature = #feature_out, derive(Serialize))]
        });
    } else if flags.response {
        item_attrs.push(syn::parse_quote! {
            #[cfg_attr(feature = #feature_in, derive(Serialize))]
        });
        item_attrs.push(syn::parse_quote! {
            #[cfg_attr(feature = #feature_out, derive(Deserialize))]
        });
    }

    // Derives have to come before any `#[serde(...)]` helper attributes
    item_attrs.insert(0, syn::parse_quote! {
        #[derive(#(#universal_derives),*)]
    });

    TokenStream::from(quote! { #item })
}
