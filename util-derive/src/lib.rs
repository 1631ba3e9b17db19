extern crate proc_macro2;

use proc_macro::TokenStream;
use quote::quote;

fn get_enum_variants(
    input: &syn::DeriveInput,
) -> &syn::punctuated::Punctuated<syn::Variant, syn::token::Comma> {
    let variants = match &input.data {
        syn::Data::Enum(enum_item) => &enum_item.variants,
        _ => panic!("Input must be an enum."),
    };

    assert!(
        variants.iter().all(|v| v.fields.is_empty()),
        "All variants must have no fields."
    );

    variants
}

/// Lowercase mnemonic table, indexed by discriminant — used for tracing
/// and for assembling the canonical display form of an opcode.
#[proc_macro_derive(MnemonicName)]
pub fn mnemonic_name_derive(input: TokenStream) -> TokenStream {
    let syn_item: syn::DeriveInput = syn::parse(input).unwrap();
    let name = &syn_item.ident;
    let variants = get_enum_variants(&syn_item);

    let variant_names = variants
        .iter()
        .map(|v| v.ident.to_string().to_lowercase());

    let expanded = quote! {
        impl ::util::MnemonicName for #name {
            fn mnemonic(&self) -> &'static str {
                const NAMES: &[&str] = &[#(#variant_names),*];
                NAMES[*self as usize]
            }
        }
    };
    expanded.into()
}

/// Case-insensitive `FromStr`, matched against each variant's lowercased
/// identifier (the canonical mnemonic form is lowercase; source text may
/// use any case).
#[proc_macro_derive(EnumFromStr)]
pub fn enum_from_str_derive(input: TokenStream) -> TokenStream {
    let syn_item: syn::DeriveInput = syn::parse(input).unwrap();
    let name = &syn_item.ident;
    let name_str = name.to_string();
    let variants = get_enum_variants(&syn_item);
    let literals = variants
        .iter()
        .map(|v| v.ident.to_string().to_lowercase());
    let identifiers = variants.iter().map(|v| &v.ident);

    let expanded = quote! {
        impl EnumFromStr for #name {
            fn from_str(s: &str) -> Result<#name, ::util::ParseEnumError> {
                let lower = s.to_lowercase();
                match lower.as_str() {
                    #( #literals => Ok(#name::#identifiers), )*
                    _ => Err(::util::ParseEnumError {
                        value: s.to_string(),
                        enum_name: #name_str,
                    }),
                }
            }
        }

        impl ::core::str::FromStr for #name {
            type Err = ::util::ParseEnumError;

            fn from_str(s: &str) -> Result<#name, ::util::ParseEnumError> {
                EnumFromStr::from_str(s)
            }
        }
    };

    expanded.into()
}
