// SPDX-License-Identifier: Apache-2.0

//! Derives for sysnet internal use
//!
//! [JsonDisplay]: Implement `std::fmt::Display` using compact JSON output and
//! fall back to Debug display when serialization fails.
//!
//! [JsonDisplayHideSecrets]: Same as [JsonDisplay], but invokes
//! `self.clone().hide_secrets()` first so WPA keys and passwords never reach
//! the log.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::{DeriveInput, parse_macro_input};

fn display_body(value: TokenStream2) -> TokenStream2 {
    quote::quote! {
        match serde_json::to_string(#value) {
            Ok(s) => {
                // Plain string values are shown without quotes.
                if s.matches('"').count() == 2
                    && let Some(s) =
                        s.strip_prefix('"').and_then(|s| s.strip_suffix('"'))
                {
                    write!(f, "{}", s)
                } else {
                    write!(f, "{}", s)
                }
            }
            Err(e) => {
                log::error!(
                    "BUG: Failed to convert {:?} into JSON: {e}",
                    #value
                );
                write!(f, "{:?}", #value)
            }
        }
    }
}

#[proc_macro_derive(JsonDisplay)]
pub fn derive_json_display(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let class_name = &input.ident;
    let body = display_body(quote::quote! { &self });

    let expanded = quote::quote! {
        impl std::fmt::Display for #class_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                #body
            }
        }
    };

    TokenStream::from(expanded)
}

#[proc_macro_derive(JsonDisplayHideSecrets)]
pub fn derive_json_display_hide_secrets(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let class_name = &input.ident;
    let body = display_body(quote::quote! { &self_clone });

    let expanded = quote::quote! {
        impl std::fmt::Display for #class_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let mut self_clone = self.clone();
                self_clone.hide_secrets();
                #body
            }
        }
    };

    TokenStream::from(expanded)
}
