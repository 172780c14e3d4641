//! Procedural macro derives for `streamcbor`: `#[derive(CborEncode,
//! CborDecode)]` generates field-by-field implementations of this crate's
//! `CborEncode`/`CborDecode` traits. A struct becomes a map keyed by field
//! name (named fields) or a definite-length array (tuple fields) or `null`
//! (unit struct); an enum variant becomes the single-entry map
//! `{ variant_name: payload }`, with `payload` shaped the same way.
//!
//! Field/variant attributes, all under `#[cbor(...)]`:
//! - `rename = "..."` — use a different wire name than the Rust identifier.
//! - `skip` (fields only) — exclude the field; it's populated via
//!   `Default::default()` on decode.
//! - `default` (fields only) — if the key is absent on decode, populate via
//!   `Default::default()` instead of failing.
//!
//! Unrecognized map keys are skipped structurally on decode, so adding a
//! field to a struct stays forward-compatible with data written by an
//! older version.

#![deny(clippy::all)]
#![deny(missing_docs)]

extern crate proc_macro;

mod attrs;
mod decode;
mod encode;
mod types;
mod util;

use proc_macro::TokenStream;
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput};

use crate::decode::{decode_enum, decode_struct};
use crate::encode::{encode_enum, encode_struct};

#[proc_macro_derive(CborEncode, attributes(cbor))]
/// Derive [`streamcbor::CborEncode`] for a struct or enum.
pub fn derive_cbor_encode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let out = (|| -> syn::Result<proc_macro2::TokenStream> {
        match &input.data {
            Data::Struct(data) => encode_struct(&input.ident, &input.generics, data),
            Data::Enum(data) => encode_enum(&input.ident, &input.generics, data),
            Data::Union(u) => Err(syn::Error::new(
                u.union_token.span(),
                "CborEncode not supported for unions",
            )),
        }
    })();

    match out {
        Ok(ts) => TokenStream::from(ts),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}

#[proc_macro_derive(CborDecode, attributes(cbor))]
/// Derive [`streamcbor::CborDecode`] for a struct or enum.
pub fn derive_cbor_decode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let out = (|| -> syn::Result<proc_macro2::TokenStream> {
        match &input.data {
            Data::Struct(data) => decode_struct(&input.ident, &input.generics, data),
            Data::Enum(data) => decode_enum(&input.ident, &input.generics, data),
            Data::Union(u) => Err(syn::Error::new(
                u.union_token.span(),
                "CborDecode not supported for unions",
            )),
        }
    })();

    match out {
        Ok(ts) => TokenStream::from(ts),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}
