use quote::{format_ident, quote};
use syn::{DataEnum, DataStruct, Fields, Generics, Ident, LitStr};

use crate::attrs::{ensure_no_cbor_attrs, parse_cbor_field_attrs, parse_cbor_variant_attrs};
use crate::types::{is_option_type, type_mentions_self};
use crate::util::add_where_bound;

fn tuple_decode_parts(
    name: &Ident,
    fields: &syn::FieldsUnnamed,
    wc: &mut syn::WhereClause,
    ctx: &str,
) -> syn::Result<(Vec<Ident>, Vec<proc_macro2::TokenStream>)> {
    let mut vars = Vec::new();
    let mut decodes = Vec::new();

    for (idx, field) in fields.unnamed.iter().enumerate() {
        ensure_no_cbor_attrs(&field.attrs, ctx)?;
        let var = format_ident!("v{idx}");
        vars.push(var.clone());

        if !type_mentions_self(&field.ty, name) {
            add_where_bound(wc, &field.ty, quote!(::streamcbor::CborDecode));
        }
        decodes.push(quote! { let #var = ::streamcbor::CborDecode::decode(r)?; });
    }

    Ok((vars, decodes))
}

fn add_decode_bounds_for_named_fields(
    name: &Ident,
    fields: &syn::FieldsNamed,
    wc: &mut syn::WhereClause,
) -> syn::Result<()> {
    for field in &fields.named {
        let attr = parse_cbor_field_attrs(&field.attrs)?;
        if attr.skip {
            add_where_bound(wc, &field.ty, quote!(::core::default::Default));
            continue;
        }
        if is_option_type(&field.ty) || attr.default {
            add_where_bound(wc, &field.ty, quote!(::core::default::Default));
        }
        if !type_mentions_self(&field.ty, name) {
            add_where_bound(wc, &field.ty, quote!(::streamcbor::CborDecode));
        }
    }
    Ok(())
}

/// `{ field: value, ... }`, tolerant of unknown keys (skipped structurally)
/// and of definite (`MapHeader`) or indefinite (`MapStart`/`Break`) form.
fn decode_named_fields(
    fields: &syn::FieldsNamed,
    target: proc_macro2::TokenStream,
) -> syn::Result<proc_macro2::TokenStream> {
    let mut inits = Vec::new();
    let mut matches = Vec::new();
    let mut finals = Vec::new();

    for field in &fields.named {
        let attr = parse_cbor_field_attrs(&field.attrs)?;
        let ident = field.ident.as_ref().unwrap();
        let ty = &field.ty;

        if attr.skip {
            finals.push(quote! { #ident: ::core::default::Default::default(), });
            continue;
        }

        let key = attr
            .rename
            .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
        let var = format_ident!("__{ident}");

        inits.push(quote! { let mut #var: ::core::option::Option<#ty> = ::core::option::Option::None; });

        matches.push(quote! {
            #key => {
                #var = ::core::option::Option::Some(::streamcbor::CborDecode::decode(r)?);
            }
        });

        if is_option_type(ty) || attr.default {
            finals.push(quote! { #ident: #var.unwrap_or_default(), });
        } else {
            finals.push(quote! {
                #ident: #var.ok_or_else(|| {
                    ::streamcbor::Error::new(
                        ::streamcbor::ErrorKind::ValidationFailure,
                        map_off,
                    )
                })?,
            });
        }
    }

    Ok(quote! {
        let map_off = r.position();
        #(#inits)*
        if r.has_map_header() {
            let map_len = r.read_map_header()?;
            for _ in 0..map_len {
                let k = r.read_string()?;
                match k.as_str() {
                    #(#matches)*
                    _ => r.skip_value()?,
                }
            }
        } else {
            r.read_map_start()?;
            while !r.try_read_break()? {
                let k = r.read_string()?;
                match k.as_str() {
                    #(#matches)*
                    _ => r.skip_value()?,
                }
            }
        }
        Ok(#target { #(#finals)* })
    })
}

pub(crate) fn decode_struct(
    name: &Ident,
    generics: &Generics,
    data: &DataStruct,
) -> syn::Result<proc_macro2::TokenStream> {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let mut where_clause = where_clause.cloned();
    let wc = where_clause.get_or_insert_with(|| syn::WhereClause {
        where_token: Default::default(),
        predicates: Default::default(),
    });

    match &data.fields {
        Fields::Named(fields) => {
            add_decode_bounds_for_named_fields(name, fields, wc)?;
            let body = decode_named_fields(fields, quote!(Self))?;
            Ok(quote! {
                impl #impl_generics ::streamcbor::CborDecode for #name #ty_generics #where_clause {
                    fn decode<__I: ::streamcbor::Input>(
                        r: &mut ::streamcbor::Reader<__I>,
                    ) -> ::core::result::Result<Self, ::streamcbor::Error> {
                        #body
                    }
                }
            })
        }

        Fields::Unnamed(fields) => {
            let (vars, decodes) = tuple_decode_parts(name, fields, wc, "tuple struct fields")?;
            let expected = vars.len() as u64;
            Ok(quote! {
                impl #impl_generics ::streamcbor::CborDecode for #name #ty_generics #where_clause {
                    fn decode<__I: ::streamcbor::Input>(
                        r: &mut ::streamcbor::Reader<__I>,
                    ) -> ::core::result::Result<Self, ::streamcbor::Error> {
                        let arr_off = r.position();
                        let arr_len = r.read_array_header()?;
                        if arr_len != #expected {
                            return Err(::streamcbor::Error::new(
                                ::streamcbor::ErrorKind::ValidationFailure,
                                arr_off,
                            ));
                        }
                        #(#decodes)*
                        Ok(Self(#(#vars),*))
                    }
                }
            })
        }

        Fields::Unit => Ok(quote! {
            impl #impl_generics ::streamcbor::CborDecode for #name #ty_generics #where_clause {
                fn decode<__I: ::streamcbor::Input>(
                    r: &mut ::streamcbor::Reader<__I>,
                ) -> ::core::result::Result<Self, ::streamcbor::Error> {
                    r.read_null()?;
                    Ok(Self)
                }
            }
        }),
    }
}

/// Each variant round-trips through the single-entry map `{ variant_name:
/// payload }` written by [`crate::encode::encode_enum`].
pub(crate) fn decode_enum(
    name: &Ident,
    generics: &Generics,
    data: &DataEnum,
) -> syn::Result<proc_macro2::TokenStream> {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let mut where_clause = where_clause.cloned();
    let wc = where_clause.get_or_insert_with(|| syn::WhereClause {
        where_token: Default::default(),
        predicates: Default::default(),
    });

    let mut arms = Vec::new();

    for variant in &data.variants {
        let v_attr = parse_cbor_variant_attrs(&variant.attrs)?;
        let vname = v_attr
            .rename
            .unwrap_or_else(|| LitStr::new(&variant.ident.to_string(), variant.ident.span()));
        let ident = &variant.ident;

        let body = match &variant.fields {
            Fields::Unit => quote! {
                r.read_null()?;
                Ok(Self::#ident)
            },

            Fields::Unnamed(fields) => {
                let (vars, decodes) =
                    tuple_decode_parts(name, fields, wc, "tuple enum variant fields")?;
                let expected = vars.len() as u64;
                quote! {
                    let arr_off = r.position();
                    let arr_len = r.read_array_header()?;
                    if arr_len != #expected {
                        return Err(::streamcbor::Error::new(
                            ::streamcbor::ErrorKind::ValidationFailure,
                            arr_off,
                        ));
                    }
                    #(#decodes)*
                    Ok(Self::#ident(#(#vars),*))
                }
            }

            Fields::Named(fields) => {
                add_decode_bounds_for_named_fields(name, fields, wc)?;
                decode_named_fields(fields, quote!(Self::#ident))?
            }
        };

        arms.push(quote! { #vname => { #body } });
    }

    Ok(quote! {
        impl #impl_generics ::streamcbor::CborDecode for #name #ty_generics #where_clause {
            fn decode<__I: ::streamcbor::Input>(
                r: &mut ::streamcbor::Reader<__I>,
            ) -> ::core::result::Result<Self, ::streamcbor::Error> {
                let map_off = r.position();
                let map_len = r.read_map_header()?;
                if map_len != 1 {
                    return Err(::streamcbor::Error::new(
                        ::streamcbor::ErrorKind::ValidationFailure,
                        map_off,
                    ));
                }
                let variant_off = r.position();
                let tag = r.read_string()?;
                match tag.as_str() {
                    #(#arms)*
                    _ => Err(::streamcbor::Error::new(
                        ::streamcbor::ErrorKind::ValidationFailure,
                        variant_off,
                    )),
                }
            }
        }
    })
}
