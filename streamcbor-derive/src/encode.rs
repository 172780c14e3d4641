use quote::{format_ident, quote};
use syn::{DataEnum, DataStruct, Fields, Generics, Ident, LitStr, Type};

use crate::attrs::{ensure_no_cbor_attrs, parse_cbor_field_attrs, parse_cbor_variant_attrs};
use crate::types::type_mentions_self;
use crate::util::add_where_bound;

/// Builds the `write_map_header`/key/value statements for a named-field
/// shape, skipping `cbor(skip)` fields entirely.
fn named_field_entries<'a>(
    name: &Ident,
    fields: &'a syn::FieldsNamed,
    bounds: &mut Vec<&'a Type>,
    value: impl Fn(&Ident) -> proc_macro2::TokenStream,
) -> syn::Result<(usize, Vec<proc_macro2::TokenStream>)> {
    let mut stmts = Vec::new();
    let mut len = 0usize;

    for field in &fields.named {
        let attr = parse_cbor_field_attrs(&field.attrs)?;
        if attr.skip {
            continue;
        }
        let f_ident = field.ident.as_ref().unwrap();
        let key = attr
            .rename
            .unwrap_or_else(|| LitStr::new(&f_ident.to_string(), f_ident.span()));

        if !type_mentions_self(&field.ty, name) {
            bounds.push(&field.ty);
        }

        let value_ts = value(f_ident);
        stmts.push(quote! {
            w.write_text(#key)?;
            ::streamcbor::CborEncode::encode(#value_ts, w)?;
        });
        len += 1;
    }

    Ok((len, stmts))
}

fn tuple_field_items<'a>(
    name: &Ident,
    fields: &'a syn::FieldsUnnamed,
    bounds: &mut Vec<&'a Type>,
    ctx: &str,
) -> syn::Result<Vec<proc_macro2::TokenStream>> {
    let mut items = Vec::new();
    for (idx, field) in fields.unnamed.iter().enumerate() {
        ensure_no_cbor_attrs(&field.attrs, ctx)?;
        let index = syn::Index::from(idx);
        if !type_mentions_self(&field.ty, name) {
            bounds.push(&field.ty);
        }
        items.push(quote! { ::streamcbor::CborEncode::encode(&self.#index, w)?; });
    }
    Ok(items)
}

fn push_bounds(
    where_clause: Option<&syn::WhereClause>,
    bounds: Vec<&Type>,
) -> Option<syn::WhereClause> {
    let mut where_clause = where_clause.cloned();
    if !bounds.is_empty() {
        let wc = where_clause.get_or_insert_with(|| syn::WhereClause {
            where_token: Default::default(),
            predicates: Default::default(),
        });
        for ty in bounds {
            add_where_bound(wc, ty, quote!(::streamcbor::CborEncode));
        }
    }
    where_clause
}

pub(crate) fn encode_struct(
    name: &Ident,
    generics: &Generics,
    data: &DataStruct,
) -> syn::Result<proc_macro2::TokenStream> {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    match &data.fields {
        Fields::Named(fields) => {
            let mut bounds = Vec::new();
            let (len, entries) =
                named_field_entries(name, fields, &mut bounds, |ident| quote!(&self.#ident))?;
            let where_clause = push_bounds(where_clause, bounds);

            Ok(quote! {
                impl #impl_generics ::streamcbor::CborEncode for #name #ty_generics #where_clause {
                    fn encode<__W: ::streamcbor::Output>(
                        &self,
                        w: &mut ::streamcbor::Writer<__W>,
                    ) -> ::core::result::Result<(), ::streamcbor::Error> {
                        w.write_map_header(#len as u64)?;
                        #(#entries)*
                        Ok(())
                    }
                }
            })
        }

        Fields::Unnamed(fields) => {
            let mut bounds = Vec::new();
            let items = tuple_field_items(name, fields, &mut bounds, "tuple struct fields")?;
            let len = items.len();
            let where_clause = push_bounds(where_clause, bounds);

            Ok(quote! {
                impl #impl_generics ::streamcbor::CborEncode for #name #ty_generics #where_clause {
                    fn encode<__W: ::streamcbor::Output>(
                        &self,
                        w: &mut ::streamcbor::Writer<__W>,
                    ) -> ::core::result::Result<(), ::streamcbor::Error> {
                        w.write_array_header(#len as u64)?;
                        #(#items)*
                        Ok(())
                    }
                }
            })
        }

        Fields::Unit => Ok(quote! {
            impl #impl_generics ::streamcbor::CborEncode for #name #ty_generics #where_clause {
                fn encode<__W: ::streamcbor::Output>(
                    &self,
                    w: &mut ::streamcbor::Writer<__W>,
                ) -> ::core::result::Result<(), ::streamcbor::Error> {
                    w.write_null()?;
                    Ok(())
                }
            }
        }),
    }
}

/// Each variant is written as the single-entry map `{ variant_name: payload }`,
/// where `payload` is that variant's own field shape (null/array/map).
pub(crate) fn encode_enum(
    name: &Ident,
    generics: &Generics,
    data: &DataEnum,
) -> syn::Result<proc_macro2::TokenStream> {
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut arms = Vec::new();
    let mut bounds = Vec::new();

    for variant in &data.variants {
        let v_attr = parse_cbor_variant_attrs(&variant.attrs)?;
        let vname = v_attr
            .rename
            .unwrap_or_else(|| LitStr::new(&variant.ident.to_string(), variant.ident.span()));
        let ident = &variant.ident;

        match &variant.fields {
            Fields::Unit => {
                arms.push(quote! {
                    Self::#ident => {
                        w.write_map_header(1)?;
                        w.write_text(#vname)?;
                        w.write_null()?;
                    }
                });
            }

            Fields::Unnamed(fields) => {
                let pats: Vec<_> = (0..fields.unnamed.len())
                    .map(|idx| format_ident!("v{idx}"))
                    .collect();
                let mut items = Vec::new();
                for (idx, field) in fields.unnamed.iter().enumerate() {
                    ensure_no_cbor_attrs(&field.attrs, "tuple enum variant fields")?;
                    if !type_mentions_self(&field.ty, name) {
                        bounds.push(&field.ty);
                    }
                    let var = &pats[idx];
                    items.push(quote! { ::streamcbor::CborEncode::encode(#var, w)?; });
                }
                let len = items.len();
                arms.push(quote! {
                    Self::#ident( #(#pats),* ) => {
                        w.write_map_header(1)?;
                        w.write_text(#vname)?;
                        w.write_array_header(#len as u64)?;
                        #(#items)*
                    }
                });
            }

            Fields::Named(fields) => {
                let (len, entries) =
                    named_field_entries(name, fields, &mut bounds, |ident| quote!(#ident))?;
                let pats: Vec<_> = fields
                    .named
                    .iter()
                    .map(|f| f.ident.as_ref().unwrap().clone())
                    .collect();
                arms.push(quote! {
                    Self::#ident { #(#pats),* } => {
                        w.write_map_header(1)?;
                        w.write_text(#vname)?;
                        w.write_map_header(#len as u64)?;
                        #(#entries)*
                    }
                });
            }
        }
    }

    let where_clause = push_bounds(where_clause, bounds);

    Ok(quote! {
        impl #impl_generics ::streamcbor::CborEncode for #name #ty_generics #where_clause {
            fn encode<__W: ::streamcbor::Output>(
                &self,
                w: &mut ::streamcbor::Writer<__W>,
            ) -> ::core::result::Result<(), ::streamcbor::Error> {
                match self { #(#arms)* }
                Ok(())
            }
        }
    })
}
