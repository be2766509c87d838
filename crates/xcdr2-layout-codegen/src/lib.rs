// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, Attribute, Data, DataEnum, DataStruct, DeriveInput, Expr, ExprLit,
    ExprUnary, Fields, Ident, Lit, LitInt, Type, UnOp,
};

/// `#[derive(ValueWrite)]` macro: generates the static-schema adapter
///
/// Supports:
/// - Structs (named or tuple fields) -> struct types
/// - Enums whose variants are unit or single-field tuples -> union types
/// - Fieldless enums -> enumerated types
///
/// Container attributes:
/// - `#[xcdr(final)]`, `#[xcdr(appendable)]` (default), `#[xcdr(mutable)]`
/// - `#[xcdr(bit_bound = N)]` on enumerations (default 32)
/// - `#[xcdr(discriminator = i16)]` on unions (default `i32`)
///
/// Field / variant attributes:
/// - `#[xcdr(id = N)]`: explicit member id; following ids continue from N + 1
/// - `#[xcdr(key)]`: key member (must-understand)
/// - `#[xcdr(optional)]`: optional member; `Option<T>` fields are optional implicitly
/// - `#[xcdr(label = N)]`: union case label, repeatable; defaults to the variant index
///
/// Example:
/// ```ignore
/// use xcdr2_layout::ValueWrite;
///
/// #[derive(ValueWrite)]
/// #[xcdr(mutable)]
/// struct Reading {
///     #[xcdr(key)]
///     sensor: u32,
///     value: f64,
///     note: Option<String>,
/// }
/// ```
#[proc_macro_derive(ValueWrite, attributes(xcdr))]
pub fn derive_value_write(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let container = ContainerAttrs::parse(&input.attrs)?;
    let (kind, body) = match &input.data {
        Data::Struct(data) => expand_struct(&container, data)?,
        Data::Enum(data) if data.variants.iter().all(|v| v.fields.is_empty()) => {
            expand_enumeration(&container, data)?
        }
        Data::Enum(data) => expand_union(&container, data)?,
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "ValueWrite cannot be derived for Rust unions",
            ))
        }
    };

    let name = &input.ident;
    let mut generics = input.generics.clone();
    let params: Vec<Ident> = generics.type_params().map(|p| p.ident.clone()).collect();
    if !params.is_empty() {
        let where_clause = generics.make_where_clause();
        for param in params {
            where_clause
                .predicates
                .push(syn::parse_quote!(#param: ::xcdr2_layout::ValueWrite));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::xcdr2_layout::ValueWrite for #name #ty_generics #where_clause {
            const KIND: ::xcdr2_layout::TypeKind = #kind;

            fn write_value<W: ::xcdr2_layout::ValueWriter + ?Sized>(
                &self,
                writer: &mut W,
            ) -> ::xcdr2_layout::Result<()> {
                #body
            }
        }
    })
}

#[derive(Clone, Copy)]
enum Extensibility {
    Final,
    Appendable,
    Mutable,
}

impl Extensibility {
    fn tokens(self) -> TokenStream2 {
        match self {
            Self::Final => quote! { ::xcdr2_layout::Extensibility::Final },
            Self::Appendable => quote! { ::xcdr2_layout::Extensibility::Appendable },
            Self::Mutable => quote! { ::xcdr2_layout::Extensibility::Mutable },
        }
    }
}

struct ContainerAttrs {
    extensibility: Extensibility,
    bit_bound: Option<u16>,
    /// `TypeKind` variant of the union discriminator.
    discriminator: Option<Ident>,
}

impl ContainerAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self {
            extensibility: Extensibility::Appendable,
            bit_bound: None,
            discriminator: None,
        };
        for attr in attrs.iter().filter(|a| a.path().is_ident("xcdr")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("final") {
                    out.extensibility = Extensibility::Final;
                } else if meta.path.is_ident("appendable") {
                    out.extensibility = Extensibility::Appendable;
                } else if meta.path.is_ident("mutable") {
                    out.extensibility = Extensibility::Mutable;
                } else if meta.path.is_ident("bit_bound") {
                    let lit: LitInt = meta.value()?.parse()?;
                    let bound: u16 = lit.base10_parse()?;
                    if !(1..=32).contains(&bound) {
                        return Err(meta.error("bit_bound must be within 1..=32"));
                    }
                    out.bit_bound = Some(bound);
                } else if meta.path.is_ident("discriminator") {
                    let ty: Ident = meta.value()?.parse()?;
                    let Some(kind) = discriminator_kind(&ty) else {
                        return Err(syn::Error::new_spanned(
                            &ty,
                            "discriminator must be one of i8, u8, i16, u16, i32, u32, i64, u64",
                        ));
                    };
                    out.discriminator = Some(kind);
                } else {
                    return Err(meta.error("unsupported xcdr container attribute"));
                }
                Ok(())
            })?;
        }
        Ok(out)
    }
}

#[derive(Default)]
struct MemberAttrs {
    id: Option<u32>,
    key: bool,
    optional: bool,
    labels: Vec<i64>,
}

impl MemberAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("xcdr")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    let lit: LitInt = meta.value()?.parse()?;
                    let id: u32 = lit.base10_parse()?;
                    if id > 0x0fff_ffff {
                        return Err(meta.error("member id exceeds 28 bits"));
                    }
                    out.id = Some(id);
                } else if meta.path.is_ident("key") {
                    out.key = true;
                } else if meta.path.is_ident("optional") {
                    out.optional = true;
                } else if meta.path.is_ident("label") {
                    let expr: Expr = meta.value()?.parse()?;
                    out.labels.push(int_literal(&expr)?);
                } else {
                    return Err(meta.error("unsupported xcdr member attribute"));
                }
                Ok(())
            })?;
        }
        Ok(out)
    }
}

/// Member ids: sequential, an explicit id restarts the sequence after itself.
struct IdSequence(u32);

impl IdSequence {
    fn next(&mut self, explicit: Option<u32>) -> u32 {
        let id = explicit.unwrap_or(self.0);
        self.0 = id.wrapping_add(1);
        id
    }
}

fn expand_struct(
    container: &ContainerAttrs,
    data: &DataStruct,
) -> syn::Result<(TokenStream2, TokenStream2)> {
    let extensibility = container.extensibility.tokens();
    let mut ids = IdSequence(0);
    let mut members = Vec::new();

    for (index, field) in data.fields.iter().enumerate() {
        let attrs = MemberAttrs::parse(&field.attrs)?;
        if !attrs.labels.is_empty() {
            return Err(syn::Error::new_spanned(field, "label applies to union variants"));
        }
        let id = ids.next(attrs.id);
        let ty = &field.ty;
        let access = match &field.ident {
            Some(ident) => quote! { self.#ident },
            None => {
                let index = syn::Index::from(index);
                quote! { self.#index }
            }
        };

        let mut param = quote! {
            ::xcdr2_layout::MemberParam::new(#id, <#ty as ::xcdr2_layout::ValueWrite>::KIND)
        };
        if attrs.key {
            param = quote! { #param.key() };
        }
        if attrs.optional || is_option(ty) {
            param = quote! {
                #param.optional(::xcdr2_layout::ValueWrite::is_present(&#access))
            };
        }

        members.push(quote! {
            writer.begin_struct_member(#param)?;
            ::xcdr2_layout::ValueWrite::write_value(&#access, writer)?;
            writer.end_struct_member()?;
        });
    }

    let body = quote! {
        writer.begin_struct(#extensibility)?;
        #(#members)*
        writer.end_struct()
    };
    Ok((quote! { ::xcdr2_layout::TypeKind::Struct }, body))
}

fn expand_union(
    container: &ContainerAttrs,
    data: &DataEnum,
) -> syn::Result<(TokenStream2, TokenStream2)> {
    if container.bit_bound.is_some() {
        return Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            "bit_bound applies to enumerations",
        ));
    }
    let extensibility = container.extensibility.tokens();
    let disc_kind = container
        .discriminator
        .clone()
        .unwrap_or_else(|| format_ident!("Int32"));
    let mut ids = IdSequence(1);
    let mut arms = Vec::new();

    for (index, variant) in data.variants.iter().enumerate() {
        let attrs = MemberAttrs::parse(&variant.attrs)?;
        if attrs.key || attrs.optional {
            return Err(syn::Error::new_spanned(
                variant,
                "union members cannot be key or optional",
            ));
        }
        let id = ids.next(attrs.id);
        let label = match attrs.labels.first() {
            Some(label) => *label,
            None => i64::try_from(index).map_err(|_| {
                syn::Error::new_spanned(variant, "too many variants for implicit labels")
            })?,
        };
        let ident = &variant.ident;
        let discriminator = quote! {
            writer.write_discriminator(::xcdr2_layout::PrimitiveValue::from_discriminator(
                ::xcdr2_layout::TypeKind::#disc_kind,
                #label,
            )?)?;
        };

        let arm = match &variant.fields {
            Fields::Unit => quote! {
                Self::#ident => {
                    #discriminator
                }
            },
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                let ty = &fields.unnamed[0].ty;
                quote! {
                    Self::#ident(value) => {
                        #discriminator
                        writer.begin_union_member(::xcdr2_layout::MemberParam::new(
                            #id,
                            <#ty as ::xcdr2_layout::ValueWrite>::KIND,
                        ))?;
                        ::xcdr2_layout::ValueWrite::write_value(value, writer)?;
                        writer.end_union_member()?;
                    }
                }
            }
            _ => {
                return Err(syn::Error::new_spanned(
                    variant,
                    "union variants must be unit or hold exactly one unnamed field",
                ))
            }
        };
        arms.push(arm);
    }

    let body = quote! {
        writer.begin_union(#extensibility)?;
        match self {
            #(#arms)*
        }
        writer.end_union()
    };
    Ok((quote! { ::xcdr2_layout::TypeKind::Union }, body))
}

fn expand_enumeration(
    container: &ContainerAttrs,
    data: &DataEnum,
) -> syn::Result<(TokenStream2, TokenStream2)> {
    if container.discriminator.is_some() {
        return Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            "discriminator applies to unions",
        ));
    }
    let bit_bound = container.bit_bound.unwrap_or(32);
    let mut next: i64 = 0;
    let mut arms = Vec::new();

    for variant in &data.variants {
        let value = match &variant.discriminant {
            Some((_, expr)) => int_literal(expr)?,
            None => next,
        };
        let value = i32::try_from(value)
            .map_err(|_| syn::Error::new_spanned(variant, "enumerator exceeds i32"))?;
        next = i64::from(value) + 1;
        let ident = &variant.ident;
        arms.push(quote! { Self::#ident => #value, });
    }

    let body = if arms.is_empty() {
        quote! { match *self {} }
    } else {
        quote! {
            let value: i32 = match self {
                #(#arms)*
            };
            writer.write_primitive(::xcdr2_layout::PrimitiveValue::Enum {
                value,
                bit_bound: #bit_bound,
            })
        }
    };
    Ok((
        quote! { ::xcdr2_layout::TypeKind::Enum { bit_bound: #bit_bound } },
        body,
    ))
}

fn int_literal(expr: &Expr) -> syn::Result<i64> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(lit), ..
        }) => lit.base10_parse(),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => int_literal(expr).map(|v| -v),
        Expr::Group(group) => int_literal(&group.expr),
        Expr::Paren(paren) => int_literal(&paren.expr),
        _ => Err(syn::Error::new_spanned(expr, "expected an integer literal")),
    }
}

fn discriminator_kind(ty: &Ident) -> Option<Ident> {
    let kind = match ty.to_string().as_str() {
        "i8" => "Int8",
        "u8" => "UInt8",
        "i16" => "Int16",
        "u16" => "UInt16",
        "i32" => "Int32",
        "u32" => "UInt32",
        "i64" => "Int64",
        "u64" => "UInt64",
        _ => return None,
    };
    Some(Ident::new(kind, ty.span()))
}

fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}
