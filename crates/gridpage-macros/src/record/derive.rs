//! Implementation of the `#[derive(Record)]` macro.
//!
//! Generates the `Record` impl and one column-name constant per annotated
//! field.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    spanned::Spanned, Data, DeriveInput, Error, Fields, GenericArgument, PathArguments, Result,
    Type,
};

use super::attrs::{parse_grid_attrs, ColumnKind};

/// Main implementation of the Record derive macro.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut columns: Vec<String> = Vec::new();
    let mut column_defs: Vec<TokenStream> = Vec::new();
    let mut field_matches: Vec<TokenStream> = Vec::new();
    let mut column_constants: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_grid_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let Some(kind) = attrs.kind else {
            continue;
        };

        let column = attrs.rename.unwrap_or_else(|| field_name.to_string());
        if columns.contains(&column) {
            return Err(Error::new(
                attrs.span,
                format!("duplicate column name '{}'", column),
            ));
        }

        let const_name = format_ident!("{}", to_screaming_snake_case(&column));
        column_constants.push(quote! {
            /// Column id for requests and sort keys.
            pub const #const_name: &'static str = #column;
        });

        let value_expr = if option_inner(&field.ty).is_some() {
            let inner = value_of(kind, quote! { v }, true);
            quote! {
                match &self.#field_name {
                    ::core::option::Option::Some(v) => #inner,
                    ::core::option::Option::None => ::gridpage::Value::Null,
                }
            }
        } else {
            value_of(kind, quote! { self.#field_name }, false)
        };

        field_matches.push(quote! {
            #column => #value_expr,
        });
        let kind_ident = kind.ident();
        column_defs.push(quote! {
            ::gridpage::Column::new(#column, ::gridpage::ColumnKind::#kind_ident)
        });
        columns.push(column);
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#column_constants)*
        }

        impl #impl_generics ::gridpage::Record for #struct_name #ty_generics #where_clause {
            const COLUMNS: &'static [::gridpage::Column<'static>] = &[#(#column_defs),*];

            fn field_value(&self, column: &str) -> ::gridpage::Value<'_> {
                match column {
                    #(#field_matches)*
                    _ => ::gridpage::Value::Null,
                }
            }
        }
    };

    Ok(expanded)
}

/// Builds the `Value` for one field. `by_ref` is set when `place` is
/// already a reference (the binding inside an `Option` match).
fn value_of(kind: ColumnKind, place: TokenStream, by_ref: bool) -> TokenStream {
    let borrowed = if by_ref {
        quote! { #place }
    } else {
        quote! { &#place }
    };
    let copied = if by_ref {
        quote! { *#place }
    } else {
        quote! { #place }
    };

    match kind {
        ColumnKind::Text => quote! {
            ::gridpage::Value::Text(::core::convert::AsRef::<str>::as_ref(#borrowed))
        },
        ColumnKind::Number => quote! {
            ::gridpage::Value::Number(::gridpage::Number::from(#copied))
        },
        ColumnKind::Date => quote! {
            ::gridpage::Value::Date(::gridpage::GridDate::grid_date(#borrowed))
        },
        ColumnKind::Boolean => quote! {
            ::gridpage::Value::Bool(#copied)
        },
    }
}

/// Returns `T` when `ty` is written as `Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = c.is_alphabetic();
        }
    }

    result
}
