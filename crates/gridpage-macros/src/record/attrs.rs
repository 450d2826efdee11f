//! Attribute parsing for the Record derive macro.
//!
//! Parses the `#[grid(...)]` field attributes.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token,
};

/// The kind of value a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// `#[grid(text)]`, for `String`/`&str` fields.
    Text,
    /// `#[grid(number)]`, for any primitive numeric field.
    Number,
    /// `#[grid(date)]`, for fields implementing `GridDate`.
    Date,
    /// `#[grid(boolean)]`, for `bool` fields.
    Boolean,
}

impl ColumnKind {
    /// Name of the matching `gridpage::ColumnKind` variant.
    pub fn ident(self) -> Ident {
        let name = match self {
            ColumnKind::Text => "Text",
            ColumnKind::Number => "Number",
            ColumnKind::Date => "Date",
            ColumnKind::Boolean => "Boolean",
        };
        Ident::new(name, Span::call_site())
    }

    pub fn from_ident(ident: &Ident) -> Result<Self> {
        match ident.to_string().as_str() {
            "text" | "Text" | "String" => Ok(ColumnKind::Text),
            "number" | "Number" => Ok(ColumnKind::Number),
            "date" | "Date" => Ok(ColumnKind::Date),
            "boolean" | "Boolean" | "Bool" => Ok(ColumnKind::Boolean),
            other => Err(Error::new(
                ident.span(),
                format!(
                    "unknown column kind: '{}'. Expected one of: text, number, date, boolean",
                    other
                ),
            )),
        }
    }
}

/// Field-level attributes from `#[grid(...)]`.
#[derive(Debug, Clone)]
pub struct GridAttr {
    pub kind: Option<ColumnKind>,
    pub skip: bool,
    /// Column name override (default: the field name).
    pub rename: Option<String>,
    pub span: Span,
}

impl Default for GridAttr {
    fn default() -> Self {
        GridAttr {
            kind: None,
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl Parse for GridAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = GridAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if let Some(ident) = p.get_ident() {
                        if attr.kind.is_some() {
                            return Err(Error::new(ident.span(), "column kind given twice"));
                        }
                        attr.kind = Some(ColumnKind::from_ident(ident)?);
                        attr.span = ident.span();
                    } else {
                        return Err(Error::new(
                            p.span(),
                            "expected column kind: text, number, date, boolean, or skip",
                        ));
                    }
                }

                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    if let syn::Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    {
                        attr.rename = Some(s.value());
                    } else {
                        return Err(Error::new(
                            nv.value.span(),
                            "rename must be a string literal",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown grid attribute. Expected: text, number, date, boolean, skip, or rename = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract the `#[grid(...)]` attribute from a field's attributes.
pub fn parse_grid_attrs(attrs: &[Attribute]) -> Result<GridAttr> {
    for attr in attrs {
        if attr.path().is_ident("grid") {
            return attr.parse_args::<GridAttr>();
        }
    }
    Ok(GridAttr::default())
}
