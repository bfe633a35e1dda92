use darling::{ast::Data, FromDeriveInput, FromField};
use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Type};

#[derive(FromField)]
#[darling(attributes(record))]
struct RecordField {
    ident: Option<syn::Ident>,
    ty: Type,
    #[darling(default)]
    key: bool,
    #[darling(default)]
    rename: Option<String>,
}

#[derive(FromDeriveInput)]
#[darling(attributes(record), supports(struct_named))]
struct RecordInput {
    ident: syn::Ident,
    data: Data<darling::util::Ignored, RecordField>,
}

impl RecordField {
    fn column_name(&self) -> String {
        match (&self.rename, &self.ident) {
            (Some(name), _) => name.clone(),
            (None, Some(ident)) => ident.to_string(),
            (None, None) => String::new(),
        }
    }

    /// Maps the field type to the `Domain` variant name.
    fn domain(&self) -> Option<&'static str> {
        let path = match &self.ty {
            Type::Path(path) => path,
            _ => return None,
        };
        let segment = path.path.segments.last()?;
        match segment.ident.to_string().as_str() {
            "i8" => Some("I8"),
            "i16" => Some("I16"),
            "i32" => Some("I32"),
            "i64" => Some("I64"),
            "f32" => Some("F32"),
            "f64" => Some("F64"),
            "char" => Some("Char"),
            "String" => Some("Str"),
            _ => None,
        }
    }
}

pub(crate) fn impl_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            &input.generics,
            "`Record` cannot be derived for generic types",
        )
        .to_compile_error()
        .into();
    }
    let parsed = match RecordInput::from_derive_input(&input) {
        Ok(parsed) => parsed,
        Err(e) => return e.write_errors().into(),
    };
    let fields = match &parsed.data {
        Data::Struct(fields) => &fields.fields,
        Data::Enum(_) => {
            return syn::Error::new_spanned(&input, "`Record` is only derivable for structs")
                .to_compile_error()
                .into();
        }
    };

    let mut idents: Vec<syn::Ident> = Vec::with_capacity(fields.len());
    let mut names: Vec<String> = Vec::with_capacity(fields.len());
    let mut variants: Vec<Ident> = Vec::with_capacity(fields.len());
    let mut to_values: Vec<TokenStream2> = Vec::with_capacity(fields.len());
    let mut key_names: Vec<String> = Vec::new();
    for field in fields {
        let ident = match &field.ident {
            Some(ident) => ident.clone(),
            None => {
                return syn::Error::new_spanned(&parsed.ident, "fields must be named")
                    .to_compile_error()
                    .into();
            }
        };
        let domain = match field.domain() {
            Some(domain) => domain,
            None => {
                return syn::Error::new_spanned(
                    &field.ty,
                    "unsupported field type; expected one of \
                     i8, i16, i32, i64, f32, f64, char, String",
                )
                .to_compile_error()
                .into();
            }
        };
        let variant = Ident::new(domain, Span::call_site());
        to_values.push(if domain == "Str" {
            quote!(minibase::Value::Str(self.#ident.clone()))
        } else {
            quote!(minibase::Value::#variant(self.#ident))
        });
        let name = field.column_name();
        if field.key {
            key_names.push(name.clone());
        }
        idents.push(ident);
        names.push(name);
        variants.push(variant);
    }
    if key_names.is_empty() {
        return syn::Error::new_spanned(
            &parsed.ident,
            "at least one field must be marked with `#[record(key)]`",
        )
        .to_compile_error()
        .into();
    }

    let ident = &parsed.ident;
    let expanded = quote! {
        impl minibase::Record for #ident {
            fn schema() -> minibase::Schema {
                minibase::Schema::new(
                    &[#((#names, minibase::Domain::#variants)),*],
                    &[#(#key_names),*],
                )
                .expect("derived record schema is consistent")
            }

            fn to_tuple(&self) -> minibase::Tuple {
                vec![#(#to_values),*]
            }

            fn from_tuple(
                tuple: minibase::Tuple,
            ) -> std::result::Result<Self, minibase::_reexports::Error> {
                let mut values = tuple.into_iter();
                Ok(Self {
                    #(
                        #idents: match values.next() {
                            Some(minibase::Value::#variants(value)) => value,
                            other => {
                                return Err(minibase::_reexports::Error::msg(format!(
                                    "unexpected value for field `{}`: {:?}",
                                    #names, other
                                )))
                            }
                        },
                    )*
                })
            }
        }
    };
    expanded.into()
}
