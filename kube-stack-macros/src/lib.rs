use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Error, Fields, Ident, LitStr};

/// Implements `crate::output::TableOutputRow` for a struct with named fields.
///
/// Every field becomes a column rendered through `Display`. The header is the
/// field name in upper case with underscores turned into spaces, unless the
/// field carries `#[column(header = "...")]`. The field marked with
/// `#[name_column]` is printed on its own in the `names` format.
#[proc_macro_derive(TableOutputRow, attributes(name_column, column))]
pub fn derive_table_output_row(input: TokenStream) -> TokenStream {
    let parsed_input = parse_macro_input!(input as DeriveInput);

    expand_table_output_row(parsed_input).unwrap_or_else(|err| err.into_compile_error().into())
}

struct Column {
    ident: Ident,
    header: String,
    is_name: bool,
}

fn expand_table_output_row(input: DeriveInput) -> syn::Result<TokenStream> {
    let struct_ident = &input.ident;
    let (impl_generics, type_generics, where_clause) = input.generics.split_for_impl();
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            other => {
                return Err(Error::new(
                    other.span(),
                    "TableOutputRow needs a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                struct_ident.span(),
                "TableOutputRow can only be derived for structs",
            ))
        }
    };

    let columns = fields
        .iter()
        .map(|field| {
            let ident = field
                .ident
                .clone()
                .ok_or_else(|| Error::new(field.span(), "unnamed field"))?;
            let mut column = Column {
                header: default_header(&ident),
                ident,
                is_name: false,
            };

            for attr in &field.attrs {
                if attr.path().is_ident("name_column") {
                    column.is_name = true;
                } else if attr.path().is_ident("column") {
                    attr.parse_nested_meta(|meta| {
                        if meta.path.is_ident("header") {
                            column.header = meta.value()?.parse::<LitStr>()?.value();
                            Ok(())
                        } else {
                            Err(meta.error("expected `header = \"...\"`"))
                        }
                    })?;
                }
            }

            Ok(column)
        })
        .collect::<syn::Result<Vec<_>>>()?;

    let name_field = columns
        .iter()
        .find(|column| column.is_name)
        .map(|column| &column.ident)
        .ok_or_else(|| {
            Error::new(
                struct_ident.span(),
                "TableOutputRow needs one field marked with #[name_column]",
            )
        })?;
    let headers = columns.iter().map(|column| &column.header);
    let field_names = columns.iter().map(|column| &column.ident);
    let column_count = columns.len();

    let output = quote! {
        impl #impl_generics crate::output::TableOutputRow for #struct_ident #type_generics #where_clause {
            fn get_name(&self) -> ::std::string::String {
                ::std::string::ToString::to_string(&self.#name_field)
            }

            fn get_column_names() -> ::std::vec::Vec<::std::string::String> {
                ::std::vec![#(::std::string::String::from(#headers)),*]
            }

            fn get_column_count() -> usize {
                #column_count
            }

            fn get_row(&self) -> ::std::vec::Vec<::std::string::String> {
                ::std::vec![#(::std::string::ToString::to_string(&self.#field_names)),*]
            }
        }
    };

    Ok(output.into())
}

fn default_header(ident: &Ident) -> String {
    ident.to_string().to_uppercase().replace('_', " ")
}
