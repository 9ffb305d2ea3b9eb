use crate::serde_attr::{self, FieldName};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr};

pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "#[derive(Validate)] requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "#[derive(Validate)] can only be used on structs",
            ));
        }
    };

    let rename_all = serde_attr::container_rename_rule(&input.attrs)?;

    let mut metas = Vec::new();
    let mut accessors = Vec::new();
    for field in named {
        let Some(rules) = validate_rules(&field.attrs)? else {
            continue;
        };
        let Some(ident) = &field.ident else {
            continue;
        };

        let ident_str = ident.to_string();
        let meta = match serde_attr::field_name(&field.attrs, &ident_str, rename_all)? {
            Some(FieldName::Named(serde_name)) => quote! {
                ::tagcheck::FieldMeta::new(#ident_str, #rules)
                    .with_serde(::tagcheck::SerdeName::Named(#serde_name))
            },
            Some(FieldName::Skipped) => quote! {
                ::tagcheck::FieldMeta::new(#ident_str, #rules)
                    .with_serde(::tagcheck::SerdeName::Skipped)
            },
            None => quote! {
                ::tagcheck::FieldMeta::new(#ident_str, #rules)
            },
        };

        let index = metas.len();
        metas.push(meta);
        accessors.push(quote! {
            ::tagcheck::Field::new(&FIELDS[#index], &self.#ident)
        });
    }

    let count = metas.len();
    let struct_name = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::tagcheck::Validate for #name #ty_generics #where_clause {
            fn struct_name(&self) -> &'static str {
                #struct_name
            }

            fn fields(&self) -> ::std::vec::Vec<::tagcheck::Field<'_>> {
                static FIELDS: [::tagcheck::FieldMeta; #count] = [#(#metas),*];
                ::std::vec![#(#accessors),*]
            }
        }
    })
}

/// Collect `#[validate("...")]` tags; several attributes are joined with `,`
fn validate_rules(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut tags = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("validate")) {
        let lit: LitStr = attr.parse_args().map_err(|e| {
            syn::Error::new(e.span(), "expected #[validate(\"rule,rule=param\")]")
        })?;
        let value = lit.value();
        if !value.trim().is_empty() {
            tags.push(value);
        }
    }

    if attrs.iter().any(|a| a.path().is_ident("validate")) {
        Ok(Some(tags.join(",")))
    } else {
        Ok(None)
    }
}
