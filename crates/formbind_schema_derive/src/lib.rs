use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use proc_macro_crate::{FoundCrate, crate_name};
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, parse_macro_input};

#[proc_macro_derive(FormSchema)]
pub fn derive_form_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            input.ident,
            "FormSchema derive currently supports only non-generic structs",
        )
        .to_compile_error()
        .into();
    }

    let model_vis = input.vis;
    let model_ident = input.ident;
    let fields_struct_ident = format_ident!("{model_ident}Fields");
    let schema_struct_ident = format_ident!("{model_ident}Schema");

    let named_fields = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            _ => {
                return syn::Error::new(
                    Span::call_site(),
                    "FormSchema derive requires a struct with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new(
                Span::call_site(),
                "FormSchema derive is only supported on structs",
            )
            .to_compile_error()
            .into();
        }
    };

    let formbind = formbind_path();
    let mut fields_methods = Vec::new();
    let mut decode_fields = Vec::new();
    let mut encode_fields = Vec::new();

    for field in named_fields {
        let Some(field_ident) = field.ident else {
            continue;
        };
        let field_ty = field.ty;
        let field_name = field_ident.to_string();

        fields_methods.push(quote! {
            pub const fn #field_ident(&self) -> #formbind::FieldKey {
                #formbind::FieldKey::new(#field_name)
            }
        });

        decode_fields.push(quote! {
            #field_ident: raw
                .get(#field_name)
                .ok_or_else(|| {
                    #formbind::SchemaError::MissingField(#formbind::FieldKey::new(#field_name))
                })?
                .parse::<#field_ty>()
                .map_err(|error| #formbind::SchemaError::InvalidField {
                    key: #formbind::FieldKey::new(#field_name),
                    detail: error.to_string(),
                })?
        });

        encode_fields.push(quote! {
            record.insert(#formbind::FieldKey::new(#field_name), value.#field_ident.to_string());
        });
    }

    quote! {
        #[derive(Clone, Copy, Debug, Default)]
        #model_vis struct #fields_struct_ident;

        impl #fields_struct_ident {
            #(#fields_methods)*
        }

        #[derive(Clone, Copy, Debug, Default)]
        #model_vis struct #schema_struct_ident;

        impl #formbind::FormCodec for #schema_struct_ident {
            type Value = #model_ident;
            type Error = #formbind::SchemaError;

            fn decode(
                &self,
                raw: &#formbind::RawRecord,
            ) -> Result<#model_ident, #formbind::SchemaError> {
                Ok(#model_ident {
                    #(#decode_fields),*
                })
            }

            fn encode(&self, value: &#model_ident) -> #formbind::RawRecord {
                let mut record = #formbind::RawRecord::new();
                #(#encode_fields)*
                record
            }
        }

        impl #formbind::FormSchema for #model_ident {
            type Fields = #fields_struct_ident;
            type Codec = #schema_struct_ident;

            fn fields() -> Self::Fields {
                #fields_struct_ident
            }

            fn schema() -> Self::Codec {
                #schema_struct_ident
            }
        }
    }
    .into()
}

fn formbind_path() -> TokenStream2 {
    match crate_name("formbind") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Ok(FoundCrate::Itself) => quote!(crate),
        Err(_) => quote!(::formbind),
    }
}
