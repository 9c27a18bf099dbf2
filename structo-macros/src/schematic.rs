//! Schematic derive macro implementation.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Type};

/// Implementation for `#[derive(Schematic)]`
pub fn derive_schematic_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let schema_impl = match generate_json_schema(&input) {
        Ok(tokens) => tokens,
        Err(err) => return err.to_compile_error().into(),
    };
    let field_names_impl = field_names_slice(&input);

    let expanded = quote! {
        impl #impl_generics ::structo_core::Schematic for #name #ty_generics #where_clause {
            fn json_schema() -> ::serde_json::Value {
                #schema_impl
            }

            fn field_names() -> &'static [&'static str] {
                #field_names_impl
            }

            fn schema_name() -> &'static str {
                #name_str
            }
        }
    };

    TokenStream::from(expanded)
}

fn generate_json_schema(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let name = input.ident.to_string();
    let schema_id = format!("urn:schematic:{}", name);

    match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(fields) => {
                let property_inserts: Vec<TokenStream2> = fields
                    .named
                    .iter()
                    .map(|f| {
                        let field_name = f.ident.as_ref().unwrap().to_string();
                        let type_schema = type_to_schema(&f.ty);

                        // Field doc comments become schema descriptions.
                        let description = doc_comment(&f.attrs);

                        if description.is_empty() {
                            quote! {
                                properties.insert(#field_name.to_string(), #type_schema);
                            }
                        } else {
                            quote! {
                                properties.insert(#field_name.to_string(), {
                                    let mut schema = #type_schema;
                                    if let Some(obj) = schema.as_object_mut() {
                                        obj.insert(
                                            "description".to_string(),
                                            ::serde_json::json!(#description),
                                        );
                                    }
                                    schema
                                });
                            }
                        }
                    })
                    .collect();

                Ok(quote! {
                    {
                        let mut properties = ::serde_json::Map::new();
                        #(#property_inserts)*

                        ::serde_json::json!({
                            "$id": #schema_id,
                            "title": #name,
                            "type": "object",
                            "properties": properties
                        })
                    }
                })
            }
            _ => Err(syn::Error::new_spanned(
                &input.ident,
                "Schematic requires named fields; tuple and unit structs have no schema shape",
            )),
        },
        syn::Data::Enum(data) => {
            for variant in &data.variants {
                if !matches!(variant.fields, syn::Fields::Unit) {
                    return Err(syn::Error::new_spanned(
                        variant,
                        "Schematic enums must be fieldless",
                    ));
                }
            }
            let variants: Vec<String> = data
                .variants
                .iter()
                .map(|v| v.ident.to_string())
                .collect();

            Ok(quote! {
                ::serde_json::json!({
                    "$id": #schema_id,
                    "title": #name,
                    "type": "string",
                    "enum": [#(#variants),*]
                })
            })
        }
        syn::Data::Union(_) => Err(syn::Error::new_spanned(
            &input.ident,
            "Schematic cannot be derived for unions",
        )),
    }
}

fn field_names_slice(input: &DeriveInput) -> TokenStream2 {
    if let syn::Data::Struct(data) = &input.data {
        if let syn::Fields::Named(fields) = &data.fields {
            let names: Vec<String> = fields
                .named
                .iter()
                .map(|f| f.ident.as_ref().unwrap().to_string())
                .collect();
            return quote!(&[#(#names),*]);
        }
    }
    quote!(&[])
}

fn doc_comment(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter(|a| a.path().is_ident("doc"))
        .filter_map(|a| {
            if let syn::Meta::NameValue(nv) = &a.meta {
                if let syn::Expr::Lit(lit) = &nv.value {
                    if let syn::Lit::Str(s) = &lit.lit {
                        return Some(s.value().trim().to_string());
                    }
                }
            }
            None
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn type_to_schema(ty: &Type) -> TokenStream2 {
    if let Type::Path(p) = ty {
        if let Some(seg) = p.path.segments.last() {
            let ident = seg.ident.to_string();
            return match ident.as_str() {
                "String" | "str" => quote!(::serde_json::json!({ "type": "string" })),
                "i8" | "i16" | "i32" | "i64" | "i128" | "isize" => {
                    quote!(::serde_json::json!({ "type": "integer" }))
                }
                "u8" | "u16" | "u32" | "u64" | "u128" | "usize" => {
                    quote!(::serde_json::json!({ "type": "integer" }))
                }
                "f32" | "f64" => quote!(::serde_json::json!({ "type": "number" })),
                "bool" => quote!(::serde_json::json!({ "type": "boolean" })),
                "Vec" => {
                    if let syn::PathArguments::AngleBracketed(args) = &seg.arguments {
                        if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                            let inner_schema = type_to_schema(inner);
                            return quote! {
                                ::serde_json::json!({
                                    "type": "array",
                                    "items": #inner_schema
                                })
                            };
                        }
                    }
                    quote!(::serde_json::json!({ "type": "array" }))
                }
                "Option" => {
                    if let syn::PathArguments::AngleBracketed(args) = &seg.arguments {
                        if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                            let inner_schema = type_to_schema(inner);
                            return quote! {
                                {
                                    let mut schema = #inner_schema;
                                    if let Some(obj) = schema.as_object_mut() {
                                        // Widen the type to a nullable pair.
                                        if let Some(ty) = obj.get("type").cloned() {
                                            obj.insert(
                                                "type".to_string(),
                                                ::serde_json::json!([ty, "null"]),
                                            );
                                        }
                                    }
                                    schema
                                }
                            };
                        }
                    }
                    quote!(::serde_json::json!({ "type": ["string", "null"] }))
                }
                "HashMap" | "BTreeMap" => {
                    quote!(::serde_json::json!({
                        "type": "object",
                        "additionalProperties": true
                    }))
                }
                _ => {
                    // Another Schematic type: nest its schema, minus the
                    // identifier markers that only belong at a root.
                    quote! {
                        {
                            let mut schema = <#ty as ::structo_core::Schematic>::json_schema();
                            if let Some(obj) = schema.as_object_mut() {
                                obj.remove("$id");
                                obj.remove("title");
                            }
                            schema
                        }
                    }
                }
            };
        }
    }
    quote!(::serde_json::json!({ "type": "string" }))
}
