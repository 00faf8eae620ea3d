//! `#[derive(Injectable)]` 实现

use crate::utils::{
    classify, is_trait_object, parse_inject_attr, parse_injectable_name, DefaultValue, FieldShape,
};
use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Error, Fields, Result};

/// 生成 `Keyed` 与 `Describe` 实现
pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Injectable 不支持泛型类型，请使用 ConstructorDescriptor 构建器手写描述符",
        ));
    }

    let Data::Struct(data) = &input.data else {
        return Err(Error::new(
            input.ident.span(),
            "Injectable 只能用于结构体",
        ));
    };

    let ident = &input.ident;
    let type_name = match parse_injectable_name(&input.attrs)? {
        Some(name) => quote! { #name },
        None => {
            let simple = ident.to_string();
            quote! { ::core::concat!(::core::module_path!(), "::", #simple) }
        }
    };

    let constructor = match &data.fields {
        Fields::Named(named) => {
            let mut params = Vec::new();
            let mut inits = Vec::new();
            for field in &named.named {
                let (param, init) = expand_field(field)?;
                params.extend(param);
                inits.push(init);
            }
            quote! {
                ::di_abstractions::ConstructorDescriptor::builder()
                    #(#params)*
                    .primary()
                    .build(|args| ::core::result::Result::Ok(Self { #(#inits),* }))
            }
        }
        Fields::Unit => quote! {
            ::di_abstractions::ConstructorDescriptor::builder()
                .primary()
                .build(|_| ::core::result::Result::Ok(Self))
        },
        Fields::Unnamed(unnamed) => {
            return Err(Error::new(
                unnamed.span(),
                "Injectable 只支持具名字段的结构体",
            ))
        }
    };

    Ok(quote! {
        impl ::di_abstractions::Keyed for #ident {
            fn type_key() -> ::di_abstractions::TypeKey {
                ::di_abstractions::TypeKey::named(#type_name)
            }
        }

        impl ::di_abstractions::Describe for #ident {
            fn describe() -> ::di_abstractions::TypeDescriptor {
                ::di_abstractions::TypeDescriptor::class(#type_name).constructor(#constructor)
            }
        }
    })
}

/// 生成单个字段的形参声明与字段初始化表达式
fn expand_field(field: &syn::Field) -> Result<(Option<TokenStream>, TokenStream)> {
    let Some(name) = &field.ident else {
        return Err(Error::new(field.span(), "缺少字段名"));
    };
    let attr = parse_inject_attr(field)?;
    let span = field.ty.span();

    if attr.skip {
        let init = quote_spanned! {span=> #name: ::core::default::Default::default() };
        return Ok((None, init));
    }

    let param_name = name.to_string();
    let shape = classify(&field.ty);
    let dependency = shape.dependency();
    if is_trait_object(dependency) {
        return Err(Error::new(
            dependency.span(),
            "trait 对象无法从类型擦除的实例中取回，请注入具体类型或使用 #[inject(skip)]",
        ));
    }
    if shape.is_nullable() && attr.default.is_some() {
        return Err(Error::new(
            field.span(),
            "Option 字段未解析时总是 None，不能再指定默认值",
        ));
    }

    let key = if shape.is_nullable() {
        quote! { <#dependency as ::di_abstractions::Keyed>::type_key().nullable() }
    } else {
        quote! { <#dependency as ::di_abstractions::Keyed>::type_key() }
    };
    let param = if attr.default.is_some() {
        quote! { .defaulted(#param_name, #key) }
    } else {
        quote! { .param(#param_name, #key) }
    };

    let fallback = attr.default.map(|default| match default {
        DefaultValue::Trait => quote! { ::core::default::Default::default },
        DefaultValue::Expr(expr) => quote! { || #expr },
    });

    let value = match (shape, fallback) {
        (FieldShape::Shared(ty), None) => quote! { args.get::<#ty>(#param_name)? },
        (FieldShape::Shared(ty), Some(fallback)) => {
            quote! { args.get_or::<#ty, _>(#param_name, #fallback)? }
        }
        (FieldShape::Value(ty), None) => quote! { args.cloned::<#ty>(#param_name)? },
        (FieldShape::Value(ty), Some(fallback)) => {
            quote! { args.cloned_or::<#ty, _>(#param_name, #fallback)? }
        }
        (FieldShape::OptionalShared(ty), _) => quote! { args.get_optional::<#ty>(#param_name)? },
        (FieldShape::OptionalValue(ty), _) => {
            quote! { args.cloned_optional::<#ty>(#param_name)? }
        }
    };

    Ok((Some(param), quote_spanned! {span=> #name: #value }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand_to_string(input: DeriveInput) -> String {
        expand(input).unwrap().to_string()
    }

    #[test]
    fn test_named_struct_gets_primary_constructor() {
        let output = expand_to_string(parse_quote! {
            struct Greeter {
                leaf: Arc<Leaf>,
                maybe: Option<Arc<Leaf>>,
                name: String,
                #[inject(default = 3)]
                retries: u32,
                #[inject(skip)]
                cache: Vec<u8>,
            }
        });

        assert!(output.contains("impl :: di_abstractions :: Keyed for Greeter"));
        assert!(output.contains("impl :: di_abstractions :: Describe for Greeter"));
        assert!(output.contains(". param (\"leaf\""));
        assert!(output.contains(". nullable ()"));
        assert!(output.contains(". defaulted (\"retries\""));
        assert!(!output.contains("\"cache\""));
        assert!(output.contains(". primary ()"));
    }

    #[test]
    fn test_custom_type_name() {
        let output = expand_to_string(parse_quote! {
            #[injectable(name = "app::Greeter")]
            struct Greeter;
        });
        assert!(output.contains("\"app::Greeter\""));
        assert!(!output.contains("module_path"));
    }

    #[test]
    fn test_rejects_unsupported_inputs() {
        let generic: DeriveInput = parse_quote!(struct Boxed<T> { value: T });
        let tuple: DeriveInput = parse_quote!(struct Pair(u32, u32););
        let enumeration: DeriveInput = parse_quote!(enum Color { Red });
        let dyn_field: DeriveInput = parse_quote!(struct Svc { port: Arc<dyn Port> });
        let defaulted_option: DeriveInput = parse_quote! {
            struct Svc {
                #[inject(default)]
                leaf: Option<Arc<Leaf>>,
            }
        };

        for input in [generic, tuple, enumeration, dyn_field, defaulted_option] {
            assert!(expand(input).is_err());
        }
    }
}
