//! 宏工具函数

use syn::{Attribute, Expr, Field, GenericArgument, LitStr, PathArguments, Result, Token, Type};

/// 字段在构造函数中的形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape<'a> {
    /// `Arc<X>`：共享依赖
    Shared(&'a Type),
    /// `Option<Arc<X>>`：可空的共享依赖
    OptionalShared(&'a Type),
    /// `X`：克隆得到的值
    Value(&'a Type),
    /// `Option<X>`：可空的克隆值
    OptionalValue(&'a Type),
}

impl<'a> FieldShape<'a> {
    /// 依赖的类型，即类型键的来源
    pub fn dependency(&self) -> &'a Type {
        match *self {
            FieldShape::Shared(ty)
            | FieldShape::OptionalShared(ty)
            | FieldShape::Value(ty)
            | FieldShape::OptionalValue(ty) => ty,
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, FieldShape::OptionalShared(_) | FieldShape::OptionalValue(_))
    }
}

/// 按字段类型判断形态
pub fn classify(ty: &Type) -> FieldShape<'_> {
    if let Some(inner) = wrapped_type(ty, "Option") {
        return match wrapped_type(inner, "Arc") {
            Some(shared) => FieldShape::OptionalShared(shared),
            None => FieldShape::OptionalValue(inner),
        };
    }
    match wrapped_type(ty, "Arc") {
        Some(shared) => FieldShape::Shared(shared),
        None => FieldShape::Value(ty),
    }
}

/// 若类型形如 `Wrapper<T>`，返回 `T`
///
/// 只比较路径最后一段，`std::sync::Arc<T>` 与 `Arc<T>` 等价。
pub fn wrapped_type<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let segment = type_path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first() {
        Some(GenericArgument::Type(inner)) => Some(inner),
        _ => None,
    }
}

/// 是否为 trait 对象（`dyn Trait`）
pub fn is_trait_object(ty: &Type) -> bool {
    match ty {
        Type::TraitObject(_) => true,
        Type::Paren(paren) => is_trait_object(&paren.elem),
        Type::Group(group) => is_trait_object(&group.elem),
        _ => false,
    }
}

/// 字段上的 `#[inject(...)]` 参数
#[derive(Default)]
pub struct InjectAttr {
    pub skip: bool,
    pub default: Option<DefaultValue>,
}

/// 默认值来源
pub enum DefaultValue {
    /// `#[inject(default)]`，使用 `Default::default()`
    Trait,
    /// `#[inject(default = expr)]`
    Expr(Box<Expr>),
}

/// 解析字段上的 `#[inject(...)]`
pub fn parse_inject_attr(field: &Field) -> Result<InjectAttr> {
    let mut parsed = InjectAttr::default();
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("inject")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                parsed.skip = true;
                Ok(())
            } else if meta.path.is_ident("default") {
                if meta.input.peek(Token![=]) {
                    let expr: Expr = meta.value()?.parse()?;
                    parsed.default = Some(DefaultValue::Expr(Box::new(expr)));
                } else {
                    parsed.default = Some(DefaultValue::Trait);
                }
                Ok(())
            } else {
                Err(meta.error("不支持的 inject 参数，可用: skip, default, default = <expr>"))
            }
        })?;
    }
    Ok(parsed)
}

/// 解析结构体上的 `#[injectable(name = "...")]`，返回自定义类型名
pub fn parse_injectable_name(attrs: &[Attribute]) -> Result<Option<LitStr>> {
    let mut name = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("injectable")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                if lit.value().trim().is_empty() {
                    return Err(syn::Error::new(lit.span(), "类型名不能为空"));
                }
                name = Some(lit);
                Ok(())
            } else {
                Err(meta.error("不支持的 injectable 参数，可用: name = \"...\""))
            }
        })?;
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::ToTokens;
    use syn::{parse_quote, ItemStruct};

    fn tokens(ty: &Type) -> String {
        ty.to_token_stream().to_string()
    }

    #[test]
    fn test_classify_field_shapes() {
        let shared: Type = parse_quote!(std::sync::Arc<Leaf>);
        let optional_shared: Type = parse_quote!(Option<Arc<Leaf>>);
        let value: Type = parse_quote!(String);
        let optional_value: Type = parse_quote!(Option<u32>);

        assert!(matches!(classify(&shared), FieldShape::Shared(ty) if tokens(ty) == "Leaf"));
        assert!(matches!(
            classify(&optional_shared),
            FieldShape::OptionalShared(ty) if tokens(ty) == "Leaf"
        ));
        assert!(matches!(classify(&value), FieldShape::Value(ty) if tokens(ty) == "String"));
        assert!(matches!(
            classify(&optional_value),
            FieldShape::OptionalValue(ty) if tokens(ty) == "u32"
        ));
        assert!(classify(&optional_value).is_nullable());
        assert!(!classify(&shared).is_nullable());
    }

    #[test]
    fn test_wrapped_type_requires_single_argument() {
        let map: Type = parse_quote!(Arc<HashMap<String, i32>>);
        let bare: Type = parse_quote!(Arc);
        let two: Type = parse_quote!(Result<String, Error>);

        assert_eq!(tokens(wrapped_type(&map, "Arc").unwrap()), "HashMap < String , i32 >");
        assert!(wrapped_type(&bare, "Arc").is_none());
        assert!(wrapped_type(&two, "Result").is_none());
    }

    #[test]
    fn test_detects_trait_objects() {
        let object: Type = parse_quote!(dyn Port + Send + Sync);
        let concrete: Type = parse_quote!(Leaf);
        assert!(is_trait_object(&object));
        assert!(!is_trait_object(&concrete));
    }

    #[test]
    fn test_parse_inject_attr() {
        let item: ItemStruct = parse_quote! {
            struct Svc {
                #[inject(skip)]
                cache: Vec<u8>,
                #[inject(default)]
                retries: u32,
                #[inject(default = String::from("anon"))]
                name: String,
                plain: Arc<Leaf>,
            }
        };
        let fields: Vec<_> = item.fields.iter().collect();

        assert!(parse_inject_attr(fields[0]).unwrap().skip);
        assert!(matches!(
            parse_inject_attr(fields[1]).unwrap().default,
            Some(DefaultValue::Trait)
        ));
        assert!(matches!(
            parse_inject_attr(fields[2]).unwrap().default,
            Some(DefaultValue::Expr(_))
        ));
        let plain = parse_inject_attr(fields[3]).unwrap();
        assert!(!plain.skip && plain.default.is_none());
    }

    #[test]
    fn test_unknown_inject_argument_is_rejected() {
        let item: ItemStruct = parse_quote! {
            struct Svc {
                #[inject(lazy)]
                leaf: Arc<Leaf>,
            }
        };
        let field = item.fields.iter().next().unwrap();
        assert!(parse_inject_attr(field).is_err());
    }

    #[test]
    fn test_parse_injectable_name() {
        let item: ItemStruct = parse_quote! {
            #[injectable(name = "app::Greeter")]
            struct Greeter;
        };
        assert_eq!(parse_injectable_name(&item.attrs).unwrap().unwrap().value(), "app::Greeter");

        let unnamed: ItemStruct = parse_quote!(struct Greeter;);
        assert!(parse_injectable_name(&unnamed.attrs).unwrap().is_none());

        let empty: ItemStruct = parse_quote! {
            #[injectable(name = "")]
            struct Greeter;
        };
        assert!(parse_injectable_name(&empty.attrs).is_err());
    }
}
