//! 类型元数据定义
//!
//! [`TypeKey`] 是注册表的查找键，描述被请求的类型：基础类型标识、
//! 有序的类型实参列表以及可空标记。相等性与哈希在三个字段上按结构比较。

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;

/// 类型名称
pub type TypeName = Cow<'static, str>;

/// 内建的不透明类型
///
/// 这些类型不会被自动解析构造，只能从注册表中获取。
pub const INTRINSIC_TYPES: &[&str] = &[
    "bool", "char", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128",
    "usize", "f32", "f64", "str", "String", "Vec", "VecDeque", "HashMap", "HashSet", "BTreeMap",
    "BTreeSet",
];

/// 类型标识的基础部分
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeBase {
    /// 具体声明，例如 `app::Leaf`
    Named(TypeName),
    /// 对外层声明形式类型参数的引用，例如 `T`
    Param(TypeName),
}

/// 类型实参
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeArg {
    /// 通配投影 `*`
    Star,
    /// 具体类型实参
    Type(TypeKey),
}

impl TypeArg {
    /// 获取具体类型，通配投影返回 `None`
    pub fn as_type(&self) -> Option<&TypeKey> {
        match self {
            TypeArg::Star => None,
            TypeArg::Type(key) => Some(key),
        }
    }
}

impl From<TypeKey> for TypeArg {
    fn from(key: TypeKey) -> Self {
        TypeArg::Type(key)
    }
}

/// 被请求类型的规范描述
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    base: TypeBase,
    args: Vec<TypeArg>,
    nullable: bool,
}

impl TypeKey {
    /// 创建无类型实参的具体类型键
    pub fn named(name: impl Into<TypeName>) -> Self {
        Self {
            base: TypeBase::Named(name.into()),
            args: Vec::new(),
            nullable: false,
        }
    }

    /// 创建形式类型参数引用
    pub fn param(name: impl Into<TypeName>) -> Self {
        Self {
            base: TypeBase::Param(name.into()),
            args: Vec::new(),
            nullable: false,
        }
    }

    /// 创建带类型实参的具体类型键
    pub fn generic<I>(name: impl Into<TypeName>, args: I) -> Self
    where
        I: IntoIterator<Item = TypeKey>,
    {
        Self::named(name).with_args(args.into_iter().map(TypeArg::Type))
    }

    /// 从实现了 [`Keyed`] 的 Rust 类型获取类型键
    pub fn of<T: Keyed + ?Sized>() -> Self {
        T::type_key()
    }

    /// 追加类型实参
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = TypeArg>,
    {
        self.args.extend(args);
        self
    }

    /// 追加一个类型实参
    pub fn with_arg(mut self, arg: impl Into<TypeArg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// 追加一个通配投影实参
    pub fn with_star(mut self) -> Self {
        self.args.push(TypeArg::Star);
        self
    }

    /// 标记为可空
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// 去掉可空标记后的副本
    pub fn non_null(&self) -> Self {
        Self {
            nullable: false,
            ..self.clone()
        }
    }

    pub(crate) fn rebuild(&self, args: Vec<TypeArg>) -> Self {
        Self {
            base: self.base.clone(),
            args,
            nullable: self.nullable,
        }
    }

    pub fn base(&self) -> &TypeBase {
        &self.base
    }

    /// 基础类型名称（声明名或形参名）
    pub fn name(&self) -> &str {
        match &self.base {
            TypeBase::Named(name) | TypeBase::Param(name) => name,
        }
    }

    pub fn args(&self) -> &[TypeArg] {
        &self.args
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// 是否为形式类型参数引用
    pub fn is_param(&self) -> bool {
        matches!(self.base, TypeBase::Param(_))
    }

    /// 是否属于不透明的内建类型集合
    pub fn is_intrinsic(&self) -> bool {
        match &self.base {
            TypeBase::Named(name) => INTRINSIC_TYPES.contains(&name.as_ref()),
            TypeBase::Param(_) => false,
        }
    }

    /// 通配投影：同一基础类型，所有实参替换为 `*`，不可空
    ///
    /// 形参引用没有投影。
    pub fn star_projected(&self) -> Option<Self> {
        match &self.base {
            TypeBase::Named(_) => Some(Self {
                base: self.base.clone(),
                args: vec![TypeArg::Star; self.args.len()],
                nullable: false,
            }),
            TypeBase::Param(_) => None,
        }
    }

    /// 原始类型：同一基础类型，无实参，不可空
    pub fn raw(&self) -> Option<Self> {
        match &self.base {
            TypeBase::Named(_) => Some(Self {
                base: self.base.clone(),
                args: Vec::new(),
                nullable: false,
            }),
            TypeBase::Param(_) => None,
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (index, arg) in self.args.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                match arg {
                    TypeArg::Star => f.write_str("*")?,
                    TypeArg::Type(key) => write!(f, "{key}")?,
                }
            }
            f.write_str(">")?;
        }
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

/// 能够给出自身 [`TypeKey`] 的类型
///
/// 通常由 `#[derive(Injectable)]` 生成，也可以手动实现，
/// 例如为 `dyn Trait` 指定接口的类型键。
pub trait Keyed {
    fn type_key() -> TypeKey;
}

/// 获取类型 `T` 的类型键
pub fn type_key<T: Keyed + ?Sized>() -> TypeKey {
    T::type_key()
}

macro_rules! impl_intrinsic_keyed {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Keyed for $ty {
                fn type_key() -> TypeKey {
                    TypeKey::named($name)
                }
            }
        )*
    };
}

impl_intrinsic_keyed! {
    bool => "bool",
    char => "char",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    i128 => "i128",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    usize => "usize",
    f32 => "f32",
    f64 => "f64",
    str => "str",
    String => "String",
}

impl<T: Keyed> Keyed for Vec<T> {
    fn type_key() -> TypeKey {
        TypeKey::generic("Vec", [T::type_key()])
    }
}

impl<T: Keyed> Keyed for VecDeque<T> {
    fn type_key() -> TypeKey {
        TypeKey::generic("VecDeque", [T::type_key()])
    }
}

impl<T: Keyed, S> Keyed for HashSet<T, S> {
    fn type_key() -> TypeKey {
        TypeKey::generic("HashSet", [T::type_key()])
    }
}

impl<T: Keyed> Keyed for BTreeSet<T> {
    fn type_key() -> TypeKey {
        TypeKey::generic("BTreeSet", [T::type_key()])
    }
}

impl<K: Keyed, V: Keyed, S> Keyed for HashMap<K, V, S> {
    fn type_key() -> TypeKey {
        TypeKey::generic("HashMap", [K::type_key(), V::type_key()])
    }
}

impl<K: Keyed, V: Keyed> Keyed for BTreeMap<K, V> {
    fn type_key() -> TypeKey {
        TypeKey::generic("BTreeMap", [K::type_key(), V::type_key()])
    }
}

impl<T: Keyed> Keyed for Option<T> {
    fn type_key() -> TypeKey {
        T::type_key().nullable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(key: &TypeKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_structural_equality() {
        let a = TypeKey::generic("HashMap", [TypeKey::named("String"), TypeKey::named("i32")]);
        let b = type_key::<HashMap<String, i32>>();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let swapped = TypeKey::generic("HashMap", [TypeKey::named("i32"), TypeKey::named("String")]);
        assert_ne!(a, swapped);
        assert_ne!(a, a.clone().nullable());
        assert_ne!(TypeKey::named("Vec"), type_key::<Vec<String>>());
    }

    #[test]
    fn test_option_maps_to_nullable() {
        let key = type_key::<Option<String>>();
        assert!(key.is_nullable());
        assert_eq!(key.non_null(), type_key::<String>());
        assert_eq!(key.to_string(), "String?");
    }

    #[test]
    fn test_star_projection_and_raw() {
        let key = type_key::<Option<Vec<u8>>>();
        let star = key.star_projected().unwrap();
        assert_eq!(star, TypeKey::named("Vec").with_star());
        assert!(!star.is_nullable());
        assert_eq!(star.to_string(), "Vec<*>");
        assert_eq!(key.raw().unwrap(), TypeKey::named("Vec"));

        assert!(TypeKey::param("T").star_projected().is_none());
        assert!(TypeKey::param("T").raw().is_none());
    }

    #[test]
    fn test_intrinsic_set() {
        assert!(type_key::<String>().is_intrinsic());
        assert!(type_key::<Vec<String>>().is_intrinsic());
        assert!(type_key::<u64>().is_intrinsic());
        assert!(!TypeKey::named("app::Leaf").is_intrinsic());
        assert!(!TypeKey::param("String").is_intrinsic());
    }

    #[test]
    fn test_display_nested() {
        let key = TypeKey::generic("app::Box", [type_key::<Vec<String>>()])
            .with_star()
            .nullable();
        assert_eq!(key.to_string(), "app::Box<Vec<String>, *>?");
    }
}
