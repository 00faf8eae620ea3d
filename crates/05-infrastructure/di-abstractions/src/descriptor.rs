//! 类型描述符
//!
//! Rust 没有运行时反射，可构造类型的构造函数信息由显式的描述符提供：
//! 形式类型参数、构造函数列表、每个构造函数的形参（名称、类型键、是否有默认值）
//! 以及指定注入标记。描述符可以手写，也可以由 `#[derive(Injectable)]` 生成。

use crate::arguments::Arguments;
use crate::factory::Instance;
use infrastructure_common::{DependencyResult, Keyed, TypeKey, TypeName};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 声明的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// 具体类型，可以被构造
    Class,
    /// 接口（trait 对象）
    Interface,
    /// 原始类型
    Primitive,
    /// 枚举
    Enum,
    /// 仅作标记使用的类型
    Annotation,
}

/// 构造函数可见性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// 构造函数形参描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    name: TypeName,
    ty: TypeKey,
    has_default: bool,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<TypeName>, ty: TypeKey) -> Self {
        Self {
            name: name.into(),
            ty,
            has_default: false,
        }
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 声明的类型，可能引用外层声明的形式类型参数
    pub fn ty(&self) -> &TypeKey {
        &self.ty
    }

    pub fn has_default(&self) -> bool {
        self.has_default
    }
}

/// 构造函数调用
pub type ConstructorFn = Arc<dyn Fn(&Arguments) -> DependencyResult<Instance> + Send + Sync>;

/// 构造函数描述
#[derive(Clone)]
pub struct ConstructorDescriptor {
    params: Vec<ParameterDescriptor>,
    designated: bool,
    primary: bool,
    visibility: Visibility,
    invoke: ConstructorFn,
}

impl ConstructorDescriptor {
    pub fn builder() -> ConstructorBuilder {
        ConstructorBuilder::default()
    }

    pub fn params(&self) -> &[ParameterDescriptor] {
        &self.params
    }

    /// 是否带有指定注入标记
    pub fn is_designated(&self) -> bool {
        self.designated
    }

    /// 是否为主构造函数
    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn invoke(&self, args: &Arguments) -> DependencyResult<Instance> {
        (self.invoke)(args)
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("params", &self.params)
            .field("designated", &self.designated)
            .field("primary", &self.primary)
            .field("visibility", &self.visibility)
            .field("invoke", &"<function>")
            .finish()
    }
}

/// 构造函数描述构建器
#[derive(Debug, Default)]
pub struct ConstructorBuilder {
    params: Vec<ParameterDescriptor>,
    designated: bool,
    primary: bool,
    visibility: Visibility,
}

impl ConstructorBuilder {
    /// 添加必需形参；可空类型键表示可空形参
    pub fn param(mut self, name: impl Into<TypeName>, ty: TypeKey) -> Self {
        self.params.push(ParameterDescriptor::new(name, ty));
        self
    }

    /// 添加带默认值的形参
    pub fn defaulted(mut self, name: impl Into<TypeName>, ty: TypeKey) -> Self {
        self.params
            .push(ParameterDescriptor::new(name, ty).with_default());
        self
    }

    /// 标记为指定注入构造函数
    pub fn designated(mut self) -> Self {
        self.designated = true;
        self
    }

    /// 标记为主构造函数
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// 以返回具体值的闭包完成构建
    pub fn build<T, F>(self, constructor: F) -> ConstructorDescriptor
    where
        T: Any + Send + Sync,
        F: Fn(&Arguments) -> DependencyResult<T> + Send + Sync + 'static,
    {
        self.build_instance(move |args| Ok(Arc::new(constructor(args)?) as Instance))
    }

    /// 以返回类型擦除实例的闭包完成构建
    pub fn build_instance<F>(self, constructor: F) -> ConstructorDescriptor
    where
        F: Fn(&Arguments) -> DependencyResult<Instance> + Send + Sync + 'static,
    {
        ConstructorDescriptor {
            params: self.params,
            designated: self.designated,
            primary: self.primary,
            visibility: self.visibility,
            invoke: Arc::new(constructor),
        }
    }
}

/// 类型描述符
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    name: TypeName,
    kind: TypeKind,
    type_params: Vec<TypeName>,
    constructors: Vec<ConstructorDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<TypeName>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_params: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// 具体类型描述符
    pub fn class(name: impl Into<TypeName>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    /// 接口描述符
    pub fn interface(name: impl Into<TypeName>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    /// 按声明顺序添加形式类型参数
    pub fn type_param(mut self, name: impl Into<TypeName>) -> Self {
        self.type_params.push(name.into());
        self
    }

    /// 按声明顺序添加构造函数
    pub fn constructor(mut self, constructor: ConstructorDescriptor) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn type_params(&self) -> &[TypeName] {
        &self.type_params
    }

    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }
}

/// 能给出自身类型描述符的类型
pub trait Describe: Keyed {
    fn describe() -> TypeDescriptor;
}
