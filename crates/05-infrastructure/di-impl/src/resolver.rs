//! 反射式解析器
//!
//! 先向后备服务提供者查询；未命中时根据 [`TypeCatalog`] 中的描述符选择构造函数，
//! 递归解析每个形参并调用构造函数。
//!
//! 解析路径作为显式参数逐层传递，并发的顶层调用互不干扰。
//! 递归深度只受调用线程栈大小的限制，解析器内部不设上限；
//! 极深的非循环类型图需要在更大的线程栈上解析。

use crate::catalog::TypeCatalog;
use di_abstractions::{
    Argument, Arguments, ConstructorDescriptor, Instance, ResolutionPath, ServiceProvider,
    TypeDescriptor, TypeKind,
};
use infrastructure_common::{
    substitute, DependencyError, DependencyResult, SubstitutionMap, TypeKey,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// 反射式解析器
#[derive(Clone)]
pub struct ReflectiveResolver {
    catalog: Arc<TypeCatalog>,
    backing: Option<Arc<dyn ServiceProvider>>,
}

impl ReflectiveResolver {
    /// 创建不带后备服务提供者的解析器
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self {
            catalog,
            backing: None,
        }
    }

    /// 创建带后备服务提供者的解析器
    pub fn with_backing(catalog: Arc<TypeCatalog>, backing: Arc<dyn ServiceProvider>) -> Self {
        Self {
            catalog,
            backing: Some(backing),
        }
    }

    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }

    pub fn backing(&self) -> Option<&Arc<dyn ServiceProvider>> {
        self.backing.as_ref()
    }

    /// 在给定的解析路径中解析
    ///
    /// 顶层调用应传入空路径；传入预置路径可以模拟处于某个构造过程中的解析。
    pub fn provide_in(
        &self,
        key: &TypeKey,
        path: &mut ResolutionPath,
    ) -> DependencyResult<Option<Instance>> {
        if let Some(backing) = &self.backing {
            if let Some(instance) = backing.provide_instance(key)? {
                trace!("后备服务提供者命中: {}", key);
                return Ok(Some(instance));
            }
        }

        if self.catalog.is_opaque(key) {
            trace!("不透明类型不参与自动构造: {}", key);
            return Ok(None);
        }

        self.auto_resolve(key, path).map(Some)
    }

    fn auto_resolve(&self, key: &TypeKey, path: &mut ResolutionPath) -> DependencyResult<Instance> {
        path.push(key)?;
        let result = self.initialize(key, path);
        path.pop();
        result
    }

    fn initialize(&self, key: &TypeKey, path: &mut ResolutionPath) -> DependencyResult<Instance> {
        let descriptor = self.instantiable_descriptor(key)?;
        let constructor = select_constructor(&descriptor)?;
        let mapping = SubstitutionMap::for_request(descriptor.type_params(), key);

        debug!(
            "自动构造: {} (深度 {}, {} 个形参)",
            key,
            path.depth(),
            constructor.params().len()
        );

        let mut args = Arguments::new(key.non_null());
        for parameter in constructor.params() {
            let wanted = substitute(parameter.ty(), &mapping);
            let resolved = match self.provide_in(&wanted, path) {
                Ok(resolved) => resolved,
                Err(err) if err.is_recoverable() => {
                    debug!("形参 {} ({}) 未解析: {}", parameter.name(), wanted, err);
                    None
                }
                Err(err) => return Err(err),
            };

            let argument = match resolved {
                Some(instance) => Argument::Value(instance),
                None if wanted.is_nullable() => Argument::Null,
                None if parameter.has_default() => Argument::Default,
                None => {
                    return Err(DependencyError::UnresolvedParameter {
                        parameter: parameter.name().to_string(),
                        parameter_type: wanted.to_string(),
                        owner: descriptor.name().to_string(),
                    })
                }
            };
            args.push(parameter.name().to_string(), wanted, argument);
        }

        constructor.invoke(&args).map_err(|err| match err {
            DependencyError::UnresolvedParameter { .. } | DependencyError::NotInstantiable { .. } => {
                warn!("构造函数调用失败: {}: {}", key, err);
                DependencyError::construction_failed(key.to_string(), err.to_string())
            }
            other => other,
        })
    }

    fn instantiable_descriptor(&self, key: &TypeKey) -> DependencyResult<Arc<TypeDescriptor>> {
        let Some(descriptor) = self.catalog.lookup(key) else {
            return Err(DependencyError::not_instantiable(
                key.to_string(),
                "没有登记类型描述符",
            ));
        };

        let reason = match descriptor.kind() {
            TypeKind::Class if descriptor.constructors().is_empty() => Some("没有构造函数"),
            TypeKind::Class => None,
            // 原始类型在 provide_in 中已按不透明类型返回缺失，不会走到这里
            TypeKind::Interface | TypeKind::Primitive => Some("接口类型"),
            TypeKind::Enum => Some("枚举类型"),
            TypeKind::Annotation => Some("标记类型"),
        };

        match reason {
            Some(reason) => Err(DependencyError::not_instantiable(key.to_string(), reason)),
            None => Ok(descriptor),
        }
    }
}

/// 选择构造函数
///
/// 优先级：唯一的指定注入构造函数 → 主构造函数 → 声明顺序中第一个公开构造函数
/// → 第一个构造函数。多于一个指定注入构造函数时报错。
fn select_constructor(descriptor: &TypeDescriptor) -> DependencyResult<&ConstructorDescriptor> {
    let constructors = descriptor.constructors();

    let mut designated = constructors.iter().filter(|c| c.is_designated());
    if let Some(chosen) = designated.next() {
        if designated.next().is_some() {
            return Err(DependencyError::AmbiguousConstructor {
                type_name: descriptor.name().to_string(),
            });
        }
        return Ok(chosen);
    }

    constructors
        .iter()
        .find(|c| c.is_primary())
        .or_else(|| constructors.iter().find(|c| c.is_public()))
        .or_else(|| constructors.first())
        .ok_or_else(|| DependencyError::not_instantiable(descriptor.name(), "没有构造函数"))
}

impl ServiceProvider for ReflectiveResolver {
    fn provide_instance(&self, key: &TypeKey) -> DependencyResult<Option<Instance>> {
        let mut path = ResolutionPath::new();
        self.provide_in(key, &mut path)
    }
}

impl fmt::Debug for ReflectiveResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectiveResolver")
            .field("catalog", &self.catalog.len())
            .field("backing", &self.backing.is_some())
            .finish()
    }
}
