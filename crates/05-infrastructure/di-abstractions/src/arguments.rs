//! 构造函数实参
//!
//! 解析器为所选构造函数的每个形参决定一个 [`Argument`]，构造函数闭包通过
//! [`Arguments`] 按形参名取值。

use crate::factory::Instance;
use infrastructure_common::{DependencyError, DependencyResult, TypeKey, TypeName};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 单个形参的最终取值
#[derive(Clone)]
pub enum Argument {
    /// 解析得到的实例
    Value(Instance),
    /// 可空形参未解析，绑定为空
    Null,
    /// 带默认值的形参未解析，由构造函数使用默认值
    Default,
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Value(_) => f.write_str("Value(<instance>)"),
            Argument::Null => f.write_str("Null"),
            Argument::Default => f.write_str("Default"),
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    name: TypeName,
    ty: TypeKey,
    argument: Argument,
}

/// 构造函数调用的实参集合
#[derive(Debug, Clone)]
pub struct Arguments {
    owner: TypeKey,
    slots: Vec<Slot>,
}

impl Arguments {
    /// 为被构造的类型创建空的实参集合
    pub fn new(owner: TypeKey) -> Self {
        Self {
            owner,
            slots: Vec::new(),
        }
    }

    /// 按声明顺序追加一个形参的取值
    pub fn push(&mut self, name: impl Into<TypeName>, ty: TypeKey, argument: Argument) {
        self.slots.push(Slot {
            name: name.into(),
            ty,
            argument,
        });
    }

    /// 被构造的类型（已包含请求的类型实参）
    pub fn owner(&self) -> &TypeKey {
        &self.owner
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.slot(name).map(|slot| &slot.argument)
    }

    /// 形参解析后的具体类型键
    pub fn parameter_type(&self, name: &str) -> Option<&TypeKey> {
        self.slot(name).map(|slot| &slot.ty)
    }

    /// 形参是否交由默认值处理
    pub fn is_default(&self, name: &str) -> bool {
        matches!(self.argument(name), Some(Argument::Default))
    }

    /// 获取必需形参
    pub fn get<T>(&self, name: &str) -> DependencyResult<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let slot = self.require(name)?;
        match &slot.argument {
            Argument::Value(instance) => self.downcast(slot, instance),
            Argument::Null | Argument::Default => Err(DependencyError::UnresolvedParameter {
                parameter: slot.name.to_string(),
                parameter_type: slot.ty.to_string(),
                owner: self.owner.to_string(),
            }),
        }
    }

    /// 获取可空形参，未解析时为 `None`
    pub fn get_optional<T>(&self, name: &str) -> DependencyResult<Option<Arc<T>>>
    where
        T: Any + Send + Sync,
    {
        let slot = self.require(name)?;
        match &slot.argument {
            Argument::Value(instance) => self.downcast(slot, instance).map(Some),
            Argument::Null | Argument::Default => Ok(None),
        }
    }

    /// 获取带默认值的形参
    pub fn get_or<T, F>(&self, name: &str, default: F) -> DependencyResult<Arc<T>>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        Ok(self
            .get_optional(name)?
            .unwrap_or_else(|| Arc::new(default())))
    }

    /// 获取必需形参的克隆值
    pub fn cloned<T>(&self, name: &str) -> DependencyResult<T>
    where
        T: Any + Send + Sync + Clone,
    {
        self.get::<T>(name).map(|value| T::clone(&value))
    }

    /// 获取可空形参的克隆值
    pub fn cloned_optional<T>(&self, name: &str) -> DependencyResult<Option<T>>
    where
        T: Any + Send + Sync + Clone,
    {
        Ok(self.get_optional::<T>(name)?.map(|value| T::clone(&value)))
    }

    /// 获取带默认值形参的克隆值
    pub fn cloned_or<T, F>(&self, name: &str, default: F) -> DependencyResult<T>
    where
        T: Any + Send + Sync + Clone,
        F: FnOnce() -> T,
    {
        Ok(self
            .cloned_optional::<T>(name)?
            .unwrap_or_else(default))
    }

    fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    fn require(&self, name: &str) -> DependencyResult<&Slot> {
        self.slot(name).ok_or_else(|| {
            DependencyError::construction_failed(
                self.owner.to_string(),
                format!("构造函数没有名为 {name} 的形参"),
            )
        })
    }

    fn downcast<T>(&self, slot: &Slot, instance: &Instance) -> DependencyResult<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        Arc::clone(instance)
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                parameter: format!("{}.{}", self.owner, slot.name),
                expected: std::any::type_name::<T>().to_string(),
            })
    }
}
