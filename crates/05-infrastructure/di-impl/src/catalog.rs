//! 类型描述符表
//!
//! 解析器从这里取得可构造类型的构造函数信息。
//! 描述符按声明名登记；Rust 泛型是单态化的，因此也允许为某个具体实例化
//! 单独登记描述符，查找时优先于按声明名登记的描述符。

use dashmap::DashMap;
use di_abstractions::{Describe, TypeDescriptor, TypeKind};
use infrastructure_common::{TypeKey, TypeName};
use std::sync::Arc;
use tracing::debug;

/// 类型描述符表
#[derive(Debug, Default)]
pub struct TypeCatalog {
    declarations: DashMap<TypeName, Arc<TypeDescriptor>>,
    instantiations: DashMap<TypeKey, Arc<TypeDescriptor>>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按声明名登记描述符，同名覆盖
    pub fn add(&self, descriptor: TypeDescriptor) -> &Self {
        debug!(
            "登记类型描述符: {} ({:?}, {} 个构造函数)",
            descriptor.name(),
            descriptor.kind(),
            descriptor.constructors().len()
        );
        self.declarations
            .insert(TypeName::Owned(descriptor.name().to_string()), Arc::new(descriptor));
        self
    }

    /// 为具体实例化登记描述符
    pub fn add_instantiation(&self, key: TypeKey, descriptor: TypeDescriptor) -> &Self {
        debug!("登记实例化描述符: {}", key);
        self.instantiations.insert(key.non_null(), Arc::new(descriptor));
        self
    }

    /// 登记实现了 [`Describe`] 的类型
    ///
    /// 带类型实参的类型键按实例化登记，否则按声明名登记。
    pub fn describe<T: Describe + ?Sized>(&self) -> &Self {
        let key = T::type_key();
        let descriptor = T::describe();
        if key.args().is_empty() {
            self.add(descriptor)
        } else {
            self.add_instantiation(key, descriptor)
        }
    }

    /// 查找请求类型的描述符
    pub fn lookup(&self, key: &TypeKey) -> Option<Arc<TypeDescriptor>> {
        if key.is_param() {
            return None;
        }
        if !key.args().is_empty() {
            if let Some(found) = self.instantiations.get(&key.non_null()) {
                return Some(Arc::clone(found.value()));
            }
        }
        self.declarations
            .get(key.name())
            .map(|found| Arc::clone(found.value()))
    }

    /// 请求类型是否属于不透明类型，不参与自动构造
    ///
    /// 内置类型与 `Primitive` 描述符都在这里判定，解析器不再单独检查。
    pub fn is_opaque(&self, key: &TypeKey) -> bool {
        if key.is_intrinsic() {
            return true;
        }
        matches!(
            self.lookup(key).map(|descriptor| descriptor.kind()),
            Some(TypeKind::Primitive)
        )
    }

    pub fn len(&self) -> usize {
        self.declarations.len() + self.instantiations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.declarations.clear();
        self.instantiations.clear();
    }
}
