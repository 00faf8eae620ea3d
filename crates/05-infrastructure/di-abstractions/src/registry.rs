//! 服务提供者与注册表抽象接口

use crate::factory::{Factory, Instance, SingletonFactory, TransientFactory};
use infrastructure_common::{DependencyResult, Keyed, TypeKey};
use std::any::Any;
use std::sync::Arc;
use tracing::warn;

/// 所有者标识
pub type OwnerId = String;

/// 服务提供者 trait
///
/// 注册表和解析器共同实现的契约：按类型键提供实例，不存在时返回 `Ok(None)`。
/// 注册表从不返回错误，解析器在结构性配置错误时返回错误。
pub trait ServiceProvider: Send + Sync {
    /// 按类型键提供类型擦除的实例
    fn provide_instance(&self, key: &TypeKey) -> DependencyResult<Option<Instance>>;
}

/// [`ServiceProvider`] 的类型化辅助方法
pub trait ServiceProviderExt: ServiceProvider {
    /// 按类型键提供实例并转换为 `T`
    ///
    /// 实例的具体类型与 `T` 不一致时视为不存在。
    fn provide<T>(&self, key: &TypeKey) -> DependencyResult<Option<Arc<T>>>
    where
        T: Any + Send + Sync,
    {
        let Some(instance) = self.provide_instance(key)? else {
            return Ok(None);
        };

        match instance.downcast::<T>() {
            Ok(typed) => Ok(Some(typed)),
            Err(_) => {
                warn!(
                    "实例类型与请求不符: key={}, expected={}",
                    key,
                    std::any::type_name::<T>()
                );
                Ok(None)
            }
        }
    }

    /// 以 `T` 自身的类型键提供实例
    fn provide_of<T>(&self) -> DependencyResult<Option<Arc<T>>>
    where
        T: Keyed + Any + Send + Sync,
    {
        self.provide::<T>(&T::type_key())
    }
}

impl<P: ServiceProvider + ?Sized> ServiceProviderExt for P {}

impl<P: ServiceProvider + ?Sized> ServiceProvider for Arc<P> {
    fn provide_instance(&self, key: &TypeKey) -> DependencyResult<Option<Instance>> {
        (**self).provide_instance(key)
    }
}

/// 服务注册表 trait
///
/// 同一精确类型键的最后一次注册生效。所有方法都只需要共享引用，
/// 可以在多个线程中并发调用。
pub trait ServiceRegistry: ServiceProvider {
    /// 以指定类型键注册工厂
    ///
    /// 不检查工厂产出的实例是否与类型键匹配。
    fn register_factory(&self, key: TypeKey, factory: Arc<dyn Factory>);

    /// 注册单例实例，类型键取自 `T`
    fn register_instance<T>(&self, instance: T)
    where
        T: Keyed + Any + Send + Sync,
        Self: Sized,
    {
        self.register_factory(T::type_key(), Arc::new(SingletonFactory::new(instance)));
    }

    /// 注册已共享的单例实例
    fn register_arc<T>(&self, instance: Arc<T>)
    where
        T: Keyed + Any + Send + Sync,
        Self: Sized,
    {
        self.register_factory(T::type_key(), Arc::new(SingletonFactory::from_arc(instance)));
    }

    /// 注册瞬时供应函数
    fn register_supplier<T, F>(&self, supplier: F)
    where
        T: Keyed + Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
        Self: Sized,
    {
        self.register_factory(T::type_key(), Arc::new(TransientFactory::new(supplier)));
    }

    /// 清空所有注册
    fn clear(&self);

    /// 精确类型键是否已注册
    fn contains(&self, key: &TypeKey) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
