//! 组件工厂抽象接口
//!
//! 提供固定实例与按需创建两种实例生产策略

use infrastructure_common::Lifetime;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 类型擦除后的组件实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 组件工厂 trait
///
/// 可以被调用任意次，良构的工厂不会失败。
pub trait Factory: Send + Sync {
    /// 产生一个实例
    fn provide(&self) -> Instance;

    /// 工厂的生命周期策略
    fn lifetime(&self) -> Lifetime;
}

/// 单例工厂，始终返回同一个预先构建的实例
#[derive(Clone)]
pub struct SingletonFactory {
    instance: Instance,
}

impl SingletonFactory {
    pub fn new<T>(instance: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            instance: Arc::new(instance),
        }
    }

    /// 使用已共享的实例，不会复制
    pub fn from_arc<T>(instance: Arc<T>) -> Self
    where
        T: Any + Send + Sync,
    {
        Self { instance }
    }

    pub fn from_instance(instance: Instance) -> Self {
        Self { instance }
    }
}

impl Factory for SingletonFactory {
    fn provide(&self) -> Instance {
        Arc::clone(&self.instance)
    }

    fn lifetime(&self) -> Lifetime {
        Lifetime::Singleton
    }
}

impl fmt::Debug for SingletonFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingletonFactory")
            .field("instance", &"<instance>")
            .finish()
    }
}

/// 瞬时工厂，每次调用都执行一次供应函数
#[derive(Clone)]
pub struct TransientFactory {
    supplier: Arc<dyn Fn() -> Instance + Send + Sync>,
}

impl TransientFactory {
    pub fn new<T, F>(supplier: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            supplier: Arc::new(move || Arc::new(supplier()) as Instance),
        }
    }
}

impl Factory for TransientFactory {
    fn provide(&self) -> Instance {
        (self.supplier)()
    }

    fn lifetime(&self) -> Lifetime {
        Lifetime::Transient
    }
}

impl fmt::Debug for TransientFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransientFactory")
            .field("supplier", &"<function>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_singleton_factory_returns_same_instance() {
        let shared = Arc::new(String::from("shared"));
        let factory = SingletonFactory::from_arc(Arc::clone(&shared));

        let a = factory.provide().downcast::<String>().unwrap();
        let b = factory.provide().downcast::<String>().unwrap();

        assert!(Arc::ptr_eq(&shared, &a));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(factory.lifetime(), Lifetime::Singleton);
    }

    #[test]
    fn test_transient_factory_invokes_supplier_each_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let factory = TransientFactory::new(move || counter.fetch_add(1, Ordering::SeqCst) + 1);

        let a = factory.provide().downcast::<usize>().unwrap();
        let b = factory.provide().downcast::<usize>().unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!((*a, *b), (1, 2));
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(factory.lifetime(), Lifetime::Transient);
    }
}
