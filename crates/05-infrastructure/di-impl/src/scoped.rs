//! 作用域服务注册表
//!
//! 无所有者标记的扁平注册表，对应单个生命周期作用域（一次请求、一次测试）。

use crate::lookup;
use dashmap::DashMap;
use di_abstractions::{Factory, Instance, ServiceProvider, ServiceRegistry};
use infrastructure_common::{ContainerConfig, DependencyResult, LookupPolicy, TypeKey};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 作用域服务注册表
pub struct ScopedServiceRegistry {
    providers: DashMap<TypeKey, Arc<dyn Factory>>,
    lookup_policy: LookupPolicy,
}

impl ScopedServiceRegistry {
    /// 创建新的注册表
    pub fn new() -> Self {
        Self::with_policy(LookupPolicy::default())
    }

    /// 使用指定查找策略创建注册表
    pub fn with_policy(lookup_policy: LookupPolicy) -> Self {
        Self {
            providers: DashMap::new(),
            lookup_policy,
        }
    }

    /// 从容器配置创建注册表
    pub fn with_config(config: &ContainerConfig) -> Self {
        Self::with_policy(config.lookup_policy)
    }

    pub fn lookup_policy(&self) -> LookupPolicy {
        self.lookup_policy
    }

    /// 已注册的类型键
    pub fn keys(&self) -> Vec<TypeKey> {
        let mut keys: Vec<TypeKey> = self.providers.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }
}

impl Default for ScopedServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ScopedServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedServiceRegistry")
            .field("keys", &self.keys())
            .field("lookup_policy", &self.lookup_policy)
            .finish()
    }
}

impl ServiceProvider for ScopedServiceRegistry {
    fn provide_instance(&self, key: &TypeKey) -> DependencyResult<Option<Instance>> {
        let factory = lookup::find_entry(&self.providers, key, self.lookup_policy);
        Ok(factory.map(|factory| factory.provide()))
    }
}

impl ServiceRegistry for ScopedServiceRegistry {
    fn register_factory(&self, key: TypeKey, factory: Arc<dyn Factory>) {
        debug!("注册服务: {} ({:?})", key, factory.lifetime());
        self.providers.insert(key, factory);
    }

    fn clear(&self) {
        debug!("清空作用域注册表: {} 项", self.providers.len());
        self.providers.clear();
    }

    fn contains(&self, key: &TypeKey) -> bool {
        self.providers.contains_key(key)
    }

    fn len(&self) -> usize {
        self.providers.len()
    }
}
