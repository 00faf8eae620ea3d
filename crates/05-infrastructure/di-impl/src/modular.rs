//! 模块化服务注册表
//!
//! 每条注册都带有所有者标记，可以按所有者整体卸载（插件 / 模块生命周期）。
//! 所有者索引不单独维护，而是从条目当前的所有者标记推导，
//! 因此后来者覆盖的键不会被先前所有者的卸载删除。

use crate::lookup;
use dashmap::DashMap;
use di_abstractions::{
    Factory, Instance, OwnerId, ServiceProvider, ServiceRegistry, SingletonFactory,
    TransientFactory,
};
use infrastructure_common::{
    ContainerConfig, DependencyResult, Keyed, LookupPolicy, TypeKey, HOST_OWNER,
};
use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
struct Owned {
    owner: OwnerId,
    factory: Arc<dyn Factory>,
}

/// 模块化服务注册表
pub struct ModularServiceRegistry {
    providers: DashMap<TypeKey, Owned>,
    host_owner: OwnerId,
    lookup_policy: LookupPolicy,
}

impl ModularServiceRegistry {
    /// 创建新的注册表，默认所有者为宿主
    pub fn new() -> Self {
        Self::with_config(&ContainerConfig::default())
    }

    /// 从容器配置创建注册表
    pub fn with_config(config: &ContainerConfig) -> Self {
        Self {
            providers: DashMap::new(),
            host_owner: config.host_owner.clone(),
            lookup_policy: config.lookup_policy,
        }
    }

    /// 未指定所有者时使用的所有者标识
    pub fn host_owner(&self) -> &str {
        &self.host_owner
    }

    /// 以指定所有者注册工厂
    pub fn register_owned(&self, owner: impl Into<OwnerId>, key: TypeKey, factory: Arc<dyn Factory>) {
        let owner = owner.into();
        debug!("注册服务: {} (owner={}, {:?})", key, owner, factory.lifetime());
        self.providers.insert(key, Owned { owner, factory });
    }

    /// 以指定所有者注册单例实例
    pub fn register_instance_owned<T>(&self, owner: impl Into<OwnerId>, instance: T)
    where
        T: Keyed + Any + Send + Sync,
    {
        self.register_owned(owner, T::type_key(), Arc::new(SingletonFactory::new(instance)));
    }

    /// 以指定所有者注册瞬时供应函数
    pub fn register_supplier_owned<T, F>(&self, owner: impl Into<OwnerId>, supplier: F)
    where
        T: Keyed + Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register_owned(owner, T::type_key(), Arc::new(TransientFactory::new(supplier)));
    }

    /// 卸载指定所有者当前拥有的全部注册，返回删除的数量
    ///
    /// 未知所有者是空操作。已被其他所有者覆盖的键保持不变。
    pub fn unregister(&self, owner: &str) -> usize {
        let mut removed = 0;
        self.providers.retain(|_, owned| {
            let keep = owned.owner != owner;
            if !keep {
                removed += 1;
            }
            keep
        });

        if removed > 0 {
            info!("卸载所有者 {} 的 {} 项注册", owner, removed);
        } else {
            debug!("所有者 {} 没有可卸载的注册", owner);
        }
        removed
    }

    /// 指定所有者当前拥有的类型键
    pub fn owned_keys(&self, owner: &str) -> Vec<TypeKey> {
        let mut keys: Vec<TypeKey> = self
            .providers
            .iter()
            .filter(|entry| entry.value().owner == owner)
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        keys
    }

    /// 当前拥有至少一项注册的所有者
    pub fn owners(&self) -> BTreeSet<OwnerId> {
        self.providers
            .iter()
            .map(|entry| entry.value().owner.clone())
            .collect()
    }

    /// 类型键当前的所有者
    pub fn owner_of(&self, key: &TypeKey) -> Option<OwnerId> {
        self.providers.get(key).map(|entry| entry.owner.clone())
    }
}

impl Default for ModularServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ModularServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModularServiceRegistry")
            .field("entries", &self.providers.len())
            .field("owners", &self.owners())
            .field("host_owner", &self.host_owner)
            .field("lookup_policy", &self.lookup_policy)
            .finish()
    }
}

impl ServiceProvider for ModularServiceRegistry {
    fn provide_instance(&self, key: &TypeKey) -> DependencyResult<Option<Instance>> {
        let owned = lookup::find_entry(&self.providers, key, self.lookup_policy);
        Ok(owned.map(|owned| owned.factory.provide()))
    }
}

impl ServiceRegistry for ModularServiceRegistry {
    /// 以宿主所有者注册
    fn register_factory(&self, key: TypeKey, factory: Arc<dyn Factory>) {
        self.register_owned(self.host_owner.clone(), key, factory);
    }

    fn clear(&self) {
        info!("清空模块化注册表: {} 项", self.providers.len());
        self.providers.clear();
    }

    fn contains(&self, key: &TypeKey) -> bool {
        self.providers.contains_key(key)
    }

    fn len(&self) -> usize {
        self.providers.len()
    }
}
