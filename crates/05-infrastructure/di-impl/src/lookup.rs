//! 注册表查找
//!
//! 两种注册表共用的唯一查找入口。精确匹配之后的回退是类型不安全的：
//! 注册在通配或原始类型键下的值会被任意实例化的请求拿到，
//! 调用方必须保证该值兼容所有可能的实例化。需要严格匹配时使用
//! [`LookupPolicy::ExactOnly`]。

use dashmap::DashMap;
use infrastructure_common::{LookupPolicy, TypeKey};
use tracing::trace;

/// 按查找顺序列出候选键：精确键、通配投影键、原始类型键
pub fn candidate_keys(key: &TypeKey, policy: LookupPolicy) -> Vec<TypeKey> {
    let mut candidates = vec![key.clone()];
    if !policy.allows_fallback() {
        return candidates;
    }

    for fallback in [key.star_projected(), key.raw()].into_iter().flatten() {
        if !candidates.contains(&fallback) {
            candidates.push(fallback);
        }
    }
    candidates
}

/// 在条目表中按策略查找
pub fn find_entry<V: Clone>(
    entries: &DashMap<TypeKey, V>,
    key: &TypeKey,
    policy: LookupPolicy,
) -> Option<V> {
    for candidate in candidate_keys(key, policy) {
        if let Some(entry) = entries.get(&candidate) {
            if &candidate != key {
                trace!("通配回退命中: {} -> {}", key, candidate);
            }
            return Some(entry.value().clone());
        }
    }
    None
}
