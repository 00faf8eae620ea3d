//! 组件生命周期

use serde::{Deserialize, Serialize};

/// 组件生命周期类型
///
/// 只有单例与瞬时两种，没有更细的作用域生命周期。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    /// 单例模式 - 容器生命周期内始终返回同一个实例
    Singleton,
    /// 瞬时模式 - 每次请求都创建新实例
    #[default]
    Transient,
}

impl Lifetime {
    pub fn is_singleton(self) -> bool {
        matches!(self, Self::Singleton)
    }
}
