//! 解析上下文
//!
//! 每次顶层解析调用创建一个独立的 [`ResolutionPath`]，并显式地传入每一层递归，
//! 因此并发的解析之间不会共享循环检测状态。

use infrastructure_common::{DependencyError, DependencyResult, TypeKey};

/// 当前正在构造的类型链，用于检测循环依赖
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionPath {
    chain: Vec<TypeKey>,
}

impl ResolutionPath {
    /// 创建空的解析路径
    pub fn new() -> Self {
        Self::default()
    }

    /// 以给定的类型链创建解析路径
    pub fn seeded<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = TypeKey>,
    {
        Self {
            chain: keys.into_iter().map(|key| key.non_null()).collect(),
        }
    }

    /// 添加类型到解析链
    ///
    /// 可空标记不参与比较，`A` 与 `A?` 视为同一次构造。
    pub fn push(&mut self, key: &TypeKey) -> DependencyResult<()> {
        let key = key.non_null();
        if self.chain.contains(&key) {
            let dependency_chain = self
                .chain
                .iter()
                .chain(std::iter::once(&key))
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(DependencyError::CircularDependency { dependency_chain });
        }
        self.chain.push(key);
        Ok(())
    }

    /// 从解析链中移除最近添加的类型
    pub fn pop(&mut self) -> Option<TypeKey> {
        self.chain.pop()
    }

    pub fn contains(&self, key: &TypeKey) -> bool {
        self.chain.contains(&key.non_null())
    }

    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn keys(&self) -> &[TypeKey] {
        &self.chain
    }
}
