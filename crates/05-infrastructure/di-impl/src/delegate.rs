//! 注入值持有者
//!
//! [`EagerInjection`] 从创建起持有值；[`LazyInjection`] 在首次访问时调用供应函数，
//! 之后一直返回缓存的值。两者都可以通过 `Deref` 直接当作内部值使用。

use once_cell::sync::OnceCell;
use std::fmt;
use std::ops::Deref;

/// 立即注入的值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EagerInjection<T> {
    value: T,
}

impl<T> EagerInjection<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Deref for EagerInjection<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

/// 延迟注入的值
///
/// 供应函数最多被调用一次，多个线程并发首次访问时只有一个线程执行它。
pub struct LazyInjection<T> {
    cell: OnceCell<T>,
    supplier: Box<dyn Fn() -> T + Send + Sync>,
}

impl<T> LazyInjection<T> {
    pub fn new<F>(supplier: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            supplier: Box::new(supplier),
        }
    }

    /// 获取值，首次访问时计算
    pub fn get(&self) -> &T {
        self.cell.get_or_init(|| (self.supplier)())
    }

    /// 值是否已经计算
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Deref for LazyInjection<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T: fmt::Debug> fmt::Debug for LazyInjection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => f.debug_tuple("LazyInjection").field(value).finish(),
            None => f.write_str("LazyInjection(<uninit>)"),
        }
    }
}
