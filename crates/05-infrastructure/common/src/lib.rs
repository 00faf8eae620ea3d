//! # Infrastructure Common
//!
//! 依赖注入容器的公共类型和工具。
//!
//! ## 核心组件
//!
//! - [`TypeKey`] - 被请求类型的规范描述，注册表的查找键
//! - [`Keyed`] - 能给出自身类型键的类型
//! - [`SubstitutionMap`] / [`substitute`] - 泛型类型参数替换
//! - [`DependencyError`] - 依赖解析错误
//! - [`ContainerConfig`] - 容器配置

pub mod configuration;
pub mod errors;
pub mod generics;
pub mod lifecycle;
pub mod metadata;

pub use configuration::*;
pub use errors::*;
pub use generics::*;
pub use lifecycle::*;
pub use metadata::*;
