//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义实例生产、注册表和构造函数描述的核心接口。
//!
//! ## 核心接口
//!
//! - [`Factory`] - 实例工厂（单例 / 瞬时）
//! - [`ServiceProvider`] - 按类型键提供实例的契约
//! - [`ServiceRegistry`] - 可注册的服务提供者
//! - [`TypeDescriptor`] - 代替运行时反射的构造函数描述
//! - [`ResolutionPath`] - 单次解析的循环检测上下文

pub mod arguments;
pub mod descriptor;
pub mod factory;
pub mod registry;
pub mod resolver;

pub use arguments::*;
pub use descriptor::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;

pub use infrastructure_common::{
    type_key, DependencyError, DependencyResult, Keyed, Lifetime, TypeArg, TypeKey, TypeName,
};
