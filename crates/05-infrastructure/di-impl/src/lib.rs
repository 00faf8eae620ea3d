//! # 依赖注入具体实现
//!
//! 提供两种服务注册表、类型描述符表和反射式自动解析器。
//!
//! - [`ScopedServiceRegistry`] - 扁平的作用域注册表
//! - [`ModularServiceRegistry`] - 带所有者标记、可按所有者卸载的注册表
//! - [`TypeCatalog`] - 可构造类型的描述符表
//! - [`ReflectiveResolver`] - 先查后备注册表，未命中时按构造函数自动构造
//! - [`EagerInjection`] / [`LazyInjection`] - 注入值持有者
//!
//! ```
//! use di_abstractions::{ConstructorDescriptor, ServiceProviderExt, ServiceRegistry, TypeDescriptor, TypeKey};
//! use di_impl::{ReflectiveResolver, ScopedServiceRegistry, TypeCatalog};
//! use std::sync::Arc;
//!
//! struct Greeter {
//!     name: String,
//! }
//!
//! let catalog = TypeCatalog::new();
//! catalog.add(TypeDescriptor::class("doc::Greeter").constructor(
//!     ConstructorDescriptor::builder()
//!         .param("name", TypeKey::named("String"))
//!         .build(|args| Ok(Greeter { name: args.cloned("name")? })),
//! ));
//!
//! let registry = Arc::new(ScopedServiceRegistry::new());
//! registry.register_instance(String::from("world"));
//!
//! let resolver = ReflectiveResolver::with_backing(Arc::new(catalog), registry);
//! let greeter = resolver
//!     .provide::<Greeter>(&TypeKey::named("doc::Greeter"))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(greeter.name, "world");
//! ```

pub mod catalog;
pub mod delegate;
pub mod lookup;
pub mod modular;
pub mod resolver;
pub mod scoped;

pub use catalog::TypeCatalog;
pub use delegate::{EagerInjection, LazyInjection};
pub use lookup::{candidate_keys, find_entry};
pub use modular::ModularServiceRegistry;
pub use resolver::ReflectiveResolver;
pub use scoped::ScopedServiceRegistry;
