//! # Component Macros
//!
//! 这个 crate 提供生成依赖注入类型描述符的派生宏，代替运行时反射。
//!
//! ## 核心宏
//!
//! - [`Injectable`](derive@Injectable) - 生成 `Keyed` 与 `Describe` 实现
//!
//! 生成的代码引用 `::di_abstractions`，使用方需要直接依赖该 crate。
//!
//! ## 使用示例
//!
//! ```ignore
//! use component_macros::Injectable;
//! use std::sync::Arc;
//!
//! #[derive(Injectable)]
//! pub struct Repository {
//!     url: String,
//! }
//!
//! #[derive(Injectable)]
//! #[injectable(name = "app::UserService")]
//! pub struct UserService {
//!     repository: Arc<Repository>,
//!     audit: Option<Arc<AuditLog>>,
//!     #[inject(default = 3)]
//!     retries: u32,
//!     #[inject(skip)]
//!     hits: std::sync::atomic::AtomicU64,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod injectable;
mod utils;

/// 可注入类型派生宏
///
/// 为具名字段结构体（或单元结构体）实现 `Keyed` 与 `Describe`：
/// 类型名默认为 `module_path!()::类型名`，描述符包含一个主构造函数，
/// 形参按字段声明顺序排列。
///
/// # 字段形态
///
/// - `Arc<X>` - 共享依赖，类型键取自 `X`
/// - `Option<Arc<X>>` - 可空依赖，未解析时为 `None`
/// - `X` - 从解析结果克隆的值，要求 `X: Clone`
/// - `Option<X>` - 可空的克隆值
///
/// # 属性
///
/// - `#[injectable(name = "...")]` - 自定义类型名
/// - `#[inject(default)]` - 未解析时使用 `Default::default()`
/// - `#[inject(default = expr)]` - 未解析时使用给定表达式
/// - `#[inject(skip)]` - 不作为形参，使用 `Default::default()`
///
/// 泛型结构体、元组结构体和枚举会产生编译错误。
#[proc_macro_derive(Injectable, attributes(injectable, inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    injectable::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
