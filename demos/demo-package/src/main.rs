//! # 依赖注入容器演示
//!
//! 演示：
//! - 使用 `#[derive(Injectable)]` 生成类型描述符
//! - 从注册表取值、自动构造未注册的类型
//! - 按所有者卸载插件注册
//! - 循环依赖的报告方式
//!
//! 日志级别通过 `RUST_LOG` 控制，例如 `RUST_LOG=debug`。

use component_macros::Injectable;
use di_abstractions::{DependencyError, ServiceProvider, ServiceProviderExt, ServiceRegistry};
use di_impl::{LazyInjection, ModularServiceRegistry, ReflectiveResolver, TypeCatalog};
use infrastructure_common::ContainerConfig;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Injectable)]
struct Clock {
    #[inject(default = 8)]
    utc_offset: i8,
}

#[derive(Debug, Injectable)]
struct Greeter {
    clock: Arc<Clock>,
    greeting: String,
    #[inject(default)]
    exclamations: u32,
}

#[derive(Debug, Injectable)]
struct Reporter {
    greeter: Arc<Greeter>,
    plugin: Option<Arc<PluginBanner>>,
}

#[derive(Debug, Injectable)]
struct PluginBanner {
    text: String,
}

#[derive(Debug, Injectable)]
struct Chicken {
    egg: Arc<Egg>,
}

#[derive(Debug, Injectable)]
struct Egg {
    chicken: Arc<Chicken>,
}

fn catalog() -> Arc<TypeCatalog> {
    let catalog = TypeCatalog::new();
    catalog
        .describe::<Clock>()
        .describe::<Greeter>()
        .describe::<Reporter>()
        .describe::<PluginBanner>()
        .describe::<Chicken>()
        .describe::<Egg>();
    Arc::new(catalog)
}

fn report(resolver: &ReflectiveResolver) -> anyhow::Result<()> {
    let Some(reporter) = resolver.provide_of::<Reporter>()? else {
        anyhow::bail!("Reporter 无法解析");
    };

    let greeter = &reporter.greeter;
    info!(
        "{}{} (UTC{:+})",
        greeter.greeting,
        "!".repeat(greeter.exclamations as usize),
        greeter.clock.utc_offset
    );
    match &reporter.plugin {
        Some(banner) => info!("插件横幅: {}", banner.text),
        None => info!("没有插件横幅"),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ContainerConfig::load()?;
    info!("容器配置: {:?}", config);

    let registry = Arc::new(ModularServiceRegistry::with_config(&config));
    registry.register_instance(String::from("你好"));
    registry.register_instance(2_u32);
    registry.register_instance_owned(
        "banner-plugin",
        PluginBanner {
            text: String::from("由插件提供"),
        },
    );

    let resolver = ReflectiveResolver::with_backing(
        catalog(),
        Arc::clone(&registry) as Arc<dyn ServiceProvider>,
    );

    info!("=== 插件已加载 ===");
    report(&resolver)?;

    let removed = registry.unregister("banner-plugin");
    info!("=== 插件已卸载 ({} 项) ===", removed);
    report(&resolver)?;

    info!("=== 延迟注入 ===");
    let lazy_resolver = resolver.clone();
    let clock = LazyInjection::new(move || lazy_resolver.provide_of::<Clock>());
    info!("已初始化: {}", clock.is_initialized());
    if let Ok(Some(clock)) = &*clock {
        info!("时区: UTC{:+}", clock.utc_offset);
    }

    info!("=== 循环依赖 ===");
    match resolver.provide_of::<Chicken>() {
        Err(DependencyError::CircularDependency { dependency_chain }) => {
            warn!("检测到循环依赖: {}", dependency_chain);
        }
        other => anyhow::bail!("预期循环依赖错误，实际为 {:?}", other.map(|v| v.is_some())),
    }

    Ok(())
}
