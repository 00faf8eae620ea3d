//! 派生宏、描述符表、注册表与解析器的端到端测试

use component_macros::Injectable;
use di_abstractions::{
    ConstructorDescriptor, DependencyError, Keyed, ServiceProvider, ServiceProviderExt,
    ServiceRegistry, SingletonFactory, TypeDescriptor, TypeKey,
};
use di_impl::{
    EagerInjection, ModularServiceRegistry, ReflectiveResolver, ScopedServiceRegistry, TypeCatalog,
};
use infrastructure_common::{ContainerConfig, LookupPolicy};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

#[derive(Debug, Clone, Injectable)]
pub struct DatabaseUrl {
    #[inject(default = String::from("sqlite::memory:"))]
    url: String,
}

#[derive(Debug, Injectable)]
pub struct Repository {
    url: Arc<DatabaseUrl>,
}

#[derive(Debug, Injectable)]
pub struct AuditLog {
    sink: String,
}

#[derive(Debug, Injectable)]
#[injectable(name = "app::UserService")]
pub struct UserService {
    repository: Arc<Repository>,
    audit: Option<Arc<AuditLog>>,
    #[inject(default = 3)]
    retries: u32,
    #[inject(skip)]
    requests: u64,
}

#[derive(Debug, Injectable)]
pub struct Settings {
    limits: Arc<HashMap<String, u32>>,
}

#[derive(Debug, Injectable)]
pub struct Ping {
    pong: Arc<Pong>,
}

#[derive(Debug, Injectable)]
pub struct Pong {
    ping: Option<Arc<Ping>>,
}

fn catalog() -> Arc<TypeCatalog> {
    let catalog = TypeCatalog::new();
    catalog
        .describe::<DatabaseUrl>()
        .describe::<Repository>()
        .describe::<AuditLog>()
        .describe::<UserService>()
        .describe::<Settings>()
        .describe::<Ping>()
        .describe::<Pong>();
    Arc::new(catalog)
}

#[test]
fn test_derived_graph_resolves_with_defaults() -> anyhow::Result<()> {
    let resolver = ReflectiveResolver::new(catalog());

    let service = resolver
        .provide_of::<UserService>()?
        .ok_or_else(|| anyhow::anyhow!("UserService 未解析"))?;

    assert_eq!(service.repository.url.url, "sqlite::memory:");
    // AuditLog 需要 String，没有后备注册表时不可解析，可空形参为 None
    assert!(service.audit.is_none());
    assert_eq!(service.retries, 3);
    assert_eq!(service.requests, 0);
    Ok(())
}

#[test]
fn test_registered_values_flow_into_derived_types() -> anyhow::Result<()> {
    let registry = Arc::new(ScopedServiceRegistry::new());
    registry.register_instance(String::from("stdout"));
    registry.register_instance(7_u32);
    registry.register_instance(DatabaseUrl {
        url: String::from("postgres://db"),
    });
    let resolver = ReflectiveResolver::with_backing(catalog(), registry);

    let service = resolver
        .provide_of::<UserService>()?
        .ok_or_else(|| anyhow::anyhow!("UserService 未解析"))?;

    assert_eq!(service.repository.url.url, "postgres://db");
    assert_eq!(service.audit.as_ref().map(|a| a.sink.as_str()), Some("stdout"));
    assert_eq!(service.retries, 7);
    Ok(())
}

#[test]
fn test_nullable_back_reference_still_reports_cycle() {
    let resolver = ReflectiveResolver::new(catalog());

    let err = resolver.provide_instance(&Ping::type_key()).unwrap_err();
    match err {
        DependencyError::CircularDependency { dependency_chain } => {
            assert_eq!(
                dependency_chain,
                format!("{0} -> {1} -> {0}", Ping::type_key(), Pong::type_key())
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_star_registration_serves_parameterized_dependency() -> anyhow::Result<()> {
    let registry = Arc::new(ScopedServiceRegistry::new());
    let limits = Arc::new(HashMap::from([(String::from("rps"), 100_u32)]));
    registry.register_factory(
        TypeKey::named("HashMap").with_star().with_star(),
        Arc::new(SingletonFactory::from_arc(Arc::clone(&limits))),
    );
    let resolver = ReflectiveResolver::with_backing(catalog(), registry);

    let settings = resolver
        .provide_of::<Settings>()?
        .ok_or_else(|| anyhow::anyhow!("Settings 未解析"))?;
    assert!(Arc::ptr_eq(&settings.limits, &limits));
    Ok(())
}

#[test]
fn test_exact_only_config_disables_star_fallback() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(file, "lookup_policy = \"exact_only\"")?;
    let config = ContainerConfig::from_file(file.path())?;
    assert_eq!(config.lookup_policy, LookupPolicy::ExactOnly);

    let registry = Arc::new(ScopedServiceRegistry::with_config(&config));
    registry.register_factory(
        TypeKey::named("HashMap").with_star().with_star(),
        Arc::new(SingletonFactory::new(HashMap::<String, u32>::new())),
    );
    let resolver = ReflectiveResolver::with_backing(catalog(), registry);

    // HashMap 是不透明类型，精确查找失败后 Settings 的必需形参无法解析
    let err = resolver.provide_of::<Settings>().unwrap_err();
    assert!(matches!(err, DependencyError::UnresolvedParameter { .. }));
    Ok(())
}

#[test]
fn test_plugin_owned_services_are_unloaded() -> anyhow::Result<()> {
    let modular = Arc::new(ModularServiceRegistry::new());
    modular.register_instance(String::from("host-sink"));
    modular.register_instance_owned(
        "plugin",
        AuditLog {
            sink: String::from("plugin-sink"),
        },
    );
    let resolver =
        ReflectiveResolver::with_backing(catalog(), Arc::clone(&modular) as Arc<dyn ServiceProvider>);

    let audit = resolver
        .provide_of::<AuditLog>()?
        .ok_or_else(|| anyhow::anyhow!("AuditLog 未解析"))?;
    assert_eq!(audit.sink, "plugin-sink");

    assert_eq!(modular.unregister("plugin"), 1);
    let audit = resolver
        .provide_of::<AuditLog>()?
        .ok_or_else(|| anyhow::anyhow!("AuditLog 未解析"))?;
    assert_eq!(audit.sink, "host-sink");
    Ok(())
}

#[test]
fn test_hand_written_generic_descriptor_with_instantiation() -> anyhow::Result<()> {
    #[derive(Debug)]
    struct Named<T> {
        inner: Arc<T>,
    }

    let catalog = TypeCatalog::new();
    catalog.describe::<DatabaseUrl>().add_instantiation(
        TypeKey::named("app::Named").with_arg(DatabaseUrl::type_key()),
        TypeDescriptor::class("app::Named").type_param("T").constructor(
            ConstructorDescriptor::builder()
                .param("inner", TypeKey::param("T"))
                .build(|args| {
                    Ok(Named::<DatabaseUrl> {
                        inner: args.get("inner")?,
                    })
                }),
        ),
    );
    let resolver = ReflectiveResolver::new(Arc::new(catalog));

    let named = resolver
        .provide::<Named<DatabaseUrl>>(
            &TypeKey::named("app::Named").with_arg(DatabaseUrl::type_key()),
        )?
        .ok_or_else(|| anyhow::anyhow!("Named<DatabaseUrl> 未解析"))?;
    assert_eq!(named.inner.url, "sqlite::memory:");
    Ok(())
}

#[test]
fn test_eager_injection_holds_resolved_value() -> anyhow::Result<()> {
    let resolver = ReflectiveResolver::new(catalog());
    let repository = EagerInjection::new(
        resolver
            .provide_of::<Repository>()?
            .ok_or_else(|| anyhow::anyhow!("Repository 未解析"))?,
    );

    assert_eq!(repository.url.url, "sqlite::memory:");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_share_one_resolver() -> anyhow::Result<()> {
    let registry = Arc::new(ModularServiceRegistry::new());
    registry.register_instance(String::from("stdout"));
    let resolver = Arc::new(ReflectiveResolver::with_backing(catalog(), registry));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let resolver = Arc::clone(&resolver);
        handles.push(tokio::task::spawn_blocking(move || {
            resolver.provide_of::<UserService>()
        }));
    }

    for handle in handles {
        let service = handle.await??.ok_or_else(|| anyhow::anyhow!("UserService 未解析"))?;
        assert!(service.audit.is_some());
    }
    Ok(())
}
