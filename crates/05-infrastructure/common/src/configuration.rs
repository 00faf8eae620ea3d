//! 容器配置
//!
//! 配置来源按优先级从低到高：默认值、`config/container.*` 文件、`DI_` 前缀的环境变量。

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error};

/// 默认的宿主所有者标识
pub const HOST_OWNER: &str = "host";

/// 注册表的查找策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupPolicy {
    /// 精确匹配失败后回退到通配投影与原始类型
    ///
    /// 回退是类型不安全的：注册在通配键下的值必须兼容所有实例化。
    #[default]
    StarProjected,
    /// 只做精确匹配
    ExactOnly,
}

impl LookupPolicy {
    pub fn allows_fallback(self) -> bool {
        matches!(self, Self::StarProjected)
    }
}

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 注册表查找策略
    pub lookup_policy: LookupPolicy,
    /// 未指定所有者时使用的所有者标识
    pub host_owner: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            lookup_policy: LookupPolicy::default(),
            host_owner: HOST_OWNER.to_string(),
        }
    }
}

impl ContainerConfig {
    /// 从默认位置加载配置
    pub fn load() -> ConfigResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/container").required(false));
        Self::build(builder)
    }

    /// 从指定文件加载配置，环境变量仍可覆盖
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            Err(e) => {
                error!("读取配置文件失败: {}: {}", path.display(), e);
                return Err(e.into());
            }
        };
        if !metadata.is_file() {
            error!("配置路径不是文件: {}", path.display());
            return Err(std::io::Error::other(format!("不是文件: {}", path.display())).into());
        }

        let builder = config::Config::builder().add_source(config::File::from(path));
        Self::build(builder)
    }

    /// 从 TOML 文本解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml));
        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> ConfigResult<Self> {
        let settings = builder
            .add_source(
                config::Environment::with_prefix("DI")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| {
                error!("容器配置构建失败: {}", e);
                ConfigError::ParseError {
                    source: Box::new(e),
                }
            })?;

        let config: Self = settings.try_deserialize().map_err(|e| {
            error!("容器配置绑定失败: {}", e);
            ConfigError::ParseError {
                source: Box::new(e),
            }
        })?;

        config.validate()?;
        debug!("容器配置加载完成: {:?}", config);
        Ok(config)
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.host_owner.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "host_owner 不能为空".to_string(),
            });
        }
        Ok(())
    }
}
