//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 依赖注入错误类型
///
/// 所有变体对当前 `provide` 调用都是致命的，不会重试。
/// 是否可以在参数解析时被吞掉由 [`DependencyError::is_recoverable`] 决定。
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("存在多个指定注入构造函数: {type_name}")]
    AmbiguousConstructor { type_name: String },

    #[error("类型不可实例化: {type_name}, 原因: {reason}")]
    NotInstantiable { type_name: String, reason: String },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("无法解析必需参数 {parameter}: {parameter_type}, 所属类型: {owner}")]
    UnresolvedParameter {
        parameter: String,
        parameter_type: String,
        owner: String,
    },

    #[error("组件创建失败: {type_name}, 原因: {message}")]
    ConstructionFailed { type_name: String, message: String },

    #[error("参数类型不匹配: {parameter}, 期望 {expected}")]
    TypeMismatch { parameter: String, expected: String },
}

impl DependencyError {
    /// 创建不可实例化错误
    pub fn not_instantiable(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NotInstantiable {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// 创建组件创建失败错误
    pub fn construction_failed(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConstructionFailed {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// 递归解析参数失败时，该错误能否降级为“参数未解析”
    ///
    /// 只有“类型不可构造 / 找不到”类的结果可以降级；循环依赖、构造函数歧义、
    /// 构造失败和类型不匹配始终向上传播。
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotInstantiable { .. } | Self::UnresolvedParameter { .. }
        )
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
