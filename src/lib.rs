//! llt-logger - 分级的进程内日志工具
//!
//! 每个 [`Logger`] 实例按全局级别阈值格式化并保存日志，
//! [`LevelRegistry`] 记录所有实例，用于跨实例的统计与检索。
//!
//! ## 模块
//!
//! - **level**: 日志级别（error / info / parser / cf / morph / debug）
//! - **registry**: 级别阈值与 logger 实例注册表
//! - **logger**: 日志器
//! - **appender**: 共享输出通道（终端、内存）
//! - **config**: 配置类型，支持 JSON5 / YAML / TOML
//! - **global**: 全局注册表单例
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use llt_logger::{LevelRegistry, LoggerConfig, RegistryConfig};
//!
//! let registry = LevelRegistry::new(RegistryConfig::from_env());
//! let logger = registry.new_logger(LoggerConfig::new().title("Parser").indent(2));
//!
//! logger.log("parsing started");
//! logger.error("unexpected token");
//!
//! assert_eq!(registry.count_errors(), 1);
//! ```

pub mod appender;
pub mod config;
pub mod error;
pub mod global;
pub mod level;
pub mod logger;
pub mod macros;
pub mod registry;

// 重新导出主要的公共 API
pub use appender::{ConsoleAppender, ConsoleAppenderConfig, LogAppender, MemoryAppender, Target};
pub use config::{Indent, LoggerConfig, RegistryConfig, LEVEL_ENV_VAR};
pub use error::LevelError;
pub use level::{normalized_level, valid_level, LevelSpec, Severity, DEFAULT_LEVEL, INVALID_LEVEL};
pub use logger::Logger;
pub use registry::{CountField, LevelRegistry, ERROR_TAG, WARNING_TAG};

pub use global::global_registry;
